use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Contents of `plugin.json`, sent verbatim to the Plotune core on registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub name: String,
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub mode: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub cmd: Vec<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub git_path: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub post_url: String,
    #[serde(default)]
    pub webpage: String,
    pub file_formats: Vec<String>,
    #[serde(default)]
    pub ask_form: bool,
    pub connection: Connection,
    #[serde(default)]
    pub configuration: Value,
}

fn enabled_default() -> bool {
    true
}

impl ExtensionConfig {
    /// Whether the file extension of `path` is listed in `file_formats`.
    /// Entries may be written with or without the leading dot.
    pub fn accepts(&self, path: &str) -> bool {
        let ext = match Path::new(path).extension() {
            Some(ext) => ext.to_string_lossy().to_ascii_lowercase(),
            None => return false,
        };
        self.file_formats
            .iter()
            .any(|f| f.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Connection {
    pub ip: String,
    pub port: u16,
    pub target: String,
    pub target_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "PLW Reader",
        "id": "plw_reader",
        "version": "0.1.0",
        "mode": "offline",
        "file_formats": [".plw", "PLX"],
        "connection": { "ip": "127.0.0.1", "port": 0, "target": "127.0.0.1", "target_port": 8000 }
    }"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: ExtensionConfig = serde_json::from_str(SAMPLE).unwrap();
        assert!(config.enabled);
        assert_eq!(config.connection.target_port, 8000);
        assert!(config.configuration.is_null());
    }

    #[test]
    fn test_accepts() {
        let config: ExtensionConfig = serde_json::from_str(SAMPLE).unwrap();
        assert!(config.accepts("/data/run.PLW"));
        assert!(config.accepts("run.plx"));
        assert!(!config.accepts("run.csv"));
        assert!(!config.accepts("run"));
    }
}
