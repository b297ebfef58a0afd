use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use plw_reader::PlwReader;

#[derive(Clone)]
pub struct ChannelInfo {
    pub reader: Arc<PlwReader>,
    pub original_name: String, // column name inside the decoded file
}

#[derive(Clone)]
pub struct AppState {
    // Maps unique_name -> ChannelInfo
    pub channels: Arc<RwLock<HashMap<String, ChannelInfo>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers every channel of `reader`, suffixing names already taken.
    /// Returns the exposed names in channel order.
    pub async fn register_reader(&self, reader: Arc<PlwReader>) -> Vec<String> {
        let mut channels = self.channels.write().await;
        let mut exposed = Vec::new();

        for (_index, name) in reader.list_channels() {
            let final_name = unique_name(&channels, name);
            channels.insert(
                final_name.clone(),
                ChannelInfo {
                    reader: reader.clone(),
                    original_name: name.to_string(),
                },
            );
            exposed.push(final_name);
        }

        exposed
    }

    /// Sorted column names of the file registered under `id`.
    pub async fn headers_for(&self, id: &str) -> Option<Vec<String>> {
        let channels = self.channels.read().await;
        let mut headers: Vec<String> = channels
            .values()
            .filter(|info| reader_id(&info.reader) == id)
            .map(|info| info.original_name.clone())
            .collect();

        if headers.is_empty() {
            return None;
        }
        headers.sort();
        headers.dedup();
        Some(headers)
    }
}

/// Id handed to clients for a decoded file; stable while the file stays registered.
pub fn reader_id(reader: &Arc<PlwReader>) -> String {
    format!("{:x}", Arc::as_ptr(reader) as usize)
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_name(taken: &HashMap<String, ChannelInfo>, base: &str) -> String {
    if !taken.contains_key(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{}_{}", base, i))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn reader(channels: u32) -> Arc<PlwReader> {
        // Header-only file: version 5, zero records
        let mut bytes = vec![0u8; 1684];
        bytes[0..2].copy_from_slice(&1684u16.to_le_bytes());
        bytes[42..46].copy_from_slice(&5u32.to_le_bytes());
        bytes[46..50].copy_from_slice(&channels.to_le_bytes());
        bytes[566..568].copy_from_slice(&5u16.to_le_bytes());
        bytes[586..590].copy_from_slice(&737_425u32.to_le_bytes());
        Arc::new(PlwReader::decode(Cursor::new(bytes), PathBuf::from("a.plw")).unwrap())
    }

    #[tokio::test]
    async fn test_names_stay_unique_across_files() {
        let state = AppState::new();

        let first = state.register_reader(reader(2)).await;
        assert_eq!(first, vec!["channel_1", "channel_2"]);

        let second = state.register_reader(reader(1)).await;
        assert_eq!(second, vec!["channel_1_1"]);

        let channels = state.channels.read().await;
        assert_eq!(channels.len(), 3);
        assert_eq!(channels["channel_1_1"].original_name, "channel_1");
    }

    #[tokio::test]
    async fn test_reader_id_resolves_headers() {
        let state = AppState::new();
        let first = reader(2);
        let second = reader(1);
        state.register_reader(first.clone()).await;
        state.register_reader(second.clone()).await;

        assert_eq!(
            state.headers_for(&reader_id(&first)).await,
            Some(vec!["channel_1".to_string(), "channel_2".to_string()])
        );
        assert_eq!(
            state.headers_for(&reader_id(&second)).await,
            Some(vec!["channel_1".to_string()])
        );
        assert_eq!(state.headers_for("not-an-id").await, None);
    }
}
