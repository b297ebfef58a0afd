use anyhow::{anyhow, Context, Result};
use std::sync::OnceLock;
use tokio::fs;
use tokio::net::TcpListener;
use tracing::info;

use crate::models::extension_model::ExtensionConfig;

const CONFIG_ENV: &str = "PLW_READER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "plugin.json";

static CONFIG_CACHE: OnceLock<ExtensionConfig> = OnceLock::new();
static CORE_URL: OnceLock<String> = OnceLock::new();

/// Loads `plugin.json` (or `$PLW_READER_CONFIG`), binds the listener and
/// caches the config with the port actually bound.
pub async fn init_config_and_bind() -> Result<TcpListener> {
    let file_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let data = fs::read_to_string(&file_path)
        .await
        .with_context(|| format!("reading {file_path}"))?;

    let mut config: ExtensionConfig =
        serde_json::from_str(&data).with_context(|| format!("parsing {file_path}"))?;

    let bind_addr = format!("{}:{}", config.connection.ip, config.connection.port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;

    // Port 0 in the config means "any free port"
    config.connection.port = listener.local_addr()?.port();

    let url = format!("{}:{}", config.connection.target, config.connection.target_port);

    CORE_URL
        .set(url)
        .map_err(|_| anyhow!("core URL already initialized"))?;

    info!(
        "Config {} initialized with dynamic port: {}",
        file_path, config.connection.port
    );

    CONFIG_CACHE
        .set(config)
        .map_err(|_| anyhow!("config already initialized"))?;

    Ok(listener)
}

/// Panics if called before [`init_config_and_bind`].
pub fn get_cached_config() -> &'static ExtensionConfig {
    CONFIG_CACHE.get().expect("Config not initialized")
}

pub fn get_core_url() -> &'static String {
    CORE_URL.get().expect("Core URL not initialized")
}

pub fn try_cached_config() -> Option<&'static ExtensionConfig> {
    CONFIG_CACHE.get()
}
