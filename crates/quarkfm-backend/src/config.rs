use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use quarkfm_bridge::config::ClientConfig;
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "QUARKFM_SERVER_URL";

const CONFIG_FILE_NAME: &str = "client.toml";

/// Errors that can occur while loading or resolving the client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the configuration to TOML (e.g., when saving changes).
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn config_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("dev", "quarkfm", "quarkfm") {
        Some(dirs) => Ok(dirs.config_dir().join(CONFIG_FILE_NAME)),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads the client configuration from the user's configuration directory and
/// applies the environment override.
pub async fn load_config() -> Result<ClientConfig, ConfigError> {
    let path = config_path()?;
    log::info!("Loading configuration from {path:?}");
    let mut config = load_config_from(&path).await?;

    if let Ok(server_url) = std::env::var(SERVER_URL_ENV) {
        if !server_url.trim().is_empty() {
            log::info!("Using server URL from {SERVER_URL_ENV}: {server_url}");
            config.server_url = server_url.trim().to_owned();
        }
    }

    Ok(config)
}

/// Reads the configuration at `path`, writing the defaults there first when
/// the file does not exist yet.
pub async fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    if path.exists() {
        let contents = read_to_string(path).await?;
        let config: ClientConfig = toml::from_str(&contents)?;
        return Ok(config);
    }

    let config = ClientConfig::default();
    if let Some(parent) = path.parent() {
        create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(config)
}

/// Saves the configuration to the user's configuration directory.
pub async fn save_config(config: &ClientConfig) -> Result<(), ConfigError> {
    save_config_to(&config_path()?, config).await
}

/// Serializes `config` to pretty-printed TOML and writes it to `path`,
/// overwriting any existing file.
pub async fn save_config_to(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).await?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    let contents = toml::to_string_pretty(config)?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(())
}
