use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BpError;

pub const URL_ENV: &str = "BEATPLAN_URL";
pub const API_KEY_ENV: &str = "BEATPLAN_API_KEY";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    /// Never attempt direct writes; always queue.
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct QueueConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub url: String,
    pub api_key: String,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("beatplan").join("config.toml"))
}

/// Loads the user config. A missing file yields the defaults.
pub fn load_config() -> Result<Config, BpError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config, BpError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => return Err(err.into()),
    };

    Ok(toml::from_str(&content)?)
}

/// Backend connection settings: environment first, then config file.
pub fn resolve_backend(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Option<BackendSettings> {
    let pick = |var: &str, fallback: &Option<String>| {
        env(var)
            .filter(|v| !v.is_empty())
            .or_else(|| fallback.clone().filter(|v| !v.is_empty()))
    };

    Some(BackendSettings {
        url: pick(URL_ENV, &config.backend_url)?,
        api_key: pick(API_KEY_ENV, &config.api_key)?,
    })
}

pub fn resolve_queue_path(cli_path: Option<PathBuf>, config: &Config) -> PathBuf {
    cli_path
        .or_else(|| config.queue.path.clone())
        .unwrap_or_else(default_queue_path)
}

pub fn default_queue_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("beatplan")
        .join("queue")
}
