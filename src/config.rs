use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,

    // semicolon-delimited export used to seed the current position
    pub csv_path: Option<PathBuf>,
    pub device_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 5000,
            csv_path: None,
            device_id: "GPS-TRACKER-001".to_string(),
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    let config = toml::from_str(&data).context("Failed to parse config")?;
    Ok(config)
}

/// Load the given config file. Without one, `config.toml` is used if it exists.
pub fn resolve(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load(path),
        None if Path::new(DEFAULT_PATH).exists() => load(Path::new(DEFAULT_PATH)),
        None => Ok(Config::default()),
    }
}
