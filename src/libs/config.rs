//! Configuration management for the tasklist server and client.
//!
//! Settings live in `config.json` inside the platform data directory resolved
//! by [`DataStorage`]. A missing file is not an error: defaults are used, so
//! `tasklist serve` works on a fresh machine with no setup.
//!
//! ## Sources
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. Built-in defaults
//! 2. `config.json`
//! 3. Environment variables (a `.env` file is loaded first by `main`):
//!    `TASKLIST_HOST`, `TASKLIST_PORT`, `TASKLIST_DB`, `TASKLIST_URL`,
//!    `TASKLIST_TIMEOUT`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasklist::libs::config::Config;
//!
//! let config = Config::load()?;
//! println!("listening on {}", config.server.bind_address());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "tasklist.db";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP server settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file path. When unset the file lives in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Client store settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Root URL of the server, without the `/api` suffix.
    pub base_url: String,
    /// Upper bound for any single request before it fails with a network error.
    pub timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: format!("http://{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(PathBuf::from(path)),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Reads `config.json`, falling back to defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(&config_file_path)?;
        let config: Config =
            serde_json::from_str(&config_str).with_context(|| format!("cannot parse {}", config_file_path.display()))?;
        Ok(config)
    }

    /// [`Config::read`] with environment overrides applied on top.
    pub fn load() -> Result<Config> {
        let mut config = Self::read()?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("TASKLIST_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("TASKLIST_PORT") {
            self.server.port = port.parse().with_context(|| format!("TASKLIST_PORT is not a port: {}", port))?;
        }
        if let Ok(db) = env::var("TASKLIST_DB") {
            self.server.database = Some(db);
        }
        if let Ok(url) = env::var("TASKLIST_URL") {
            self.client.base_url = url;
        }
        if let Ok(timeout) = env::var("TASKLIST_TIMEOUT") {
            self.client.timeout_secs = timeout
                .parse()
                .with_context(|| format!("TASKLIST_TIMEOUT is not a number of seconds: {}", timeout))?;
        }
        Ok(())
    }
}
