//! Shared configuration for the netinv CLI.
//!
//! A TOML file plus `NETINV_`-prefixed environment overrides control where
//! the inventory lives, the default output settings, and the optional login
//! users table. Values the CLI can also override per-invocation (output,
//! data file) resolve there from `GlobalOpts`.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Inventory data file. Defaults to the platform data directory.
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Optional login gate. When `users` is non-empty, commands that touch the
/// inventory require a username/password from this table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Username -> password pairs.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl AuthConfig {
    pub fn required(&self) -> bool {
        !self.users.is_empty()
    }

    /// Check one credential pair against the table.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "netinv", "netinv")
}

/// Location of the config file (`config.toml` under the platform config dir).
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(".netinv/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the inventory data file: explicit config value, else
/// `inventory.json` under the platform data dir.
pub fn data_path(config: &Config) -> PathBuf {
    if let Some(ref path) = config.data_file {
        return path.clone();
    }
    project_dirs().map_or_else(
        || PathBuf::from(".netinv/inventory.json"),
        |dirs| dirs.data_dir().join("inventory.json"),
    )
}

// ── Load / save ─────────────────────────────────────────────────────

/// Load configuration, falling back to defaults when the file is missing
/// or malformed. Environment variables (`NETINV_*`) override file values.
pub fn load_config_or_default() -> Config {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("NETINV_"))
        .extract()
        .unwrap_or_default()
}

/// Write the config file, creating parent directories as needed.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(config)?;
    std::fs::write(&path, rendered)?;
    Ok(())
}
