//! Server configuration.
//!
//! Values come from built-in defaults, an optional YAML file named by
//! `HEARTH_CONFIG`, the `LISTEN` environment variable and finally the
//! `--directory` command-line flag, in increasing order of precedence.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "HEARTH_CONFIG";

/// Environment variable overriding the listen address.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to, e.g. "127.0.0.1:4221"
    pub listen_addr: String,
    /// Seconds a connection may stay silent before the server closes it
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Root for `/files/{name}` lookups
    pub directory: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4221".to_string(),
            idle_timeout_secs: 5,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// Reads the YAML file named by `HEARTH_CONFIG` if set, then applies the
    /// `LISTEN` override. Command-line flags are applied separately with
    /// [`Config::apply_args`].
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    /// Parses a YAML config file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies command-line overrides. Only `--directory <path>` is known;
    /// anything else is ignored.
    pub fn apply_args<I>(&mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--directory" {
                let dir = args
                    .next()
                    .context("--directory requires a path argument")?;
                self.files.directory = PathBuf::from(dir);
            }
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout_secs)
    }
}
