//! User configuration, read from `~/.taskform/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where `todos.json` and the log file live. Defaults to `~/.taskform`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive used when `TASKFORM_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(taskform_dir)
    }
}

/// `~/.taskform`, or `./.taskform` when no home directory is known.
pub fn taskform_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".taskform")
}

pub fn default_config_path() -> PathBuf {
    taskform_dir().join("config.toml")
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Missing or malformed files fall back to defaults.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match fs::read_to_string(path)
        .map_err(Into::into)
        .and_then(|s| parse_config(&s))
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring config {}: {}", path.display(), err);
            Config::default()
        }
    }
}
