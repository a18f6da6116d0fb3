//! `markov.toml` parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "markov.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkovConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which model the commands operate on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model document; relative paths are taken from the config's directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Expected network name. A loaded model with another name is reported.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive, e.g. `info` or `markov_infer=debug`.
    #[serde(default)]
    pub level: Option<String>,
}

impl MarkovConfig {
    /// Search upward from `start_dir` for `markov.toml`, parse it and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: MarkovConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing markov.toml")
    }

    /// The configured model file, resolved against `config_dir`.
    pub fn model_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.model.file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                config_dir.join(file)
            }
        })
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}
