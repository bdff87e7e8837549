//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File-level configuration for get-papers-list
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub eutils: EutilsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EutilsConfig {
    pub base_url: String,
    pub database: String,
    pub max_results: usize,
    pub batch_size: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        let defaults = paperfetch_pubmed::Config::default();
        Self {
            base_url: defaults.base_url,
            database: defaults.database,
            max_results: defaults.max_results,
            batch_size: defaults.batch_size,
            fetch_timeout_secs: defaults.fetch_timeout.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./paperfetch.toml (current directory)
    /// 2. ~/.config/paperfetch/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("paperfetch.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "paperfetch") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Runtime configuration for the PubMed pipeline
    pub fn pipeline(&self) -> paperfetch_pubmed::Config {
        let eutils = &self.eutils;
        if eutils.batch_size > paperfetch_pubmed::config::MAX_IDS_PER_REQUEST {
            log::warn!(
                "batch_size {} exceeds the efetch limit, using {}",
                eutils.batch_size,
                paperfetch_pubmed::config::MAX_IDS_PER_REQUEST
            );
        }
        paperfetch_pubmed::Config {
            base_url: eutils.base_url.clone(),
            database: eutils.database.clone(),
            max_results: eutils.max_results,
            batch_size: eutils.batch_size,
            fetch_timeout: Duration::from_secs(eutils.fetch_timeout_secs),
        }
    }
}
