// Config module for shared configuration utilities

use crate::constants;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub fn data_dir() -> PathBuf {
    std::env::var("AK_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(constants::DATA_DIR))
}

pub fn images_dir() -> PathBuf {
    data_dir().join(constants::IMAGES_DIR)
}

pub fn defaults_dir() -> PathBuf {
    data_dir().join(constants::DEFAULTS_DIR)
}

pub fn config_path() -> PathBuf {
    data_dir().join(constants::CONFIG_FILE)
}

/// Settings read from `assetkeeper.toml`, with environment overrides applied.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub language: Option<String>,
    pub prefetch_jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            language: None,
            prefetch_jobs: constants::DEFAULT_PREFETCH_JOBS,
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let mut settings = Self::from_file(&config_path())?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Read settings from a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("AK_API_URL") {
            self.api_url = url;
        }
        if let Some(language) = var("AK_LANGUAGE") {
            self.language = Some(language).filter(|l| !l.is_empty());
        }
        if self.prefetch_jobs == 0 {
            self.prefetch_jobs = 1;
        }
    }
}
