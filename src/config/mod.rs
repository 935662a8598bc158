//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PalaverError, Result};
use crate::memory::DEFAULT_MAX_SIZE;
use crate::types::GenerationSettings;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolved settings for building an agent and its provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub api_key: Option<String>,
    /// `None` means the provider's default endpoint.
    pub base_url: Option<String>,
    /// Number of most recent messages sent with each model call.
    pub max_memory: usize,
    pub connect_timeout_secs: u64,
    /// Attempts for opening a model call, including the first.
    pub max_retries: u32,
    pub settings: GenerationSettings,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            max_memory: DEFAULT_MAX_SIZE,
            connect_timeout_secs: 10,
            max_retries: 3,
            settings: GenerationSettings::default(),
        }
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("max_memory", &self.max_memory)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("settings", &self.settings)
            .finish()
    }
}

impl AgentConfig {
    /// `$HOME/.palaver/config.toml`, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".palaver").join("config.toml"))
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }

    /// Resolve the full stack: defaults, then the config file, then `.env`
    /// and the process environment.
    ///
    /// An explicit `path` must exist; the default path is skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    tracing::debug!(path = %path.display(), "loading config file");
                    Self::from_file(&path)?
                }
                _ => Self::default(),
            },
        };
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(model) = lookup("PALAVER_MODEL").filter(|v| !v.is_empty()) {
            self.model = model;
        }
        if let Some(raw) = lookup("PALAVER_MAX_MEMORY") {
            self.max_memory = raw.trim().parse().map_err(|_| {
                PalaverError::Configuration(format!(
                    "PALAVER_MAX_MEMORY must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        Ok(())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_memory(mut self, max_memory: usize) -> Self {
        self.max_memory = max_memory;
        self
    }
}
