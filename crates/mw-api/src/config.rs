//! API server configuration.
//!
//! Loaded from an optional TOML file (`MEALWISE_CONFIG`), then overridden
//! by environment variables. The provider key is read separately from
//! `OPENAI_API_KEY` and never stored in config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::analysis::DEFAULT_MAX_BATCH_SIZE;
use crate::inference::OpenAiConfig;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the persisted cache document.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Distinct uncached items sent to the model per batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Allowed CORS origins (e.g., ["http://localhost:5173"]). Empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Chat completions provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("meal_analysis_cache.json")
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

impl ApiConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// File named by `MEALWISE_CONFIG` (or defaults), then env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("MEALWISE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(path) = var("MEAL_CACHE_PATH") {
            self.cache_path = PathBuf::from(path);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.openai.model = model;
        }
    }

    /// Deadline applied to every model call.
    pub fn call_timeout(&self) -> Duration {
        self.openai.timeout()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_path: default_cache_path(),
            max_batch_size: default_max_batch_size(),
            cors_origins: vec![],
            openai: OpenAiConfig::default(),
        }
    }
}
