//! Configuration management for insightboard.
//!
//! Settings come from built-in defaults, then an optional config file, then
//! environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "insightboard.toml";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Completion endpoints, models and request limits.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:3030".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            bind: default_bind(),
            source_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut settings: Settings = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        settings.source_path = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Apply environment variable overrides.
    ///
    /// `INSIGHT_BIND` sets the listen address; see
    /// [`LlmConfig::with_env_overrides`] for the rest.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.llm = self.llm.with_overrides(&lookup);
        if let Some(bind) = lookup("INSIGHT_BIND") {
            self.bind = bind;
        }
        self
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file (`--config`).
    pub config_path: Option<PathBuf>,
}

/// Load settings with explicit options.
///
/// An explicit config file must load; the default file is optional and a
/// broken one only logs a warning.
pub async fn load_settings_with_options(options: LoadOptions) -> anyhow::Result<Settings> {
    let settings = match options.config_path {
        Some(path) => Settings::load_from_path(&path)
            .await
            .map_err(anyhow::Error::msg)?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                tracing::debug!("Found config in working directory: {}", path.display());
                Settings::load_from_path(&path).await.unwrap_or_else(|e| {
                    tracing::warn!("Ignoring {}: {}", path.display(), e);
                    Settings::default()
                })
            } else {
                Settings::default()
            }
        }
    };

    Ok(settings.with_env_overrides())
}
