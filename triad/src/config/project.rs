use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{Backend, ModelSettings};

/// Config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".triad.toml";

/// Directory under `$HOME` holding the global `config.toml`.
pub const GLOBAL_CONFIG_DIR: &str = ".triad";

/// Model configuration read from TOML files.
///
/// API keys are deliberately not part of this file format; they are supplied per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// LLM provider to use (e.g., "anthropic", "openai")
    #[serde(default)]
    pub provider: Option<String>,

    /// Model to use
    #[serde(default)]
    pub model: Option<String>,

    /// Maximum tokens generated per stage
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,

    /// API endpoint override (openai provider only)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProjectConfig {
    /// Load config with precedence: project file > global file > defaults.
    pub fn load() -> Result<Self> {
        let global = std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(GLOBAL_CONFIG_DIR).join("config.toml"));
        let project = std::env::current_dir()
            .ok()
            .map(|dir| dir.join(PROJECT_CONFIG_FILE));

        Self::load_layered(global.as_deref(), project.as_deref())
    }

    /// Load and merge the given files; missing files are skipped.
    pub fn load_layered(global: Option<&Path>, project: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        for path in [global, project].into_iter().flatten() {
            if path.is_file() {
                debug!(path = %path.display(), "loading config file");
                config = config.merge(Self::load_from_path(path)?);
            }
        }

        Ok(config)
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            model: other.model.or(self.model),
            max_tokens: other.max_tokens.or(self.max_tokens),
            temperature: other.temperature.or(self.temperature),
            base_url: other.base_url.or(self.base_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Resolve into concrete settings, filling gaps with defaults.
    pub fn model_settings(&self) -> Result<ModelSettings> {
        let defaults = ModelSettings::default();
        let backend = match self.provider.as_deref() {
            Some(name) => name.parse::<Backend>()?,
            None => defaults.backend,
        };

        let settings = ModelSettings {
            backend,
            model: self.model.clone(),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
        };
        settings.validate()?;
        Ok(settings)
    }
}
