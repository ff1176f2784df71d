//! Configuration loading from weather-chat.toml.

use runtime::DEFAULT_MAX_TOKENS;
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "weather-chat.toml";

/// Environment variable that overrides the configured model.
pub const MODEL_ENV: &str = "WEATHER_CHAT_MODEL";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Model backend configuration.
///
/// One model is used for every round trip of a query.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token cap per round trip.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Optional system prompt.
    #[serde(default)]
    pub system: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            system: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load an explicit config file, or the default file if it exists, or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Replace the model when an override is present and non-empty.
    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.backend.model = model.trim().to_string();
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");
        assert_eq!(config.backend.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(config.backend.system.is_none());
    }

    #[test]
    fn backend_section_overrides_defaults() {
        let config = Config::parse(
            r#"
[backend]
model = "claude-opus-4-20250514"
max_tokens = 2048
system = "Answer briefly."
"#,
        )
        .unwrap();
        assert_eq!(config.backend.model, "claude-opus-4-20250514");
        assert_eq!(config.backend.max_tokens, 2048);
        assert_eq!(config.backend.system.as_deref(), Some("Answer briefly."));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[backend\nmodel = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn model_override_wins_unless_blank() {
        let config = Config::default().with_model_override(Some("claude-haiku".into()));
        assert_eq!(config.backend.model, "claude-haiku");

        let config = Config::default().with_model_override(Some("  ".into()));
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");

        let config = Config::default().with_model_override(None);
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = Config::discover(Some(Path::new("/nonexistent/weather-chat.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
