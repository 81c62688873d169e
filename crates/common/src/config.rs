//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Trait suggestion configuration.
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    /// Push notification configuration.
    #[serde(default)]
    pub push: PushConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Configuration for the external text-generation API used for
/// trait suggestions, descriptions, captions and compatibility.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionConfig {
    /// Chat-completions endpoint (`OpenAI`-compatible).
    #[serde(default = "default_completions_url")]
    pub api_url: String,
    /// API key. Suggestions degrade to static fallbacks when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            api_url: default_completions_url(),
            api_key: None,
            model: default_model(),
        }
    }
}

/// Web Push configuration. Push is best-effort and disabled unless keyed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushConfig {
    /// VAPID public key (base64 URL-safe encoded).
    #[serde(default)]
    pub vapid_public_key: Option<String>,
    /// VAPID private key (base64 URL-safe encoded).
    #[serde(default)]
    pub vapid_private_key: Option<String>,
    /// VAPID subject (typically a mailto: URL).
    #[serde(default)]
    pub vapid_subject: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_completions_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `LOVE8_ENV`)
    /// 3. Environment variables with `LOVE8_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("LOVE8_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LOVE8")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LOVE8")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_config_defaults() {
        let config = SuggestionConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.api_url.contains("/chat/completions"));
    }

    #[test]
    fn test_push_config_defaults_unkeyed() {
        let config = PushConfig::default();
        assert!(config.vapid_public_key.is_none());
        assert!(config.vapid_private_key.is_none());
    }
}
