//! Environment-based configuration.
//!
//! Credentials come from the process environment; a missing required
//! credential is a startup-fatal condition, never a per-request error.

use tracing::info;

use crate::error::{Result, ScribeError};

/// Default completion model when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Runtime configuration for both bot front-ends.
#[derive(Debug, Clone)]
pub struct ScribeConfig {
    /// Telegram bot token (`BOT_TOKEN`). Required.
    pub bot_token: String,
    /// Generation-service credential (`OPENAI_API_KEY`). Required.
    pub openai_api_key: String,
    /// Completion model identifier (`OPENAI_MODEL`).
    pub model: String,
    /// OpenAI-compatible API base URL (`OPENAI_BASE_URL`).
    pub openai_base_url: String,
    /// Telegram Bot API base URL (`TELEGRAM_API_URL`).
    pub telegram_api_url: String,
    /// Optional outbound proxy for all HTTP traffic (`PROXY_URL`).
    pub proxy_url: Option<String>,
}

impl ScribeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(model = %config.model, "Configuration loaded from environment");
        Ok(config)
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Lets tests supply values without mutating process-global state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            bot_token: require(&lookup, "BOT_TOKEN")?,
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            model: optional(&lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: optional(&lookup, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            telegram_api_url: optional(&lookup, "TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            proxy_url: optional(&lookup, "PROXY_URL"),
        })
    }
}

/// Fetch a required key, treating empty or whitespace-only values as unset.
fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    optional(lookup, key).ok_or_else(|| ScribeError::Config(format!("{} is not set", key)))
}

/// Fetch an optional key, treating empty or whitespace-only values as unset.
fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = ScribeConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_missing_bot_token_is_fatal() {
        let result = ScribeConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]));
        match result {
            Err(ScribeError::Config(msg)) => assert!(msg.contains("BOT_TOKEN")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = ScribeConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "123:abc")]));
        match result {
            Err(ScribeError::Config(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_required_value_treated_as_missing() {
        let result = ScribeConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "   "),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert!(matches!(result, Err(ScribeError::Config(_))));
    }

    #[test]
    fn test_overrides_respected() {
        let config = ScribeConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("TELEGRAM_API_URL", "http://localhost:8081"),
            ("PROXY_URL", "http://proxy.internal:3128"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url, "http://localhost:11434/v1");
        assert_eq!(config.telegram_api_url, "http://localhost:8081");
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy.internal:3128"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let config = ScribeConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "  123:abc  "),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.bot_token, "123:abc");
    }

    #[test]
    fn test_empty_optional_value_falls_back_to_default() {
        let config = ScribeConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", ""),
        ]))
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
