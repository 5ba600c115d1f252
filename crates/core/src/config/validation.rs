//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache.ttl_seconds` is not positive
    /// - a timeout is 0 or exceeds 10 minutes
    /// - `ai.temperature` is outside 0..=2 or `ai.top_p` outside 0..=1
    /// - `ai.max_tokens` is 0
    /// - `ai.endpoint` or `ai.model` is empty
    ///
    /// A user prompt without a `wiki_content` placeholder or an empty
    /// `confluence.wiki_url` only logs a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_seconds <= 0 {
            return Err(invalid("cache.ttl_seconds", "must be greater than 0"));
        }

        if self.confluence.timeout_secs == 0 || self.confluence.timeout_secs > 600 {
            return Err(invalid("confluence.timeout_secs", "must be between 1 and 600"));
        }
        if self.ai.timeout_secs == 0 || self.ai.timeout_secs > 600 {
            return Err(invalid("ai.timeout_secs", "must be between 1 and 600"));
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(invalid("ai.temperature", "must be between 0.0 and 2.0"));
        }
        if !(0.0..=1.0).contains(&self.ai.top_p) {
            return Err(invalid("ai.top_p", "must be between 0.0 and 1.0"));
        }
        if self.ai.max_tokens == 0 {
            return Err(invalid("ai.max_tokens", "must be greater than 0"));
        }

        if self.ai.endpoint.trim().is_empty() {
            return Err(invalid("ai.endpoint", "must not be empty"));
        }
        if self.ai.model.trim().is_empty() {
            return Err(invalid("ai.model", "must not be empty"));
        }

        if !self.prompts.user_page_rating.contains("wiki_content") {
            tracing::warn!("prompts.user_page_rating has no {{{{ wiki_content }}}} placeholder; page text will not be sent");
        }

        if self.confluence.wiki_url.is_empty() {
            tracing::warn!("confluence.wiki_url is empty; every page fetch will fail");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiConfig, CacheConfig, ConfluenceConfig, PromptConfig};

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ttl_zero() {
        let config = AppConfig { cache: CacheConfig { ttl_seconds: 0, ..Default::default() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache.ttl_seconds"));
    }

    #[test]
    fn test_validate_rating_timeout_zero() {
        let config = AppConfig { ai: AiConfig { timeout_secs: 0, ..Default::default() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "ai.timeout_secs"));
    }

    #[test]
    fn test_validate_fetch_timeout_exceeds_limit() {
        let config = AppConfig {
            confluence: ConfluenceConfig { timeout_secs: 601, ..Default::default() },
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "confluence.timeout_secs"));
    }

    #[test]
    fn test_validate_sampling_ranges() {
        let config = AppConfig { ai: AiConfig { temperature: 2.5, ..Default::default() }, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "ai.temperature"));

        let config = AppConfig { ai: AiConfig { top_p: 1.1, ..Default::default() }, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "ai.top_p"));

        let config = AppConfig { ai: AiConfig { max_tokens: 0, ..Default::default() }, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "ai.max_tokens"));
    }

    #[test]
    fn test_validate_empty_model() {
        let config = AppConfig { ai: AiConfig { model: "  ".into(), ..Default::default() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "ai.model"));
    }

    #[test]
    fn test_validate_prompt_without_placeholder_only_warns() {
        let config = AppConfig {
            prompts: PromptConfig { user_page_rating: "Rate this page.".into(), ..Default::default() },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_values() {
        let config = AppConfig {
            ai: AiConfig { temperature: 0.0, top_p: 1.0, timeout_secs: 600, max_tokens: 1, ..Default::default() },
            cache: CacheConfig { ttl_seconds: 1, ..Default::default() },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
