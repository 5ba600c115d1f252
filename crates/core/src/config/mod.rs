//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Secrets (`CONFLUENCE_API_TOKEN`, `AI_API_KEY`)
//! 2. Environment variables (PAGEPULSE_*, `__` separates sections)
//! 3. TOML config file (`PAGEPULSE_CONFIG_FILE`, else `config.toml`)
//! 4. Built-in defaults
//!
//! The loaded value is built once at startup and handed by reference to the
//! cache and the rater; nothing reads configuration after that.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub confluence: ConfluenceConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub prompts: PromptConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Document source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceConfig {
    /// Base wiki URL, e.g. `https://example.atlassian.net/wiki`.
    #[serde(default)]
    pub wiki_url: String,

    #[serde(default)]
    pub username: String,

    /// Set via CONFLUENCE_API_TOKEN.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Page fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

/// Rating model endpoint and sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenAI-compatible base URL; `/chat/completions` is appended.
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    /// Model used when a request does not name one.
    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Set via AI_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Upper bound on one rating call, in seconds.
    #[serde(default = "default_rating_timeout_secs")]
    pub timeout_secs: u64,
}

/// Prompt templates sent to the rating model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_system_prompt")]
    pub system_page_rating: String,

    /// User prompt; `{{ wiki_content }}` is replaced with the page text.
    #[serde(default = "default_user_prompt")]
    pub user_page_rating: String,
}

/// Rating cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
}

fn default_fetch_timeout_secs() -> u64 {
    20
}

fn default_ai_endpoint() -> String {
    "https://api.openai.com/v1".into()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".into()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    1.0
}

fn default_rating_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    "You are a technical writer reviewing internal wiki pages. Rate the page quality \
     from 1 to 10 and list concrete recommendations."
        .into()
}

fn default_user_prompt() -> String {
    "Rate the following page:\n\n{{ wiki_content }}".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./cache/pagepulse.sqlite")
}

fn default_ttl_seconds() -> i64 {
    86_400
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            wiki_url: String::new(),
            username: String::new(),
            api_token: None,
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_rating_timeout_secs(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { system_page_rating: default_system_prompt(), user_page_rating: default_user_prompt() }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { db_path: default_db_path(), ttl_seconds: default_ttl_seconds() }
    }
}

impl ConfluenceConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AiConfig {
    /// Rating timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read or parsed
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("PAGEPULSE_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::figment(&config_path)
            .extract::<Self>()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))
            .and_then(|config| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Build the layered figment without extracting it.
    ///
    /// A missing TOML file is skipped silently by figment.
    pub fn figment(config_path: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_path))
            .merge(
                Env::prefixed("PAGEPULSE_")
                    .ignore(&["config_file"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
            .merge(Env::raw().only(&["confluence_api_token", "ai_api_key"]).map(|key| {
                if key.as_str().eq_ignore_ascii_case("confluence_api_token") {
                    "confluence.api_token".into()
                } else {
                    "ai.api_key".into()
                }
            }))
    }

    /// Confluence API token (deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is not set.
    pub fn require_confluence_token(&self) -> Result<&str, ConfigError> {
        self.confluence.api_token.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "confluence.api_token".into(),
            hint: "Set CONFLUENCE_API_TOKEN environment variable".into(),
        })
    }

    /// Rating endpoint API key (deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_ai_api_key(&self) -> Result<&str, ConfigError> {
        self.ai.api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "ai.api_key".into(),
            hint: "Set AI_API_KEY environment variable".into(),
        })
    }
}
