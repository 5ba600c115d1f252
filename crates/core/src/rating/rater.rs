//! The rating orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::types::{Document, Rating, RatingRequest, RatingResult, SamplingParams};
use super::{DocumentSource, RatingModel, TextNormalizer};
use crate::Error;
use crate::cache::RatingCache;
use crate::config::AppConfig;

/// Immutable settings the rater needs from configuration.
#[derive(Debug, Clone)]
pub struct RaterSettings {
    pub default_model: String,
    pub system_prompt: String,
    pub user_prompt_template: String,
    pub sampling: SamplingParams,
    pub fetch_timeout: Duration,
    pub rating_timeout: Duration,
}

impl From<&AppConfig> for RaterSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_model: config.ai.model.clone(),
            system_prompt: config.prompts.system_page_rating.clone(),
            user_prompt_template: config.prompts.user_page_rating.clone(),
            sampling: SamplingParams::from(&config.ai),
            fetch_timeout: config.confluence.timeout(),
            rating_timeout: config.ai.timeout(),
        }
    }
}

/// Fetches, cleans, and rates pages, serving repeat requests from cache.
///
/// Cheap to share behind an `Arc`; every call is independent and holds no
/// lock across awaits. Two concurrent requests for the same page may both
/// miss and both call the model; the later write wins, which the
/// content-hash check makes harmless.
pub struct PageRater {
    source: Arc<dyn DocumentSource>,
    normalizer: Arc<dyn TextNormalizer>,
    model: Arc<dyn RatingModel>,
    cache: RatingCache,
    settings: RaterSettings,
}

impl PageRater {
    /// Create a rater from loaded configuration and its collaborators.
    pub fn new(
        config: &AppConfig, cache: RatingCache, source: Arc<dyn DocumentSource>, normalizer: Arc<dyn TextNormalizer>,
        model: Arc<dyn RatingModel>,
    ) -> Self {
        Self::with_settings(RaterSettings::from(config), cache, source, normalizer, model)
    }

    pub fn with_settings(
        settings: RaterSettings, cache: RatingCache, source: Arc<dyn DocumentSource>,
        normalizer: Arc<dyn TextNormalizer>, model: Arc<dyn RatingModel>,
    ) -> Self {
        Self { source, normalizer, model, cache, settings }
    }

    /// Rate the page behind `locator` with `model`, or the configured default.
    ///
    /// Never returns an error: every failure is folded into
    /// [`RatingResult::Failure`].
    pub async fn get_rating(&self, locator: &str, model: Option<&str>) -> RatingResult {
        let result = self.rate_page(locator, model).await;
        if let Err(e) = &result {
            tracing::warn!(locator, kind = ?e.kind(), error = %e, "page rating failed");
        }
        result.into()
    }

    async fn rate_page(&self, locator: &str, model: Option<&str>) -> Result<Rating, Error> {
        if locator.trim().is_empty() {
            return Err(Error::InvalidInput("page locator cannot be empty".into()));
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.settings.default_model.as_str());

        let document = self.fetch(locator).await?;
        let text = self.normalizer.clean(&document.body).map_err(|e| match e {
            Error::ContentExtraction(_) => e,
            other => Error::ContentExtraction(other.details()),
        })?;

        if let Some(rating) = self.cached_rating(&document.id, &text).await {
            tracing::info!(page_id = %document.id, "using cached rating");
            return Ok(rating.cached());
        }

        tracing::info!(page_id = %document.id, model, "requesting fresh rating");
        let rating = Rating::from(self.call_model(text.clone(), model).await?);

        if let Err(e) = self.cache.put(&document.id, &text, &rating).await {
            tracing::warn!(page_id = %document.id, error = %e, "failed to cache rating");
        }

        Ok(rating)
    }

    async fn fetch(&self, locator: &str) -> Result<Document, Error> {
        let timeout = self.settings.fetch_timeout;
        match tokio::time::timeout(timeout, self.source.fetch_document(locator)).await {
            Ok(Ok(document)) => Ok(document),
            Ok(Err(e @ Error::ContentFetch(_))) => Err(e),
            Ok(Err(other)) => Err(Error::ContentFetch(other.details())),
            Err(_) => Err(Error::ContentFetch(format!("fetch timed out after {}s", timeout.as_secs()))),
        }
    }

    /// Valid cached rating, if any. Read failures count as a miss.
    async fn cached_rating(&self, page_id: &str, text: &str) -> Option<Rating> {
        let record = match self.cache.get(page_id, text).await {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(page_id, error = %e, "rating cache read failed; continuing without cache");
                return None;
            }
        };

        match record.decode::<Rating>() {
            Ok(rating) => Some(rating),
            Err(e) => {
                tracing::warn!(page_id, error = %e, "cached rating unreadable; ignoring");
                None
            }
        }
    }

    async fn call_model(&self, content: String, model: &str) -> Result<super::ModelReply, Error> {
        let request = RatingRequest {
            content,
            model: model.to_string(),
            system_prompt: self.settings.system_prompt.clone(),
            user_prompt_template: self.settings.user_prompt_template.clone(),
            sampling: self.settings.sampling,
        };

        let timeout = self.settings.rating_timeout;
        let start = Instant::now();
        let reply = match tokio::time::timeout(timeout, self.model.rate(&request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e @ (Error::RatingTimeout(_) | Error::RatingFailed(_)))) => return Err(e),
            Ok(Err(other)) => return Err(Error::RatingFailed(other.details())),
            Err(_) => {
                return Err(Error::RatingTimeout(format!("rating call exceeded {}s", timeout.as_secs())));
            }
        };

        tracing::debug!(
            model = %reply.model,
            prompt_tokens = reply.prompt_tokens,
            completion_tokens = reply.completion_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rating call completed"
        );

        Ok(reply)
    }

    /// The cache this rater reads and writes.
    pub fn cache(&self) -> &RatingCache {
        &self.cache
    }

    pub fn settings(&self) -> &RaterSettings {
        &self.settings
    }
}
