//! Values exchanged between the rater, its collaborators and callers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::{Error, ErrorKind};

/// A resolved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Stable page identifier; the cache key.
    pub id: String,
    /// Raw body as delivered by the source (storage-format HTML).
    pub body: String,
}

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl From<&AiConfig> for SamplingParams {
    fn from(config: &AiConfig) -> Self {
        Self { max_tokens: config.max_tokens, temperature: config.temperature, top_p: config.top_p }
    }
}

/// One rating call.
#[derive(Debug, Clone)]
pub struct RatingRequest {
    /// Canonical page text.
    pub content: String,
    pub model: String,
    pub system_prompt: String,
    /// User prompt with a `{{ wiki_content }}` placeholder.
    pub user_prompt_template: String,
    pub sampling: SamplingParams,
}

/// What the model returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub answer: String,
    /// Model name as resolved by the endpoint.
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A page rating; also the cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rating {
    pub answer: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Rating {
    /// The same rating served from cache: no new model cost.
    pub fn cached(self) -> Self {
        Self { input_tokens: 0, output_tokens: 0, ..self }
    }
}

impl From<ModelReply> for Rating {
    fn from(reply: ModelReply) -> Self {
        Self {
            answer: reply.answer,
            model: reply.model,
            input_tokens: reply.prompt_tokens,
            output_tokens: reply.completion_tokens,
        }
    }
}

/// Outcome of a rating request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RatingResult {
    Success(Rating),
    Failure { kind: ErrorKind, details: String },
}

impl RatingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RatingResult::Success(_))
    }

    /// The rating, if any.
    pub fn rating(&self) -> Option<&Rating> {
        match self {
            RatingResult::Success(rating) => Some(rating),
            RatingResult::Failure { .. } => None,
        }
    }

    /// The failure kind, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            RatingResult::Success(_) => None,
            RatingResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Error> for RatingResult {
    fn from(err: Error) -> Self {
        RatingResult::Failure { kind: err.kind(), details: err.details() }
    }
}

impl From<Result<Rating, Error>> for RatingResult {
    fn from(result: Result<Rating, Error>) -> Self {
        match result {
            Ok(rating) => RatingResult::Success(rating),
            Err(err) => err.into(),
        }
    }
}
