//! Page rating orchestration.
//!
//! [`PageRater`] resolves a page through a [`DocumentSource`], cleans it with
//! a [`TextNormalizer`], and consults the rating cache before asking a
//! [`RatingModel`] for a fresh rating.
//!
//! ### Failure policy
//! - Cache read errors fail open: the model is called as if the cache missed.
//! - Cache write errors are logged; the fresh rating is still returned.
//! - A failed or timed-out model call never writes to the cache.

pub mod rater;
pub mod types;

pub use rater::{PageRater, RaterSettings};
pub use types::{Document, ModelReply, Rating, RatingRequest, RatingResult, SamplingParams};

use crate::Error;

/// Resolves a page locator to its identity and raw body.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document behind `locator`.
    ///
    /// An unknown page is an error (`Error::ContentFetch`), not an empty body.
    async fn fetch_document(&self, locator: &str) -> Result<Document, Error>;
}

/// Turns a raw page body into the canonical text that is hashed and rated.
pub trait TextNormalizer: Send + Sync {
    fn clean(&self, raw: &str) -> Result<String, Error>;
}

/// Chat model that produces a rating for canonical page text.
#[async_trait::async_trait]
pub trait RatingModel: Send + Sync {
    async fn rate(&self, request: &RatingRequest) -> Result<ModelReply, Error>;
}
