//! rate_page tool implementation.
//!
//! Fetches a wiki page, rates it with the configured model and returns the
//! rating with token usage. Repeat requests for an unchanged page are served
//! from cache with zero token usage.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use pagepulse_core::{Error, PageRater};

/// Parameters for the rate_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RatePageParams {
    /// URL of the wiki page to rate.
    pub wiki_url: String,

    /// Model to rate with. Defaults to the configured model.
    #[serde(default)]
    pub model: Option<String>,
}

/// Implementation of the rate_page tool.
///
/// Rating failures are returned as tool errors carrying the structured
/// `{status, kind, details}` body, not as protocol errors.
pub async fn rate_impl(rater: &PageRater, params: RatePageParams) -> Result<CallToolResult, McpError> {
    let result = rater.get_rating(&params.wiki_url, params.model.as_deref()).await;

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| Error::Serialization(format!("Failed to serialize rating: {e}")))?;

    if result.is_success() {
        Ok(CallToolResult::success(vec![Content::text(json)]))
    } else {
        Ok(CallToolResult::error(vec![Content::text(json)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{PAGE_URL, first_text, rater};
    use pagepulse_core::{ErrorKind, RatingResult};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_rate_then_cached() {
        let (rater, model) = rater().await;
        let params = RatePageParams { wiki_url: PAGE_URL.into(), model: None };

        let first = rate_impl(&rater, params.clone()).await.unwrap();
        assert_ne!(first.is_error, Some(true));
        let first: RatingResult = serde_json::from_str(&first_text(&first)).unwrap();
        let first = first.rating().unwrap().clone();
        assert_eq!(first.answer, "8/10 for <p>Body</p>");
        assert_eq!(first.input_tokens, 50);

        let second = rate_impl(&rater, params).await.unwrap();
        let second: RatingResult = serde_json::from_str(&first_text(&second)).unwrap();
        assert_eq!(second.rating().unwrap().answer, first.answer);
        assert_eq!(second.rating().unwrap().input_tokens, 0);

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_tool_error() {
        let (rater, model) = rater().await;
        let params = RatePageParams { wiki_url: "https://wiki.example.com/pages/1/Nope".into(), model: None };

        let result = rate_impl(&rater, params).await.unwrap();
        assert_eq!(result.is_error, Some(true));

        let body: RatingResult = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(body.error_kind(), Some(ErrorKind::ContentFetchFailure));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
