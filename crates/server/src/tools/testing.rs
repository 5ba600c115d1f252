//! In-process collaborators for tool tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pagepulse_client::HtmlCleaner;
use pagepulse_core::rating::{Document, DocumentSource, ModelReply, RaterSettings, RatingModel, RatingRequest};
use pagepulse_core::{AppConfig, Error, PageRater, RatingCache};

pub(crate) const PAGE_URL: &str = "https://wiki.example.com/spaces/ENG/pages/42/Home";

pub(crate) struct OnePage;

#[async_trait::async_trait]
impl DocumentSource for OnePage {
    async fn fetch_document(&self, locator: &str) -> Result<Document, Error> {
        if locator == PAGE_URL {
            Ok(Document { id: "42".into(), body: "<nav>menu</nav><p>Body</p>".into() })
        } else {
            Err(Error::ContentFetch(format!("page not found: {locator}")))
        }
    }
}

#[derive(Default)]
pub(crate) struct CountingModel {
    pub calls: AtomicUsize,
}

#[async_trait::async_trait]
impl RatingModel for CountingModel {
    async fn rate(&self, request: &RatingRequest) -> Result<ModelReply, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ModelReply {
            answer: format!("8/10 for {}", request.content),
            model: request.model.clone(),
            prompt_tokens: 50,
            completion_tokens: 10,
        })
    }
}

pub(crate) async fn rater() -> (Arc<PageRater>, Arc<CountingModel>) {
    let config = AppConfig::default();
    let cache = RatingCache::open_in_memory(config.cache.ttl_seconds).await.unwrap();
    let model = Arc::new(CountingModel::default());
    let settings = RaterSettings { rating_timeout: Duration::from_secs(2), ..RaterSettings::from(&config) };
    let rater = PageRater::with_settings(settings, cache, Arc::new(OnePage), Arc::new(HtmlCleaner::new()), model.clone());
    (Arc::new(rater), model)
}

/// Text of the first content item of a tool result.
pub(crate) fn first_text(result: &rmcp::model::CallToolResult) -> String {
    let value = serde_json::to_value(&result.content[0]).unwrap();
    value
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}
