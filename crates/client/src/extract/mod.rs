//! Page body cleanup.
//!
//! Storage-format bodies carry markup that says nothing about page quality.
//! [`HtmlCleaner`] drops those elements and keeps the rest of the markup, so
//! headings, lists and tables still reach the model. The cleaned markup is
//! also what gets hashed, so the cleanup must stay deterministic.

use pagepulse_core::Error;
use pagepulse_core::rating::TextNormalizer;
use scraper::{Html, Selector};

/// Elements removed by default, together with their content.
pub const DEFAULT_STRIPPED_TAGS: &[&str] = &["script", "style", "meta", "header", "footer", "nav"];

/// Removes non-content elements from HTML.
#[derive(Debug, Clone)]
pub struct HtmlCleaner {
    selector: Selector,
}

impl HtmlCleaner {
    /// Create a cleaner stripping [`DEFAULT_STRIPPED_TAGS`].
    pub fn new() -> Self {
        Self::with_tags(DEFAULT_STRIPPED_TAGS).expect("default tag selector is valid")
    }

    /// Create a cleaner stripping the given tag names.
    pub fn with_tags(tags: &[&str]) -> Result<Self, Error> {
        let selector = Selector::parse(&tags.join(", "))
            .map_err(|e| Error::InvalidInput(format!("invalid tag list {tags:?}: {e}")))?;
        Ok(Self { selector })
    }

    /// Return `html` with every stripped element removed.
    pub fn clean_html(&self, html: &str) -> Result<String, Error> {
        if html.trim().is_empty() {
            return Err(Error::ContentExtraction("page body is empty".into()));
        }

        let mut fragment = Html::parse_fragment(html);
        let doomed: Vec<_> = fragment.select(&self.selector).map(|el| el.id()).collect();

        for id in doomed {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }

        let cleaned = fragment.root_element().inner_html();
        if cleaned.trim().is_empty() {
            return Err(Error::ContentExtraction("no content left after cleanup".into()));
        }

        tracing::debug!("cleaned page body: {} -> {} bytes", html.len(), cleaned.len());
        Ok(cleaned)
    }
}

impl Default for HtmlCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer for HtmlCleaner {
    fn clean(&self, raw: &str) -> Result<String, Error> {
        self.clean_html(raw)
    }
}
