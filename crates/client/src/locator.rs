//! Page locator parsing.
//!
//! Users paste whatever URL their browser shows. Both shapes Confluence
//! produces are accepted:
//!
//! - `/wiki/spaces/<space>/pages/<id>/<title>`
//! - `/pages/viewpage.action?pageId=<id>`

use url::Url;

/// Error type for locator parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("no page id in URL: {0}")]
    NoPageId(String),
}

/// Canonicalize a URL string.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<Url, LocatorError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(LocatorError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = Url::parse(&url_str).map_err(|e| LocatorError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(LocatorError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| LocatorError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Extract the numeric page id from a page URL.
///
/// `pageId` in the query wins. Otherwise the segment after `pages` is used,
/// and failing that the second-to-last path segment.
pub fn page_id(locator: &str) -> Result<String, LocatorError> {
    let url = canonicalize(locator)?;

    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "pageId") {
        return numeric(&id, locator);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let after_pages = segments
        .windows(2)
        .find(|w| w[0] == "pages" && w[1].bytes().all(|b| b.is_ascii_digit()))
        .map(|w| w[1]);

    let candidate = after_pages
        .or_else(|| segments.len().checked_sub(2).map(|i| segments[i]))
        .ok_or_else(|| LocatorError::NoPageId(locator.to_string()))?;

    numeric(candidate, locator)
}

fn numeric(id: &str, locator: &str) -> Result<String, LocatorError> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id.to_string())
    } else {
        Err(LocatorError::NoPageId(locator.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("wiki.example.com/pages/1/x").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("wiki.example.com"));
    }

    #[test]
    fn test_canonicalize_lowercase_host_and_fragment() {
        let url = canonicalize("https://WIKI.Example.COM/pages/1/x#comments").unwrap();
        assert_eq!(url.host_str(), Some("wiki.example.com"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(LocatorError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_whitespace_only() {
        assert_eq!(canonicalize("   "), Err(LocatorError::Empty));
    }

    #[test]
    fn test_page_id_spaces_url() {
        let id = page_id("https://acme.atlassian.net/wiki/spaces/ENG/pages/123456/Release+Process").unwrap();
        assert_eq!(id, "123456");
    }

    #[test]
    fn test_page_id_trailing_slash() {
        let id = page_id("https://acme.atlassian.net/wiki/spaces/ENG/pages/98765/").unwrap();
        assert_eq!(id, "98765");
    }

    #[test]
    fn test_page_id_viewpage_action() {
        let id = page_id("https://wiki.internal/pages/viewpage.action?pageId=4242&src=search").unwrap();
        assert_eq!(id, "4242");
    }

    #[test]
    fn test_page_id_second_to_last_fallback() {
        let id = page_id("https://wiki.internal/display/777/Some-Title").unwrap();
        assert_eq!(id, "777");
    }

    #[test]
    fn test_page_id_missing() {
        assert!(matches!(page_id("https://wiki.internal/"), Err(LocatorError::NoPageId(_))));
        assert!(matches!(page_id("https://wiki.internal/spaces/ENG/overview"), Err(LocatorError::NoPageId(_))));
    }

    #[test]
    fn test_page_id_rejects_non_numeric_query() {
        let result = page_id("https://wiki.internal/pages/viewpage.action?pageId=../../admin");
        assert!(matches!(result, Err(LocatorError::NoPageId(_))));
    }
}
