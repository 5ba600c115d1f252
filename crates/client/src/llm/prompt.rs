//! User prompt rendering.

use std::sync::LazyLock;

use regex::Regex;

/// `{{ wiki_content }}`, tolerant of inner whitespace.
static CONTENT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*wiki_content\s*\}\}").expect("invalid placeholder regex"));

/// Substitute the page text into every placeholder of `template`.
///
/// The page text is inserted literally; `$` sequences in it are not
/// treated as capture references.
pub fn render_user_prompt(template: &str, content: &str) -> String {
    CONTENT_PLACEHOLDER
        .replace_all(template, regex::NoExpand(content))
        .into_owned()
}
