//! Confluence REST API response types.

use serde::Deserialize;

/// `GET /rest/api/content/{id}?expand=body.storage`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<ContentBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub storage: Option<StorageValue>,
}

/// Storage-format (XHTML) page body.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageValue {
    pub value: String,
}

impl ContentResponse {
    /// The storage-format body, if the API returned one.
    pub fn into_storage_value(self) -> Option<String> {
        self.body.and_then(|b| b.storage).map(|s| s.value)
    }
}
