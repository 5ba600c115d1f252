//! cache_sweep tool implementation.
//!
//! Deletes ratings older than the TTL. Expired ratings are never served
//! anyway; this only reclaims space.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use pagepulse_core::{Error, RatingCache};

/// Parameters for the cache_sweep tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheSweepParams {
    /// Delete ratings written more than this many seconds ago.
    /// Defaults to the configured TTL.
    #[serde(default)]
    pub older_than_seconds: Option<i64>,
}

/// Output from the cache_sweep tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSweepOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Number of entries left.
    pub remaining: u64,
}

/// Implementation of the cache_sweep tool.
pub async fn sweep_impl(cache: &RatingCache, params: CacheSweepParams) -> Result<CallToolResult, McpError> {
    let max_age = params.older_than_seconds.unwrap_or_else(|| cache.ttl_seconds());
    if max_age < 0 {
        return Err(Error::InvalidInput("older_than_seconds must not be negative".to_string()).into());
    }

    let deleted = cache.sweep(max_age).await?;
    let remaining = cache.count().await?;

    let output = CacheSweepOutput { deleted, remaining };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Serialization(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
