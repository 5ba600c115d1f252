//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache::{CacheSweepParams, sweep_impl};
use crate::tools::rate_page::{RatePageParams, rate_impl};

use pagepulse_core::PageRater;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for pagepulse.
#[derive(Clone)]
pub struct PagePulseServer {
    rater: Arc<PageRater>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl PagePulseServer {
    /// Create a new server handler around a shared rater.
    pub fn new(rater: Arc<PageRater>) -> Self {
        Self { rater, tool_router: Self::tool_router() }
    }

    /// Rate a wiki page.
    ///
    /// Unchanged pages rated within the cache TTL are answered from cache
    /// with zero token usage.
    #[tool(
        description = "Rate the quality of a wiki page. Returns the rating with its model and token usage (zero when served from cache)."
    )]
    async fn rate_page(&self, params: Parameters<RatePageParams>) -> Result<CallToolResult, McpError> {
        rate_impl(&self.rater, params.0).await
    }

    /// Delete expired ratings from the cache.
    #[tool(description = "Delete cached ratings older than the given age (default: the configured TTL).")]
    async fn cache_sweep(&self, params: Parameters<CacheSweepParams>) -> Result<CallToolResult, McpError> {
        sweep_impl(self.rater.cache(), params.0).await
    }
}

impl ServerHandler for PagePulseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "pagepulse".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Rates wiki pages with a language model and caches ratings per page content.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::rater;

    #[tokio::test]
    async fn test_lists_both_tools() {
        let (rater, _) = rater().await;
        let server = PagePulseServer::new(rater);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cache_sweep", "rate_page"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let (rater, _) = rater().await;
        let info = PagePulseServer::new(rater).get_info();
        assert_eq!(info.server_info.name, "pagepulse");
        assert!(info.capabilities.tools.is_some());
    }
}
