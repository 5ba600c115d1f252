//! MCP tool implementations.
//!
//! This module contains all tools exposed by the pagepulse server.

pub mod cache;
pub mod rate_page;

#[cfg(test)]
pub(crate) mod testing;
