//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the rating cache.

pub mod sweep;

pub use sweep::{CacheSweepParams, sweep_impl};
