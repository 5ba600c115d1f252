//! SQLite-backed cache for page ratings.
//!
//! This module provides a persistent, content-validated rating cache using
//! SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Content fingerprints using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - TTL expiry at read time plus an age-based sweep

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod ratings;

pub use crate::Error;

pub use connection::RatingCache;
pub use hash::content_hash;
pub use ratings::{CacheRecord, Lookup};
