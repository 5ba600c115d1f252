//! Core types and shared functionality for pagepulse.
//!
//! This crate provides:
//! - Rating cache with SQLite backend
//! - The page rating orchestrator and its collaborator traits
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod rating;

pub use cache::{CacheRecord, RatingCache};
pub use config::{AppConfig, ConfigError};
pub use error::{Error, ErrorKind};
pub use rating::{PageRater, Rating, RatingResult};
