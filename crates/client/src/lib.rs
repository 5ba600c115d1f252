//! Client code for pagepulse.
//!
//! This crate provides the concrete collaborators behind the rating
//! pipeline: the Confluence document source, the HTML cleaner and the
//! chat completions rating client.

pub mod confluence;
pub mod extract;
pub mod llm;
pub mod locator;

pub use confluence::{ConfluenceClient, ConfluenceClientConfig};
pub use extract::HtmlCleaner;
pub use llm::{ChatClient, ChatConfig, ChatError, render_user_prompt};
pub use locator::{LocatorError, canonicalize, page_id};
