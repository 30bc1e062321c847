//! # Asana API client
//!
//! An async client for the Asana REST API with layered options, automatic
//! retries and cursor-driven pagination.
//!
//! ## Features
//!
//! - **Layered Options**: defaults, client options and per-call options merged per request
//! - **Retries**: exponential backoff for server errors, `Retry-After` for rate limits
//! - **Pagination**: page and item iterators that follow `next_page` cursors
//! - **Auth**: API key (basic) or personal access / OAuth token (bearer)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use asana_client::{Client, Collection, Options, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::access_token("0/abc")?;
//!
//!     let me = client.get("/users/me", &Options::new(), &Options::new()).await?;
//!     println!("{me}");
//!
//!     let mut tasks = client.get_items("/tasks", &Options::new().with("project", "42"), &Options::new());
//!     while let Some(task) = tasks.next_item().await? {
//!         println!("{task}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Client: get / post / put / delete / get_collection      │
//! └──────────────────────────────────────────────────────────┘
//!          │                    │                    │
//! ┌────────┴──────┬─────────────┴──────┬─────────────┴──────┐
//! │   Options     │   Request Executor │   Pagination       │
//! ├───────────────┼────────────────────┼────────────────────┤
//! │ Defaults      │ Classify status    │ Page iterator      │
//! │ Client tier   │ Retry / backoff    │ Item iterator      │
//! │ Call tier     │ Retry-After        │ Streams            │
//! └───────────────┴────────────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document the option keys and error variants before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Layered request options
pub mod options;

/// Authentication implementations
pub mod auth;

/// HTTP transport, status classification, retry and rate limiting
pub mod http;

/// Request executor
pub mod client;

/// Page and item iterators
pub mod pagination;

/// Registry of top-level resources
pub mod resources;

/// Client configuration files
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::AuthConfig;
pub use client::{Client, ClientBuilder};
pub use config::{load_config, load_config_from_str, ClientConfig};
pub use error::{ApiError, Error, ErrorKind, Result};
pub use options::{IteratorType, Options, Retries};
pub use pagination::{Collection, ItemIterator, PageIterator};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
