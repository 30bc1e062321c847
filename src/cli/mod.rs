//! CLI module
//!
//! Command-line interface over the client's verbs.
//!
//! # Commands
//!
//! - `get` - Fetch a single resource
//! - `list` - Walk a collection page by page or item by item
//! - `post` / `put` - Create or update a resource from JSON data
//! - `delete` - Delete a resource
//! - `resources` - List the known top-level collections

mod commands;
mod runner;

pub use commands::{Cli, Commands, IterateMode, OutputFormat};
pub use runner::Runner;
