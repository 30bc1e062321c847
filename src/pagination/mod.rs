//! Pagination module
//!
//! Collections are paginated with server-issued cursors: every page carries
//! a `next_page` object whose `path` is the target of the following request.
//!
//! # Overview
//!
//! - [`PageIterator`] follows cursors and yields one page (`Vec<Value>`) per step
//! - [`ItemIterator`] flattens pages into individual items
//! - [`Collection`] is what `Client::get_collection` returns, depending on the
//!   `iterator_type` option
//!
//! Both iterators are single-pass. Their async `next_*` methods return
//! `Ok(None)` once the server stops returning a cursor, and keep doing so.

mod iterators;
mod types;

pub use iterators::{ItemIterator, PageIterator};
pub use types::{Collection, Cursor, ResponseEnvelope};
