//! Pagination wire types

use super::iterators::{ItemIterator, PageIterator};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Continuation token for the next page
///
/// Opaque to the client apart from `path`, which is requested next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Path (relative to `base_url`) of the next page, query string included
    pub path: String,
    /// Server offset token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// A full response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Payload
    #[serde(default)]
    pub data: Value,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next_page: Option<Cursor>,
}

impl ResponseEnvelope {
    /// Parse an envelope from a decoded response
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Split into the page's items and the next cursor
    pub fn into_page(self) -> Result<(Vec<Value>, Option<Cursor>)> {
        match self.data {
            Value::Array(items) => Ok((items, self.next_page)),
            other => Err(Error::decode(format!(
                "expected a page of items, got {other}"
            ))),
        }
    }
}

/// Result of `Client::get_collection`
#[derive(Debug)]
pub enum Collection {
    /// `iterator_type = "pages"`
    Pages(PageIterator),
    /// `iterator_type = "items"`
    Items(ItemIterator),
    /// `iterator_type = null`: the first page's data, fetched eagerly
    Data(Value),
}
