//! Page and item iterators

use super::types::{Cursor, ResponseEnvelope};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::options::{keys, Options};
use futures::Stream;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
enum CursorState {
    NotStarted,
    Next(Cursor),
    Exhausted,
}

/// Yields a collection one page at a time, following `next_page` cursors
///
/// A failed step leaves the cursor untouched, so calling
/// [`next_page`](Self::next_page) again repeats the same request.
#[derive(Debug)]
pub struct PageIterator {
    client: Client,
    path: String,
    query: Options,
    options: Options,
    state: CursorState,
}

impl PageIterator {
    pub(crate) fn new(client: Client, path: String, query: Options, options: Options) -> Self {
        Self {
            client,
            path,
            query,
            options: options.with(keys::FULL_PAYLOAD, true),
            state: CursorState::NotStarted,
        }
    }

    /// Whether the last page has been returned
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Cursor the next step will follow, if one is pending
    pub fn cursor(&self) -> Option<&Cursor> {
        match &self.state {
            CursorState::Next(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Fetch the next page, or `None` once the collection is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>> {
        let response = match &self.state {
            CursorState::Exhausted => return Ok(None),
            CursorState::NotStarted => {
                self.client
                    .get(&self.path, &self.query, &self.options)
                    .await?
            }
            CursorState::Next(cursor) => {
                // The cursor encodes its own position; a caller-set offset
                // would conflict with it, including one set on the client.
                self.options = self.options.clone().with(keys::OFFSET, Value::Null);
                self.client
                    .get(&cursor.path, &Options::new(), &self.options)
                    .await?
            }
        };

        let (page, next_page) = ResponseEnvelope::from_value(response)?.into_page()?;
        debug!(
            "Fetched page of {} item(s) from {}, more: {}",
            page.len(),
            self.path,
            next_page.is_some()
        );

        self.state = match next_page {
            Some(cursor) => CursorState::Next(cursor),
            None => CursorState::Exhausted,
        };
        Ok(Some(page))
    }

    /// Adapt into a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Value>>> {
        futures::stream::try_unfold(self, |mut pages| async move {
            let page = pages.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, pages)))
        })
    }
}

/// Yields a collection one item at a time, in server order
///
/// Buffers at most the current page.
#[derive(Debug)]
pub struct ItemIterator {
    pages: PageIterator,
    buffer: VecDeque<Value>,
}

impl ItemIterator {
    /// Flatten a page iterator
    pub fn new(pages: PageIterator) -> Self {
        Self {
            pages,
            buffer: VecDeque::new(),
        }
    }

    /// Fetch the next item, or `None` once the collection is exhausted
    pub async fn next_item(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            match self.pages.next_page().await? {
                Some(page) => self.buffer.extend(page),
                None => return Ok(None),
            }
        }
    }

    /// Adapt into a stream of items
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        futures::stream::try_unfold(self, |mut items| async move {
            let item = items.next_item().await?;
            Ok::<_, Error>(item.map(|item| (item, items)))
        })
    }
}

impl From<PageIterator> for ItemIterator {
    fn from(pages: PageIterator) -> Self {
        Self::new(pages)
    }
}
