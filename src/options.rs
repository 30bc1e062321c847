//! Layered request options
//!
//! Every call resolves a fresh [`Options`] value by merging tiers in order:
//! built-in defaults, client construction options, per-call options and, for
//! queries, explicit query fields. Later tiers replace earlier ones key by key;
//! nested objects are never merged.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Recognized option names
pub mod keys {
    pub const BASE_URL: &str = "base_url";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const SYNC: &str = "sync";
    pub const POLL_INTERVAL: &str = "poll_interval";
    pub const RETRIES: &str = "retries";
    pub const RETRY_DELAY: &str = "retry_delay";
    pub const RETRY_BACKOFF: &str = "retry_backoff";
    pub const FULL_PAYLOAD: &str = "full_payload";
    pub const ITERATOR_TYPE: &str = "iterator_type";
    pub const PRETTY: &str = "pretty";
    pub const FIELDS: &str = "fields";
    pub const EXPAND: &str = "expand";
    pub const HEADERS: &str = "headers";
    pub const PARAMS: &str = "params";
    pub const DATA: &str = "data";
}

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Default page size
pub const DEFAULT_LIMIT: u64 = 100;

const DEFAULT_POLL_INTERVAL_SECS: f64 = 5.0;
const DEFAULT_RETRIES: u32 = 5;
const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;
const DEFAULT_RETRY_BACKOFF: f64 = 2.0;

/// Options sent as plain query parameters
pub const QUERY_KEYS: &[&str] = &[keys::LIMIT, keys::OFFSET, keys::SYNC];

/// Options that modify the API response (`opt_*` in query strings)
pub const API_KEYS: &[&str] = &[keys::PRETTY, keys::FIELDS, keys::EXPAND];

/// Options handed to the transport as-is
pub const TRANSPORT_KEYS: &[&str] = &[keys::HEADERS, keys::PARAMS, keys::DATA];

// ============================================================================
// Retries
// ============================================================================

/// Retry budget for retryable failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Retries {
    /// At most this many retries after the first attempt
    Bounded(u32),
    /// Retry until the request succeeds or fails permanently
    Unbounded,
}

impl Retries {
    /// Wire spelling of [`Retries::Unbounded`]
    pub const INFINITE: &'static str = "infinite";

    /// Parse an option value: an integer or `"infinite"`
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == Self::INFINITE => Ok(Self::Unbounded),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Self::Bounded)
                .ok_or_else(|| {
                    Error::invalid_option(keys::RETRIES, format!("{n} is not a valid retry count"))
                }),
            other => Err(Error::invalid_option(
                keys::RETRIES,
                format!("expected an integer or \"{}\", got {other}", Self::INFINITE),
            )),
        }
    }
}

impl Default for Retries {
    fn default() -> Self {
        Self::Bounded(DEFAULT_RETRIES)
    }
}

impl From<u32> for Retries {
    fn from(n: u32) -> Self {
        Self::Bounded(n)
    }
}

impl From<Retries> for Value {
    fn from(retries: Retries) -> Self {
        match retries {
            Retries::Bounded(n) => Value::from(n),
            Retries::Unbounded => Value::from(Retries::INFINITE),
        }
    }
}

impl TryFrom<Value> for Retries {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

// ============================================================================
// Iterator type
// ============================================================================

/// How `get_collection` exposes a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorType {
    /// One element per page
    Pages,
    /// One element per item, across pages
    Items,
}

impl IteratorType {
    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            IteratorType::Pages => "pages",
            IteratorType::Items => "items",
        }
    }

    /// Parse an option value; `null` disables iteration
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s == "pages" => Ok(Some(Self::Pages)),
            Value::String(s) if s == "items" => Ok(Some(Self::Items)),
            other => Err(Error::invalid_option(
                keys::ITERATOR_TYPE,
                format!("unknown value {other}"),
            )),
        }
    }
}

impl From<IteratorType> for Value {
    fn from(kind: IteratorType) -> Self {
        Value::from(kind.as_str())
    }
}

// ============================================================================
// Options
// ============================================================================

/// An immutable set of named options
///
/// Builder methods consume and return the value; nothing mutates an
/// `Options` that has been handed to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults, the lowest precedence tier
    pub fn defaults() -> Self {
        Self::new()
            .with(keys::BASE_URL, DEFAULT_BASE_URL)
            .with(keys::LIMIT, DEFAULT_LIMIT)
            .with(keys::POLL_INTERVAL, DEFAULT_POLL_INTERVAL_SECS)
            .with(keys::RETRIES, Retries::default())
            .with(keys::RETRY_DELAY, DEFAULT_RETRY_DELAY_SECS)
            .with(keys::RETRY_BACKOFF, DEFAULT_RETRY_BACKOFF)
            .with(keys::FULL_PAYLOAD, false)
            .with(keys::ITERATOR_TYPE, IteratorType::Pages)
    }

    /// Set an option
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a raw option value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether an option is set
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of options set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over option names and values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Layer `other` on top of `self`
    #[must_use]
    pub fn merged(&self, other: &Options) -> Options {
        let mut map = self.0.clone();
        for (key, value) in &other.0 {
            map.insert(key.clone(), value.clone());
        }
        Self(map)
    }

    /// Restrict to the given keys
    #[must_use]
    pub fn select(&self, keys: &[&str]) -> Options {
        keys.iter()
            .filter_map(|key| self.0.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect()
    }

    /// Copy without one key
    #[must_use]
    pub fn without(&self, key: &str) -> Options {
        let mut map = self.0.clone();
        map.remove(key);
        Self(map)
    }

    /// `limit`, `offset` and `sync`
    pub fn query_options(&self) -> Options {
        self.select(QUERY_KEYS)
    }

    /// `pretty`, `fields` and `expand`, as sent in a request body
    pub fn api_options(&self) -> Options {
        self.select(API_KEYS)
    }

    /// API modifier options in query-string form
    ///
    /// Keys get an `opt_` prefix and sequences are joined with commas.
    pub fn api_query_options(&self) -> Options {
        self.api_options()
            .0
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Array(items) => Value::from(
                        items
                            .iter()
                            .filter_map(query_value)
                            .collect::<Vec<_>>()
                            .join(","),
                    ),
                    other => other,
                };
                (format!("opt_{key}"), value)
            })
            .collect()
    }

    /// `headers`, `params` and `data`
    pub fn transport_options(&self) -> Options {
        self.select(TRANSPORT_KEYS)
    }

    // ------------------------------------------------------------------------
    // Typed accessors. Missing keys fall back to the built-in defaults.
    // ------------------------------------------------------------------------

    /// API root that request paths are appended to
    pub fn base_url(&self) -> Result<&str> {
        match self.get(keys::BASE_URL) {
            None => Ok(DEFAULT_BASE_URL),
            Some(Value::String(url)) => Ok(url),
            Some(other) => Err(Error::invalid_option(
                keys::BASE_URL,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Page size, if set
    pub fn limit(&self) -> Result<Option<u64>> {
        match self.get(keys::LIMIT) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                Error::invalid_option(keys::LIMIT, format!("expected an integer, got {value}"))
            }),
        }
    }

    /// Interval for long-polling callers
    pub fn poll_interval(&self) -> Result<Duration> {
        self.seconds(keys::POLL_INTERVAL, DEFAULT_POLL_INTERVAL_SECS)
    }

    /// Retry budget
    pub fn retries(&self) -> Result<Retries> {
        self.get(keys::RETRIES)
            .map_or(Ok(Retries::default()), Retries::from_value)
    }

    /// First backoff delay
    pub fn retry_delay(&self) -> Result<Duration> {
        self.seconds(keys::RETRY_DELAY, DEFAULT_RETRY_DELAY_SECS)
    }

    /// Backoff multiplier applied after each delay
    pub fn retry_backoff(&self) -> Result<f64> {
        self.non_negative(keys::RETRY_BACKOFF, DEFAULT_RETRY_BACKOFF)
    }

    /// Whether to return the full response envelope
    pub fn full_payload(&self) -> Result<bool> {
        match self.get(keys::FULL_PAYLOAD) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(Error::invalid_option(
                keys::FULL_PAYLOAD,
                format!("expected a boolean, got {other}"),
            )),
        }
    }

    /// Collection iteration strategy
    pub fn iterator_type(&self) -> Result<Option<IteratorType>> {
        self.get(keys::ITERATOR_TYPE)
            .map_or(Ok(Some(IteratorType::Pages)), IteratorType::from_value)
    }

    /// Extra request headers
    pub fn headers(&self) -> Result<Vec<(String, String)>> {
        self.string_pairs(keys::HEADERS)
    }

    /// Query parameters, with booleans spelled `true`/`false`
    pub fn params(&self) -> Result<Vec<(String, String)>> {
        self.string_pairs(keys::PARAMS)
    }

    /// Request body
    pub fn data(&self) -> Option<&Value> {
        self.get(keys::DATA).filter(|v| !v.is_null())
    }

    /// Check every recognized option that is set has a usable value
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(self.base_url()?)?;
        self.limit()?;
        self.poll_interval()?;
        self.retries()?;
        self.retry_delay()?;
        self.retry_backoff()?;
        self.full_payload()?;
        self.iterator_type()?;
        self.headers()?;
        self.params()?;
        Ok(())
    }

    fn seconds(&self, key: &str, default: f64) -> Result<Duration> {
        let secs = self.non_negative(key, default)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            Error::invalid_option(key, format!("{secs} seconds is out of range"))
        })
    }

    fn non_negative(&self, key: &str, default: f64) -> Result<f64> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.as_f64() {
            Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
            _ => Err(Error::invalid_option(
                key,
                format!("expected a non-negative number, got {value}"),
            )),
        }
    }

    fn string_pairs(&self, key: &str) -> Result<Vec<(String, String)>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(map)) => Ok(map
                .iter()
                .filter_map(|(k, v)| query_value(v).map(|v| (k.clone(), v)))
                .collect()),
            Some(other) => Err(Error::invalid_option(
                key,
                format!("expected an object, got {other}"),
            )),
        }
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        Value::Object(options.0)
    }
}

impl TryFrom<Value> for Options {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::config(format!(
                "options must be a JSON object, got {other}"
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Merge option tiers, lowest precedence first
pub fn resolve(layers: &[&Options]) -> Options {
    layers
        .iter()
        .fold(Options::new(), |acc, layer| acc.merged(layer))
}

/// Textual form of a value in a query string or header
///
/// Booleans become `true`/`false`, sequences are comma-joined and `null`
/// is dropped.
pub fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
