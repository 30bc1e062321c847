//! Request executor
//!
//! [`Client`] resolves options for each call, sends the request through its
//! [`Transport`], classifies the response and retries retryable failures:
//! - Rate limited responses wait exactly the server's `Retry-After`
//! - Other retryable failures back off exponentially from `retry_delay`
//! - Non-retryable failures propagate on first occurrence

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{
    classify, RateLimiter, RateLimiterConfig, ReqwestTransport, RetryState, Transport,
    TransportConfig, TransportRequest,
};
use crate::options::{keys, resolve, IteratorType, Options, Retries};
use crate::pagination::{Collection, ItemIterator, PageIterator};
use crate::types::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Builder for [`Client`]
pub struct ClientBuilder {
    options: Options,
    auth: AuthConfig,
    transport_config: TransportConfig,
    rate_limit: Option<RateLimiterConfig>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            options: Options::new(),
            auth: AuthConfig::None,
            transport_config: TransportConfig::default(),
            rate_limit: None,
            transport: None,
        }
    }
}

impl ClientBuilder {
    /// Set a construction-time option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.with(key, value);
        self
    }

    /// Layer a set of construction-time options
    pub fn options(mut self, options: &Options) -> Self {
        self.options = self.options.merged(options);
        self
    }

    /// Set the API root
    pub fn base_url(self, url: impl Into<String>) -> Self {
        self.option(keys::BASE_URL, url.into())
    }

    /// Set the default page size
    pub fn limit(self, limit: u64) -> Self {
        self.option(keys::LIMIT, limit)
    }

    /// Set the retry budget
    pub fn retries(self, retries: Retries) -> Self {
        self.option(keys::RETRIES, retries)
    }

    /// Set the first backoff delay
    pub fn retry_delay(self, delay: Duration) -> Self {
        self.option(keys::RETRY_DELAY, delay.as_secs_f64())
    }

    /// Set the backoff multiplier
    pub fn retry_backoff(self, backoff: f64) -> Self {
        self.option(keys::RETRY_BACKOFF, backoff)
    }

    /// Set the long-poll interval
    pub fn poll_interval(self, interval: Duration) -> Self {
        self.option(keys::POLL_INTERVAL, interval.as_secs_f64())
    }

    /// Return full response envelopes instead of `data`
    pub fn full_payload(self, full_payload: bool) -> Self {
        self.option(keys::FULL_PAYLOAD, full_payload)
    }

    /// Choose how `get_collection` iterates; `None` returns plain data
    pub fn iterator_type(self, iterator_type: Option<IteratorType>) -> Self {
        self.option(
            keys::ITERATOR_TYPE,
            iterator_type.map_or(Value::Null, Value::from),
        )
    }

    /// Set the credential applied by the default transport
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set the request timeout of the default transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = timeout;
        self
    }

    /// Set the user agent of the default transport
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.transport_config.user_agent = agent.into();
        self
    }

    /// Throttle outgoing requests on the client side
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Use a custom transport instead of reqwest
    ///
    /// The transport is responsible for authentication; `auth`, `timeout`
    /// and `user_agent` are ignored.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client, validating the recognized options
    pub fn build(self) -> Result<Client> {
        let options = Options::defaults().merged(&self.options);
        options.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.transport_config, self.auth)?),
        };

        Ok(Client {
            transport,
            options,
            rate_limiter: self.rate_limit.as_ref().map(RateLimiter::new),
        })
    }
}

/// Asana API client
///
/// Cheap to clone; clones share the transport and the rate limiter.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    options: Options,
    rate_limiter: Option<RateLimiter>,
}

impl Client {
    /// Create a client with default options and no credential
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client authenticating with an API key
    pub fn basic_auth(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().auth(AuthConfig::api_key(api_key)).build()
    }

    /// Create a client authenticating with a personal access or OAuth token
    pub fn access_token(token: impl Into<String>) -> Result<Self> {
        Self::builder().auth(AuthConfig::bearer(token)).build()
    }

    /// Defaults merged with construction-time options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Layer per-call options over the client's options
    pub fn resolve_options(&self, options: &Options) -> Options {
        resolve(&[&self.options, options])
    }

    /// Check if client-side throttling is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Issue one logical request, retrying retryable failures
    ///
    /// Returns the response's `data` member, or the whole envelope when
    /// `full_payload` is set.
    pub async fn request(&self, method: Method, path: &str, options: &Options) -> Result<Value> {
        let options = self.resolve_options(options);
        let request = build_request(method, path, &options)?;
        let full_payload = options.full_payload()?;
        let mut retry = RetryState::new(
            options.retries()?,
            options.retry_delay()?,
            options.retry_backoff()?,
        );

        let mut attempt: u64 = 1;
        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            debug!("{} {} (attempt {})", method, request.url, attempt);
            let response = self.transport.send(request.clone()).await?;

            let Some(error) = classify(&response) else {
                return decode_body(&response.body, full_payload);
            };

            match retry.next_delay(&error) {
                Some(delay) => {
                    warn!(
                        "{} {} failed with {}, attempt {}, retrying in {:?}",
                        method, request.url, error.status, attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    debug!(
                        "{} {} failed with {} after {} attempt(s)",
                        method, request.url, error.status, attempt
                    );
                    return Err(error.into());
                }
            }
        }
    }

    /// GET a resource
    ///
    /// Query options (`limit`, `offset`, `sync`) and API modifiers
    /// (`opt_pretty`, `opt_fields`, `opt_expand`) are added to the query
    /// string; entries in `query` win over both.
    pub async fn get(&self, path: &str, query: &Options, options: &Options) -> Result<Value> {
        let resolved = self.resolve_options(options);
        let params = resolve(&[
            &resolved.query_options(),
            &resolved.api_query_options(),
            query,
        ]);
        let options = options.clone().with(keys::PARAMS, params);
        self.request(Method::GET, path, &options).await
    }

    /// GET a collection, shaped by the `iterator_type` option
    pub async fn get_collection(
        &self,
        path: &str,
        query: &Options,
        options: &Options,
    ) -> Result<Collection> {
        match self.resolve_options(options).iterator_type()? {
            Some(IteratorType::Pages) => Ok(Collection::Pages(self.get_pages(path, query, options))),
            Some(IteratorType::Items) => Ok(Collection::Items(self.get_items(path, query, options))),
            None => self.get(path, query, options).await.map(Collection::Data),
        }
    }

    /// Iterate over a collection page by page
    pub fn get_pages(
        &self,
        path: impl Into<String>,
        query: &Options,
        options: &Options,
    ) -> PageIterator {
        PageIterator::new(self.clone(), path.into(), query.clone(), options.clone())
    }

    /// Iterate over a collection item by item
    pub fn get_items(
        &self,
        path: impl Into<String>,
        query: &Options,
        options: &Options,
    ) -> ItemIterator {
        ItemIterator::new(self.get_pages(path, query, options))
    }

    /// POST `{ "data": data }` to a path
    pub async fn post(&self, path: &str, data: Value, options: &Options) -> Result<Value> {
        self.write(Method::POST, path, data, options).await
    }

    /// PUT `{ "data": data }` to a path
    pub async fn put(&self, path: &str, data: Value, options: &Options) -> Result<Value> {
        self.write(Method::PUT, path, data, options).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, options: &Options) -> Result<Value> {
        let options = options.clone().with(keys::DATA, Value::Null);
        self.request(Method::DELETE, path, &options).await
    }

    async fn write(&self, method: Method, path: &str, data: Value, options: &Options) -> Result<Value> {
        let resolved = self.resolve_options(options);

        let mut body = Map::new();
        body.insert("data".to_string(), data);
        let api_options = resolved.api_options();
        if !api_options.is_empty() {
            body.insert("options".to_string(), api_options.into());
        }

        let mut headers = match resolved.get(keys::HEADERS) {
            Some(Value::Object(headers)) => headers.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                return Err(Error::invalid_option(
                    keys::HEADERS,
                    format!("expected an object, got {other}"),
                ));
            }
        };
        headers.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
        headers.insert("content-type".to_string(), "application/json".into());

        let options = options
            .clone()
            .with(keys::HEADERS, headers)
            .with(keys::DATA, body);
        self.request(method, path, &options).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Build the transport request from resolved options
///
/// The URL is `base_url + path` verbatim, so a path that already carries a
/// query string (as pagination cursors do) keeps it.
fn build_request(method: Method, path: &str, options: &Options) -> Result<TransportRequest> {
    let mut url = Url::parse(&format!("{}{}", options.base_url()?, path))?;
    let transport = options.transport_options();

    let params = transport.params()?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    let mut request = TransportRequest::new(method, url);
    request.headers = transport.headers()?;
    request.body = match transport.data() {
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(data) => Some(serde_json::to_string(data)?),
        None => None,
    };
    Ok(request)
}

/// Decode a successful response body
fn decode_body(body: &str, full_payload: bool) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let envelope: Value = serde_json::from_str(body)?;
    if full_payload {
        return Ok(envelope);
    }

    match envelope {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| Error::decode("response has no 'data' member")),
        other => Err(Error::decode(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
