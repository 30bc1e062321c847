//! Transport seam
//!
//! The executor hands a fully built [`TransportRequest`] to a [`Transport`]
//! and gets back the raw status, headers and body. [`ReqwestTransport`] is
//! the default implementation.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// One HTTP request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Full URL including query string
    pub url: Url,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Serialized request body
    pub body: Option<String>,
}

impl TransportRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters of the URL, in order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// A raw HTTP response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: String,
}

impl TransportResponse {
    /// Create a response with a body and no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Performs a single HTTP exchange
///
/// Implementations must not retry; retries belong to the executor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Configuration for the default transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("asana-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    authenticator: Authenticator,
}

impl ReqwestTransport {
    /// Create a transport with the given settings and credential
    pub fn new(config: &TransportConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self::with_client(client, auth))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, auth: AuthConfig) -> Self {
        Self {
            client,
            authenticator: Authenticator::new(auth),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut req = self
            .client
            .request(request.method.into(), request.url.clone());

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        req = self.authenticator.apply(req);

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        trace!("{} {} -> {}", request.method, request.url, status);
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
