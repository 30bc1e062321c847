//! HTTP plumbing
//!
//! Everything the executor needs below the verb surface.
//!
//! # Features
//!
//! - **Transport**: `Transport` trait with a reqwest-backed default
//! - **Classification**: fixed status table producing typed API errors
//! - **Retry State**: bounded or unbounded budget with exponential backoff
//! - **Rate Limiting**: optional client-side token bucket using governor

mod classify;
mod rate_limit;
mod retry;
mod transport;

pub use classify::{classify, kind_for_status, DEFAULT_RETRY_AFTER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::RetryState;
pub use transport::{
    ReqwestTransport, Transport, TransportConfig, TransportRequest, TransportResponse,
};
