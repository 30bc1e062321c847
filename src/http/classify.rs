//! Status code classification
//!
//! Maps a response to an [`ApiError`] using a fixed table:
//!
//! | Status          | Kind               | Retryable |
//! |-----------------|--------------------|-----------|
//! | 400, 409        | InvalidRequest     | no        |
//! | 401             | NoAuthorization    | no        |
//! | 403             | Forbidden          | no        |
//! | 404             | NotFound           | no        |
//! | 412             | PreconditionFailed | no        |
//! | 429             | RateLimitEnforced  | yes       |
//! | 500, 502-504    | ServerError        | yes       |
//!
//! Anything else at or above 400 is `Unexpected` and not retried.

use super::transport::TransportResponse;
use crate::error::{ApiError, ErrorKind};
use std::time::Duration;

/// Wait used when a 429 carries no usable `Retry-After`
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Classify a response, returning `None` for success
pub fn classify(response: &TransportResponse) -> Option<ApiError> {
    let kind = kind_for_status(response.status, || retry_after(response))?;
    Some(ApiError::new(kind, response.status, response.body.clone()))
}

/// Look up the error kind for a status code
///
/// `retry_after` is only consulted for 429.
pub fn kind_for_status(status: u16, retry_after: impl FnOnce() -> Duration) -> Option<ErrorKind> {
    let kind = match status {
        400 | 409 => ErrorKind::InvalidRequest,
        401 => ErrorKind::NoAuthorization,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        412 => ErrorKind::PreconditionFailed,
        429 => ErrorKind::RateLimitEnforced {
            retry_after: retry_after(),
        },
        500 | 502 | 503 | 504 => ErrorKind::ServerError,
        s if s < 400 => return None,
        _ => ErrorKind::Unexpected,
    };
    Some(kind)
}

/// Extract the `Retry-After` header in seconds
fn retry_after(response: &TransportResponse) -> Duration {
    response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
