//! Provider error types.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Errors from external data providers. Logged, never surfaced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The call did not finish in time.
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be sent or the connection failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("Could not decode provider response: {0}")]
    Decode(String),

    /// The provider answered but has nothing usable.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Runs `call` with a deadline.
///
/// # Errors
///
/// Returns `ProviderError::Timeout` if `timeout` elapses first, or the
/// call's own error.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| ProviderError::Timeout(timeout))?
}
