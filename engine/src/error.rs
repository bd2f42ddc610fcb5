//! Engine error types.

use ratedesk_common::{CurrencyCode, CurrencyPair, InvalidCurrencyCode};
use thiserror::Error;

/// Errors a single provider can fail with. Inside the resolver every
/// variant is a "try the next provider" signal.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Transport failure, timeout, or non-2xx upstream status.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream responded but the payload is unusable.
    #[error("malformed upstream response: {0}")]
    Parse(String),

    /// Provider structurally cannot serve this pair. Raised before any
    /// network I/O.
    #[error("provider {provider} cannot serve {pair}")]
    UnsupportedPair {
        provider: String,
        pair: CurrencyPair,
    },

    /// Upstream data is well-formed but does not contain the requested
    /// currency.
    #[error("currency {0} not found in upstream data")]
    NotFound(CurrencyCode),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timeout: {err}"))
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(format!("request failed: {err}"))
        }
    }
}

/// Errors surfaced to resolver callers.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A currency code was empty after normalization. Caller's fault, not
    /// retried.
    #[error(transparent)]
    InvalidCode(#[from] InvalidCurrencyCode),

    /// Every configured provider reported itself unavailable (or the
    /// provider list is empty).
    #[error("no rate provider available for {0}")]
    NoProvidersAvailable(CurrencyPair),

    /// Every available provider was tried and failed. Carries the last
    /// per-provider error; earlier ones are superseded.
    #[error("all providers failed for {pair}")]
    Exhausted {
        pair: CurrencyPair,
        #[source]
        source: ProviderError,
    },
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
