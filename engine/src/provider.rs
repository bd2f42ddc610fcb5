//! Rate provider trait and test utilities.

use async_trait::async_trait;
use ratedesk_common::{CurrencyPair, ExchangeRate};

use crate::error::ProviderError;

/// A single upstream rate source.
///
/// Providers are constructed once at startup and hold no mutable state, so
/// one instance may serve any number of concurrent lookups. Cancellation is
/// the usual async form: dropping the returned future aborts any in-flight
/// HTTP call, and every concrete provider carries a bounded request timeout.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Stable identifier for logging and diagnostics.
    fn name(&self) -> &str;

    /// Cheap, non-blocking liveness signal. Providers without an
    /// independent health check report `true`.
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch the current rate for a pair.
    async fn get_rate(&self, pair: &CurrencyPair) -> Result<ExchangeRate, ProviderError>;
}

/// Mock rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    rates: dashmap::DashMap<CurrencyPair, ExchangeRate>,
    failure: std::sync::Mutex<Option<ProviderError>>,
    available: std::sync::atomic::AtomicBool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: dashmap::DashMap::new(),
            failure: std::sync::Mutex::new(None),
            available: std::sync::atomic::AtomicBool::new(true),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set a rate for a currency pair.
    pub fn set_rate(&self, rate: ExchangeRate) {
        self.rates.insert(rate.pair.clone(), rate);
    }

    /// Make every `get_rate` call fail with the given error.
    pub fn fail_with(&self, error: ProviderError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Toggle the availability signal.
    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of `get_rate` invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> Result<ExchangeRate, ProviderError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        self.rates
            .get(pair)
            .map(|r| r.clone())
            .ok_or_else(|| ProviderError::NotFound(pair.quote.clone()))
    }
}
