//! Rate resolution over an ordered provider fallback chain.

use std::sync::Arc;

use ratedesk_common::{CurrencyCode, CurrencyPair, ExchangeRate};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::cache::{RateCache, SharedRateCache};
use crate::catalog;
use crate::error::{ResolveError, ResolveResult};
use crate::provider::RateProvider;

/// Configuration for the rate resolver.
#[derive(Debug, Clone)]
pub struct RateResolverConfig {
    /// Cache entry lifetime in minutes.
    pub cache_ttl_minutes: i64,
    /// Whether to consult the cache before contacting providers.
    pub use_cache: bool,
}

impl Default for RateResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: crate::cache::DEFAULT_TTL_MINUTES,
            use_cache: true,
        }
    }
}

/// Resolves exchange rates through an ordered provider list with a shared
/// read-through/write-through cache.
///
/// The resolver itself is stateless orchestration; it is safe to call from
/// any number of concurrent tasks. Concurrent lookups for the same pair may
/// each reach upstream (no in-flight coalescing).
pub struct RateResolver {
    providers: Vec<Arc<dyn RateProvider>>,
    cache: SharedRateCache,
    config: RateResolverConfig,
}

impl RateResolver {
    /// Create a resolver owning a fresh cache. Provider order encodes
    /// fallback priority and is preserved exactly.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>, config: RateResolverConfig) -> Self {
        let cache = Arc::new(RateCache::with_ttl_minutes(config.cache_ttl_minutes));
        Self::with_cache(providers, cache, config)
    }

    /// Create a resolver sharing an externally owned cache.
    pub fn with_cache(
        providers: Vec<Arc<dyn RateProvider>>,
        cache: SharedRateCache,
        config: RateResolverConfig,
    ) -> Self {
        Self {
            providers,
            cache,
            config,
        }
    }

    /// Resolve the rate for raw currency-code input. Codes are trimmed and
    /// uppercased; empty codes fail immediately.
    pub async fn get_rate(&self, from: &str, to: &str) -> ResolveResult<ExchangeRate> {
        let pair = CurrencyPair::new(CurrencyCode::parse(from)?, CurrencyCode::parse(to)?);
        self.resolve(&pair).await
    }

    /// Resolve the rate for a normalized pair.
    ///
    /// A valid cache entry short-circuits the provider chain entirely;
    /// on a miss, providers are tried in configured order and the first
    /// success is written through to the cache. Only total exhaustion
    /// surfaces an error, carrying the last provider failure.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn resolve(&self, pair: &CurrencyPair) -> ResolveResult<ExchangeRate> {
        if self.config.use_cache {
            if let Some(cached) = self.cache.get(pair) {
                debug!(source = %cached.source, "using cached rate");
                return Ok(cached);
            }
        }

        let mut last_err = None;

        for provider in &self.providers {
            if !provider.is_available() {
                debug!(provider = provider.name(), "provider unavailable, skipping");
                continue;
            }

            match provider.get_rate(pair).await {
                Ok(rate) => {
                    info!(
                        provider = provider.name(),
                        rate = %rate.rate,
                        "resolved rate"
                    );
                    self.cache.insert(rate.clone());
                    return Ok(rate);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next"
                    );
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(source) => Err(ResolveError::Exhausted {
                pair: pair.clone(),
                source,
            }),
            None => Err(ResolveError::NoProvidersAvailable(pair.clone())),
        }
    }

    /// Convert an amount of `from` into `to` at the resolved rate. Any
    /// amount is accepted, including zero and negative values.
    pub async fn convert(&self, amount: Decimal, from: &str, to: &str) -> ResolveResult<Decimal> {
        let rate = self.get_rate(from, to).await?;
        Ok(rate.convert(amount))
    }

    /// The static code-to-display-name catalog.
    pub fn supported_currencies(&self) -> &'static [(&'static str, &'static str)] {
        catalog::supported_currencies()
    }

    /// The shared cache, for embedders that schedule cleanup or inspect
    /// statistics.
    pub fn cache(&self) -> &SharedRateCache {
        &self.cache
    }

    /// Eagerly evict expired cache entries.
    pub fn cleanup(&self) {
        self.cache.evict_expired();
    }
}
