//! Shared rate cache with TTL.

use chrono::Duration;
use dashmap::DashMap;
use ratedesk_common::{expires_in, is_expired, CurrencyPair, ExchangeRate, Timestamp};
use std::sync::Arc;
use tracing::debug;

/// Cached rate entry. Owned exclusively by the cache; lookups hand out
/// clones, never references.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    expires_at: Timestamp,
}

impl CacheEntry {
    fn new(rate: ExchangeRate, ttl: Duration) -> Self {
        Self {
            rate,
            expires_at: expires_in(ttl),
        }
    }

    fn is_valid(&self) -> bool {
        !is_expired(self.expires_at)
    }
}

/// Thread-safe rate cache keyed by ordered currency pair; a pair and its
/// inverse are distinct keys, no inverse is ever derived.
///
/// Expiry is lazy: `get` treats an expired entry as a miss but leaves it in
/// place. [`RateCache::evict_expired`] performs the eager sweep and is meant
/// to run periodically from an external scheduler to bound memory.
pub struct RateCache {
    entries: DashMap<CurrencyPair, CacheEntry>,
    ttl: Duration,
}

/// Default entry lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

impl RateCache {
    /// Create a cache with the given entry lifetime. A zero or negative
    /// TTL expires every entry immediately.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Create a cache with a TTL given in whole minutes.
    pub fn with_ttl_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes))
    }

    /// Get a rate if a valid entry exists. An expired entry behaves
    /// exactly like a miss.
    pub fn get(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        match self.entries.get(pair) {
            Some(entry) if entry.is_valid() => {
                debug!(pair = %pair, "cache hit");
                Some(entry.rate.clone())
            }
            Some(_) => {
                debug!(pair = %pair, "cache entry expired");
                None
            }
            None => {
                debug!(pair = %pair, "cache miss");
                None
            }
        }
    }

    /// Insert a rate, keyed by its pair. Last write wins.
    pub fn insert(&self, rate: ExchangeRate) {
        let entry = CacheEntry::new(rate.clone(), self.ttl);
        self.entries.insert(rate.pair, entry);
    }

    /// Remove exactly the entries whose expiry has passed.
    pub fn evict_expired(&self) {
        self.entries.retain(|_, entry| entry.is_valid());
    }

    /// Periodically sweep expired entries. Intended for long-running
    /// embedders; never required for correctness.
    pub async fn run_cleanup_loop(&self, interval: std::time::Duration) {
        loop {
            tokio::time::sleep(interval).await;
            self.evict_expired();
        }
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including expired ones awaiting eviction.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let valid = self.entries.iter().filter(|e| e.is_valid()).count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::with_ttl_minutes(DEFAULT_TTL_MINUTES)
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ratedesk_common::CurrencyCode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn make_rate(base: &str, quote: &str, rate: Decimal) -> ExchangeRate {
        ExchangeRate::new(
            CurrencyPair::new(CurrencyCode::new(base), CurrencyCode::new(quote)),
            rate,
            "TEST",
        )
    }

    #[test]
    fn test_insert_and_get() {
        let cache = RateCache::default();
        let rate = make_rate("USD", "RUB", dec!(90.0));
        let pair = rate.pair.clone();

        cache.insert(rate.clone());

        let cached = cache.get(&pair).unwrap();
        assert_eq!(cached.pair, pair);
        assert_eq!(cached.rate, dec!(90.0));
    }

    #[test]
    fn test_miss_on_unwritten_key() {
        let cache = RateCache::default();
        let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("EUR"));

        assert!(cache.get(&pair).is_none());
    }

    #[test]
    fn test_pair_and_inverse_are_distinct_keys() {
        let cache = RateCache::default();
        let rate = make_rate("USD", "RUB", dec!(90.0));
        let inverse = rate.pair.inverse();

        cache.insert(rate);

        assert!(cache.get(&inverse).is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = RateCache::new(Duration::zero());
        let rate = make_rate("USD", "RUB", dec!(90.0));
        let pair = rate.pair.clone();

        cache.insert(rate);

        assert!(cache.get(&pair).is_none());
        // Lazy expiry: the entry is still physically present.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expiry_after_ttl_elapses() {
        let cache = RateCache::new(Duration::milliseconds(50));
        let rate = make_rate("USD", "RUB", dec!(90.0));
        let pair = rate.pair.clone();

        cache.insert(rate);
        assert!(cache.get(&pair).is_some());

        sleep(StdDuration::from_millis(60));

        assert!(cache.get(&pair).is_none());
    }

    #[test]
    fn test_evict_expired_removes_exactly_expired_entries() {
        let cache = RateCache::new(Duration::milliseconds(80));

        cache.insert(make_rate("USD", "RUB", dec!(90.0)));
        sleep(StdDuration::from_millis(100));
        cache.insert(make_rate("EUR", "RUB", dec!(100.0)));

        assert_eq!(cache.len(), 2);

        cache.evict_expired();

        assert_eq!(cache.len(), 1);
        let kept = CurrencyPair::new(CurrencyCode::new("EUR"), CurrencyCode::new("RUB"));
        assert!(cache.get(&kept).is_some());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = RateCache::default();
        let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("RUB"));

        cache.insert(make_rate("USD", "RUB", dec!(90.0)));
        cache.insert(make_rate("USD", "RUB", dec!(91.5)));

        assert_eq!(cache.get(&pair).unwrap().rate, dec!(91.5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_use_across_threads() {
        let cache = Arc::new(RateCache::default());
        let codes = ["USD", "EUR", "GBP", "JPY", "CHF", "CNY", "AUD", "CAD"];

        let handles: Vec<_> = codes
            .iter()
            .map(|code| {
                let cache = Arc::clone(&cache);
                let code = code.to_string();
                std::thread::spawn(move || {
                    for i in 1..=100i64 {
                        let rate = ExchangeRate::new(
                            CurrencyPair::new(
                                CurrencyCode::new(&code),
                                CurrencyCode::new("RUB"),
                            ),
                            Decimal::from(i),
                            "TEST",
                        );
                        let pair = rate.pair.clone();
                        cache.insert(rate);
                        assert!(cache.get(&pair).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), codes.len());
    }

    proptest! {
        #[test]
        fn prop_set_then_get_returns_rate(
            base in "[A-Z]{3}",
            quote in "[A-Z]{3}",
            mantissa in 1i64..=1_000_000_000,
            scale in 0u32..9,
        ) {
            let rate_value = Decimal::new(mantissa, scale);
            prop_assume!(rate_value > Decimal::ZERO);

            let cache = RateCache::default();
            let rate = make_rate(&base, &quote, rate_value);
            let pair = rate.pair.clone();

            cache.insert(rate);

            let cached = cache.get(&pair).unwrap();
            prop_assert_eq!(cached.rate, rate_value);
        }
    }
}
