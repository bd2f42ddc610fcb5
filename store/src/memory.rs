//! In-memory favorites repository for tests and offline use.

use async_trait::async_trait;
use dashmap::DashMap;
use ratedesk_common::{now, CurrencyPair};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::StoreError;
use crate::favorites::{FavoritePair, FavoritesRepository};

/// DashMap-backed repository with the same observable contract as the
/// Postgres one.
#[derive(Default)]
pub struct MemoryFavorites {
    favorites: DashMap<i64, Vec<FavoritePair>>,
    next_id: AtomicI64,
}

impl MemoryFavorites {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesRepository for MemoryFavorites {
    async fn add(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError> {
        let mut entry = self.favorites.entry(user_id).or_default();

        if entry.iter().any(|f| &f.pair == pair) {
            return Ok(());
        }

        let favorite = FavoritePair {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id,
            pair: pair.clone(),
            created_at: now(),
        };
        // Newest first, matching the Postgres ordering.
        entry.insert(0, favorite);

        Ok(())
    }

    async fn list(&self, user_id: i64) -> Result<Vec<FavoritePair>, StoreError> {
        Ok(self
            .favorites
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn remove(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError> {
        let mut entry = self
            .favorites
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound {
                user_id,
                pair: pair.clone(),
            })?;

        let before = entry.len();
        entry.retain(|f| &f.pair != pair);

        if entry.len() == before {
            return Err(StoreError::NotFound {
                user_id,
                pair: pair.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratedesk_common::CurrencyCode;

    fn pair(base: &str, quote: &str) -> CurrencyPair {
        CurrencyPair::new(CurrencyCode::new(base), CurrencyCode::new(quote))
    }

    #[tokio::test]
    async fn add_and_list() {
        let store = MemoryFavorites::new();
        store.add(1, &pair("USD", "RUB")).await.unwrap();
        store.add(1, &pair("EUR", "RUB")).await.unwrap();
        store.add(2, &pair("GBP", "USD")).await.unwrap();

        let favorites = store.list(1).await.unwrap();
        assert_eq!(favorites.len(), 2);
        // Newest first.
        assert_eq!(favorites[0].pair, pair("EUR", "RUB"));
        assert_eq!(store.list(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_add_is_idempotent() {
        let store = MemoryFavorites::new();
        store.add(1, &pair("USD", "RUB")).await.unwrap();
        store.add(1, &pair("USD", "RUB")).await.unwrap();

        assert_eq!(store.list(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_the_pair() {
        let store = MemoryFavorites::new();
        store.add(1, &pair("USD", "RUB")).await.unwrap();
        store.remove(1, &pair("USD", "RUB")).await.unwrap();

        assert!(store.list(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_missing_pair_fails() {
        let store = MemoryFavorites::new();
        store.add(1, &pair("USD", "RUB")).await.unwrap();

        let result = store.remove(1, &pair("EUR", "RUB")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        let result = store.remove(99, &pair("USD", "RUB")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_for_unknown_user_is_empty() {
        let store = MemoryFavorites::new();
        assert!(store.list(42).await.unwrap().is_empty());
    }
}
