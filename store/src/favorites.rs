//! Favorites repository contract.

use async_trait::async_trait;
use ratedesk_common::{CurrencyPair, Timestamp};

use crate::error::StoreError;

/// A user's saved currency pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritePair {
    /// Row identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// The saved pair.
    pub pair: CurrencyPair,
    /// When the favorite was added.
    pub created_at: Timestamp,
}

/// Operations on a user's favorite pairs.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Save a pair for a user. Adding an existing favorite is a no-op.
    async fn add(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError>;

    /// List a user's favorites, most recent first.
    async fn list(&self, user_id: i64) -> Result<Vec<FavoritePair>, StoreError>;

    /// Remove a saved pair. Fails with [`StoreError::NotFound`] if the
    /// user never saved it.
    async fn remove(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError>;
}
