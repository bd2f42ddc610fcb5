//! Store error types.

use ratedesk_common::CurrencyPair;
use thiserror::Error;

/// Errors from the favorites store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pair is not among the user's favorites.
    #[error("favorite {pair} not found for user {user_id}")]
    NotFound { user_id: i64, pair: CurrencyPair },

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
