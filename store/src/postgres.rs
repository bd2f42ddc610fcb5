//! Postgres-backed favorites repository.

use async_trait::async_trait;
use ratedesk_common::{CurrencyCode, CurrencyPair, Timestamp};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::info;

use crate::error::StoreError;
use crate::favorites::{FavoritePair, FavoritesRepository};

/// Favorites repository over a Postgres connection pool.
pub struct PostgresFavorites {
    pool: PgPool,
}

impl PostgresFavorites {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("favorites store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl FavoritesRepository for PostgresFavorites {
    async fn add(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, from_currency, to_currency)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, from_currency, to_currency) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(pair.base.as_str())
        .bind(pair.quote.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, user_id: i64) -> Result<Vec<FavoritePair>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, from_currency, to_currency, created_at
            FROM user_favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let favorites = rows
            .into_iter()
            .map(|row| {
                let from: String = row.get("from_currency");
                let to: String = row.get("to_currency");
                let created_at: Timestamp = row.get("created_at");
                FavoritePair {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    pair: CurrencyPair::new(CurrencyCode::new(from), CurrencyCode::new(to)),
                    created_at,
                }
            })
            .collect();

        Ok(favorites)
    }

    async fn remove(&self, user_id: i64, pair: &CurrencyPair) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_favorites
            WHERE user_id = $1 AND from_currency = $2 AND to_currency = $3
            "#,
        )
        .bind(user_id)
        .bind(pair.base.as_str())
        .bind(pair.quote.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                user_id,
                pair: pair.clone(),
            });
        }

        Ok(())
    }
}
