//! ratedesk Favorites Store
//!
//! Persistence for user-favorite currency pairs: a repository trait with a
//! Postgres implementation for production and an in-memory one for tests
//! and offline use.

pub mod error;
pub mod favorites;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use favorites::{FavoritePair, FavoritesRepository};
pub use memory::MemoryFavorites;
pub use postgres::PostgresFavorites;
