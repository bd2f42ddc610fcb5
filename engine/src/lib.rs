//! ratedesk Rate Resolution Engine
//!
//! Resolves currency-pair exchange rates by querying upstream providers in
//! priority order, with a shared TTL-bounded cache in front of them.
//!
//! # Features
//!
//! - Provider abstraction with ordered fallback
//! - REST (JSON) and daily-bulletin (XML) providers
//! - Concurrent read-through/write-through rate cache with TTL
//! - Static currency catalog for display
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ratedesk_engine::{BulletinProvider, RateResolver, RateResolverConfig, RestProvider};
//!
//! let resolver = RateResolver::new(
//!     vec![Arc::new(RestProvider::new()), Arc::new(BulletinProvider::new())],
//!     RateResolverConfig::default(),
//! );
//!
//! let rate = resolver.get_rate("USD", "RUB").await?;
//! let rub = resolver.convert(dec!(100), "USD", "RUB").await?;
//! ```

pub mod bulletin;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod rest;

pub use bulletin::BulletinProvider;
pub use cache::{CacheStats, RateCache, SharedRateCache};
pub use catalog::{display_name, supported_currencies};
pub use error::{ProviderError, ResolveError, ResolveResult};
pub use provider::RateProvider;
pub use resolver::{RateResolver, RateResolverConfig};
pub use rest::RestProvider;
