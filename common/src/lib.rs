//! ratedesk Common Types
//!
//! Shared domain types used across the ratedesk workspace: currency codes,
//! currency pairs, exchange rates, and time helpers.

pub mod currency;
pub mod time;

pub use currency::*;
pub use time::*;
