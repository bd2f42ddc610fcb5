//! Static currency catalog.
//!
//! Display names for the currencies the frontend offers. The catalog is
//! never consulted to validate pair requests: a pair outside this list may
//! still resolve if a provider serves it, and a pair inside it may still
//! fail if none does.

use ratedesk_common::CurrencyCode;

/// Supported currency codes with display names, sorted by code.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("AUD", "Australian Dollar"),
    ("BYN", "Belarusian Ruble"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("KZT", "Kazakhstani Tenge"),
    ("RUB", "Russian Ruble"),
    ("TRY", "Turkish Lira"),
    ("UAH", "Ukrainian Hryvnia"),
    ("USD", "United States Dollar"),
];

/// The full code-to-name mapping.
pub fn supported_currencies() -> &'static [(&'static str, &'static str)] {
    SUPPORTED_CURRENCIES
}

/// Look up the display name for a code, if catalogued.
pub fn display_name(code: &CurrencyCode) -> Option<&'static str> {
    SUPPORTED_CURRENCIES
        .binary_search_by_key(&code.as_str(), |(c, _)| c)
        .ok()
        .map(|idx| SUPPORTED_CURRENCIES[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted_by_code() {
        let codes: Vec<_> = SUPPORTED_CURRENCIES.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn display_name_lookup() {
        assert_eq!(
            display_name(&CurrencyCode::new("usd")),
            Some("United States Dollar")
        );
        assert_eq!(display_name(&CurrencyCode::new("XXX")), None);
    }
}
