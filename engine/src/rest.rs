//! REST JSON rate provider (frankfurter.app API shape).

use async_trait::async_trait;
use ratedesk_common::{CurrencyPair, ExchangeRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::RateProvider;

const PROVIDER_NAME: &str = "frankfurter";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream response: a mapping of target code to rate.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, Decimal>,
}

/// Provider backed by a `GET <base>/latest?from=X&to=Y` JSON endpoint.
pub struct RestProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RestProvider {
    /// Default upstream endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.frankfurter.app";

    /// Create a provider against the default endpoint.
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn extract_rate(body: &LatestRates, pair: &CurrencyPair) -> Result<Decimal, ProviderError> {
        let rate = body.rates.get(pair.quote.as_str()).copied().ok_or_else(|| {
            ProviderError::Parse(format!("code {} absent from response", pair.quote))
        })?;

        if rate <= Decimal::ZERO {
            return Err(ProviderError::Parse(format!(
                "non-positive rate {rate} for {pair}"
            )));
        }

        Ok(rate)
    }
}

impl Default for RestProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for RestProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> Result<ExchangeRate, ProviderError> {
        let url = format!(
            "{}/latest?from={}&to={}",
            self.base_url, pair.base, pair.quote
        );
        debug!(provider = PROVIDER_NAME, url = %url, "fetching rate");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Network(format!(
                "upstream returned status {status}"
            )));
        }

        let body: LatestRates = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("invalid JSON body: {e}")))?;

        let rate = Self::extract_rate(&body, pair)?;
        Ok(ExchangeRate::new(pair.clone(), rate, PROVIDER_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratedesk_common::CurrencyCode;
    use rust_decimal_macros::dec;

    fn usd_rub() -> CurrencyPair {
        CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("RUB"))
    }

    fn parse_body(json: &str) -> LatestRates {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_rate_for_target_code() {
        let body = parse_body(r#"{"amount":1.0,"base":"USD","rates":{"RUB":90.45,"EUR":0.92}}"#);
        let rate = RestProvider::extract_rate(&body, &usd_rub()).unwrap();
        assert_eq!(rate, dec!(90.45));
    }

    #[test]
    fn missing_target_code_is_a_parse_error() {
        let body = parse_body(r#"{"rates":{"EUR":0.92}}"#);
        let result = RestProvider::extract_rate(&body, &usd_rub());
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    #[test]
    fn non_positive_rate_is_a_parse_error() {
        let body = parse_body(r#"{"rates":{"RUB":0}}"#);
        let result = RestProvider::extract_rate(&body, &usd_rub());
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    #[test]
    fn malformed_body_does_not_deserialize() {
        assert!(serde_json::from_str::<LatestRates>(r#"{"rates": "oops"}"#).is_err());
        assert!(serde_json::from_str::<LatestRates>("not json").is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Port 0 is never routable, so the request fails in the transport.
        let provider = RestProvider::with_base_url("http://127.0.0.1:0");
        let result = provider.get_rate(&usd_rub()).await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }
}
