//! Pivot-currency daily-bulletin provider (CBR XML shape).
//!
//! The bulletin publishes every rate against one pivot currency, so only
//! pairs with exactly one pivot side are servable. The document charset is
//! auto-detected from the BOM or the XML declaration before parsing, and
//! decimal values use a locale comma separator.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use ratedesk_common::{CurrencyCode, CurrencyPair, ExchangeRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::RateProvider;

const PROVIDER_NAME: &str = "cbr";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Daily bulletin document.
#[derive(Debug, Deserialize)]
struct Bulletin {
    #[serde(rename = "Valute", default)]
    records: Vec<BulletinRecord>,
}

/// One bulletin record: `Value` pivot units buy `Nominal` units of
/// `CharCode`.
#[derive(Debug, Deserialize)]
struct BulletinRecord {
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Nominal")]
    nominal: u32,
    #[serde(rename = "Value")]
    value: String,
}

/// Provider backed by a bulk daily XML bulletin around a fixed pivot
/// currency.
pub struct BulletinProvider {
    pivot: CurrencyCode,
    url: String,
    client: reqwest::Client,
}

impl BulletinProvider {
    /// Default bulletin endpoint.
    pub const DEFAULT_URL: &'static str = "https://www.cbr.ru/scripts/XML_daily.asp";

    /// Create a provider for the default RUB bulletin.
    pub fn new() -> Self {
        Self::with_endpoint(CurrencyCode::new("RUB"), Self::DEFAULT_URL)
    }

    /// Create a provider for a custom pivot and bulletin URL.
    pub fn with_endpoint(pivot: CurrencyCode, url: impl Into<String>) -> Self {
        Self {
            pivot,
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Decode raw bulletin bytes using the BOM or the declared charset,
    /// falling back to UTF-8.
    fn decode_document(bytes: &[u8]) -> Result<String, ProviderError> {
        let encoding = Encoding::for_bom(bytes)
            .map(|(encoding, _)| encoding)
            .or_else(|| declared_encoding(bytes))
            .unwrap_or(UTF_8);

        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(ProviderError::Parse(format!(
                "document is not valid {}",
                encoding.name()
            )));
        }

        Ok(text.into_owned())
    }

    fn parse_document(body: &str) -> Result<Bulletin, ProviderError> {
        quick_xml::de::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("invalid XML bulletin: {e}")))
    }

    /// Extract the rate for `pair` from a parsed bulletin. The caller has
    /// already established that exactly one side of the pair is the pivot.
    fn rate_from_bulletin(
        &self,
        bulletin: &Bulletin,
        pair: &CurrencyPair,
    ) -> Result<Decimal, ProviderError> {
        let base_is_pivot = pair.base == self.pivot;
        let target = if base_is_pivot { &pair.quote } else { &pair.base };

        let record = bulletin
            .records
            .iter()
            .find(|r| r.char_code == target.as_str())
            .ok_or_else(|| ProviderError::NotFound(target.clone()))?;

        // Locale comma decimal separator.
        let normalized = record.value.replacen(',', ".", 1);
        let value = Decimal::from_str(&normalized)
            .map_err(|e| ProviderError::Parse(format!("bad value {:?}: {e}", record.value)))?;

        if record.nominal == 0 {
            return Err(ProviderError::Parse(format!(
                "zero nominal for {}",
                record.char_code
            )));
        }

        // Pivot units per one target unit.
        let per_unit = value / Decimal::from(record.nominal);
        if per_unit <= Decimal::ZERO {
            return Err(ProviderError::Parse(format!(
                "non-positive rate for {}",
                record.char_code
            )));
        }

        if base_is_pivot {
            Ok(Decimal::ONE / per_unit)
        } else {
            Ok(per_unit)
        }
    }
}

impl Default for BulletinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for BulletinProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> Result<ExchangeRate, ProviderError> {
        let base_is_pivot = pair.base == self.pivot;
        let quote_is_pivot = pair.quote == self.pivot;

        // Exactly one side must be the pivot; reject before any I/O.
        if base_is_pivot == quote_is_pivot {
            return Err(ProviderError::UnsupportedPair {
                provider: PROVIDER_NAME.to_string(),
                pair: pair.clone(),
            });
        }

        debug!(provider = PROVIDER_NAME, url = %self.url, "fetching bulletin");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Network(format!(
                "upstream returned status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read body: {e}")))?;

        let body = Self::decode_document(&bytes)?;
        let bulletin = Self::parse_document(&body)?;
        let rate = self.rate_from_bulletin(&bulletin, pair)?;

        Ok(ExchangeRate::new(pair.clone(), rate, PROVIDER_NAME))
    }
}

/// Pull the `encoding=` label out of the XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = std::str::from_utf8(&bytes[..bytes.len().min(256)]).ok()?;
    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];

    let after = declaration.split_once("encoding=")?.1;
    let quote = after.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let label = &after[1..after[1..].find(quote)? + 1];

    Encoding::for_label(label.as_bytes())
}
