//! Poloniex adapter. Symbols use `_` and are embedded in the price path.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};
use super::{collect_pairs, fetch_json, lenient_decimal, lenient_string, valid_price};

pub(super) const DEFAULT_BASE_URL: &str = "https://api.poloniex.com";

const EXCHANGE: ExchangeId = ExchangeId::Poloniex;

#[derive(Clone)]
pub struct PoloniexAdapter {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl PoloniexAdapter {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, http)
    }

    pub fn with_base_url(base_url: &str, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl ExchangePort for PoloniexAdapter {
    fn id(&self) -> ExchangeId {
        EXCHANGE
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("_")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        let request = HttpRequest::get(format!("{}/markets", self.base_url));
        let markets: Vec<Market> = fetch_json(EXCHANGE, self.http.as_ref(), &request).await?;

        Ok(collect_pairs(
            EXCHANGE,
            markets.iter().map(|m| {
                (
                    m.base_currency_name.as_deref(),
                    m.quote_currency_name.as_deref(),
                )
            }),
        ))
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        let request = HttpRequest::get(format!(
            "{}/markets/{}/price",
            self.base_url,
            self.format_symbol(pair)
        ));

        match fetch_json::<MarketPrice>(EXCHANGE, self.http.as_ref(), &request).await {
            Ok(ticker) => valid_price(EXCHANGE, pair, ticker.price),
            Err(e) => {
                tracing::debug!("{}: error while retrieving the price for {} - {}", EXCHANGE, pair, e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Market {
    #[serde(rename = "baseCurrencyName", default, deserialize_with = "lenient_string")]
    base_currency_name: Option<String>,
    #[serde(rename = "quoteCurrencyName", default, deserialize_with = "lenient_string")]
    quote_currency_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketPrice {
    #[serde(default, deserialize_with = "lenient_decimal")]
    price: Option<Decimal>,
}
