//! Whitebit adapter
//!
//! There is no per-symbol ticker call: the v1 tickers endpoint returns every
//! market keyed by `BASE_QUOTE`, and the price is looked up by that key.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};
use super::{collect_pairs, fetch_json, lenient_decimal, lenient_string, valid_price};

pub(super) const DEFAULT_BASE_URL: &str = "https://whitebit.com";

const EXCHANGE: ExchangeId = ExchangeId::Whitebit;

#[derive(Clone)]
pub struct WhitebitAdapter {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl WhitebitAdapter {
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
impl ExchangePort for WhitebitAdapter {
    fn id(&self) -> ExchangeId {
        EXCHANGE
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("_")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        let request = HttpRequest::get(format!("{}/api/v4/public/markets", self.base_url));
        let markets: Vec<Market> = fetch_json(EXCHANGE, self.http.as_ref(), &request).await?;

        Ok(collect_pairs(
            EXCHANGE,
            markets
                .iter()
                .map(|m| (m.stock.as_deref(), m.money.as_deref())),
        ))
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        let request = HttpRequest::get(format!("{}/api/v1/public/tickers", self.base_url));

        match fetch_json::<TickersResponse>(EXCHANGE, self.http.as_ref(), &request).await {
            Ok(response) => {
                let symbol = self.format_symbol(pair);
                let price = response
                    .result
                    .and_then(|mut markets| markets.remove(&symbol))
                    .and_then(|entry| decode_entry(&symbol, entry))
                    .and_then(|entry| entry.ticker)
                    .and_then(|ticker| ticker.last);
                valid_price(EXCHANGE, pair, price)
            }
            Err(e) => {
                tracing::debug!("{}: error while retrieving the price for {} - {}", EXCHANGE, pair, e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Market {
    #[serde(default, deserialize_with = "lenient_string")]
    stock: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    money: Option<String>,
}

/// Entries stay raw until looked up, so a malformed market never hides the others
#[derive(Debug, Deserialize)]
struct TickersResponse {
    result: Option<HashMap<String, Value>>,
}

fn decode_entry(symbol: &str, entry: Value) -> Option<TickerEntry> {
    match serde_json::from_value(entry) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::debug!("{}: malformed ticker entry for {} - {}", EXCHANGE, symbol, e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    ticker: Option<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(default, deserialize_with = "lenient_decimal")]
    last: Option<Decimal>,
}
