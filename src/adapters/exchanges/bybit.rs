//! Bybit v5 spot adapter

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};
use super::{collect_pairs, fetch_json, lenient_decimal, lenient_string, schema_error, valid_price};

pub(super) const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

const EXCHANGE: ExchangeId = ExchangeId::Bybit;
const CATEGORY: &str = "spot";

#[derive(Clone)]
pub struct BybitAdapter {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl BybitAdapter {
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
impl ExchangePort for BybitAdapter {
    fn id(&self) -> ExchangeId {
        EXCHANGE
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        let request = HttpRequest::get(format!("{}/v5/market/instruments-info", self.base_url))
            .query("category", CATEGORY);
        let response: Envelope<Instrument> =
            fetch_json(EXCHANGE, self.http.as_ref(), &request).await?;

        let list = response
            .result
            .and_then(|r| r.list)
            .ok_or_else(|| schema_error(EXCHANGE, "missing 'result.list'"))?;

        Ok(collect_pairs(
            EXCHANGE,
            list.iter()
                .map(|i| (i.base_coin.as_deref(), i.quote_coin.as_deref())),
        ))
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        let request = HttpRequest::get(format!("{}/v5/market/tickers", self.base_url))
            .query("category", CATEGORY)
            .query("symbol", self.format_symbol(pair));

        match fetch_json::<Envelope<Ticker>>(EXCHANGE, self.http.as_ref(), &request).await {
            Ok(response) => {
                let price = response
                    .result
                    .and_then(|r| r.list)
                    .and_then(|list| list.into_iter().next())
                    .and_then(|t| t.last_price);
                valid_price(EXCHANGE, pair, price)
            }
            Err(e) => {
                tracing::debug!("{}: error while retrieving the price for {} - {}", EXCHANGE, pair, e);
                None
            }
        }
    }
}

/// `{"retCode":0,"result":{"list":[...]}}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<ResultList<T>>,
}

#[derive(Debug, Deserialize)]
struct ResultList<T> {
    list: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct Instrument {
    #[serde(rename = "baseCoin", default, deserialize_with = "lenient_string")]
    base_coin: Option<String>,
    #[serde(rename = "quoteCoin", default, deserialize_with = "lenient_string")]
    quote_coin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(rename = "lastPrice", default, deserialize_with = "lenient_decimal")]
    last_price: Option<Decimal>,
}
