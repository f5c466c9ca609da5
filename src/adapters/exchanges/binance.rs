//! Binance spot adapter

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};
use super::{collect_pairs, fetch_json, lenient_decimal, lenient_string, schema_error, valid_price};

pub(super) const DEFAULT_BASE_URL: &str = "https://api.binance.com";

const EXCHANGE: ExchangeId = ExchangeId::Binance;

/// Binance public REST adapter
#[derive(Clone)]
pub struct BinanceAdapter {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl BinanceAdapter {
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
impl ExchangePort for BinanceAdapter {
    fn id(&self) -> ExchangeId {
        EXCHANGE
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        let request = HttpRequest::get(format!("{}/api/v3/exchangeInfo", self.base_url));
        let info: ExchangeInfo = fetch_json(EXCHANGE, self.http.as_ref(), &request).await?;

        let symbols = info
            .symbols
            .ok_or_else(|| schema_error(EXCHANGE, "missing 'symbols'"))?;

        Ok(collect_pairs(
            EXCHANGE,
            symbols
                .iter()
                .map(|s| (s.base_asset.as_deref(), s.quote_asset.as_deref())),
        ))
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        let request = HttpRequest::get(format!("{}/api/v3/ticker/price", self.base_url))
            .query("symbol", self.format_symbol(pair));

        match fetch_json::<TickerPrice>(EXCHANGE, self.http.as_ref(), &request).await {
            Ok(ticker) => valid_price(EXCHANGE, pair, ticker.price),
            Err(e) => {
                tracing::debug!("{}: error while retrieving the price for {} - {}", EXCHANGE, pair, e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Option<Vec<SymbolInfo>>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    #[serde(rename = "baseAsset", default, deserialize_with = "lenient_string")]
    base_asset: Option<String>,
    #[serde(rename = "quoteAsset", default, deserialize_with = "lenient_string")]
    quote_asset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[serde(default, deserialize_with = "lenient_decimal")]
    price: Option<Decimal>,
}
