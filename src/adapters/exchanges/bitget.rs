//! Bitget adapter, reported as "jbex"
//!
//! Pairs come from the spot product list; the price comes from the USDT-margined
//! futures symbol-price endpoint.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};
use super::{collect_pairs, fetch_json, lenient_decimal, lenient_string, schema_error, valid_price};

pub(super) const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

const EXCHANGE: ExchangeId = ExchangeId::Bitget;
const PRODUCT_TYPE: &str = "usdt-futures";

/// Bitget public REST adapter
#[derive(Clone)]
pub struct BitgetAdapter {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl BitgetAdapter {
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
impl ExchangePort for BitgetAdapter {
    fn id(&self) -> ExchangeId {
        EXCHANGE
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        let request = HttpRequest::get(format!("{}/api/spot/v1/public/products", self.base_url));
        let products: ProductsResponse = fetch_json(EXCHANGE, self.http.as_ref(), &request).await?;

        let data = products
            .data
            .ok_or_else(|| schema_error(EXCHANGE, "missing 'data' array"))?;

        Ok(collect_pairs(
            EXCHANGE,
            data.iter()
                .map(|p| (p.base_coin.as_deref(), p.quote_coin.as_deref())),
        ))
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        let request = HttpRequest::get(format!("{}/api/v2/mix/market/symbol-price", self.base_url))
            .query("productType", PRODUCT_TYPE)
            .query("symbol", self.format_symbol(pair));

        match fetch_json::<SymbolPriceResponse>(EXCHANGE, self.http.as_ref(), &request).await {
            Ok(response) => {
                let price = response
                    .data
                    .and_then(|data| data.into_iter().next())
                    .and_then(|entry| entry.price);
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
struct ProductsResponse {
    data: Option<Vec<Product>>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(rename = "baseCoin", default, deserialize_with = "lenient_string")]
    base_coin: Option<String>,
    #[serde(rename = "quoteCoin", default, deserialize_with = "lenient_string")]
    quote_coin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolPriceResponse {
    data: Option<Vec<SymbolPrice>>,
}

#[derive(Debug, Deserialize)]
struct SymbolPrice {
    #[serde(default, deserialize_with = "lenient_decimal")]
    price: Option<Decimal>,
}
