//! Exchange Adapters
//!
//! Implementations of `ExchangePort` for the supported centralized exchanges:
//! - `BinanceAdapter`: spot exchangeInfo + ticker/price
//! - `BitgetAdapter` ("jbex"): spot products + USDT-futures symbol price
//! - `PoloniexAdapter`: markets + per-market price
//! - `BybitAdapter`: v5 spot instruments + tickers
//! - `WhitebitAdapter`: v4 markets + v1 tickers map
//!
//! Response schemas are typed with `Option` at every level. Scalar fields go through
//! lenient deserializers so one odd value never poisons a whole listing.

mod binance;
mod bitget;
mod poloniex;
mod bybit;
mod whitebit;

#[cfg(test)]
mod contract_tests;

pub use binance::BinanceAdapter;
pub use bitget::BitgetAdapter;
pub use poloniex::PoloniexAdapter;
pub use bybit::BybitAdapter;
pub use whitebit::WhitebitAdapter;

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::{AdapterError, ExchangePort};
use crate::ports::http::{HttpRequest, HttpTransport};

/// Build the adapter for `id` against `base_url`
pub fn build_exchange(
    id: ExchangeId,
    base_url: &str,
    http: Arc<dyn HttpTransport>,
) -> Arc<dyn ExchangePort> {
    match id {
        ExchangeId::Binance => Arc::new(BinanceAdapter::with_base_url(base_url, http)),
        ExchangeId::Bitget => Arc::new(BitgetAdapter::with_base_url(base_url, http)),
        ExchangeId::Poloniex => Arc::new(PoloniexAdapter::with_base_url(base_url, http)),
        ExchangeId::Bybit => Arc::new(BybitAdapter::with_base_url(base_url, http)),
        ExchangeId::Whitebit => Arc::new(WhitebitAdapter::with_base_url(base_url, http)),
    }
}

/// Default public API base URL for an exchange
pub fn default_base_url(id: ExchangeId) -> &'static str {
    match id {
        ExchangeId::Binance => binance::DEFAULT_BASE_URL,
        ExchangeId::Bitget => bitget::DEFAULT_BASE_URL,
        ExchangeId::Poloniex => poloniex::DEFAULT_BASE_URL,
        ExchangeId::Bybit => bybit::DEFAULT_BASE_URL,
        ExchangeId::Whitebit => whitebit::DEFAULT_BASE_URL,
    }
}

/// GET `request` and decode the body as `T`
async fn fetch_json<T: DeserializeOwned>(
    exchange: ExchangeId,
    http: &dyn HttpTransport,
    request: &HttpRequest,
) -> Result<T, AdapterError> {
    let body = http
        .get_text(request)
        .await
        .map_err(|source| AdapterError::Transport { exchange, source })?;

    decode(exchange, &body)
}

fn decode<T: DeserializeOwned>(exchange: ExchangeId, body: &str) -> Result<T, AdapterError> {
    serde_json::from_str(body).map_err(|e| AdapterError::Decode {
        exchange,
        message: e.to_string(),
    })
}

fn schema_error(exchange: ExchangeId, message: &str) -> AdapterError {
    AdapterError::Schema {
        exchange,
        message: message.to_string(),
    }
}

/// Normalize raw `(base, quote)` listing fields, skipping incomplete entries
fn collect_pairs<'a, I>(exchange: ExchangeId, entries: I) -> BTreeSet<Pair>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let mut skipped = 0usize;
    let pairs: BTreeSet<Pair> = entries
        .into_iter()
        .filter_map(|(base, quote)| {
            let pair = Pair::from_parts(base?, quote?);
            if pair.is_none() {
                skipped += 1;
            }
            pair
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("{}: skipped {} listing entries with blank currencies", exchange, skipped);
    }
    tracing::debug!("{}: listed {} pairs", exchange, pairs.len());
    pairs
}

/// Accept a JSON string, anything else becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accept a price as a JSON string or number, anything else becomes `None`
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => parse_decimal(&s),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Keep non-negative prices only
fn valid_price(exchange: ExchangeId, pair: &Pair, price: Option<Decimal>) -> Option<Decimal> {
    match price {
        Some(p) if p.is_sign_negative() && !p.is_zero() => {
            tracing::debug!("{}: ignoring negative price {} for {}", exchange, p, pair);
            None
        }
        Some(p) => Some(p),
        None => {
            tracing::debug!("{}: price field missing for {}", exchange, pair);
            None
        }
    }
}
