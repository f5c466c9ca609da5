//! Price quotes and min/max reports

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::exchange::ExchangeId;
use super::pair::Pair;

/// One exchange's last price for a pair, captured at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    exchange: ExchangeId,
    pair: Pair,
    price: Decimal,
    fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote stamped with the current time.
    ///
    /// Negative prices are not quotes; `None` is returned for them.
    pub fn new(exchange: ExchangeId, pair: Pair, price: Decimal) -> Option<Self> {
        Self::at(exchange, pair, price, Utc::now())
    }

    /// Create a quote with an explicit timestamp
    pub fn at(
        exchange: ExchangeId,
        pair: Pair,
        price: Decimal,
        fetched_at: DateTime<Utc>,
    ) -> Option<Self> {
        if price.is_sign_negative() && !price.is_zero() {
            return None;
        }
        Some(Self { exchange, pair, price, fetched_at })
    }

    pub fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Lowest and highest quote for a pair across exchanges.
///
/// Invariants: `min.price <= max.price`, both quotes come from `quotes`, and with a
/// single quote `min == max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    pair: Pair,
    min: PriceQuote,
    max: PriceQuote,
    quotes: Vec<PriceQuote>,
}

impl PriceReport {
    /// Build a report from the quotes that were actually returned.
    ///
    /// Quotes are ordered by exchange first; on equal prices the earliest exchange
    /// wins both the min and the max slot. Returns `None` for an empty set.
    pub fn from_quotes(pair: Pair, mut quotes: Vec<PriceQuote>) -> Option<Self> {
        quotes.sort_by_key(|q| q.exchange);

        let mut iter = quotes.iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);

        for quote in iter {
            if quote.price < min.price {
                min = quote;
            }
            if quote.price > max.price {
                max = quote;
            }
        }

        Some(Self {
            min: min.clone(),
            max: max.clone(),
            pair,
            quotes,
        })
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn min(&self) -> &PriceQuote {
        &self.min
    }

    pub fn max(&self) -> &PriceQuote {
        &self.max
    }

    /// Every quote collected, in exchange order
    pub fn quotes(&self) -> &[PriceQuote] {
        &self.quotes
    }

    /// Absolute spread, `max - min`
    pub fn spread(&self) -> Decimal {
        self.max.price - self.min.price
    }
}
