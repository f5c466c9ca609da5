//! Price Aggregator
//!
//! Queries every exchange for one pair and reduces the answers to a min/max report.
//! No retries and no caching: each call is one request per exchange.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Pair, PriceQuote, PriceReport};
use crate::ports::exchange::ExchangePort;
use super::fanout::for_each_exchange;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("No available prices for the pair {0}")]
    NoQuotesAvailable(Pair),
}

/// Fetch `pair` from every exchange and build a `PriceReport`
pub async fn aggregate(
    pair: &Pair,
    exchanges: &[Arc<dyn ExchangePort>],
    concurrent: bool,
) -> Result<PriceReport, AggregationError> {
    let results = for_each_exchange(exchanges, concurrent, |exchange| {
        let pair = pair.clone();
        async move { exchange.fetch_price(&pair).await }
    })
    .await;

    let quotes: Vec<PriceQuote> = results
        .into_iter()
        .filter_map(|(exchange, price)| {
            let price = price.flatten();
            tracing::debug!("{}: {} -> {:?}", exchange, pair, price);
            PriceQuote::new(exchange, pair.clone(), price?)
        })
        .collect();

    PriceReport::from_quotes(pair.clone(), quotes)
        .ok_or_else(|| AggregationError::NoQuotesAvailable(pair.clone()))
}
