//! Spread Analyzer
//!
//! Entry point used by the CLI: single-pair price analysis, common-pair listing
//! and the profit list, over a fixed, ordered set of exchanges.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ExchangeId, Pair, PairParseError, PriceReport};
use crate::ports::exchange::ExchangePort;
use super::aggregator::{aggregate, AggregationError};
use super::ranker::{rank_all, ProfitList};
use super::resolver::{resolve, CommonPairs};
use super::settings::{RankOptions, ScanSettings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidPair(#[from] PairParseError),

    #[error("The pair {0} is not supported on all exchanges.")]
    PairNotCommon(Pair),

    #[error("No available prices for the pair {0}.")]
    NoQuotesAvailable(Pair),
}

impl From<AggregationError> for AnalysisError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::NoQuotesAvailable(pair) => AnalysisError::NoQuotesAvailable(pair),
        }
    }
}

/// Cross-exchange price analysis over a fixed exchange set
#[derive(Clone)]
pub struct SpreadAnalyzer {
    exchanges: Vec<Arc<dyn ExchangePort>>,
    settings: ScanSettings,
}

impl SpreadAnalyzer {
    /// Exchanges are put into fixed order; duplicates keep the first adapter.
    pub fn new(mut exchanges: Vec<Arc<dyn ExchangePort>>, settings: ScanSettings) -> Self {
        exchanges.sort_by_key(|e| e.id());
        exchanges.dedup_by_key(|e| e.id());
        Self { exchanges, settings }
    }

    pub fn exchanges(&self) -> Vec<ExchangeId> {
        self.exchanges.iter().map(|e| e.id()).collect()
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Pairs listed on every exchange
    pub async fn list_common_pairs(&self) -> CommonPairs {
        resolve(&self.exchanges, &self.settings).await
    }

    /// Min/max price for a user-supplied pair such as `btc/usdt`
    pub async fn analyze_price_for_pair(&self, pair: &str) -> Result<PriceReport, AnalysisError> {
        let pair: Pair = pair.parse()?;
        self.analyze_pair(&pair).await
    }

    /// Min/max price for a pair, after checking it is common to all exchanges
    pub async fn analyze_pair(&self, pair: &Pair) -> Result<PriceReport, AnalysisError> {
        let common = self.list_common_pairs().await;
        if !common.contains(pair) {
            return Err(AnalysisError::PairNotCommon(pair.clone()));
        }

        tracing::info!("Fetching {} from {} exchanges", pair, self.exchanges.len());
        let report = aggregate(pair, &self.exchanges, self.settings.concurrent).await?;
        Ok(report)
    }

    /// Profit list over all common pairs
    pub async fn rank_all(&self, options: &RankOptions) -> ProfitList {
        rank_all(&self.exchanges, &self.settings, options).await
    }
}
