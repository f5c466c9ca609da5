//! Profit Ranker
//!
//! Aggregates every common pair and turns each report into a profit entry.
//! Pairs without quotes, or whose minimum price is zero, are skipped and recorded.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::domain::{Pair, PriceReport, ProfitEntry, ProfitError};
use crate::ports::exchange::ExchangePort;
use super::aggregator::{aggregate, AggregationError};
use super::resolver::{resolve, CommonPairs};
use super::settings::{RankOptions, ScanSettings};

/// Why a common pair produced no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoQuotes,
    ZeroMinPrice,
    Overflow,
    TaskFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoQuotes => "no quotes",
            SkipReason::ZeroMinPrice => "zero minimum price",
            SkipReason::Overflow => "overflow",
            SkipReason::TaskFailed => "task failed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPair {
    pub pair: Pair,
    pub reason: SkipReason,
}

/// Ranked profit entries plus what was left out
#[derive(Debug, Clone, Serialize)]
pub struct ProfitList {
    pub entries: Vec<ProfitEntry>,
    pub skipped: Vec<SkippedPair>,
    pub common: CommonPairs,
}

/// Resolve common pairs once, then aggregate each one
pub async fn rank_all(
    exchanges: &[Arc<dyn ExchangePort>],
    settings: &ScanSettings,
    options: &RankOptions,
) -> ProfitList {
    let common = resolve(exchanges, settings).await;
    rank_pairs(common, exchanges, settings, options).await
}

/// Rank an already resolved set of common pairs
pub async fn rank_pairs(
    common: CommonPairs,
    exchanges: &[Arc<dyn ExchangePort>],
    settings: &ScanSettings,
    options: &RankOptions,
) -> ProfitList {
    let pairs: Vec<Pair> = common.pairs.iter().cloned().collect();
    tracing::info!("Ranking {} common pairs", pairs.len());

    let outcomes = aggregate_all(&pairs, exchanges, settings).await;
    collect_entries(common, outcomes, options)
}

/// Turn per-pair outcomes (in `common.pairs` order) into the ranked list
fn collect_entries(
    common: CommonPairs,
    outcomes: Vec<Option<Result<PriceReport, AggregationError>>>,
    options: &RankOptions,
) -> ProfitList {
    let pairs: Vec<Pair> = common.pairs.iter().cloned().collect();
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for (pair, outcome) in pairs.into_iter().zip(outcomes) {
        match outcome {
            Some(Ok(report)) => match ProfitEntry::from_report(&report) {
                Ok(entry) => entries.push(entry),
                Err(e @ ProfitError::ZeroMinPrice(_)) => {
                    tracing::warn!("Skipping {}: {}", pair, e);
                    skipped.push(SkippedPair { pair, reason: SkipReason::ZeroMinPrice });
                }
                Err(e @ ProfitError::Overflow(_)) => {
                    tracing::warn!("Skipping {}: {}", pair, e);
                    skipped.push(SkippedPair { pair, reason: SkipReason::Overflow });
                }
            },
            Some(Err(AggregationError::NoQuotesAvailable(_))) => {
                tracing::debug!("Skipping {}: no exchange quoted it", pair);
                skipped.push(SkippedPair { pair, reason: SkipReason::NoQuotes });
            }
            None => {
                tracing::warn!("Skipping {}: aggregation task failed", pair);
                skipped.push(SkippedPair { pair, reason: SkipReason::TaskFailed });
            }
        }
    }

    apply_options(&mut entries, options);

    tracing::info!(
        "Profit list ready: {} entries, {} skipped",
        entries.len(),
        skipped.len()
    );

    ProfitList { entries, skipped, common }
}

/// Aggregate every pair with at most `max_concurrent_pairs` in flight.
/// Outcomes are returned in `pairs` order.
async fn aggregate_all(
    pairs: &[Pair],
    exchanges: &[Arc<dyn ExchangePort>],
    settings: &ScanSettings,
) -> Vec<Option<Result<PriceReport, AggregationError>>> {
    let shared: Arc<[Arc<dyn ExchangePort>]> = exchanges.to_vec().into();
    let concurrent = settings.concurrent;
    let limit = if concurrent { settings.max_concurrent_pairs } else { 1 };

    for_each_pair(pairs, limit, move |pair| {
        let exchanges = shared.clone();
        async move { aggregate(&pair, &exchanges, concurrent).await }
    })
    .await
}

/// Run `job` for every pair, `limit` at a time. `None` marks a task that panicked.
async fn for_each_pair<T, F, Fut>(pairs: &[Pair], limit: usize, job: F) -> Vec<Option<T>>
where
    F: Fn(Pair) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut outcomes: Vec<Option<T>> = pairs.iter().map(|_| None).collect();

    if limit <= 1 {
        for (index, pair) in pairs.iter().enumerate() {
            outcomes[index] = Some(job(pair.clone()).await);
        }
        return outcomes;
    }

    let permits = Arc::new(Semaphore::new(limit));
    let mut tasks = JoinSet::new();

    for (index, pair) in pairs.iter().cloned().enumerate() {
        let permits = permits.clone();
        let fut = job(pair);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            (index, fut.await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => tracing::debug!("Pair task join error: {}", e),
        }
    }

    for (pair, outcome) in pairs.iter().zip(&outcomes) {
        if outcome.is_none() {
            tracing::error!("{}: pair aggregation task failed", pair);
        }
    }

    outcomes
}

fn apply_options(entries: &mut Vec<ProfitEntry>, options: &RankOptions) {
    if let Some(min_profit) = options.min_profit {
        entries.retain(|e| e.profit_percentage() >= min_profit);
    }
    if options.sort_by_profit {
        // stable: equal profits keep pair order
        entries.sort_by(|a, b| b.profit_percentage().cmp(&a.profit_percentage()));
    }
    if let Some(limit) = options.limit {
        entries.truncate(limit);
    }
}
