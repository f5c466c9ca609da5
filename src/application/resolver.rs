//! Common-Pair Resolver
//!
//! Intersects the pair listings of every exchange.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{ExchangeId, Pair};
use crate::ports::exchange::ExchangePort;
use super::fanout::for_each_exchange;
use super::settings::{IntersectionPolicy, ScanSettings};

/// Listing outcome for one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingOutcome {
    pub exchange: ExchangeId,
    /// Number of pairs listed, or the error message
    pub result: Result<usize, String>,
}

impl ListingOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Pairs listed on every exchange, with per-exchange diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonPairs {
    pub pairs: BTreeSet<Pair>,
    pub listings: Vec<ListingOutcome>,
    pub policy: IntersectionPolicy,
}

impl CommonPairs {
    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Exchanges whose listing call failed
    pub fn failed_exchanges(&self) -> Vec<ExchangeId> {
        self.listings
            .iter()
            .filter(|l| !l.is_ok())
            .map(|l| l.exchange)
            .collect()
    }
}

/// List pairs on every exchange and intersect them according to `settings.intersection`
pub async fn resolve(exchanges: &[Arc<dyn ExchangePort>], settings: &ScanSettings) -> CommonPairs {
    tracing::info!("Resolving common pairs across {} exchanges", exchanges.len());

    let results = for_each_exchange(exchanges, settings.concurrent, |exchange| async move {
        exchange.list_pairs().await
    })
    .await;

    let mut listings = Vec::with_capacity(results.len());
    let mut sets: Vec<Option<BTreeSet<Pair>>> = Vec::with_capacity(results.len());

    for (exchange, result) in results {
        match result {
            Some(Ok(pairs)) => {
                tracing::debug!("{}: {} pairs listed", exchange, pairs.len());
                listings.push(ListingOutcome { exchange, result: Ok(pairs.len()) });
                sets.push(Some(pairs));
            }
            Some(Err(e)) => {
                tracing::warn!("Error while retrieving currency pairs - {}", e);
                listings.push(ListingOutcome { exchange, result: Err(e.to_string()) });
                sets.push(None);
            }
            None => {
                tracing::warn!("{}: listing task did not complete", exchange);
                listings.push(ListingOutcome {
                    exchange,
                    result: Err("listing task did not complete".to_string()),
                });
                sets.push(None);
            }
        }
    }

    let pairs = match settings.intersection {
        IntersectionPolicy::Strict => {
            if sets.iter().any(Option::is_none) {
                tracing::warn!(
                    "At least one exchange failed to list pairs; strict intersection is empty"
                );
                BTreeSet::new()
            } else {
                intersect(sets.into_iter().flatten())
            }
        }
        IntersectionPolicy::BestEffort => intersect(sets.into_iter().flatten()),
    };

    tracing::info!("Found {} common pairs", pairs.len());

    CommonPairs {
        pairs,
        listings,
        policy: settings.intersection,
    }
}

/// Intersection of all sets; empty input yields an empty set
fn intersect<I>(sets: I) -> BTreeSet<Pair>
where
    I: IntoIterator<Item = BTreeSet<Pair>>,
{
    let mut iter = sets.into_iter();
    let Some(mut acc) = iter.next() else {
        return BTreeSet::new();
    };
    for set in iter {
        acc.retain(|pair| set.contains(pair));
        if acc.is_empty() {
            break;
        }
    }
    acc
}
