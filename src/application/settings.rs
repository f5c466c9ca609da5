//! Scan settings shared by the resolver, aggregator and ranker

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How listing failures affect the common-pair intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionPolicy {
    /// A failed listing counts as an empty set, so one outage empties the result
    #[default]
    Strict,
    /// Intersect only over exchanges whose listing succeeded
    BestEffort,
}

impl fmt::Display for IntersectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntersectionPolicy::Strict => f.write_str("strict"),
            IntersectionPolicy::BestEffort => f.write_str("best_effort"),
        }
    }
}

impl FromStr for IntersectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(IntersectionPolicy::Strict),
            "best_effort" => Ok(IntersectionPolicy::BestEffort),
            other => Err(format!("unknown intersection policy: {}", other)),
        }
    }
}

/// Runtime settings for a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub intersection: IntersectionPolicy,
    /// Query exchanges concurrently (results are still joined in exchange order)
    pub concurrent: bool,
    /// Pairs aggregated at once while ranking
    pub max_concurrent_pairs: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            intersection: IntersectionPolicy::Strict,
            concurrent: true,
            max_concurrent_pairs: 8,
        }
    }
}

impl ScanSettings {
    /// Reference behavior: one call at a time
    pub fn sequential() -> Self {
        Self {
            concurrent: false,
            max_concurrent_pairs: 1,
            ..Self::default()
        }
    }

    pub fn with_intersection(mut self, policy: IntersectionPolicy) -> Self {
        self.intersection = policy;
        self
    }
}

/// Post-processing of the profit list. The default keeps every entry in
/// common-pair order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Sort by profit percentage, highest first
    pub sort_by_profit: bool,
    /// Drop entries below this profit percentage
    pub min_profit: Option<Decimal>,
    /// Keep at most this many entries
    pub limit: Option<usize>,
}
