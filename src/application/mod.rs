//! Application Layer - Use cases over the exchange ports
//!
//! - `resolver`: common pairs across exchanges
//! - `aggregator`: min/max price for one pair
//! - `ranker`: profit list over all common pairs
//! - `analyzer`: facade used by the CLI

mod fanout;
pub mod settings;
pub mod resolver;
pub mod aggregator;
pub mod ranker;
pub mod analyzer;

pub use settings::{IntersectionPolicy, RankOptions, ScanSettings};
pub use resolver::{resolve, CommonPairs, ListingOutcome};
pub use aggregator::{aggregate, AggregationError};
pub use ranker::{rank_all, rank_pairs, ProfitList, SkipReason, SkippedPair};
pub use analyzer::{AnalysisError, SpreadAnalyzer};
