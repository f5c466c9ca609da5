//! Domain Layer - Core types for cross-exchange price comparison
//!
//! Pure data and logic with no I/O. Exchange access happens through the ports layer.
//!
//! - `pair`: canonical `BASE/QUOTE` pair and its normalizer
//! - `exchange`: exchange identifiers in fixed tie-break order
//! - `quote`: per-exchange quotes and min/max reports
//! - `profit`: profit percentage and profit list rows

pub mod pair;
pub mod exchange;
pub mod quote;
pub mod profit;

pub use pair::{Pair, PairParseError, PAIR_SEPARATOR};
pub use exchange::ExchangeId;
pub use quote::{PriceQuote, PriceReport};
pub use profit::{profit_percentage, ProfitEntry, ProfitError};
