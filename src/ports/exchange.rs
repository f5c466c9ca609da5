//! Exchange port
//!
//! The capability every exchange adapter provides: list tradable pairs and
//! fetch the last price of a single pair.

use std::collections::BTreeSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{ExchangeId, Pair};
use super::http::TransportError;

/// Recoverable failure at a single exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("{exchange}: transport error: {source}")]
    Transport {
        exchange: ExchangeId,
        #[source]
        source: TransportError,
    },

    #[error("{exchange}: failed to decode response: {message}")]
    Decode { exchange: ExchangeId, message: String },

    #[error("{exchange}: incorrect response from the API: {message}")]
    Schema { exchange: ExchangeId, message: String },
}

impl AdapterError {
    /// Exchange the error originated from
    pub fn exchange(&self) -> ExchangeId {
        match self {
            AdapterError::Transport { exchange, .. }
            | AdapterError::Decode { exchange, .. }
            | AdapterError::Schema { exchange, .. } => *exchange,
        }
    }
}

/// Exchange adapter capability
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Which exchange this adapter talks to
    fn id(&self) -> ExchangeId;

    /// Native symbol for a canonical pair
    fn format_symbol(&self, pair: &Pair) -> String;

    /// All pairs the exchange lists, normalized
    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError>;

    /// Last price for `pair`, or `None` if the exchange does not quote it
    /// (or the call failed for any reason)
    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal>;
}
