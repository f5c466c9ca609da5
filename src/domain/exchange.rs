//! Exchange identifiers
//!
//! Declaration order is the fixed iteration order used everywhere results are
//! joined, and therefore the tie-break order for equal prices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported exchanges, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Binance,
    /// Bitget, reported under its legacy "jbex" label
    #[serde(rename = "jbex", alias = "bitget")]
    Bitget,
    Poloniex,
    Bybit,
    Whitebit,
}

impl ExchangeId {
    /// All exchanges in fixed order
    pub const ALL: [ExchangeId; 5] = [
        ExchangeId::Binance,
        ExchangeId::Bitget,
        ExchangeId::Poloniex,
        ExchangeId::Bybit,
        ExchangeId::Whitebit,
    ];

    /// Label used in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Binance => "binance",
            ExchangeId::Bitget => "jbex",
            ExchangeId::Poloniex => "poloniex",
            ExchangeId::Bybit => "bybit",
            ExchangeId::Whitebit => "whitebit",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(ExchangeId::Binance),
            "bitget" | "jbex" => Ok(ExchangeId::Bitget),
            "poloniex" => Ok(ExchangeId::Poloniex),
            "bybit" => Ok(ExchangeId::Bybit),
            "whitebit" => Ok(ExchangeId::Whitebit),
            other => Err(format!("unknown exchange: {}", other)),
        }
    }
}
