//! Canonical currency pair
//!
//! Every exchange spells its markets differently (`BTCUSDT`, `BTC_USDT`, `btc/usdt`).
//! `Pair` is the one spelling used for set intersection and reporting: uppercase,
//! trimmed, rendered as `BASE/QUOTE`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Separator used in the canonical rendering
pub const PAIR_SEPARATOR: char = '/';

/// Errors produced when parsing user-supplied pair strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairParseError {
    #[error("pair '{0}' must have the form BASE/QUOTE")]
    MissingSeparator(String),
    #[error("pair '{0}' has an empty base or quote currency")]
    EmptySide(String),
}

/// Canonical `BASE/QUOTE` currency pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    base: String,
    quote: String,
}

impl Pair {
    /// Build a pair from raw listing fields.
    ///
    /// Returns `None` when either side is blank after trimming, so listing
    /// decoders can skip malformed entries without failing the whole listing.
    pub fn from_parts(base: &str, quote: &str) -> Option<Self> {
        let base = normalize_currency(base)?;
        let quote = normalize_currency(quote)?;
        Some(Self { base, quote })
    }

    /// Base currency (e.g. `BTC`)
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote currency (e.g. `USDT`)
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Render with a custom separator, used by exchange symbol formatting
    pub fn joined(&self, separator: &str) -> String {
        format!("{}{}{}", self.base, separator, self.quote)
    }
}

fn normalize_currency(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, PAIR_SEPARATOR, self.quote)
    }
}

impl FromStr for Pair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PAIR_SEPARATOR);
        let (base, quote) = match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) => (base, quote),
            _ => return Err(PairParseError::MissingSeparator(s.to_string())),
        };

        Self::from_parts(base, quote).ok_or_else(|| PairParseError::EmptySide(s.to_string()))
    }
}

impl Serialize for Pair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
