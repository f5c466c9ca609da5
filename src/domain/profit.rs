//! Profit entries derived from price reports

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::exchange::ExchangeId;
use super::pair::Pair;
use super::quote::PriceReport;

/// Profit computation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfitError {
    #[error("minimum price for {0} is zero, profit percentage is undefined")]
    ZeroMinPrice(Pair),
    #[error("profit percentage for {0} overflows decimal range")]
    Overflow(Pair),
}

/// Relative spread in percent: `(max - min) / min * 100`
pub fn profit_percentage(report: &PriceReport) -> Result<Decimal, ProfitError> {
    let min = report.min().price();
    let max = report.max().price();

    if min.is_zero() {
        return Err(ProfitError::ZeroMinPrice(report.pair().clone()));
    }

    (max - min)
        .checked_div(min)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ProfitError::Overflow(report.pair().clone()))
}

/// One row of the profit list. Only constructed from a fresh report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitEntry {
    pair: Pair,
    min_exchange: ExchangeId,
    max_exchange: ExchangeId,
    min_price: Decimal,
    max_price: Decimal,
    profit_percentage: Decimal,
}

impl ProfitEntry {
    pub fn from_report(report: &PriceReport) -> Result<Self, ProfitError> {
        let profit_percentage = profit_percentage(report)?;
        Ok(Self {
            pair: report.pair().clone(),
            min_exchange: report.min().exchange(),
            max_exchange: report.max().exchange(),
            min_price: report.min().price(),
            max_price: report.max().price(),
            profit_percentage,
        })
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn min_exchange(&self) -> ExchangeId {
        self.min_exchange
    }

    pub fn max_exchange(&self) -> ExchangeId {
        self.max_exchange
    }

    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    pub fn profit_percentage(&self) -> Decimal {
        self.profit_percentage
    }
}
