//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - HTTP: reqwest-backed transport shared by every exchange
//! - Exchanges: Binance, Bitget (jbex), Poloniex, Bybit and Whitebit REST clients
//! - CLI: Command-line interface handlers

pub mod http;
pub mod exchanges;
pub mod cli;

pub use http::{HttpConfig, ReqwestTransport};
pub use exchanges::{
    build_exchange, default_base_url, BinanceAdapter, BitgetAdapter, BybitAdapter,
    PoloniexAdapter, WhitebitAdapter,
};
pub use cli::CliApp;
