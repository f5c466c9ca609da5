//! spread-scanner - Cross-Exchange Crypto Spread Scanner Library
//!
//! Finds currency pairs traded on every supported exchange, reports the cheapest
//! and most expensive venue for a pair, and ranks pairs by spread.
//!
//! # Modules
//!
//! - `domain`: Core types (Pair, ExchangeId, PriceQuote, PriceReport, ProfitEntry)
//! - `ports`: Trait abstractions (ExchangePort, HttpTransport)
//! - `adapters`: External implementations (exchange REST clients, reqwest, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Resolver, aggregator, ranker and the SpreadAnalyzer facade

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
