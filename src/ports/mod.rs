//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Exchange access (pair listings, last prices)
//! - HTTP transport used by the exchange adapters
//!
//! `mocks` provides recording test doubles for both.

pub mod exchange;
pub mod http;
pub mod mocks;

pub use exchange::{AdapterError, ExchangePort};
pub use http::{HttpRequest, HttpTransport, TransportError};
