//! Test doubles for the ports
//!
//! Compiled into the library so the integration tests under `tests/` can drive
//! the real adapters and the analyzer without network access. Nothing in the
//! binary uses them.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{ExchangeId, Pair};
use super::exchange::{AdapterError, ExchangePort};
use super::http::{HttpRequest, HttpTransport, TransportError};

/// Mock exchange that records calls and serves configured pairs and prices
#[derive(Debug, Clone)]
pub struct StaticExchange {
    id: ExchangeId,
    pairs: Arc<Mutex<Option<BTreeSet<Pair>>>>,
    prices: Arc<Mutex<HashMap<Pair, Decimal>>>,
    delay: Option<Duration>,
    panics: bool,
    list_calls: Arc<Mutex<u32>>,
    price_calls: Arc<Mutex<Vec<Pair>>>,
}

impl StaticExchange {
    pub fn new(id: ExchangeId) -> Self {
        Self {
            id,
            pairs: Arc::new(Mutex::new(Some(BTreeSet::new()))),
            prices: Arc::new(Mutex::new(HashMap::new())),
            delay: None,
            panics: false,
            list_calls: Arc::new(Mutex::new(0)),
            price_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builder method to set the listed pairs (`"BASE/QUOTE"` strings)
    pub fn with_pairs(self, pairs: &[&str]) -> Self {
        let parsed = pairs
            .iter()
            .map(|p| p.parse::<Pair>().expect("mock pair must be BASE/QUOTE"))
            .collect();
        *self.pairs.lock().unwrap() = Some(parsed);
        self
    }

    /// Builder method to quote a price for a pair
    pub fn with_price(self, pair: &str, price: Decimal) -> Self {
        let pair = pair.parse::<Pair>().expect("mock pair must be BASE/QUOTE");
        self.prices.lock().unwrap().insert(pair, price);
        self
    }

    /// Builder method making `list_pairs` fail
    pub fn with_failing_listing(self) -> Self {
        *self.pairs.lock().unwrap() = None;
        self
    }

    /// Builder method making every call panic, for task-failure tests
    pub fn with_panic(mut self) -> Self {
        self.panics = true;
        self
    }

    /// Builder method delaying every call, for concurrency tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `list_pairs` calls made
    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().unwrap()
    }

    /// Pairs passed to `fetch_price`, in call order
    pub fn price_calls(&self) -> Vec<Pair> {
        self.price_calls.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics {
            panic!("{} mock exchange panicked", self.id);
        }
    }
}

#[async_trait]
impl ExchangePort for StaticExchange {
    fn id(&self) -> ExchangeId {
        self.id
    }

    fn format_symbol(&self, pair: &Pair) -> String {
        pair.joined("")
    }

    async fn list_pairs(&self) -> Result<BTreeSet<Pair>, AdapterError> {
        *self.list_calls.lock().unwrap() += 1;
        self.pause().await;
        self.pairs
            .lock()
            .unwrap()
            .clone()
            .ok_or(AdapterError::Transport {
                exchange: self.id,
                source: TransportError::Http("connection refused".into()),
            })
    }

    async fn fetch_price(&self, pair: &Pair) -> Option<Decimal> {
        self.price_calls.lock().unwrap().push(pair.clone());
        self.pause().await;
        self.prices.lock().unwrap().get(pair).copied()
    }
}

#[derive(Debug, Clone)]
struct CannedRoute {
    url: String,
    query: Vec<(String, String)>,
    response: Result<String, TransportError>,
}

impl CannedRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.url == request.url
            && self
                .query
                .iter()
                .all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }
}

/// Mock HTTP transport serving canned bodies by URL and query parameters.
///
/// When several routes match, the one constraining the most query parameters wins.
/// Unmatched requests get a 404.
#[derive(Debug, Clone, Default)]
pub struct CannedTransport {
    routes: Arc<Mutex<Vec<CannedRoute>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to serve `body` for any request to `url`
    pub fn with_response(self, url: &str, body: &str) -> Self {
        self.with_query_response(url, &[], body)
    }

    /// Builder method to serve `body` when `url` and all `query` params match
    pub fn with_query_response(self, url: &str, query: &[(&str, &str)], body: &str) -> Self {
        self.push(url, query, Ok(body.to_string()))
    }

    /// Builder method to fail requests to `url`
    pub fn with_error(self, url: &str, error: TransportError) -> Self {
        self.push(url, &[], Err(error))
    }

    fn push(self, url: &str, query: &[(&str, &str)], response: Result<String, TransportError>) -> Self {
        self.routes.lock().unwrap().push(CannedRoute {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            response,
        });
        self
    }

    /// Get all recorded requests
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn get_text(&self, request: &HttpRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.routes
            .lock()
            .unwrap()
            .iter()
            .filter(|route| route.matches(request))
            .max_by_key(|route| route.query.len())
            .map(|route| route.response.clone())
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 404,
                    body: format!("no canned response for {}", request.url),
                })
            })
    }
}
