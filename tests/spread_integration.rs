//! Spread Scanner Integration Tests
//!
//! Wires the five real exchange adapters onto a canned HTTP transport serving the
//! recorded JSON fixtures, then drives the SpreadAnalyzer end to end:
//! 1. Common pair resolution across listings with different schemas
//! 2. Min/max price analysis and the PairNotCommon / NoQuotesAvailable split
//! 3. Profit ranking, including options
//! 4. Strict vs best-effort behaviour when one exchange is down
//!
//! All tests are deterministic (no real network calls).

use std::sync::Arc;

use rust_decimal_macros::dec;

use spread_scanner::adapters::exchanges::{build_exchange, default_base_url};
use spread_scanner::application::{
    AnalysisError, IntersectionPolicy, RankOptions, ScanSettings, SpreadAnalyzer,
};
use spread_scanner::domain::{ExchangeId, Pair};
use spread_scanner::ports::mocks::CannedTransport;
use spread_scanner::ports::{ExchangePort, HttpTransport, TransportError};

// ============================================================================
// Test Fixtures
// ============================================================================

fn fixture(exchange: &str, name: &str) -> String {
    let path = format!(
        "{}/fixtures/{}/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        exchange,
        name
    );
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("CONTRACT VIOLATION: Failed to load fixture '{}': {}", path, e))
}

fn url(id: ExchangeId, path: &str) -> String {
    format!("{}{}", default_base_url(id), path)
}

/// Every listing and price endpoint, answered from fixtures
fn market_transport() -> CannedTransport {
    use ExchangeId::*;

    CannedTransport::new()
        // Binance
        .with_response(&url(Binance, "/api/v3/exchangeInfo"), &fixture("binance", "exchange_info"))
        .with_query_response(
            &url(Binance, "/api/v3/ticker/price"),
            &[("symbol", "BTCUSDT")],
            &fixture("binance", "ticker_price_btcusdt"),
        )
        .with_query_response(
            &url(Binance, "/api/v3/ticker/price"),
            &[("symbol", "ETHUSDT")],
            &fixture("binance", "ticker_price_ethusdt"),
        )
        // Bitget
        .with_response(&url(Bitget, "/api/spot/v1/public/products"), &fixture("bitget", "products"))
        .with_query_response(
            &url(Bitget, "/api/v2/mix/market/symbol-price"),
            &[("symbol", "BTCUSDT")],
            &fixture("bitget", "symbol_price_btcusdt"),
        )
        .with_query_response(
            &url(Bitget, "/api/v2/mix/market/symbol-price"),
            &[("symbol", "ETHUSDT")],
            &fixture("bitget", "symbol_price_ethusdt"),
        )
        // Poloniex
        .with_response(&url(Poloniex, "/markets"), &fixture("poloniex", "markets"))
        .with_response(&url(Poloniex, "/markets/BTC_USDT/price"), &fixture("poloniex", "price_btc_usdt"))
        .with_response(&url(Poloniex, "/markets/ETH_USDT/price"), &fixture("poloniex", "price_eth_usdt"))
        // Bybit
        .with_response(&url(Bybit, "/v5/market/instruments-info"), &fixture("bybit", "instruments_spot"))
        .with_query_response(
            &url(Bybit, "/v5/market/tickers"),
            &[("symbol", "BTCUSDT")],
            &fixture("bybit", "tickers_btcusdt"),
        )
        .with_query_response(
            &url(Bybit, "/v5/market/tickers"),
            &[("symbol", "ETHUSDT")],
            &fixture("bybit", "tickers_ethusdt"),
        )
        // Whitebit
        .with_response(&url(Whitebit, "/api/v4/public/markets"), &fixture("whitebit", "markets"))
        .with_response(&url(Whitebit, "/api/v1/public/tickers"), &fixture("whitebit", "tickers"))
}

fn analyzer_over(transport: CannedTransport, settings: ScanSettings) -> SpreadAnalyzer {
    let http: Arc<dyn HttpTransport> = Arc::new(transport);
    let exchanges: Vec<Arc<dyn ExchangePort>> = ExchangeId::ALL
        .iter()
        .map(|&id| build_exchange(id, default_base_url(id), http.clone()))
        .collect();
    SpreadAnalyzer::new(exchanges, settings)
}

fn pair(s: &str) -> Pair {
    s.parse().unwrap()
}

// ============================================================================
// Common Pairs
// ============================================================================

#[tokio::test]
async fn test_common_pairs_across_all_exchanges() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let common = analyzer.list_common_pairs().await;

    let names: Vec<String> = common.pairs.iter().map(|p| p.to_string()).collect();
    assert_eq!(names, vec!["BTC/USDT", "ETH/USDT"]);
    assert!(common.failed_exchanges().is_empty());
    assert_eq!(common.listings.len(), 5);

    let exchanges: Vec<ExchangeId> = common.listings.iter().map(|l| l.exchange).collect();
    assert_eq!(exchanges, ExchangeId::ALL.to_vec());
}

#[tokio::test]
async fn test_sequential_scan_matches_concurrent() {
    let concurrent = analyzer_over(market_transport(), ScanSettings::default());
    let sequential = analyzer_over(market_transport(), ScanSettings::sequential());

    assert_eq!(
        concurrent.list_common_pairs().await.pairs,
        sequential.list_common_pairs().await.pairs
    );

    let a = concurrent.analyze_price_for_pair("ETH/USDT").await.unwrap();
    let b = sequential.analyze_price_for_pair("ETH/USDT").await.unwrap();
    assert_eq!(a.min().exchange(), b.min().exchange());
    assert_eq!(a.max().exchange(), b.max().exchange());
}

// ============================================================================
// Price Analysis
// ============================================================================

#[tokio::test]
async fn test_analyze_btc() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let report = analyzer.analyze_price_for_pair("btc/usdt").await.unwrap();

    assert_eq!(report.pair(), &pair("BTC/USDT"));
    assert_eq!(report.quotes().len(), 5);
    assert_eq!(report.min().exchange(), ExchangeId::Poloniex);
    assert_eq!(report.min().price(), dec!(41990.00));
    assert_eq!(report.max().exchange(), ExchangeId::Bybit);
    assert_eq!(report.max().price(), dec!(42010.2));
    assert!(report.min().price() <= report.max().price());
}

#[tokio::test]
async fn test_analyze_eth_without_bitget_quote() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let report = analyzer.analyze_price_for_pair("ETH/USDT").await.unwrap();

    assert_eq!(report.quotes().len(), 4);
    assert!(report.quotes().iter().all(|q| q.exchange() != ExchangeId::Bitget));
    assert_eq!(report.min().exchange(), ExchangeId::Bybit);
    assert_eq!(report.min().price(), dec!(2299.5));
    assert_eq!(report.max().exchange(), ExchangeId::Poloniex);
    assert_eq!(report.max().price(), dec!(2310.5));
}

#[tokio::test]
async fn test_analyze_pair_not_common() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());

    // SOL/USDT is missing on Poloniex
    let result = analyzer.analyze_price_for_pair("SOL/USDT").await;
    assert_eq!(result, Err(AnalysisError::PairNotCommon(pair("SOL/USDT"))));
    assert_eq!(
        result.unwrap_err().to_string(),
        "The pair SOL/USDT is not supported on all exchanges."
    );
}

#[tokio::test]
async fn test_analyze_invalid_pair() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let result = analyzer.analyze_price_for_pair("BTCUSDT").await;
    assert!(matches!(result, Err(AnalysisError::InvalidPair(_))));
}

#[tokio::test]
async fn test_analyze_no_quotes_when_price_endpoints_fail() {
    // listings only; every price request falls through to a 404
    use ExchangeId::*;
    let transport = CannedTransport::new()
        .with_response(&url(Binance, "/api/v3/exchangeInfo"), &fixture("binance", "exchange_info"))
        .with_response(&url(Bitget, "/api/spot/v1/public/products"), &fixture("bitget", "products"))
        .with_response(&url(Poloniex, "/markets"), &fixture("poloniex", "markets"))
        .with_response(&url(Bybit, "/v5/market/instruments-info"), &fixture("bybit", "instruments_spot"))
        .with_response(&url(Whitebit, "/api/v4/public/markets"), &fixture("whitebit", "markets"));

    let analyzer = analyzer_over(transport, ScanSettings::default());
    let result = analyzer.analyze_price_for_pair("BTC/USDT").await;
    assert_eq!(result, Err(AnalysisError::NoQuotesAvailable(pair("BTC/USDT"))));
}

// ============================================================================
// Profit Ranking
// ============================================================================

#[tokio::test]
async fn test_rank_all_over_fixtures() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let list = analyzer.rank_all(&RankOptions::default()).await;

    assert_eq!(list.entries.len(), 2);
    assert!(list.skipped.is_empty());

    let btc = &list.entries[0];
    assert_eq!(btc.pair(), &pair("BTC/USDT"));
    assert_eq!(btc.min_exchange(), ExchangeId::Poloniex);
    assert_eq!(btc.max_exchange(), ExchangeId::Bybit);
    // (42010.2 - 41990.00) / 41990.00 * 100
    assert_eq!(btc.profit_percentage().round_dp(2), dec!(0.05));

    let eth = &list.entries[1];
    assert_eq!(eth.pair(), &pair("ETH/USDT"));
    // (2310.5 - 2299.5) / 2299.5 * 100
    assert_eq!(eth.profit_percentage().round_dp(2), dec!(0.48));
}

#[tokio::test]
async fn test_rank_all_sorted_and_limited() {
    let analyzer = analyzer_over(market_transport(), ScanSettings::default());
    let options = RankOptions {
        sort_by_profit: true,
        min_profit: None,
        limit: Some(1),
    };
    let list = analyzer.rank_all(&options).await;

    assert_eq!(list.entries.len(), 1);
    assert_eq!(list.entries[0].pair(), &pair("ETH/USDT"));
}

// ============================================================================
// Exchange Outage
// ============================================================================

fn whitebit_down() -> CannedTransport {
    market_transport().with_error(
        &url(ExchangeId::Whitebit, "/api/v4/public/markets"),
        TransportError::Timeout("whitebit listing".to_string()),
    )
}

#[tokio::test]
async fn test_strict_outage_empties_common_pairs() {
    let analyzer = analyzer_over(whitebit_down(), ScanSettings::default());

    let common = analyzer.list_common_pairs().await;
    assert!(common.is_empty());
    assert_eq!(common.failed_exchanges(), vec![ExchangeId::Whitebit]);

    let result = analyzer.analyze_price_for_pair("BTC/USDT").await;
    assert_eq!(result, Err(AnalysisError::PairNotCommon(pair("BTC/USDT"))));

    let list = analyzer.rank_all(&RankOptions::default()).await;
    assert!(list.entries.is_empty());
}

#[tokio::test]
async fn test_best_effort_outage_keeps_working() {
    let settings = ScanSettings::default().with_intersection(IntersectionPolicy::BestEffort);
    let analyzer = analyzer_over(whitebit_down(), settings);

    let common = analyzer.list_common_pairs().await;
    assert_eq!(common.len(), 2);
    assert_eq!(common.failed_exchanges(), vec![ExchangeId::Whitebit]);

    let report = analyzer.analyze_price_for_pair("BTC/USDT").await.unwrap();
    assert_eq!(report.min().exchange(), ExchangeId::Poloniex);
    assert_eq!(report.max().exchange(), ExchangeId::Bybit);
}
