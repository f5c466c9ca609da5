//! Exchange API Contract Tests
//!
//! Golden response fixtures for each exchange's listing and price endpoints, run
//! through the real adapters over a canned transport. Fixtures live under
//! `fixtures/<exchange>/` and mirror real public API payloads, including the
//! odd entries (missing fields, lowercase coins, empty data) those APIs return.

use std::sync::Arc;

use rust_decimal_macros::dec;

use super::*;
use crate::ports::mocks::CannedTransport;

/// Load a fixture file from the fixtures directory
fn load_fixture(exchange: &str, name: &str) -> String {
    let fixture_path = format!(
        "{}/fixtures/{}/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        exchange,
        name
    );
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "CONTRACT VIOLATION: Failed to load fixture '{}': {}",
            fixture_path, e
        )
    });
    serde_json::from_str::<serde_json::Value>(&content).unwrap_or_else(|e| {
        panic!(
            "CONTRACT VIOLATION: Failed to parse fixture '{}' as JSON: {}",
            fixture_path, e
        )
    });
    content
}

fn pair(s: &str) -> Pair {
    s.parse().unwrap()
}

fn pairs(list: &[&str]) -> BTreeSet<Pair> {
    list.iter().map(|s| pair(s)).collect()
}

mod listing_contract_tests {
    use super::*;

    #[tokio::test]
    async fn test_binance_exchange_info() {
        let transport = CannedTransport::new().with_response(
            "https://api.binance.com/api/v3/exchangeInfo",
            &load_fixture("binance", "exchange_info"),
        );
        let adapter = BinanceAdapter::new(Arc::new(transport));

        let listed = adapter.list_pairs().await.unwrap();
        assert_eq!(
            listed,
            pairs(&["BTC/USDT", "ETH/USDT", "SOL/USDT", "XRP/BTC"]),
            "CONTRACT VIOLATION: Binance listing must include every symbol with both assets"
        );
    }

    #[tokio::test]
    async fn test_bitget_products() {
        let transport = CannedTransport::new().with_response(
            "https://api.bitget.com/api/spot/v1/public/products",
            &load_fixture("bitget", "products"),
        );
        let adapter = BitgetAdapter::new(Arc::new(transport));

        let listed = adapter.list_pairs().await.unwrap();
        assert_eq!(listed, pairs(&["BTC/USDT", "ETH/USDT", "SOL/USDT"]));
    }

    #[tokio::test]
    async fn test_poloniex_markets() {
        let transport = CannedTransport::new().with_response(
            "https://api.poloniex.com/markets",
            &load_fixture("poloniex", "markets"),
        );
        let adapter = PoloniexAdapter::new(Arc::new(transport));

        let listed = adapter.list_pairs().await.unwrap();
        assert_eq!(listed, pairs(&["BTC/USDT", "ETH/USDT", "TRX/USDT"]));
    }

    #[tokio::test]
    async fn test_bybit_instruments_normalizes_case() {
        let transport = CannedTransport::new().with_query_response(
            "https://api.bybit.com/v5/market/instruments-info",
            &[("category", "spot")],
            &load_fixture("bybit", "instruments_spot"),
        );
        let adapter = BybitAdapter::new(Arc::new(transport));

        let listed = adapter.list_pairs().await.unwrap();
        assert!(
            listed.contains(&pair("DOGE/USDT")),
            "CONTRACT VIOLATION: lowercase Bybit coins must normalize to uppercase pairs"
        );
        assert_eq!(listed.len(), 4);
    }

    #[tokio::test]
    async fn test_whitebit_markets() {
        let transport = CannedTransport::new().with_response(
            "https://whitebit.com/api/v4/public/markets",
            &load_fixture("whitebit", "markets"),
        );
        let adapter = WhitebitAdapter::new(Arc::new(transport));

        let listed = adapter.list_pairs().await.unwrap();
        assert_eq!(listed, pairs(&["BTC/USDT", "ETH/USDT", "SOL/USDT"]));
    }

    #[tokio::test]
    async fn test_listing_transport_failure_is_adapter_error() {
        let transport = CannedTransport::new().with_error(
            "https://api.binance.com/api/v3/exchangeInfo",
            crate::ports::http::TransportError::Timeout("5s".into()),
        );
        let adapter = BinanceAdapter::new(Arc::new(transport));

        let err = adapter.list_pairs().await.unwrap_err();
        assert_eq!(err.exchange(), ExchangeId::Binance);
        assert!(matches!(err, AdapterError::Transport { .. }));
    }
}

mod price_contract_tests {
    use super::*;

    #[tokio::test]
    async fn test_binance_ticker_price() {
        let transport = CannedTransport::new().with_query_response(
            "https://api.binance.com/api/v3/ticker/price",
            &[("symbol", "BTCUSDT")],
            &load_fixture("binance", "ticker_price_btcusdt"),
        );
        let adapter = BinanceAdapter::new(Arc::new(transport));
        assert_eq!(adapter.fetch_price(&pair("BTC/USDT")).await, Some(dec!(42000.1)));
    }

    #[tokio::test]
    async fn test_bitget_symbol_price() {
        let transport = CannedTransport::new()
            .with_query_response(
                "https://api.bitget.com/api/v2/mix/market/symbol-price",
                &[("productType", "usdt-futures"), ("symbol", "BTCUSDT")],
                &load_fixture("bitget", "symbol_price_btcusdt"),
            )
            .with_query_response(
                "https://api.bitget.com/api/v2/mix/market/symbol-price",
                &[("productType", "usdt-futures"), ("symbol", "ETHUSDT")],
                &load_fixture("bitget", "symbol_price_ethusdt"),
            );
        let adapter = BitgetAdapter::new(Arc::new(transport));

        assert_eq!(adapter.fetch_price(&pair("BTC/USDT")).await, Some(dec!(42005.5)));
        assert_eq!(
            adapter.fetch_price(&pair("ETH/USDT")).await,
            None,
            "CONTRACT VIOLATION: empty 'data' must read as no quote"
        );
    }

    #[tokio::test]
    async fn test_poloniex_market_price() {
        let transport = CannedTransport::new().with_response(
            "https://api.poloniex.com/markets/BTC_USDT/price",
            &load_fixture("poloniex", "price_btc_usdt"),
        );
        let adapter = PoloniexAdapter::new(Arc::new(transport));
        assert_eq!(adapter.fetch_price(&pair("BTC/USDT")).await, Some(dec!(41990)));
    }

    #[tokio::test]
    async fn test_bybit_tickers() {
        let transport = CannedTransport::new().with_query_response(
            "https://api.bybit.com/v5/market/tickers",
            &[("category", "spot"), ("symbol", "ETHUSDT")],
            &load_fixture("bybit", "tickers_ethusdt"),
        );
        let adapter = BybitAdapter::new(Arc::new(transport));
        assert_eq!(adapter.fetch_price(&pair("ETH/USDT")).await, Some(dec!(2299.5)));
    }

    #[tokio::test]
    async fn test_whitebit_tickers() {
        let transport = CannedTransport::new().with_response(
            "https://whitebit.com/api/v1/public/tickers",
            &load_fixture("whitebit", "tickers"),
        );
        let adapter = WhitebitAdapter::new(Arc::new(transport));

        assert_eq!(adapter.fetch_price(&pair("ETH/USDT")).await, Some(dec!(2305.1)));
        assert_eq!(
            adapter.fetch_price(&pair("SOL/USDT")).await,
            None,
            "CONTRACT VIOLATION: ticker without 'last' must read as no quote"
        );
    }

    #[tokio::test]
    async fn test_whitebit_tickers_with_malformed_entries() {
        let transport = CannedTransport::new().with_response(
            "https://whitebit.com/api/v1/public/tickers",
            &load_fixture("whitebit", "tickers_degraded"),
        );
        let adapter = WhitebitAdapter::new(Arc::new(transport));

        assert_eq!(
            adapter.fetch_price(&pair("BTC/USDT")).await,
            Some(dec!(42000.7)),
            "CONTRACT VIOLATION: a malformed sibling entry must not hide a valid ticker"
        );
        assert_eq!(adapter.fetch_price(&pair("ETH/USDT")).await, None);
        assert_eq!(adapter.fetch_price(&pair("TRX/USDT")).await, None);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_none_everywhere() {
        let http: Arc<dyn HttpTransport> = Arc::new(CannedTransport::new());
        for id in ExchangeId::ALL {
            let adapter = build_exchange(id, default_base_url(id), http.clone());
            assert_eq!(adapter.id(), id);
            assert_eq!(adapter.fetch_price(&pair("NOPE/USDT")).await, None);
        }
    }
}

mod symbol_contract_tests {
    use super::*;

    #[test]
    fn test_native_symbols_for_btc_usdt() {
        let http: Arc<dyn HttpTransport> = Arc::new(CannedTransport::new());
        let btc = pair("BTC/USDT");

        let expected = [
            (ExchangeId::Binance, "BTCUSDT"),
            (ExchangeId::Bitget, "BTCUSDT"),
            (ExchangeId::Poloniex, "BTC_USDT"),
            (ExchangeId::Bybit, "BTCUSDT"),
            (ExchangeId::Whitebit, "BTC_USDT"),
        ];

        for (id, symbol) in expected {
            let adapter = build_exchange(id, default_base_url(id), http.clone());
            assert_eq!(
                adapter.format_symbol(&btc),
                symbol,
                "CONTRACT VIOLATION: wrong native symbol for {}",
                id
            );
        }
    }
}
