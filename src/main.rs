//! spread-scanner - Cross-Exchange Crypto Spread Scanner

use anyhow::Result;

use spread_scanner::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (e.g. SPREAD_SCANNER_TIMEOUT_SECS, RUST_LOG)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
