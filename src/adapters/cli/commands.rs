//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the spread scanner.

use clap::{Parser, Subcommand, ValueEnum};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::exchanges::build_exchange;
use crate::adapters::http::ReqwestTransport;
use crate::application::{RankOptions, ScanSettings, SpreadAnalyzer};
use crate::config::{load_config_or_default, Config, DEFAULT_CONFIG_PATH};
use crate::domain::ExchangeId;
use crate::ports::{ExchangePort, HttpTransport};
use super::output;

/// spread-scanner - Cross-exchange crypto price spread scanner
#[derive(Parser, Debug)]
#[command(
    name = "spread-scanner",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Cross-exchange crypto price spread scanner",
    long_about = "spread-scanner lists the currency pairs traded on Binance, Bitget (jbex), \
                  Poloniex, Bybit and Whitebit, finds the cheapest and most expensive venue \
                  for a pair and ranks every common pair by spread."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only query these exchanges (comma separated)
    #[arg(long, value_name = "LIST", global = true, value_delimiter = ',')]
    pub exchanges: Vec<ExchangeId>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the cheapest and most expensive exchange for a pair
    Analyze(AnalyzeCmd),

    /// Rank every common pair by spread
    Profit(ProfitCmd),

    /// List pairs traded on every exchange
    Pairs(PairsCmd),
}

/// Analyze a single pair
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Currency pair (e.g., BTC/USDT)
    #[arg(value_name = "PAIR")]
    pub pair: String,
}

/// Build the profit list
#[derive(Parser, Debug)]
pub struct ProfitCmd {
    /// Sort by profit, highest first
    #[arg(short, long)]
    pub sort: bool,

    /// Drop entries below this profit percentage
    #[arg(long, value_name = "PERCENT")]
    pub min_profit: Option<Decimal>,

    /// Show at most N entries
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,
}

/// List common pairs
#[derive(Parser, Debug)]
pub struct PairsCmd {
    /// Also print per-exchange listing results
    #[arg(short, long)]
    pub detailed: bool,
}

impl From<&ProfitCmd> for RankOptions {
    fn from(cmd: &ProfitCmd) -> Self {
        RankOptions {
            sort_by_profit: cmd.sort,
            min_profit: cmd.min_profit,
            limit: cmd.limit,
        }
    }
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_config_or_default(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;

    // Initialize logging based on flags and config
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let analyzer = build_analyzer(&config, &app.exchanges)?;

    match app.command {
        Command::Analyze(cmd) => analyze_command(&analyzer, cmd, app.format).await,
        Command::Profit(cmd) => profit_command(&analyzer, cmd, app.format).await,
        Command::Pairs(cmd) => pairs_command(&analyzer, cmd, app.format).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        configured
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Exchanges to query: enabled in config, narrowed by `--exchanges` when given
fn select_exchanges<'a>(config: &'a Config, requested: &[ExchangeId]) -> Result<Vec<(ExchangeId, &'a str)>> {
    let enabled = config.exchanges.enabled();
    if requested.is_empty() {
        return Ok(enabled);
    }

    for id in requested {
        if !enabled.iter().any(|(enabled_id, _)| enabled_id == id) {
            bail!("Exchange {} is disabled in the configuration", id);
        }
    }

    Ok(enabled
        .into_iter()
        .filter(|(id, _)| requested.contains(id))
        .collect())
}

/// Wire the configured exchanges onto one shared HTTP transport
fn build_analyzer(config: &Config, requested: &[ExchangeId]) -> Result<SpreadAnalyzer> {
    let transport = ReqwestTransport::with_config(config.http_config())
        .context("Failed to create HTTP client")?;
    let http: Arc<dyn HttpTransport> = Arc::new(transport);

    let exchanges: Vec<Arc<dyn ExchangePort>> = select_exchanges(config, requested)?
        .into_iter()
        .map(|(id, base_url)| build_exchange(id, base_url, http.clone()))
        .collect();

    tracing::info!(
        "Using exchanges: {}",
        exchanges.iter().map(|e| e.id().to_string()).collect::<Vec<_>>().join(", ")
    );

    Ok(SpreadAnalyzer::new(exchanges, ScanSettings::from(config)))
}

/// Handle analyze command
async fn analyze_command(analyzer: &SpreadAnalyzer, cmd: AnalyzeCmd, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing {}", cmd.pair);

    let report = analyzer.analyze_price_for_pair(&cmd.pair).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", output::render_report(&report)),
    }

    Ok(())
}

/// Handle profit command
async fn profit_command(analyzer: &SpreadAnalyzer, cmd: ProfitCmd, format: OutputFormat) -> Result<()> {
    let options = RankOptions::from(&cmd);
    let list = analyzer.rank_all(&options).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
        OutputFormat::Text => {
            print!("{}", output::render_profit_table(&list.entries));
            for failed in list.common.failed_exchanges() {
                eprintln!("Warning: {} could not list pairs", failed);
            }
        }
    }

    Ok(())
}

/// Handle pairs command
async fn pairs_command(analyzer: &SpreadAnalyzer, cmd: PairsCmd, format: OutputFormat) -> Result<()> {
    let common = analyzer.list_common_pairs().await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&common)?),
        OutputFormat::Text => {
            if cmd.detailed {
                print!("{}", output::render_listings(&common));
            }
            print!("{}", output::render_pairs(&common));
        }
    }

    Ok(())
}
