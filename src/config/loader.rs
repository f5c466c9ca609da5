//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/default.toml.
//! Every section is optional; missing values fall back to the public endpoints
//! and conservative timeouts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::exchanges::default_base_url;
use crate::adapters::http::HttpConfig;
use crate::application::{IntersectionPolicy, ScanSettings};
use crate::domain::ExchangeId;

/// Environment variable overriding `http.timeout_secs`
pub const TIMEOUT_ENV_VAR: &str = "SPREAD_SCANNER_TIMEOUT_SECS";

const MAX_TIMEOUT_SECS: u64 = 120;

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpSection,
    pub scan: ScanSection,
    pub exchanges: ExchangesSection,
    pub logging: LoggingSection,
}

/// HTTP client configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent to exchanges
    pub user_agent: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        let http = HttpConfig::default();
        Self {
            timeout_secs: http.timeout.as_secs(),
            user_agent: http.user_agent,
        }
    }
}

impl HttpSection {
    /// Get timeout with environment variable override
    /// Checks SPREAD_SCANNER_TIMEOUT_SECS first, falls back to config value
    pub fn get_timeout_secs(&self) -> u64 {
        std::env::var(TIMEOUT_ENV_VAR)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.timeout_secs)
    }
}

/// Scan behavior section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// "strict" (one failed listing empties the result) or "best_effort"
    pub intersection: IntersectionPolicy,
    /// Query exchanges concurrently
    pub concurrent: bool,
    /// Pairs aggregated at once by the profit command
    pub max_concurrent_pairs: usize,
}

impl Default for ScanSection {
    fn default() -> Self {
        let settings = ScanSettings::default();
        Self {
            intersection: settings.intersection,
            concurrent: settings.concurrent,
            max_concurrent_pairs: settings.max_concurrent_pairs,
        }
    }
}

/// One exchange endpoint. `base_url` falls back to the public API when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl ExchangeSection {
    fn default_for(id: ExchangeId) -> Self {
        Self {
            enabled: true,
            base_url: Some(default_base_url(id).to_string()),
        }
    }
}

/// Per-exchange endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangesSection {
    pub binance: ExchangeSection,
    #[serde(alias = "jbex")]
    pub bitget: ExchangeSection,
    pub poloniex: ExchangeSection,
    pub bybit: ExchangeSection,
    pub whitebit: ExchangeSection,
}

impl Default for ExchangesSection {
    fn default() -> Self {
        Self {
            binance: ExchangeSection::default_for(ExchangeId::Binance),
            bitget: ExchangeSection::default_for(ExchangeId::Bitget),
            poloniex: ExchangeSection::default_for(ExchangeId::Poloniex),
            bybit: ExchangeSection::default_for(ExchangeId::Bybit),
            whitebit: ExchangeSection::default_for(ExchangeId::Whitebit),
        }
    }
}

impl ExchangesSection {
    pub fn get(&self, id: ExchangeId) -> &ExchangeSection {
        match id {
            ExchangeId::Binance => &self.binance,
            ExchangeId::Bitget => &self.bitget,
            ExchangeId::Poloniex => &self.poloniex,
            ExchangeId::Bybit => &self.bybit,
            ExchangeId::Whitebit => &self.whitebit,
        }
    }

    /// Configured base URL for `id`, or its public default
    pub fn base_url(&self, id: ExchangeId) -> &str {
        self.get(id)
            .base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(id))
    }

    /// Enabled exchanges with their base URLs, in fixed order
    pub fn enabled(&self) -> Vec<(ExchangeId, &str)> {
        ExchangeId::ALL
            .iter()
            .filter(|&&id| self.get(id).enabled)
            .map(|&id| (id, self.base_url(id)))
            .collect()
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Path of the configuration file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, expanding `~` in `path`.
/// A missing file at the default location yields the built-in defaults;
/// any other missing file is an error.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    load_config_or_default_at(path, Path::new(DEFAULT_CONFIG_PATH))
}

/// As `load_config_or_default`, with `default_path` as the optional location
pub fn load_config_or_default_at(path: &Path, default_path: &Path) -> Result<Config, ConfigError> {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());

    if !expanded.exists() && path == default_path {
        tracing::debug!("{} not found, using built-in defaults", default_path.display());
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    }

    load_config(expanded)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeout = self.http.get_timeout_secs();
        if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError(format!(
                "timeout_secs must be 1-{}, got {}",
                MAX_TIMEOUT_SECS, timeout
            )));
        }

        if self.scan.max_concurrent_pairs == 0 {
            return Err(ConfigError::ValidationError(
                "max_concurrent_pairs must be > 0".to_string(),
            ));
        }

        for id in ExchangeId::ALL {
            if !self.exchanges.get(id).enabled {
                continue;
            }
            let url = self.exchanges.base_url(id).trim();
            if url.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} base_url cannot be empty",
                    id
                )));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{} base_url must start with http:// or https://, got {}",
                    id, url
                )));
            }
        }

        if self.exchanges.enabled().is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one exchange must be enabled".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging level must be trace/debug/info/warn/error, got {}",
                    other
                )))
            }
        }

        Ok(())
    }

    /// HTTP transport settings, with the timeout env override applied
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(self.http.get_timeout_secs()),
            user_agent: self.http.user_agent.clone(),
        }
    }
}

// Conversion from Config to ScanSettings
impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        ScanSettings {
            intersection: config.scan.intersection,
            concurrent: config.scan.concurrent,
            max_concurrent_pairs: config.scan.max_concurrent_pairs,
        }
    }
}
