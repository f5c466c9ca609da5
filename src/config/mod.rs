//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, ExchangeSection, ExchangesSection, HttpSection, LoggingSection,
    ScanSection, load_config, load_config_or_default, load_config_or_default_at, DEFAULT_CONFIG_PATH, TIMEOUT_ENV_VAR,
};
