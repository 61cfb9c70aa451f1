//! # Storefront Configuration
//!
//! Configuration loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_CART_KEY=cart                                           │
//! │     STOREFRONT_DB_PATH=/tmp/storefront.db                              │
//! │     STOREFRONT_CATALOG=./catalog.json                                  │
//! │     STOREFRONT_CURRENCY_SYMBOL=€                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOREFRONT_CONFIG, or                                             │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! storage_key = "cart"
//! database_path = "/var/lib/storefront/storefront.db"
//! catalog_path = "/etc/storefront/catalog.json"
//!
//! [currency]
//! symbol = "$"
//! decimals = 2
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use storefront_core::{Money, DEFAULT_CART_STORAGE_KEY};

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Currency
// =============================================================================

/// How amounts are displayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyConfig {
    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            symbol: default_currency_symbol(),
            decimals: default_currency_decimals(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Key the cart record is persisted under.
    /// Default: "cart"
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// SQLite file for the cart. `None` uses the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Product catalog JSON. `None` uses the bundled demo catalog.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub currency: CurrencyConfig,
}

fn default_storage_key() -> String {
    DEFAULT_CART_STORAGE_KEY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage_key: default_storage_key(),
            database_path: None,
            catalog_path: None,
            currency: CurrencyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file (if present), then
    /// environment overrides. The result is validated.
    ///
    /// `config_path` overrides the file location; otherwise
    /// `STOREFRONT_CONFIG`, then the platform config directory.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("STOREFRONT_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`AppConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML config text.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the configuration for values the store cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }

        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most 4, got {}",
                self.currency.decimals
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("STOREFRONT_CART_KEY") {
            debug!(key = %key, "Overriding cart storage key from environment");
            self.storage_key = key;
        }

        if let Some(path) = std::env::var_os("STOREFRONT_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = std::env::var_os("STOREFRONT_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Ok(symbol) = std::env::var("STOREFRONT_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let decimals = u32::from(self.currency.decimals);
        let sign = if cents < 0 { "-" } else { "" };

        // Amounts are stored in hundredths; rescale for other precisions.
        let scaled = match decimals {
            0 => cents / 100,
            1 => cents / 10,
            2 => cents,
            d => cents.saturating_mul(10_i64.pow(d - 2)),
        };

        let divisor = 10_i64.pow(decimals);
        let whole = (scaled / divisor).unsigned_abs();
        let frac = (scaled % divisor).unsigned_abs();

        if decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency.symbol,
                whole,
                frac,
                width = decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency.symbol, whole)
        }
    }
}
