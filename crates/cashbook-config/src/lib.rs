//! Configuration management for cashbook
//!
//! This module handles loading, validation, and management of
//! cashbook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Ledger storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON snapshot file. When unset the ledger lives in memory only.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Seed the default chart of accounts the first time a company posts
    #[serde(default = "default_true")]
    pub seed_default_accounts: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_default_accounts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Reporting currency code
    #[serde(default = "default_currency")]
    pub code: String,
    /// Number of decimal places shown in reports
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Half-open range of account numbers, `start <= n < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRange {
    pub start: u32,
    pub end: u32,
}

impl AccountRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, number: u32) -> bool {
        number >= self.start && number < self.end
    }
}

impl std::fmt::Display for AccountRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Account-number boundaries and well-known account names used when
/// bucketing ledger balances into statement sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Cash and cash equivalents
    #[serde(default = "default_cash_range")]
    pub cash: AccountRange,
    /// Current assets (cash included)
    #[serde(default = "default_current_assets_range")]
    pub current_assets: AccountRange,
    /// Non-current / fixed assets
    #[serde(default = "default_fixed_assets_range")]
    pub fixed_assets: AccountRange,
    /// Current liabilities
    #[serde(default = "default_current_liabilities_range")]
    pub current_liabilities: AccountRange,
    /// Long-term liabilities
    #[serde(default = "default_noncurrent_liabilities_range")]
    pub noncurrent_liabilities: AccountRange,
    /// Expense accounts reported as cost of goods sold
    #[serde(default = "default_cogs_range")]
    pub cost_of_goods_sold: AccountRange,
    /// Revenue accounts reported below operating income
    #[serde(default = "default_other_income_range")]
    pub other_income: AccountRange,
    /// Expense accounts reported below operating income
    #[serde(default = "default_other_expenses_range")]
    pub other_expenses: AccountRange,
    /// Balancing account for simplified transactions
    #[serde(default = "default_corresponding_account")]
    pub corresponding_account: String,
    /// Equity line that receives computed net income
    #[serde(default = "default_retained_earnings_account")]
    pub retained_earnings_account: String,
    /// Asset line that receives open receivables
    #[serde(default = "default_receivables_account")]
    pub receivables_account: String,
    /// Liability line that receives open payables
    #[serde(default = "default_payables_account")]
    pub payables_account: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            cash: default_cash_range(),
            current_assets: default_current_assets_range(),
            fixed_assets: default_fixed_assets_range(),
            current_liabilities: default_current_liabilities_range(),
            noncurrent_liabilities: default_noncurrent_liabilities_range(),
            cost_of_goods_sold: default_cogs_range(),
            other_income: default_other_income_range(),
            other_expenses: default_other_expenses_range(),
            corresponding_account: default_corresponding_account(),
            retained_earnings_account: default_retained_earnings_account(),
            receivables_account: default_receivables_account(),
            payables_account: default_payables_account(),
        }
    }
}

impl ClassificationConfig {
    fn ranges(&self) -> [(&'static str, AccountRange); 8] {
        [
            ("classification.cash", self.cash),
            ("classification.current_assets", self.current_assets),
            ("classification.fixed_assets", self.fixed_assets),
            ("classification.current_liabilities", self.current_liabilities),
            ("classification.noncurrent_liabilities", self.noncurrent_liabilities),
            ("classification.cost_of_goods_sold", self.cost_of_goods_sold),
            ("classification.other_income", self.other_income),
            ("classification.other_expenses", self.other_expenses),
        ]
    }
}

fn default_cash_range() -> AccountRange {
    AccountRange::new(1000, 1100)
}

fn default_current_assets_range() -> AccountRange {
    AccountRange::new(1000, 1400)
}

fn default_fixed_assets_range() -> AccountRange {
    AccountRange::new(1400, 2000)
}

fn default_current_liabilities_range() -> AccountRange {
    AccountRange::new(2000, 2500)
}

fn default_noncurrent_liabilities_range() -> AccountRange {
    AccountRange::new(2500, 3000)
}

fn default_cogs_range() -> AccountRange {
    AccountRange::new(5000, 6000)
}

fn default_other_income_range() -> AccountRange {
    AccountRange::new(4900, 5000)
}

fn default_other_expenses_range() -> AccountRange {
    AccountRange::new(7900, 8000)
}

fn default_corresponding_account() -> String {
    "Cash".to_string()
}

fn default_retained_earnings_account() -> String {
    "Retained Earnings".to_string()
}

fn default_receivables_account() -> String {
    "Accounts Receivable".to_string()
}

fn default_payables_account() -> String {
    "Accounts Payable".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger storage settings
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Statement classification settings
    #[serde(default)]
    pub classification: ClassificationConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        for (field, range) in self.classification.ranges() {
            if range.start >= range.end {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("Range {} must have start < end", range),
                });
            }
        }

        let names = [
            ("classification.corresponding_account", &self.classification.corresponding_account),
            ("classification.retained_earnings_account", &self.classification.retained_earnings_account),
            ("classification.receivables_account", &self.classification.receivables_account),
            ("classification.payables_account", &self.classification.payables_account),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Account name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
