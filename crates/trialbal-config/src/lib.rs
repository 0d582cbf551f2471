//! Configuration management for trialbal
//!
//! This module handles loading, validation, and management of
//! trialbal configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Ledger snapshot location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the snapshot files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Main snapshot file name (company, fiscal years, accounts)
    #[serde(default = "default_main_file")]
    pub main_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            main_file: default_main_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_main_file() -> String {
    "ledger.yaml".to_string()
}

/// Report defaults, overridable per invocation from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum account tree depth walked before truncating
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Decimal places kept on report values
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Keep rows with no significant value
    #[serde(default = "default_false")]
    pub show_zero_values: bool,
    /// Count period closing vouchers
    #[serde(default = "default_false")]
    pub with_period_closing_entry: bool,
    /// Carry P&L balances from prior, unclosed fiscal years into the opening
    #[serde(default = "default_false")]
    pub show_unclosed_fy_pl_balances: bool,
    /// Include the company's default finance book when filtering by book
    #[serde(default = "default_false")]
    pub include_default_book_entries: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            precision: default_precision(),
            show_zero_values: false,
            with_period_closing_entry: false,
            show_unclosed_fy_pl_balances: false,
            include_default_book_entries: false,
        }
    }
}

fn default_max_depth() -> usize {
    10
}

fn default_precision() -> u32 {
    3
}

fn default_false() -> bool {
    false
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
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

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented text table
    Text,
    /// JSON rows
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency used when the company does not declare one
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Number of decimal places in text output
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Snapshot location
    #[serde(default)]
    pub data: DataConfig,
    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.max_depth".to_string(),
                reason: "Max depth must be greater than 0".to_string(),
            });
        }

        if self.report.precision > 10 {
            return Err(ConfigError::InvalidValue {
                field: "report.precision".to_string(),
                reason: "Precision must be between 0 and 10".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.currency.default_currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "currency.default_currency".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the main snapshot file
    pub fn ledger_path(&self) -> PathBuf {
        self.data.path.join(&self.data.main_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.report.max_depth, 10);
        assert_eq!(config.report.precision, 3);
        assert!(!config.report.show_zero_values);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.ledger_path(), PathBuf::from("./data/ledger.yaml"));
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.report.max_depth, 10);
        assert_eq!(config.currency.thousands_separator, ",");
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let config = Config::from_yaml("report:\n  show_zero_values: true\n").unwrap();
        assert!(config.report.show_zero_values);
        assert_eq!(config.report.max_depth, 10);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = Config::from_yaml("report:\n  max_depth: 0\n").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("report: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/trialbal.yaml").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
