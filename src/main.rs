//! Trialbal main entry point

mod render;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use trialbal_config::{Config, ConfigError, OutputFormat};
use trialbal_core::{DefaultErrorLogger, ErrorContext, ErrorLogger, Ledger, ReportFilters};
use trialbal_loader::YamlLedgerSource;

#[derive(Parser, Debug)]
#[command(name = "trialbal")]
#[command(author = "Trialbal Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Hierarchical trial balance over a chart of accounts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Snapshot file; overrides data.path/data.main_file from the config
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Company the report is for
    #[arg(long)]
    company: Option<String>,

    /// Fiscal year name
    #[arg(short = 'y', long)]
    fiscal_year: Option<String>,

    /// Period start (YYYY-MM-DD), defaults to the fiscal year start
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Period end (YYYY-MM-DD), defaults to the fiscal year end
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only report this account and its descendants
    #[arg(short, long)]
    account: Option<String>,

    #[arg(long)]
    cost_center: Option<String>,

    #[arg(long)]
    finance_book: Option<String>,

    /// With --finance-book, also count default-book and untagged entries
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    include_default_book_entries: Option<bool>,

    /// Carry P&L balances from earlier, unclosed fiscal years
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    show_unclosed_fy_pl_balances: Option<bool>,

    /// Count period closing vouchers
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    with_period_closing_entry: Option<bool>,

    /// Keep rows without any value
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    show_zero_values: Option<bool>,

    /// Output format (text or json)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

impl Args {
    /// Command-line filters on top of the configured defaults; a flag given
    /// as `--flag=false` turns a configured default off
    fn filters(&self, defaults: ReportFilters) -> ReportFilters {
        ReportFilters {
            company: self.company.clone(),
            fiscal_year: self.fiscal_year.clone(),
            from_date: self.from,
            to_date: self.to,
            account: self.account.clone(),
            cost_center: self.cost_center.clone(),
            finance_book: self.finance_book.clone(),
            include_default_book_entries: self
                .include_default_book_entries
                .unwrap_or(defaults.include_default_book_entries),
            show_unclosed_fy_pl_balances: self
                .show_unclosed_fy_pl_balances
                .unwrap_or(defaults.show_unclosed_fy_pl_balances),
            with_period_closing_entry: self
                .with_period_closing_entry
                .unwrap_or(defaults.with_period_closing_entry),
            show_zero_values: self.show_zero_values.unwrap_or(defaults.show_zero_values),
        }
    }
}

/// Load the config file; `None` when it does not exist
fn load_config(path: &Path) -> anyhow::Result<Option<Config>> {
    match Config::load(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::FileNotFound { .. }) => Ok(None),
        Err(e) => {
            eprintln!("{}", e.to_details());
            Err(e).with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = load_config(&args.config)?;
    let found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    if !found {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    if let Some(format) = args.format {
        config.output.format = format;
    }
    let ledger_path = args.ledger.clone().unwrap_or_else(|| config.ledger_path());
    log::info!("Loading ledger snapshot: {}", ledger_path.display());

    let source = Arc::new(YamlLedgerSource);
    let mut ledger = Ledger::new(config.clone(), source);

    let rt = Runtime::new()?;
    let logger = DefaultErrorLogger;

    if let Err(e) = rt.block_on(ledger.load(ledger_path.clone())) {
        let context = ErrorContext::new("load".to_string())
            .with_data("path", serde_json::json!(ledger_path.display().to_string()));
        logger.log_error(&e, &context);
        eprintln!("{}", e.to_details());
        return Err(e).context("Failed to load ledger snapshot");
    }

    let filters = args.filters(ledger.default_filters());
    let report = match ledger.trial_balance(&filters) {
        Ok(report) => report,
        Err(e) => {
            let context = ErrorContext::new("trial_balance".to_string())
                .with_data("filters", serde_json::to_value(&filters)?);
            logger.log_error(&e, &context);
            eprintln!("{}", e.to_details());
            return Err(e).context("Failed to compute trial balance");
        }
    };

    println!("{}", render::render(&report, &config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_on() -> ReportFilters {
        ReportFilters {
            show_zero_values: true,
            with_period_closing_entry: true,
            ..ReportFilters::default()
        }
    }

    #[test]
    fn test_flag_false_overrides_config() {
        let args = Args::try_parse_from(["trialbal", "--show-zero-values=false"]).unwrap();
        let filters = args.filters(configured_on());
        assert!(!filters.show_zero_values);
        assert!(filters.with_period_closing_entry);
    }

    #[test]
    fn test_bare_flag_turns_on() {
        let args = Args::try_parse_from(["trialbal", "--show-zero-values", "-y", "FY2024"]).unwrap();
        let filters = args.filters(ReportFilters::default());
        assert!(filters.show_zero_values);
        assert!(!filters.with_period_closing_entry);
        assert_eq!(filters.fiscal_year.as_deref(), Some("FY2024"));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::try_parse_from(["trialbal"]).unwrap();
        let filters = args.filters(configured_on());
        assert!(filters.show_zero_values);
        assert!(filters.with_period_closing_entry);
        assert!(!filters.include_default_book_entries);
    }
}
