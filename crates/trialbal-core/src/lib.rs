//! Core trial balance processing
//!
//! Builds the account hierarchy, aggregates opening balances, calculates and
//! rolls up period balances, and formats report rows.

pub mod accumulate;
pub mod balance;
pub mod error;
pub mod filters;
pub mod models;
pub mod opening;
pub mod reports;
pub mod tree;
pub mod trial_balance;
pub mod types;
pub mod zero_rows;

use std::path::PathBuf;
use trialbal_config::Config;
use trialbal_loader::SourceRef;

pub use balance::BalanceRecord;
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails,
    ErrorLogger, ErrorSeverity,
};
pub use filters::{PostingScope, ReportFilters, ReportPeriod};
pub use models::{Account, Company, CostCenter, FiscalYear, LedgerData, Posting};
pub use reports::{AccountRow, ReportRow, TotalRow, TrialBalanceReport};
pub use tree::{AccountNode, AccountTree};
pub use trial_balance::ReportSettings;
pub use types::{BalanceSide, ReportType, RootType};

/// Loaded ledger snapshot plus the settings reports run with
pub struct Ledger {
    config: Config,
    source: SourceRef,
    data: Option<LedgerData>,
    entry: Option<PathBuf>,
}

impl Ledger {
    /// Create a new ledger with config and snapshot source
    pub fn new(config: Config, source: SourceRef) -> Self {
        Self {
            config,
            source,
            data: None,
            entry: None,
        }
    }

    /// Load the snapshot from its entry file
    pub async fn load(&mut self, entry: PathBuf) -> CoreResult<()> {
        let snapshot = self.source.load_file(entry.clone()).await?;
        let data = LedgerData::from_snapshot(snapshot)?;
        log::info!(
            "Loaded {} account(s) and {} posting(s) from {}",
            data.accounts.len(),
            data.postings.len(),
            entry.display()
        );

        self.data = Some(data);
        self.entry = Some(entry);
        Ok(())
    }

    /// Load the snapshot again from the last entry file
    pub async fn reload(&mut self) -> CoreResult<()> {
        match self.entry.clone() {
            Some(entry) => self.load(entry).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loaded data, if any
    pub fn data(&self) -> Option<&LedgerData> {
        self.data.as_ref()
    }

    /// Report filters preset from configuration
    pub fn default_filters(&self) -> ReportFilters {
        ReportFilters::from_config(&self.config.report)
    }

    /// Compute a trial balance over the loaded snapshot
    pub fn trial_balance(&self, filters: &ReportFilters) -> CoreResult<TrialBalanceReport> {
        let data = self.data.as_ref().ok_or(CoreError::NotLoaded)?;
        let settings = ReportSettings::from_config(&self.config);
        trial_balance::generate(data, filters, &settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trialbal_loader::YamlLedgerSource;

    const SNAPSHOT: &str = r#"
company:
  name: Acme
  default_currency: EUR
fiscal_years:
  - name: "2024"
    year_start_date: 2024-01-01
    year_end_date: 2024-12-31
accounts:
  - name: Assets
    root_type: Asset
    report_type: Balance Sheet
    lft: 1
    rgt: 4
  - name: Cash
    parent_account: Assets
    root_type: Asset
    report_type: Balance Sheet
    lft: 2
    rgt: 3
postings:
  - account: Cash
    debit: 25
    posting_date: 2024-03-01
"#;

    fn ledger() -> Ledger {
        Ledger::new(Config::default(), Arc::new(YamlLedgerSource))
    }

    #[test]
    fn test_trial_balance_requires_loaded_data() {
        let err = ledger().trial_balance(&ReportFilters::default()).unwrap_err();
        assert!(matches!(err, CoreError::NotLoaded));
    }

    #[tokio::test]
    async fn test_reload_without_entry() {
        let err = ledger().reload().await.unwrap_err();
        assert!(matches!(err, CoreError::NotLoaded));
    }

    #[tokio::test]
    async fn test_load_and_report() {
        let dir = std::env::temp_dir().join(format!("trialbal-core-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ledger.yaml");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let mut ledger = ledger();
        ledger.load(path).await.unwrap();
        assert_eq!(ledger.data().unwrap().accounts.len(), 2);

        let mut filters = ledger.default_filters();
        filters.fiscal_year = Some("2024".to_string());
        let report = ledger.trial_balance(&filters).unwrap();
        let assets = report.row("Assets").unwrap();
        assert_eq!(assets.balance.debit, rust_decimal::Decimal::from(25));
        assert_eq!(assets.balance.closing_debit, rust_decimal::Decimal::from(25));

        std::fs::remove_dir_all(&dir).ok();
    }
}
