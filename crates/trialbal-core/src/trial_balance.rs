//! Trial balance pipeline
//!
//! One invocation runs start to finish over an already loaded snapshot:
//! validate filters, build the tree, aggregate openings, calculate period
//! balances, roll them up, then format and filter rows.

use serde::{Deserialize, Serialize};
use trialbal_config::Config;

use super::accumulate::accumulate_values_into_parents;
use super::balance::{calculate_values, PostingsByAccount};
use super::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use super::filters::{PostingScope, ReportFilters};
use super::models::LedgerData;
use super::opening::{get_opening_balances, OpeningQuery};
use super::reports::{prepare_data, RowContext, TrialBalanceReport, DEFAULT_PRECISION};
use super::tree::{AccountTree, DEFAULT_MAX_DEPTH};
use super::zero_rows::filter_out_zero_value_rows;

/// Settings that shape a report but are not filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub max_depth: usize,
    pub precision: u32,
    /// Used when the company has no default currency
    pub currency: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            precision: DEFAULT_PRECISION,
            currency: "USD".to_string(),
        }
    }
}

impl ReportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.report.max_depth,
            precision: config.report.precision,
            currency: config.currency.default_currency.clone(),
        }
    }
}

/// Compute the trial balance for `filters` over `data`
pub fn generate(
    data: &LedgerData,
    filters: &ReportFilters,
    settings: &ReportSettings,
) -> CoreResult<TrialBalanceReport> {
    let company = match filters.company.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(name) => match data.company.as_ref() {
            Some(company) if company.name == name => Some(company),
            _ => {
                return Err(CoreError::CompanyNotFound {
                    name: name.to_string(),
                })
            }
        },
        None => data.company.as_ref(),
    };

    let period = filters.resolve_period(&data.fiscal_years)?;
    let logger = DefaultErrorLogger;
    for warning in &period.warnings {
        let context = ErrorContext::new("resolve_period".to_string())
            .with_data("fiscal_year", serde_json::json!(period.fiscal_year));
        logger.log_warning(warning, &context);
    }
    let scope = PostingScope::new(filters, company, &data.cost_centers)?;

    let tree = match filters.account.as_deref() {
        Some(root) => AccountTree::scoped(&data.accounts, root, settings.max_depth)?,
        None => AccountTree::build(data.accounts.clone(), settings.max_depth),
    };
    let currency = company
        .and_then(|c| c.default_currency.clone())
        .unwrap_or_else(|| settings.currency.clone());

    let mut report = TrialBalanceReport {
        company: company.map(|c| c.name.clone()),
        currency,
        period: period.clone(),
        rows: Vec::new(),
        warnings: period.warnings.clone(),
    };
    if tree.is_empty() {
        log::debug!("No accounts to report");
        return Ok(report);
    }

    let opening = get_opening_balances(
        &data.postings,
        &data.accounts,
        &OpeningQuery {
            from_date: period.from_date,
            year_start_date: period.year_start_date,
            show_unclosed_fy_pl_balances: filters.show_unclosed_fy_pl_balances,
            scope: &scope,
        },
    );

    let mut postings = PostingsByAccount::new();
    for posting in &data.postings {
        if period.contains(&posting.posting_date) && scope.admits(posting) {
            postings
                .entry(posting.account.as_str())
                .or_default()
                .push(posting);
        }
    }
    log::debug!(
        "{} account(s) with postings between {} and {}",
        postings.len(),
        period.from_date,
        period.to_date
    );

    let (mut balances, total) = calculate_values(&tree, &postings, &opening);
    accumulate_values_into_parents(&tree, &mut balances);

    let context = RowContext {
        currency: &report.currency,
        period: &period,
        precision: settings.precision,
    };
    let rows = prepare_data(&tree, &balances, &total, &context);
    report.rows = filter_out_zero_value_rows(rows, &tree, filters.show_zero_values);

    log::debug!("Trial balance ready with {} row(s)", report.rows.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Company, FiscalYear, Posting};
    use crate::types::{ReportType, RootType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data() -> LedgerData {
        LedgerData {
            company: Some(Company {
                name: "Acme".to_string(),
                default_currency: Some("EUR".to_string()),
                default_finance_book: None,
            }),
            fiscal_years: vec![FiscalYear {
                name: "2024".to_string(),
                year_start_date: date(2024, 1, 1),
                year_end_date: date(2024, 12, 31),
            }],
            accounts: vec![Account {
                name: "Cash".to_string(),
                account_number: None,
                account_name: "Cash".to_string(),
                parent_account: None,
                root_type: RootType::Asset,
                report_type: ReportType::BalanceSheet,
                lft: 1,
                rgt: 2,
            }],
            cost_centers: Vec::new(),
            postings: vec![Posting {
                account: "Cash".to_string(),
                debit: Decimal::from(40),
                credit: Decimal::ZERO,
                posting_date: date(2024, 2, 1),
                is_opening: false,
                cost_center: None,
                finance_book: None,
                voucher_type: None,
            }],
        }
    }

    fn filters() -> ReportFilters {
        ReportFilters {
            fiscal_year: Some("2024".to_string()),
            ..ReportFilters::default()
        }
    }

    #[test]
    fn test_company_mismatch() {
        let f = ReportFilters {
            company: Some("Other".to_string()),
            ..filters()
        };
        let err = generate(&data(), &f, &ReportSettings::default()).unwrap_err();
        assert!(matches!(err, CoreError::CompanyNotFound { .. }));
    }

    #[test]
    fn test_company_currency_preferred() {
        let report = generate(&data(), &filters(), &ReportSettings::default()).unwrap();
        assert_eq!(report.currency, "EUR");
        assert_eq!(report.company.as_deref(), Some("Acme"));
        assert_eq!(report.row("Cash").unwrap().currency, "EUR");
    }

    #[test]
    fn test_fallback_currency() {
        let mut d = data();
        d.company = None;
        let report = generate(&d, &filters(), &ReportSettings::default()).unwrap();
        assert_eq!(report.currency, "USD");
    }

    #[test]
    fn test_validation_precedes_empty_chart() {
        let mut d = data();
        d.accounts.clear();
        let err = generate(&d, &ReportFilters::default(), &ReportSettings::default()).unwrap_err();
        assert!(matches!(err, CoreError::FiscalYearRequired));

        let report = generate(&d, &filters(), &ReportSettings::default()).unwrap();
        assert!(report.rows.is_empty());
    }
}
