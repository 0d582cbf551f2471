//! Report rows and the row formatter

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::balance::BalanceRecord;
use super::filters::ReportPeriod;
use super::tree::AccountTree;

/// Label of the grand total row
pub const TOTAL_LABEL: &str = "Total";

/// Default number of decimal places kept in report rows
pub const DEFAULT_PRECISION: u32 = 3;

/// Smallest magnitude that makes a row worth showing
pub fn significance_threshold() -> Decimal {
    Decimal::new(5, 3)
}

/// One account line of the trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    /// Account identity
    pub account: String,
    pub parent_account: Option<String>,
    pub indent: usize,
    /// Display label, "{number} - {name}" for numbered accounts
    pub account_name: String,
    pub currency: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(flatten)]
    pub balance: BalanceRecord,
    pub has_value: bool,
}

/// Grand total across the whole report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRow {
    pub account: String,
    pub account_name: String,
    pub currency: String,
    #[serde(flatten)]
    pub balance: BalanceRecord,
    pub warn_if_negative: bool,
    pub has_value: bool,
}

/// Row of the trial balance, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "row_type", rename_all = "snake_case")]
pub enum ReportRow {
    Account(AccountRow),
    /// Blank line between the accounts and the total
    Separator,
    Total(TotalRow),
}

impl ReportRow {
    pub fn as_account(&self) -> Option<&AccountRow> {
        match self {
            ReportRow::Account(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_total(&self) -> Option<&TotalRow> {
        match self {
            ReportRow::Total(row) => Some(row),
            _ => None,
        }
    }
}

/// Complete trial balance for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    pub company: Option<String>,
    pub currency: String,
    pub period: ReportPeriod,
    pub rows: Vec<ReportRow>,
    /// Non-fatal adjustments, e.g. clamped dates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TrialBalanceReport {
    /// Account rows only, without separator and total
    pub fn account_rows(&self) -> impl Iterator<Item = &AccountRow> {
        self.rows.iter().filter_map(ReportRow::as_account)
    }

    pub fn total(&self) -> Option<&TotalRow> {
        self.rows.iter().find_map(ReportRow::as_total)
    }

    /// Look up the row of an account
    pub fn row(&self, account: &str) -> Option<&AccountRow> {
        self.account_rows().find(|row| row.account == account)
    }
}

/// Shared values stamped on every row
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub currency: &'a str,
    pub period: &'a ReportPeriod,
    pub precision: u32,
}

/// Turn accumulated balances into display rows.
///
/// Each account's opening and closing pairs are normalized here, once, from
/// the accumulated raw amounts. Significance is judged before rounding.
/// Returns no rows at all for an empty tree.
pub fn prepare_data(
    tree: &AccountTree,
    balances: &[BalanceRecord],
    total: &BalanceRecord,
    context: &RowContext<'_>,
) -> Vec<ReportRow> {
    if tree.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(tree.len() + 2);
    for (node, raw) in tree.nodes().iter().zip(balances) {
        let account = &node.account;
        let signed = raw.normalized(account.root_type);

        rows.push(ReportRow::Account(AccountRow {
            account: account.name.clone(),
            parent_account: account.parent_account.clone(),
            indent: node.indent,
            account_name: account.display_name(),
            currency: context.currency.to_string(),
            from_date: context.period.from_date,
            to_date: context.period.to_date,
            balance: round_record(&signed, context.precision),
            has_value: has_value(&signed),
        }));
    }

    rows.push(ReportRow::Separator);
    rows.push(ReportRow::Total(TotalRow {
        account: TOTAL_LABEL.to_string(),
        account_name: TOTAL_LABEL.to_string(),
        currency: context.currency.to_string(),
        balance: round_record(total, context.precision),
        warn_if_negative: true,
        has_value: true,
    }));
    rows
}

/// Whether any field reaches the significance threshold
pub fn has_value(record: &BalanceRecord) -> bool {
    let threshold = significance_threshold();
    record.values().iter().any(|v| v.abs() >= threshold)
}

fn round_record(record: &BalanceRecord, precision: u32) -> BalanceRecord {
    record.map(|v| {
        let mut rounded = v.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded
    })
}
