//! Opening balances carried into the report period

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::filters::PostingScope;
use super::models::{Account, Posting};
use super::types::ReportType;

/// Summed pre-period debit and credit of one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalance {
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
}

/// Opening balances keyed by account identity
pub type OpeningBalances = HashMap<String, OpeningBalance>;

/// Conditions for the opening scan
#[derive(Debug, Clone)]
pub struct OpeningQuery<'a> {
    /// Period start; earlier postings count towards the opening
    pub from_date: NaiveDate,
    /// P&L openings only look back to here unless unclosed years are shown
    pub year_start_date: NaiveDate,
    pub show_unclosed_fy_pl_balances: bool,
    pub scope: &'a PostingScope,
}

impl OpeningQuery<'_> {
    fn admits(&self, posting: &Posting, report_type: ReportType) -> bool {
        if !(posting.posting_date < self.from_date || posting.is_opening) {
            return false;
        }
        if report_type == ReportType::ProfitAndLoss
            && !self.show_unclosed_fy_pl_balances
            && posting.posting_date < self.year_start_date
        {
            return false;
        }
        self.scope.admits(posting)
    }
}

/// Opening balances for balance sheet and P&L accounts, merged into one map
pub fn get_opening_balances(
    postings: &[Posting],
    accounts: &[Account],
    query: &OpeningQuery<'_>,
) -> OpeningBalances {
    let mut opening =
        get_rootwise_opening_balances(postings, accounts, ReportType::BalanceSheet, query);
    let pl_opening =
        get_rootwise_opening_balances(postings, accounts, ReportType::ProfitAndLoss, query);

    for (account, balance) in pl_opening {
        if opening.insert(account.clone(), balance).is_some() {
            log::warn!(
                "Account '{}' has both balance sheet and P&L openings; keeping P&L",
                account
            );
        }
    }

    log::debug!("Opening balances for {} account(s)", opening.len());
    opening
}

/// Opening balances for the accounts of one report type
pub fn get_rootwise_opening_balances(
    postings: &[Posting],
    accounts: &[Account],
    report_type: ReportType,
    query: &OpeningQuery<'_>,
) -> OpeningBalances {
    let in_scope: HashSet<&str> = accounts
        .iter()
        .filter(|a| a.report_type == report_type)
        .map(|a| a.name.as_str())
        .collect();

    let mut opening = OpeningBalances::new();
    for posting in postings {
        if !in_scope.contains(posting.account.as_str()) || !query.admits(posting, report_type) {
            continue;
        }
        let entry = opening.entry(posting.account.clone()).or_default();
        entry.opening_debit += posting.debit;
        entry.opening_credit += posting.credit;
    }
    opening
}
