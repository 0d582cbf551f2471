//! Core data models for the trial balance

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trialbal_loader::{
    AccountRecord, CompanyRecord, CostCenterRecord, FiscalYearRecord, LedgerSnapshot,
    PostingRecord,
};

use super::error::{CoreError, CoreResult};
use super::types::{ReportType, RootType};

/// Voucher type of the entries that zero out P&L accounts at year end
pub const PERIOD_CLOSING_VOUCHER: &str = "Period Closing Voucher";

/// Chart of accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identity (e.g., "1110 - Cash - AC")
    pub name: String,
    /// Account number, if the chart is numbered
    pub account_number: Option<String>,
    /// Human-readable account name
    pub account_name: String,
    /// Parent account identity; `None` for a root
    pub parent_account: Option<String>,
    pub root_type: RootType,
    pub report_type: ReportType,
    /// Nested-set left bound
    pub lft: u32,
    /// Nested-set right bound
    pub rgt: u32,
}

impl Account {
    /// Label shown in the report: "{number} - {name}" for numbered accounts
    pub fn display_name(&self) -> String {
        match self.account_number.as_deref() {
            Some(number) => format!("{} - {}", number, self.account_name),
            None => self.account_name.clone(),
        }
    }

    /// Whether `other` lies within this account's nested-set range (inclusive)
    pub fn contains(&self, other: &Account) -> bool {
        other.lft >= self.lft && other.rgt <= self.rgt
    }

    /// Whether `other` lies strictly inside this account's nested-set range
    pub fn strictly_contains(&self, other: &Account) -> bool {
        other.lft > self.lft && other.rgt < self.rgt
    }

    /// Numeric code used for sibling ordering
    pub fn numeric_code(&self) -> Option<&str> {
        if let Some(number) = self.account_number.as_deref() {
            let number = number.trim();
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return Some(number);
            }
        }
        // Leading all-digit word of the identity, e.g. "1000" in "1000 - Cash - AC"
        static LEADING_CODE: once_cell::sync::OnceCell<regex::Regex> =
            once_cell::sync::OnceCell::new();
        let code_regex =
            LEADING_CODE.get_or_init(|| regex::Regex::new(r"^(\d+)(?:\W|$)").unwrap());
        code_regex
            .captures(&self.name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = CoreError;

    fn try_from(record: AccountRecord) -> CoreResult<Self> {
        let root_type = record
            .root_type
            .parse::<RootType>()
            .map_err(|message| CoreError::InvalidFormat {
                message: format!("account '{}': {}", record.name, message),
            })?;
        let report_type = record
            .report_type
            .parse::<ReportType>()
            .map_err(|message| CoreError::InvalidFormat {
                message: format!("account '{}': {}", record.name, message),
            })?;
        if record.lft >= record.rgt {
            return Err(CoreError::InvalidFormat {
                message: format!(
                    "account '{}': lft {} must be less than rgt {}",
                    record.name, record.lft, record.rgt
                ),
            });
        }

        let account_name = record
            .account_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| record.name.clone());

        Ok(Account {
            name: record.name,
            account_number: record.account_number.filter(|n| !n.trim().is_empty()),
            account_name,
            parent_account: record.parent_account.filter(|p| !p.trim().is_empty()),
            root_type,
            report_type,
            lft: record.lft,
            rgt: record.rgt,
        })
    }
}

/// Cost center with nested-set bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    pub name: String,
    pub parent_cost_center: Option<String>,
    pub lft: u32,
    pub rgt: u32,
}

impl From<CostCenterRecord> for CostCenter {
    fn from(record: CostCenterRecord) -> Self {
        CostCenter {
            name: record.name,
            parent_cost_center: record.parent_cost_center,
            lft: record.lft,
            rgt: record.rgt,
        }
    }
}

/// General ledger posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Account the posting belongs to
    pub account: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub posting_date: NaiveDate,
    /// Opening entries always count towards the opening balance
    pub is_opening: bool,
    pub cost_center: Option<String>,
    pub finance_book: Option<String>,
    pub voucher_type: Option<String>,
}

impl Posting {
    /// Check if this posting belongs to a period closing voucher
    pub fn is_period_closing(&self) -> bool {
        self.voucher_type.as_deref() == Some(PERIOD_CLOSING_VOUCHER)
    }
}

impl From<PostingRecord> for Posting {
    fn from(record: PostingRecord) -> Self {
        Posting {
            account: record.account,
            debit: record.debit,
            credit: record.credit,
            posting_date: record.posting_date,
            is_opening: record.is_opening,
            cost_center: record.cost_center,
            finance_book: record.finance_book,
            voucher_type: record.voucher_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalYear {
    pub name: String,
    pub year_start_date: NaiveDate,
    pub year_end_date: NaiveDate,
}

impl TryFrom<FiscalYearRecord> for FiscalYear {
    type Error = CoreError;

    fn try_from(record: FiscalYearRecord) -> CoreResult<Self> {
        if record.year_start_date > record.year_end_date {
            return Err(CoreError::InvalidFormat {
                message: format!(
                    "fiscal year '{}' starts after it ends",
                    record.name
                ),
            });
        }
        Ok(FiscalYear {
            name: record.name,
            year_start_date: record.year_start_date,
            year_end_date: record.year_end_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub default_currency: Option<String>,
    pub default_finance_book: Option<String>,
}

impl From<CompanyRecord> for Company {
    fn from(record: CompanyRecord) -> Self {
        Company {
            name: record.name,
            default_currency: record.default_currency,
            default_finance_book: record.default_finance_book,
        }
    }
}

/// Everything a trial balance runs over, for one company
#[derive(Debug, Clone, Default)]
pub struct LedgerData {
    pub company: Option<Company>,
    pub fiscal_years: Vec<FiscalYear>,
    /// Chart of accounts in nested-set (`lft`) order
    pub accounts: Vec<Account>,
    pub cost_centers: Vec<CostCenter>,
    pub postings: Vec<Posting>,
}

impl LedgerData {
    /// Convert raw snapshot records into typed models
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> CoreResult<Self> {
        let mut accounts = snapshot
            .accounts
            .into_iter()
            .map(Account::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        let mut seen = HashSet::new();
        for account in &accounts {
            if !seen.insert(account.name.as_str()) {
                return Err(CoreError::InvalidFormat {
                    message: format!("account '{}' is defined more than once", account.name),
                });
            }
        }
        accounts.sort_by_key(|a| a.lft);

        let fiscal_years = snapshot
            .fiscal_years
            .into_iter()
            .map(FiscalYear::try_from)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(LedgerData {
            company: snapshot.company.map(Company::from),
            fiscal_years,
            accounts,
            cost_centers: snapshot.cost_centers.into_iter().map(CostCenter::from).collect(),
            postings: snapshot.postings.into_iter().map(Posting::from).collect(),
        })
    }
}
