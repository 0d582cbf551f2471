//! Raw snapshot records, as they appear in the YAML files

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One snapshot file. Included files are partial snapshots merged into the parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub company: Option<CompanyRecord>,
    #[serde(default)]
    pub fiscal_years: Vec<FiscalYearRecord>,
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub cost_centers: Vec<CostCenterRecord>,
    #[serde(default)]
    pub postings: Vec<PostingRecord>,
    /// Relative paths or glob patterns of further snapshot files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

impl LedgerSnapshot {
    /// Append another snapshot's records. A company in `other` replaces ours only if we have none.
    pub fn merge(&mut self, other: LedgerSnapshot) {
        if self.company.is_none() {
            self.company = other.company;
        }
        self.fiscal_years.extend(other.fiscal_years);
        self.accounts.extend(other.accounts);
        self.cost_centers.extend(other.cost_centers);
        self.postings.extend(other.postings);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default)]
    pub default_finance_book: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYearRecord {
    pub name: String,
    pub year_start_date: NaiveDate,
    pub year_end_date: NaiveDate,
}

/// Chart of accounts entry. `lft`/`rgt` are the nested-set bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub parent_account: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    pub root_type: String,
    pub report_type: String,
    pub lft: u32,
    pub rgt: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenterRecord {
    pub name: String,
    #[serde(default)]
    pub parent_cost_center: Option<String>,
    pub lft: u32,
    pub rgt: u32,
}

/// General ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingRecord {
    pub account: String,
    #[serde(default)]
    pub debit: Decimal,
    #[serde(default)]
    pub credit: Decimal,
    pub posting_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_yes_no")]
    pub is_opening: bool,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub finance_book: Option<String>,
    #[serde(default)]
    pub voucher_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YesNo {
    Bool(bool),
    Text(String),
}

/// Accepts `true`/`false` as well as the "Yes"/"No" strings ledger exports use.
fn deserialize_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match YesNo::deserialize(deserializer)? {
        YesNo::Bool(b) => Ok(b),
        YesNo::Text(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "Invalid opening flag: {}",
                other
            ))),
        },
    }
}
