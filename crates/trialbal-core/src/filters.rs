//! Report filters, period resolution and posting scope

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trialbal_config::ReportConfig;

use super::error::{CoreError, CoreResult};
use super::models::{Company, CostCenter, FiscalYear, Posting};

/// Filter options recognized by the trial balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Company the report is for; checked against the loaded snapshot
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub fiscal_year: Option<String>,
    /// Defaults to the fiscal year start
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    /// Defaults to the fiscal year end
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    /// Limit the report to this account's subtree
    #[serde(default)]
    pub account: Option<String>,
    /// Limit postings to this cost center and its children
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub finance_book: Option<String>,
    #[serde(default)]
    pub include_default_book_entries: bool,
    #[serde(default)]
    pub show_unclosed_fy_pl_balances: bool,
    #[serde(default)]
    pub with_period_closing_entry: bool,
    #[serde(default)]
    pub show_zero_values: bool,
}

impl ReportFilters {
    /// Filters with the boolean options taken from configuration
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            include_default_book_entries: config.include_default_book_entries,
            show_unclosed_fy_pl_balances: config.show_unclosed_fy_pl_balances,
            with_period_closing_entry: config.with_period_closing_entry,
            show_zero_values: config.show_zero_values,
            ..Self::default()
        }
    }

    /// Validate the dates against the fiscal year and settle the report period.
    ///
    /// Missing dates default to the fiscal year bounds. A from date after the to
    /// date is rejected. Dates outside the fiscal year are moved to the year's
    /// bounds with a warning.
    pub fn resolve_period(&self, fiscal_years: &[FiscalYear]) -> CoreResult<ReportPeriod> {
        let name = self
            .fiscal_year
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(CoreError::FiscalYearRequired)?;

        let fiscal_year = fiscal_years
            .iter()
            .find(|fy| fy.name == name)
            .ok_or_else(|| CoreError::FiscalYearNotFound {
                name: name.to_string(),
            })?;

        let year_start = fiscal_year.year_start_date;
        let year_end = fiscal_year.year_end_date;
        let mut from_date = self.from_date.unwrap_or(year_start);
        let mut to_date = self.to_date.unwrap_or(year_end);

        if from_date > to_date {
            return Err(CoreError::InvalidDateRange {
                from: from_date,
                to: to_date,
            });
        }

        let mut warnings = Vec::new();
        if from_date < year_start || from_date > year_end {
            let message = format!(
                "From Date should be within the Fiscal Year. Assuming From Date = {}",
                year_start
            );
            warnings.push(message);
            from_date = year_start;
        }
        if to_date < year_start || to_date > year_end {
            let message = format!(
                "To Date should be within the Fiscal Year. Assuming To Date = {}",
                year_end
            );
            warnings.push(message);
            to_date = year_end;
        }

        Ok(ReportPeriod {
            fiscal_year: fiscal_year.name.clone(),
            year_start_date: year_start,
            year_end_date: year_end,
            from_date,
            to_date,
            warnings,
        })
    }
}

/// Validated reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub fiscal_year: String,
    pub year_start_date: NaiveDate,
    pub year_end_date: NaiveDate,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Non-fatal adjustments made while resolving the period
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ReportPeriod {
    /// Check if a date is within [from_date, to_date]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.from_date && *date <= self.to_date
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FinanceBookScope {
    /// Only entries tagged with this book
    Only(String),
    /// Entries tagged with this book, the company default book, or untagged
    WithDefault {
        book: String,
        default_book: Option<String>,
    },
}

impl FinanceBookScope {
    fn admits(&self, finance_book: Option<&str>) -> bool {
        match self {
            FinanceBookScope::Only(book) => finance_book == Some(book.as_str()),
            FinanceBookScope::WithDefault { book, default_book } => match finance_book {
                None => true,
                Some(fb) => fb == book || default_book.as_deref() == Some(fb),
            },
        }
    }
}

/// Posting-level conditions shared by the opening and period scans
#[derive(Debug, Clone, PartialEq)]
pub struct PostingScope {
    cost_centers: Option<HashSet<String>>,
    finance_book: Option<FinanceBookScope>,
    include_closing_entries: bool,
}

impl PostingScope {
    /// Build the scope from filters; the named cost center must exist
    pub fn new(
        filters: &ReportFilters,
        company: Option<&Company>,
        cost_centers: &[CostCenter],
    ) -> CoreResult<Self> {
        let cost_centers = match filters.cost_center.as_deref() {
            Some(name) => Some(cost_center_subtree(name, cost_centers)?),
            None => None,
        };

        let finance_book = filters.finance_book.clone().map(|book| {
            if filters.include_default_book_entries {
                FinanceBookScope::WithDefault {
                    book,
                    default_book: company.and_then(|c| c.default_finance_book.clone()),
                }
            } else {
                FinanceBookScope::Only(book)
            }
        });

        Ok(PostingScope {
            cost_centers,
            finance_book,
            include_closing_entries: filters.with_period_closing_entry,
        })
    }

    /// Scope that admits every posting
    pub fn unrestricted() -> Self {
        PostingScope {
            cost_centers: None,
            finance_book: None,
            include_closing_entries: true,
        }
    }

    /// Check the cost center, finance book and closing-voucher conditions
    pub fn admits(&self, posting: &Posting) -> bool {
        if !self.include_closing_entries && posting.is_period_closing() {
            return false;
        }
        if let Some(ref allowed) = self.cost_centers {
            match posting.cost_center.as_deref() {
                Some(cc) if allowed.contains(cc) => {}
                _ => return false,
            }
        }
        if let Some(ref scope) = self.finance_book {
            if !scope.admits(posting.finance_book.as_deref()) {
                return false;
            }
        }
        true
    }
}

/// The named cost center and every cost center nested inside its bounds
fn cost_center_subtree(name: &str, cost_centers: &[CostCenter]) -> CoreResult<HashSet<String>> {
    let root = cost_centers
        .iter()
        .find(|cc| cc.name == name)
        .ok_or_else(|| CoreError::CostCenterNotFound {
            name: name.to_string(),
        })?;

    Ok(cost_centers
        .iter()
        .filter(|cc| cc.lft >= root.lft && cc.rgt <= root.rgt)
        .map(|cc| cc.name.clone())
        .collect())
}
