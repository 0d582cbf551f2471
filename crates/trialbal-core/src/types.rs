//! Basic classification types for accounts

use serde::{Deserialize, Serialize};

/// Top-level classification of an account, deciding its natural balance side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootType {
    /// Cash, receivables, fixed assets
    Asset,
    /// Payables, loans
    Liability,
    /// Capital, retained earnings
    Equity,
    /// Sales, other income
    Income,
    /// Cost of goods, operating expenses
    Expense,
}

impl RootType {
    /// Debit for Asset, Equity and Expense; credit for Liability and Income.
    pub fn natural_side(&self) -> BalanceSide {
        match self {
            RootType::Asset | RootType::Equity | RootType::Expense => BalanceSide::Debit,
            RootType::Liability | RootType::Income => BalanceSide::Credit,
        }
    }

    /// Position in the canonical statement order: Asset, Liability, Equity, Income, Expense
    pub fn presentation_rank(&self) -> u8 {
        match self {
            RootType::Asset => 0,
            RootType::Liability => 1,
            RootType::Equity => 2,
            RootType::Income => 3,
            RootType::Expense => 4,
        }
    }
}

impl std::str::FromStr for RootType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Ok(RootType::Asset),
            "liability" | "liabilities" => Ok(RootType::Liability),
            "equity" => Ok(RootType::Equity),
            "income" => Ok(RootType::Income),
            "expense" | "expenses" => Ok(RootType::Expense),
            _ => Err(format!("Invalid root type: {}", s)),
        }
    }
}

impl std::fmt::Display for RootType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootType::Asset => write!(f, "Asset"),
            RootType::Liability => write!(f, "Liability"),
            RootType::Equity => write!(f, "Equity"),
            RootType::Income => write!(f, "Income"),
            RootType::Expense => write!(f, "Expense"),
        }
    }
}

/// Financial statement an account reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    #[serde(rename = "Profit and Loss")]
    ProfitAndLoss,
}

impl std::str::FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balance sheet" | "balance_sheet" => Ok(ReportType::BalanceSheet),
            "profit and loss" | "profit_and_loss" => Ok(ReportType::ProfitAndLoss),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::BalanceSheet => write!(f, "Balance Sheet"),
            ReportType::ProfitAndLoss => write!(f, "Profit and Loss"),
        }
    }
}

/// Side of the ledger a balance is carried on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    Debit,
    Credit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_type_from_str() {
        assert_eq!("Asset".parse::<RootType>().unwrap(), RootType::Asset);
        assert_eq!("liabilities".parse::<RootType>().unwrap(), RootType::Liability);
        assert_eq!("EQUITY".parse::<RootType>().unwrap(), RootType::Equity);
        assert_eq!("Income".parse::<RootType>().unwrap(), RootType::Income);
        assert_eq!("expenses".parse::<RootType>().unwrap(), RootType::Expense);
        assert!("Revenue".parse::<RootType>().is_err());
    }

    #[test]
    fn test_natural_side() {
        assert_eq!(RootType::Asset.natural_side(), BalanceSide::Debit);
        assert_eq!(RootType::Equity.natural_side(), BalanceSide::Debit);
        assert_eq!(RootType::Expense.natural_side(), BalanceSide::Debit);
        assert_eq!(RootType::Liability.natural_side(), BalanceSide::Credit);
        assert_eq!(RootType::Income.natural_side(), BalanceSide::Credit);
    }

    #[test]
    fn test_report_type_round_trip_display() {
        let rt: ReportType = "Profit and Loss".parse().unwrap();
        assert_eq!(rt, ReportType::ProfitAndLoss);
        assert_eq!(ReportType::BalanceSheet.to_string(), "Balance Sheet");
    }
}
