//! Per-account balances and sign normalization

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::AddAssign;

use super::models::Posting;
use super::opening::OpeningBalances;
use super::tree::AccountTree;
use super::types::{BalanceSide, RootType};

/// The six balance fields of one account (or the grand total)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
}

impl BalanceRecord {
    /// Record carrying only an opening balance
    pub fn with_opening(opening_debit: Decimal, opening_credit: Decimal) -> Self {
        Self {
            opening_debit,
            opening_credit,
            ..Self::default()
        }
    }

    /// Add a period posting's movement
    pub fn post(&mut self, posting: &Posting) {
        self.debit += posting.debit;
        self.credit += posting.credit;
    }

    /// Closing = opening + period movement, per side
    pub fn close(&mut self) {
        self.closing_debit = self.opening_debit + self.debit;
        self.closing_credit = self.opening_credit + self.credit;
    }

    /// Signed view for display: opening and closing collapse onto the natural
    /// side of `root_type`. Movement stays gross.
    pub fn normalized(&self, root_type: RootType) -> Self {
        let side = root_type.natural_side();
        let (opening_debit, opening_credit) =
            normalize_pair(side, self.opening_debit, self.opening_credit);
        let (closing_debit, closing_credit) =
            normalize_pair(side, self.closing_debit, self.closing_credit);
        Self {
            opening_debit,
            opening_credit,
            debit: self.debit,
            credit: self.credit,
            closing_debit,
            closing_credit,
        }
    }

    /// Values in display column order
    pub fn values(&self) -> [Decimal; 6] {
        [
            self.opening_debit,
            self.opening_credit,
            self.debit,
            self.credit,
            self.closing_debit,
            self.closing_credit,
        ]
    }

    /// Apply `f` to every field
    pub fn map(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            opening_debit: f(self.opening_debit),
            opening_credit: f(self.opening_credit),
            debit: f(self.debit),
            credit: f(self.credit),
            closing_debit: f(self.closing_debit),
            closing_credit: f(self.closing_credit),
        }
    }
}

impl AddAssign for BalanceRecord {
    fn add_assign(&mut self, other: Self) {
        self.opening_debit += other.opening_debit;
        self.opening_credit += other.opening_credit;
        self.debit += other.debit;
        self.credit += other.credit;
        self.closing_debit += other.closing_debit;
        self.closing_credit += other.closing_credit;
    }
}

/// Net a debit/credit pair onto one side; the other side becomes zero.
pub fn normalize_pair(side: BalanceSide, debit: Decimal, credit: Decimal) -> (Decimal, Decimal) {
    match side {
        BalanceSide::Debit => (debit - credit, Decimal::ZERO),
        BalanceSide::Credit => (Decimal::ZERO, credit - debit),
    }
}

/// Period postings grouped by account
pub type PostingsByAccount<'a> = HashMap<&'a str, Vec<&'a Posting>>;

/// Own (pre-accumulation) balances per tree node, plus the grand total.
///
/// Records are indexed by arena position and stay raw: gross debit and credit
/// per side. The total's movement is summed gross; its opening and closing
/// are summed from each account's normalized pair.
pub fn calculate_values(
    tree: &AccountTree,
    postings: &PostingsByAccount<'_>,
    opening: &OpeningBalances,
) -> (Vec<BalanceRecord>, BalanceRecord) {
    let mut total = BalanceRecord::default();
    let mut balances = Vec::with_capacity(tree.len());

    for node in tree.nodes() {
        let name = node.account.name.as_str();
        let mut record = opening
            .get(name)
            .map(|o| BalanceRecord::with_opening(o.opening_debit, o.opening_credit))
            .unwrap_or_default();

        for posting in postings.get(name).into_iter().flatten() {
            if !posting.is_opening {
                record.post(posting);
            }
        }
        record.close();

        total.debit += record.debit;
        total.credit += record.credit;
        let signed = record.normalized(node.account.root_type);
        total.opening_debit += signed.opening_debit;
        total.opening_credit += signed.opening_credit;
        total.closing_debit += signed.closing_debit;
        total.closing_credit += signed.closing_credit;

        balances.push(record);
    }

    (balances, total)
}
