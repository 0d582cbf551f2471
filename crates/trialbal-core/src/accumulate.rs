//! Roll child balances up into their ancestors

use super::balance::BalanceRecord;
use super::tree::AccountTree;

/// Add every node's balance into its parent, deepest first.
///
/// The arena is pre-ordered, so a reverse walk finishes each subtree before
/// its parent is read. After this call every record holds its own amounts plus
/// those of all its descendants.
pub fn accumulate_values_into_parents(tree: &AccountTree, balances: &mut [BalanceRecord]) {
    for pos in (0..tree.len().min(balances.len())).rev() {
        if let Some(parent) = tree.node(pos).parent {
            let child = balances[pos];
            balances[parent] += child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use crate::tree::DEFAULT_MAX_DEPTH;
    use crate::types::{ReportType, RootType};
    use rust_decimal::Decimal;

    fn asset(name: &str, parent: Option<&str>, lft: u32, rgt: u32) -> Account {
        Account {
            name: name.to_string(),
            account_number: None,
            account_name: name.to_string(),
            parent_account: parent.map(str::to_string),
            root_type: RootType::Asset,
            report_type: ReportType::BalanceSheet,
            lft,
            rgt,
        }
    }

    fn movement(debit: i64, credit: i64) -> BalanceRecord {
        let mut record = BalanceRecord {
            debit: Decimal::from(debit),
            credit: Decimal::from(credit),
            ..BalanceRecord::default()
        };
        record.close();
        record
    }

    #[test]
    fn test_three_levels() {
        let tree = AccountTree::build(
            vec![
                asset("Assets", None, 1, 10),
                asset("Current", Some("Assets"), 2, 7),
                asset("Cash", Some("Current"), 3, 4),
                asset("Bank", Some("Current"), 5, 6),
                asset("Fixed", Some("Assets"), 8, 9),
            ],
            DEFAULT_MAX_DEPTH,
        );

        let mut balances = vec![BalanceRecord::default(); tree.len()];
        balances[tree.position("Cash").unwrap()] = movement(100, 0);
        balances[tree.position("Bank").unwrap()] = movement(0, 30);
        balances[tree.position("Fixed").unwrap()] = movement(7, 0);
        balances[tree.position("Current").unwrap()] = movement(1, 0);

        accumulate_values_into_parents(&tree, &mut balances);

        let current = balances[tree.position("Current").unwrap()];
        assert_eq!(current.debit, Decimal::from(101));
        assert_eq!(current.credit, Decimal::from(30));

        let assets = balances[tree.position("Assets").unwrap()];
        assert_eq!(assets.debit, Decimal::from(108));
        assert_eq!(assets.credit, Decimal::from(30));
        assert_eq!(assets.closing_debit, Decimal::from(108));

        // leaves untouched
        let cash = balances[tree.position("Cash").unwrap()];
        assert_eq!(cash.debit, Decimal::from(100));
    }

    #[test]
    fn test_separate_roots_do_not_mix() {
        let tree = AccountTree::build(
            vec![asset("A", None, 1, 2), asset("B", None, 3, 4)],
            DEFAULT_MAX_DEPTH,
        );
        let mut balances = vec![movement(5, 0), movement(0, 9)];
        accumulate_values_into_parents(&tree, &mut balances);
        assert_eq!(balances[0].debit, Decimal::from(5));
        assert_eq!(balances[1].credit, Decimal::from(9));
    }
}
