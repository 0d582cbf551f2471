//! Account tree construction
//!
//! Turns the flat chart of accounts into an arena of nodes laid out in
//! pre-order: every parent sits before all of its descendants, so walking the
//! arena backwards always visits children before their parents.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::error::{CoreError, CoreResult};
use super::models::Account;
use super::types::ReportType;

/// Default traversal depth limit
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Account placed in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct AccountNode {
    pub account: Account,
    /// Depth below the top level (0 for top-level accounts)
    pub indent: usize,
    /// Arena position of the parent node
    pub parent: Option<usize>,
    /// Arena positions of the direct children, in display order
    pub children: Vec<usize>,
}

/// Pre-ordered account hierarchy
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    nodes: Vec<AccountNode>,
    index: HashMap<String, usize>,
    truncated: usize,
    skipped: usize,
}

impl AccountTree {
    /// Build the tree over every account.
    ///
    /// Accounts whose parent is absent from `accounts` are top-level. Nodes at
    /// `max_depth` or deeper are left out, as are accounts that no top-level
    /// account reaches (parent cycles).
    pub fn build(accounts: Vec<Account>, max_depth: usize) -> Self {
        let order = traversal_order(&accounts, max_depth);

        let mut slots: Vec<Option<Account>> = accounts.into_iter().map(Some).collect();
        let total = slots.len();
        let mut nodes: Vec<AccountNode> = Vec::with_capacity(order.visits.len());
        for visit in &order.visits {
            if let Some(account) = slots[visit.input].take() {
                nodes.push(AccountNode {
                    account,
                    indent: visit.indent,
                    parent: visit.parent,
                    children: Vec::new(),
                });
            }
        }
        for pos in 0..nodes.len() {
            if let Some(parent) = nodes[pos].parent {
                nodes[parent].children.push(pos);
            }
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.account.name.clone(), pos))
            .collect();

        let tree = AccountTree {
            skipped: total - nodes.len(),
            nodes,
            index,
            truncated: order.truncated,
        };
        tree.check_bounds();

        if tree.truncated > 0 {
            log::warn!(
                "Account tree deeper than {} levels; {} subtree(s) left out",
                max_depth,
                tree.truncated
            );
        }
        if tree.skipped > tree.truncated {
            log::warn!(
                "{} account(s) left out of the tree (depth limit or unreachable parent chain)",
                tree.skipped
            );
        }
        log::debug!("Built account tree with {} nodes", tree.nodes.len());

        tree
    }

    /// Build the tree over `root` and the accounts nested inside its bounds
    pub fn scoped(accounts: &[Account], root: &str, max_depth: usize) -> CoreResult<Self> {
        let root_account = accounts
            .iter()
            .find(|a| a.name == root)
            .ok_or_else(|| CoreError::AccountNotFound {
                name: root.to_string(),
            })?;

        let subtree = accounts
            .iter()
            .filter(|a| root_account.contains(a))
            .cloned()
            .collect();

        Ok(Self::build(subtree, max_depth))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order
    pub fn nodes(&self) -> &[AccountNode] {
        &self.nodes
    }

    pub fn node(&self, pos: usize) -> &AccountNode {
        &self.nodes[pos]
    }

    /// Arena position of an account
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Look up a node by account identity
    pub fn get(&self, name: &str) -> Option<&AccountNode> {
        self.position(name).map(|pos| &self.nodes[pos])
    }

    /// Direct children of an account, in display order
    pub fn children_of(&self, name: &str) -> Vec<&Account> {
        self.get(name)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&c| &self.nodes[c].account)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Positions of the top-level nodes
    pub fn top_level(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(pos, _)| pos)
    }

    /// Number of subtrees cut at the depth limit
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Number of input accounts not placed in the tree
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn check_bounds(&self) {
        for node in &self.nodes {
            if let Some(parent) = node.parent {
                let parent = &self.nodes[parent].account;
                if !parent.strictly_contains(&node.account) {
                    log::warn!(
                        "Account '{}' ({}-{}) is not nested inside parent '{}' ({}-{})",
                        node.account.name,
                        node.account.lft,
                        node.account.rgt,
                        parent.name,
                        parent.lft,
                        parent.rgt
                    );
                }
            }
        }
    }
}

struct Visit {
    input: usize,
    indent: usize,
    parent: Option<usize>,
}

struct TraversalOrder {
    visits: Vec<Visit>,
    truncated: usize,
}

/// Depth-first pre-order over the input accounts using an explicit stack
fn traversal_order(accounts: &[Account], max_depth: usize) -> TraversalOrder {
    let names: HashSet<&str> = accounts.iter().map(|a| a.name.as_str()).collect();

    let mut children_of: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
    for (i, account) in accounts.iter().enumerate() {
        let parent = account
            .parent_account
            .as_deref()
            .filter(|p| *p != account.name && names.contains(p));
        children_of.entry(parent).or_default().push(i);
    }
    for (parent, children) in children_of.iter_mut() {
        if parent.is_none() {
            sort_top_level(children, accounts);
        } else {
            sort_siblings(children, accounts);
        }
    }

    let mut visits = Vec::with_capacity(accounts.len());
    let mut visited = vec![false; accounts.len()];
    let mut truncated = 0;
    let mut stack: Vec<Visit> = children_of
        .get(&None)
        .map(|top| {
            top.iter()
                .rev()
                .map(|&i| Visit { input: i, indent: 0, parent: None })
                .collect()
        })
        .unwrap_or_default();

    while let Some(visit) = stack.pop() {
        if visited[visit.input] {
            continue;
        }
        if visit.indent >= max_depth {
            truncated += 1;
            continue;
        }
        visited[visit.input] = true;

        let pos = visits.len();
        let name = accounts[visit.input].name.as_str();
        let indent = visit.indent;
        visits.push(visit);

        if let Some(children) = children_of.get(&Some(name)) {
            for &child in children.iter().rev() {
                stack.push(Visit {
                    input: child,
                    indent: indent + 1,
                    parent: Some(pos),
                });
            }
        }
    }

    TraversalOrder { visits, truncated }
}

/// Balance sheet before profit and loss, then Asset, Liability, Equity, Income, Expense.
/// Stable, so equal keys keep their input order.
fn sort_top_level(children: &mut [usize], accounts: &[Account]) {
    children.sort_by_key(|&i| {
        let account = &accounts[i];
        (
            account.report_type != ReportType::BalanceSheet,
            account.root_type.presentation_rank(),
        )
    });
}

/// Numbered siblings sort by code; otherwise input order is kept
fn sort_siblings(children: &mut [usize], accounts: &[Account]) {
    if !children.iter().all(|&i| accounts[i].numeric_code().is_some()) {
        return;
    }
    children.sort_by(|&a, &b| {
        let (a, b) = (&accounts[a], &accounts[b]);
        compare_codes(a.numeric_code(), b.numeric_code()).then_with(|| a.name.cmp(&b.name))
    });
}

/// Compare all-digit codes by numeric value without parsing into a bounded integer
fn compare_codes(a: Option<&str>, b: Option<&str>) -> Ordering {
    let key = |code: Option<&str>| {
        let digits = code.unwrap_or("").trim_start_matches('0');
        (digits.len(), digits.to_string())
    };
    key(a).cmp(&key(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RootType;

    fn account(
        name: &str,
        parent: Option<&str>,
        root_type: RootType,
        report_type: ReportType,
        lft: u32,
        rgt: u32,
    ) -> Account {
        Account {
            name: name.to_string(),
            account_number: None,
            account_name: name.to_string(),
            parent_account: parent.map(str::to_string),
            root_type,
            report_type,
            lft,
            rgt,
        }
    }

    fn asset(name: &str, parent: Option<&str>, lft: u32, rgt: u32) -> Account {
        account(name, parent, RootType::Asset, ReportType::BalanceSheet, lft, rgt)
    }

    fn names(tree: &AccountTree) -> Vec<&str> {
        tree.nodes().iter().map(|n| n.account.name.as_str()).collect()
    }

    #[test]
    fn test_root_level_canonical_order() {
        let accounts = vec![
            account("Income", None, RootType::Income, ReportType::ProfitAndLoss, 1, 2),
            account("Expense", None, RootType::Expense, ReportType::ProfitAndLoss, 3, 4),
            account("Asset", None, RootType::Asset, ReportType::BalanceSheet, 5, 6),
            account("Liability", None, RootType::Liability, ReportType::BalanceSheet, 7, 8),
            account("Equity", None, RootType::Equity, ReportType::BalanceSheet, 9, 10),
        ];
        let tree = AccountTree::build(accounts, DEFAULT_MAX_DEPTH);
        assert_eq!(names(&tree), vec!["Asset", "Liability", "Equity", "Income", "Expense"]);
    }

    #[test]
    fn test_numbered_siblings_sorted_by_code() {
        let accounts = vec![
            asset("Assets", None, 1, 8),
            asset("2000 - Bank", Some("Assets"), 2, 3),
            asset("1000 - Cash", Some("Assets"), 4, 5),
            asset("10000 - Deposits", Some("Assets"), 6, 7),
        ];
        let tree = AccountTree::build(accounts, DEFAULT_MAX_DEPTH);
        assert_eq!(
            names(&tree),
            vec!["Assets", "1000 - Cash", "2000 - Bank", "10000 - Deposits"]
        );
    }

    #[test]
    fn test_unnumbered_siblings_keep_input_order() {
        let accounts = vec![
            asset("Assets", None, 1, 8),
            asset("Receivables", Some("Assets"), 2, 3),
            asset("1000 - Cash", Some("Assets"), 4, 5),
            asset("Bank", Some("Assets"), 6, 7),
        ];
        let tree = AccountTree::build(accounts, DEFAULT_MAX_DEPTH);
        assert_eq!(names(&tree), vec!["Assets", "Receivables", "1000 - Cash", "Bank"]);
    }

    #[test]
    fn test_account_number_used_as_code() {
        let mut bank = asset("Bank - AC", Some("Assets"), 2, 3);
        bank.account_number = Some("1200".to_string());
        let mut cash = asset("Cash - AC", Some("Assets"), 4, 5);
        cash.account_number = Some("1100".to_string());
        let tree = AccountTree::build(vec![asset("Assets", None, 1, 6), bank, cash], 10);
        assert_eq!(names(&tree), vec!["Assets", "Cash - AC", "Bank - AC"]);
    }

    #[test]
    fn test_pre_order_with_indent_and_links() {
        let accounts = vec![
            asset("Assets", None, 1, 10),
            asset("Current", Some("Assets"), 2, 7),
            asset("Cash", Some("Current"), 3, 4),
            asset("Bank", Some("Current"), 5, 6),
            asset("Fixed", Some("Assets"), 8, 9),
        ];
        let tree = AccountTree::build(accounts, DEFAULT_MAX_DEPTH);

        assert_eq!(names(&tree), vec!["Assets", "Current", "Cash", "Bank", "Fixed"]);
        let indents: Vec<usize> = tree.nodes().iter().map(|n| n.indent).collect();
        assert_eq!(indents, vec![0, 1, 2, 2, 1]);

        for (pos, node) in tree.nodes().iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!(parent < pos);
                assert!(tree.node(parent).children.contains(&pos));
            }
        }
        let children: Vec<&str> = tree
            .children_of("Current")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(children, vec!["Cash", "Bank"]);
        assert_eq!(tree.top_level().collect::<Vec<_>>(), vec![0]);
        assert_eq!(tree.get("Bank").unwrap().indent, 2);
    }

    #[test]
    fn test_depth_limit_truncates() {
        let accounts = vec![
            asset("L0", None, 1, 8),
            asset("L1", Some("L0"), 2, 7),
            asset("L2", Some("L1"), 3, 6),
            asset("L3", Some("L2"), 4, 5),
        ];
        let tree = AccountTree::build(accounts, 2);
        assert_eq!(names(&tree), vec!["L0", "L1"]);
        assert_eq!(tree.truncated(), 1);
        assert_eq!(tree.skipped(), 2);
    }

    #[test]
    fn test_cycle_is_left_out() {
        let accounts = vec![
            asset("Assets", None, 1, 2),
            asset("A", Some("B"), 3, 4),
            asset("B", Some("A"), 5, 6),
        ];
        let tree = AccountTree::build(accounts, DEFAULT_MAX_DEPTH);
        assert_eq!(names(&tree), vec!["Assets"]);
        assert_eq!(tree.skipped(), 2);
    }

    #[test]
    fn test_scoped_subtree() {
        let accounts = vec![
            asset("Assets", None, 1, 10),
            asset("Current", Some("Assets"), 2, 7),
            asset("Cash", Some("Current"), 3, 4),
            asset("Bank", Some("Current"), 5, 6),
            asset("Fixed", Some("Assets"), 8, 9),
        ];
        let tree = AccountTree::scoped(&accounts, "Current", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(names(&tree), vec!["Current", "Cash", "Bank"]);
        assert_eq!(tree.node(0).indent, 0);
        assert_eq!(tree.node(0).parent, None);
        assert_eq!(tree.node(0).account.parent_account.as_deref(), Some("Assets"));
    }

    #[test]
    fn test_scoped_unknown_account() {
        let err = AccountTree::scoped(&[], "Nowhere", DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(err, CoreError::AccountNotFound { .. }));
    }

    #[test]
    fn test_empty_chart() {
        let tree = AccountTree::build(vec![], DEFAULT_MAX_DEPTH);
        assert!(tree.is_empty());
        assert_eq!(tree.top_level().count(), 0);
    }
}
