//! Zero-value row suppression

use super::reports::ReportRow;
use super::tree::AccountTree;

/// Drop account rows that carry no significant value anywhere in their subtree.
///
/// A parent stays when any descendant has a value, so kept rows always keep
/// their ancestors. Separator and total rows are never dropped.
pub fn filter_out_zero_value_rows(
    rows: Vec<ReportRow>,
    tree: &AccountTree,
    show_zero_values: bool,
) -> Vec<ReportRow> {
    if show_zero_values {
        return rows;
    }

    let mut keep = vec![false; tree.len()];
    for row in rows.iter().filter_map(ReportRow::as_account) {
        if let Some(pos) = tree.position(&row.account) {
            keep[pos] = row.has_value;
        }
    }
    for pos in (0..tree.len()).rev() {
        if keep[pos] {
            if let Some(parent) = tree.node(pos).parent {
                keep[parent] = true;
            }
        }
    }

    let before = rows.len();
    let kept: Vec<ReportRow> = rows
        .into_iter()
        .filter(|row| match row {
            ReportRow::Account(account) => tree
                .position(&account.account)
                .map(|pos| keep[pos])
                .unwrap_or(false),
            _ => true,
        })
        .collect();
    log::debug!("Suppressed {} zero-value row(s)", before - kept.len());
    kept
}
