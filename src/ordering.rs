//! Column ordering by the values of one or more sort rows.
//!
//! Both modes order columns by ascending rank, so the most frequent (or highest
//! priority) value comes first. Columns whose value is unranked, including
//! positions past the end of a short row, always come after the ranked ones, so
//! the result is a permutation of every column index.

use std::collections::BTreeMap;

use crate::matrix::MatrixStore;
use crate::ranking::{ValueOrder, ValueRanker};
use crate::types::Cell;

/// Column indices in natural order: `[0, 1, ..., n - 1]`
pub fn default_order(column_count: usize) -> Vec<usize> {
    (0..column_count).collect()
}

/// Stable key sort of all columns by the rank of their value in `row`.
pub fn order_by_single_row(row: &[Cell], order: &ValueOrder, column_count: usize) -> Vec<usize> {
    let mut columns = default_order(column_count);
    columns.sort_by_key(|&col| Slot::of(order.rank_of_opt(row.get(col))));
    columns
}

/// Hierarchical ordering: the first row gives the outermost groups, each later
/// row splits the groups of the previous one.
///
/// Columns that agree on every sort row end up contiguous, and groups at each
/// level follow that row's value order. With a single row the result equals
/// [`order_by_single_row`].
pub fn order_by_rows(rows: &[&[Cell]], orders: &[ValueOrder], column_count: usize) -> Vec<usize> {
    let mut root = GroupNode::default();
    for col in 0..column_count {
        let mut node = &mut root;
        for (row, order) in rows.iter().zip(orders) {
            let slot = Slot::of(order.rank_of_opt(row.get(col)));
            node = node.branches.entry(slot).or_default();
        }
        node.columns.push(col);
    }

    let mut flattened = Vec::with_capacity(column_count);
    root.flatten_into(&mut flattened);
    flattened
}

/// Group index of every column: the rank of its value in the primary row
pub fn group_membership(row: &[Cell], order: &ValueOrder, column_count: usize) -> Vec<Option<usize>> {
    (0..column_count)
        .map(|col| order.rank_of_opt(row.get(col)))
        .collect()
}

/// Branch key within one level of the grouping tree; unranked sorts last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Ranked(usize),
    Unranked,
}

impl Slot {
    fn of(rank: Option<usize>) -> Self {
        rank.map_or(Self::Unranked, Self::Ranked)
    }
}

#[derive(Debug, Default)]
struct GroupNode {
    branches: BTreeMap<Slot, GroupNode>,
    /// Only populated on the deepest level
    columns: Vec<usize>,
}

impl GroupNode {
    fn flatten_into(&self, out: &mut Vec<usize>) {
        out.extend_from_slice(&self.columns);
        for child in self.branches.values() {
            child.flatten_into(out);
        }
    }
}

/// Result of grouping the matrix by a set of sort rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    /// Resolved sort rows, outermost first
    pub sort_rows: Vec<usize>,
    /// Value order of each sort row
    pub value_orders: Vec<ValueOrder>,
    /// Display order: `column_order[slot]` is the column drawn at `slot`
    pub column_order: Vec<usize>,
    /// Group index of each column in the primary sort row
    pub membership: Vec<Option<usize>>,
}

impl Grouping {
    /// Value order of the primary (first) sort row
    pub fn primary_order(&self) -> Option<&ValueOrder> {
        self.value_orders.first()
    }
}

/// Orders the columns of a matrix by resolved sort rows
#[derive(Debug, Clone, Copy)]
pub struct ColumnOrderEngine<'a> {
    store: &'a MatrixStore,
    ranker: ValueRanker<'a>,
}

impl<'a> ColumnOrderEngine<'a> {
    pub fn new(store: &'a MatrixStore, ranker: ValueRanker<'a>) -> Self {
        Self { store, ranker }
    }

    /// Value order of one row (empty for a row that does not exist)
    pub fn value_order(&self, row: usize) -> ValueOrder {
        self.ranker.rank(self.store.row(row).unwrap_or_default())
    }

    /// Group columns by `sort_rows`, which must already be resolved.
    ///
    /// One row uses the single-key sort, several use the hierarchical
    /// partition. An empty row list yields the natural order, ungrouped.
    pub fn group(&self, sort_rows: &[usize]) -> Grouping {
        let column_count = self.store.max_column_count();
        let rows: Vec<&[Cell]> = sort_rows
            .iter()
            .map(|&r| self.store.row(r).unwrap_or_default())
            .collect();
        let value_orders: Vec<ValueOrder> = rows.iter().map(|row| self.ranker.rank(row)).collect();

        let column_order = match (rows.as_slice(), value_orders.as_slice()) {
            ([], _) | (_, []) => default_order(column_count),
            ([row], [order]) => order_by_single_row(row, order, column_count),
            _ => order_by_rows(&rows, &value_orders, column_count),
        };
        let membership = match (rows.first(), value_orders.first()) {
            (Some(row), Some(order)) => group_membership(row, order, column_count),
            _ => Vec::new(),
        };

        Grouping {
            sort_rows: sort_rows.to_vec(),
            value_orders,
            column_order,
            membership,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::UnlistedValues;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    fn rank(cells: &[Cell]) -> ValueOrder {
        ValueRanker::default().rank(cells)
    }

    #[test]
    fn test_single_row_groups_by_rank() {
        let r = row(&["a", "b", "a", "c"]);
        assert_eq!(order_by_single_row(&r, &rank(&r), 4), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_single_row_unranked_last() {
        // short row: columns 3 and 4 have no value
        let r = row(&["b", "a", "b"]);
        assert_eq!(order_by_single_row(&r, &rank(&r), 5), vec![0, 2, 1, 3, 4]);

        let priority = row(&["a"]);
        let order = ValueRanker::new(Some(&priority), UnlistedValues::Drop).rank(&r);
        assert_eq!(order_by_single_row(&r, &order, 3), vec![1, 0, 2]);
    }

    #[test]
    fn test_hierarchical_nesting() {
        let outer = row(&["a", "b", "a", "c"]);
        let inner = row(&["x", "x", "y", "y"]);
        let orders = vec![rank(&outer), rank(&inner)];
        let order = order_by_rows(&[outer.as_slice(), inner.as_slice()], &orders, 4);
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_hierarchical_inner_order_follows_inner_rank() {
        let outer = row(&["a", "a", "a", "b"]);
        let inner = row(&["y", "x", "x", "y"]);
        // x and y tie on count; y was seen first
        let orders = vec![rank(&outer), rank(&inner)];
        assert_eq!(orders[1].values(), row(&["y", "x"]).as_slice());
        let order = order_by_rows(&[outer.as_slice(), inner.as_slice()], &orders, 4);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_hierarchical_single_row_matches_single_sort() {
        let r = row(&["q", "p", "p", "r", "q", "p"]);
        let order = rank(&r);
        assert_eq!(
            order_by_rows(&[r.as_slice()], std::slice::from_ref(&order), 6),
            order_by_single_row(&r, &order, 6)
        );
    }

    #[test]
    fn test_membership() {
        let r = row(&["a", "b", "a"]);
        assert_eq!(
            group_membership(&r, &rank(&r), 4),
            vec![Some(0), Some(1), Some(0), None]
        );
    }

    #[test]
    fn test_engine_group() {
        let store = MatrixStore::new(
            vec![row(&["a", "b", "a", "c"]), row(&["x", "x", "y", "y"])],
            Vec::new(),
        );
        let engine = ColumnOrderEngine::new(&store, ValueRanker::default());
        let grouping = engine.group(&[0]);
        assert_eq!(grouping.column_order, vec![0, 2, 1, 3]);
        assert_eq!(grouping.membership, vec![Some(0), Some(1), Some(0), Some(2)]);

        let ungrouped = engine.group(&[]);
        assert_eq!(ungrouped.column_order, vec![0, 1, 2, 3]);
        assert!(ungrouped.membership.is_empty());
    }
}
