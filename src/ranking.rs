//! Ranking of the distinct values of one sort row.
//!
//! A [`ValueOrder`] is the key space every column ordering is built on: a
//! column's position follows the rank of its value.

use std::collections::HashMap;

use crate::types::{Cell, CellKey, LayoutConfig, UnlistedValues, ValueKind};

/// Ranked, deduplicated values of one row
#[derive(Debug, Clone, Default)]
pub struct ValueOrder {
    kind: ValueKind,
    values: Vec<Cell>,
    ranks: HashMap<CellKey, usize>,
}

impl ValueOrder {
    fn from_ranked(kind: ValueKind, values: Vec<Cell>) -> Self {
        let ranks = values
            .iter()
            .enumerate()
            .map(|(rank, cell)| (cell.key(kind), rank))
            .collect();
        Self {
            kind,
            values,
            ranks,
        }
    }

    /// Values from highest rank (0) to lowest
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Number of ranked values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was ranked
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Comparison kind the row was classified as
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Value at a rank
    pub fn get(&self, rank: usize) -> Option<&Cell> {
        self.values.get(rank)
    }

    /// Rank of `cell` under this row's equality rule; `None` if unranked
    pub fn rank_of(&self, cell: &Cell) -> Option<usize> {
        self.ranks.get(&cell.key(self.kind)).copied()
    }

    /// Rank of an optional cell (a missing cell in a ragged row is unranked)
    pub fn rank_of_opt(&self, cell: Option<&Cell>) -> Option<usize> {
        cell.and_then(|c| self.rank_of(c))
    }
}

impl PartialEq for ValueOrder {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.values == other.values
    }
}

/// Ranks row values, optionally against an explicit priority list
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueRanker<'a> {
    priority: Option<&'a [Cell]>,
    unlisted: UnlistedValues,
}

impl<'a> ValueRanker<'a> {
    /// Ranker with an optional priority list and a policy for unlisted values
    pub fn new(priority: Option<&'a [Cell]>, unlisted: UnlistedValues) -> Self {
        Self { priority, unlisted }
    }

    /// Ranker using the priority settings of a chart config
    pub fn from_config(config: &'a LayoutConfig) -> Self {
        Self::new(config.value_order.as_deref(), config.unlisted_values)
    }

    /// Rank the distinct values of `row`.
    ///
    /// Without a priority list, values are ordered by descending occurrence
    /// count, ties going to the value seen first. With one, the order is the
    /// priority list filtered to the values present; values the list does not
    /// mention are dropped or appended according to the [`UnlistedValues`]
    /// policy.
    pub fn rank(&self, row: &[Cell]) -> ValueOrder {
        let kind = ValueKind::classify(row);
        let counted = count_values(row, kind);

        let Some(priority) = self.priority else {
            return ValueOrder::from_ranked(kind, counted.into_iter().map(|(c, _)| c).collect());
        };

        let present: HashMap<CellKey, usize> = counted
            .iter()
            .enumerate()
            .map(|(i, (cell, _))| (cell.key(kind), i))
            .collect();
        let mut taken = vec![false; counted.len()];
        let mut values = Vec::with_capacity(counted.len());
        for wanted in priority {
            if let Some(&i) = present.get(&wanted.key(kind)) {
                if let (Some(slot), Some((cell, _))) = (taken.get_mut(i), counted.get(i)) {
                    if !*slot {
                        *slot = true;
                        values.push(cell.clone());
                    }
                }
            }
        }

        if self.unlisted == UnlistedValues::Append {
            values.extend(
                counted
                    .into_iter()
                    .zip(taken)
                    .filter(|(_, was_taken)| !was_taken)
                    .map(|((cell, _), _)| cell),
            );
        }
        ValueOrder::from_ranked(kind, values)
    }
}

/// Distinct values with their counts, most frequent first, ties by first sighting
fn count_values(row: &[Cell], kind: ValueKind) -> Vec<(Cell, usize)> {
    let mut slots: HashMap<CellKey, usize> = HashMap::new();
    let mut counted: Vec<(Cell, usize)> = Vec::new();
    for cell in row {
        let slot = *slots.entry(cell.key(kind)).or_insert_with(|| {
            counted.push((cell.clone(), 0));
            counted.len() - 1
        });
        if let Some((_, count)) = counted.get_mut(slot) {
            *count += 1;
        }
    }
    // stable: equal counts keep first-seen order
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
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

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    #[test]
    fn test_count_order_with_first_seen_ties() {
        let order = ValueRanker::default().rank(&cells(&["a", "b", "a", "c"]));
        assert_eq!(order.values(), cells(&["a", "b", "c"]).as_slice());
        assert_eq!(order.rank_of(&Cell::from("c")), Some(2));
        assert_eq!(order.rank_of(&Cell::from("z")), None);
    }

    #[test]
    fn test_most_frequent_first() {
        let order = ValueRanker::default().rank(&cells(&["x", "y", "y", "z", "y", "z"]));
        assert_eq!(order.values(), cells(&["y", "z", "x"]).as_slice());
    }

    #[test]
    fn test_numeric_row() {
        let row = vec![Cell::from(3), Cell::from(1), Cell::from(1), Cell::Number(-0.0)];
        let order = ValueRanker::default().rank(&row);
        assert_eq!(order.kind(), ValueKind::Numeric);
        assert_eq!(
            order.values(),
            &[Cell::from(1), Cell::from(3), Cell::Number(-0.0)]
        );
        assert_eq!(order.rank_of(&Cell::Number(0.0)), Some(2));
        // numeric rows keep strings apart from numbers
        assert_eq!(order.rank_of(&Cell::from("1")), None);
    }

    #[test]
    fn test_mixed_row_compares_as_text() {
        let row = vec![Cell::from(1), Cell::from("1"), Cell::from("b")];
        let order = ValueRanker::default().rank(&row);
        assert_eq!(order.kind(), ValueKind::Text);
        assert_eq!(order.len(), 2);
        assert_eq!(order.rank_of(&Cell::from(1)), Some(0));
        assert_eq!(order.rank_of(&Cell::from("1")), Some(0));
    }

    #[test]
    fn test_priority_drops_unlisted() {
        let priority = cells(&["c", "q", "a"]);
        let ranker = ValueRanker::new(Some(&priority), UnlistedValues::Drop);
        let order = ranker.rank(&cells(&["a", "b", "a", "c"]));
        assert_eq!(order.values(), cells(&["c", "a"]).as_slice());
        assert_eq!(order.rank_of(&Cell::from("b")), None);
    }

    #[test]
    fn test_priority_appends_unlisted() {
        let priority = cells(&["c", "c"]);
        let ranker = ValueRanker::new(Some(&priority), UnlistedValues::Append);
        let order = ranker.rank(&cells(&["a", "b", "a", "c", "b", "b"]));
        assert_eq!(order.values(), cells(&["c", "b", "a"]).as_slice());
    }

    #[test]
    fn test_empty_row() {
        let order = ValueRanker::default().rank(&[]);
        assert!(order.is_empty());
    }
}
