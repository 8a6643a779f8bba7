//! Column ordering tests for resort
//!
//! Tests for value ranking (frequency and priority lists), single-row and
//! hierarchical grouping, and the permutation and contiguity guarantees.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_contiguous_by, assert_permutation, generated_matrix, number_row, text_row};
use resort::matrix::MatrixStore;
use resort::ordering::{order_by_rows, order_by_single_row, ColumnOrderEngine};
use resort::ranking::ValueRanker;
use resort::{Cell, UnlistedValues, ValueKind};
use test_case::test_case;

// ============================================================================
// Value ranking
// ============================================================================

#[test_case(&["a", "b", "a", "c"], &["a", "b", "c"] ; "most frequent first")]
#[test_case(&["x", "y", "y", "x", "y"], &["y", "x"] ; "count beats first sighting")]
#[test_case(&["q", "p", "r"], &["q", "p", "r"] ; "ties keep first sighting")]
#[test_case(&[], &[] ; "empty row")]
fn test_frequency_ranking(row: &[&str], expected: &[&str]) {
    let order = ValueRanker::default().rank(&text_row(row));
    assert_eq!(order.values(), text_row(expected).as_slice());
}

#[test]
fn test_numeric_row_ranking() {
    let order = ValueRanker::default().rank(&number_row(&[3, 1, 3, 2]));
    assert_eq!(order.kind(), ValueKind::Numeric);
    assert_eq!(order.values(), number_row(&[3, 1, 2]).as_slice());
    assert_eq!(order.rank_of(&Cell::from(2)), Some(2));
}

#[test]
fn test_mixed_row_compares_as_text() {
    let row = vec![Cell::from(1), Cell::from("1"), Cell::from("b")];
    let order = ValueRanker::default().rank(&row);
    assert_eq!(order.kind(), ValueKind::Text);
    assert_eq!(order.len(), 2);
    assert_eq!(order.rank_of(&Cell::from("1")), Some(0));
    assert_eq!(order.rank_of(&Cell::from(1)), Some(0));
}

#[test_case(UnlistedValues::Drop, &["c", "a"] ; "unlisted dropped")]
#[test_case(UnlistedValues::Append, &["c", "a", "b"] ; "unlisted appended")]
fn test_priority_ranking(unlisted: UnlistedValues, expected: &[&str]) {
    let priority = text_row(&["c", "missing", "a"]);
    let order = ValueRanker::new(Some(&priority), unlisted).rank(&text_row(&["a", "b", "a", "c"]));
    assert_eq!(order.values(), text_row(expected).as_slice());
}

// ============================================================================
// Single-row ordering
// ============================================================================

#[test_case(&["a", "b", "a", "c"], &[0, 2, 1, 3] ; "groups a values")]
#[test_case(&["x", "y", "y", "x", "y"], &[1, 2, 4, 0, 3] ; "largest group first")]
#[test_case(&["a", "b", "c"], &[0, 1, 2] ; "all distinct keeps order")]
#[test_case(&[], &[] ; "empty")]
fn test_single_row_order(row: &[&str], expected: &[usize]) {
    let cells = text_row(row);
    let order = ValueRanker::default().rank(&cells);
    assert_eq!(order_by_single_row(&cells, &order, cells.len()), expected);
}

#[test]
fn test_single_row_priority_order() {
    let cells = text_row(&["a", "b", "a", "c"]);
    let priority = text_row(&["c", "a"]);
    let order = ValueRanker::new(Some(&priority), UnlistedValues::Drop).rank(&cells);
    // "b" is unranked and goes last
    assert_eq!(order_by_single_row(&cells, &order, 4), vec![3, 0, 2, 1]);
}

#[test]
fn test_ragged_row_pads_with_unranked() {
    let cells = text_row(&["b", "a", "b"]);
    let order = ValueRanker::default().rank(&cells);
    assert_eq!(order_by_single_row(&cells, &order, 5), vec![0, 2, 1, 3, 4]);
}

// ============================================================================
// Hierarchical ordering
// ============================================================================

#[test]
fn test_two_rows_example() {
    let outer = text_row(&["a", "b", "a", "c"]);
    let inner = text_row(&["x", "x", "y", "y"]);
    let ranker = ValueRanker::default();
    let orders = [ranker.rank(&outer), ranker.rank(&inner)];

    let order = order_by_rows(&[outer.as_slice(), inner.as_slice()], &orders, 4);
    assert_eq!(order, vec![0, 2, 1, 3]);
    let zero = order.iter().position(|&c| c == 0).unwrap();
    assert_eq!(order[zero + 1], 2);
}

#[test]
fn test_inner_row_splits_outer_groups() {
    let outer = text_row(&["p", "q", "p", "q", "p"]);
    let inner = number_row(&[1, 2, 2, 1, 1]);
    let ranker = ValueRanker::default();
    let orders = [ranker.rank(&outer), ranker.rank(&inner)];

    let order = order_by_rows(&[outer.as_slice(), inner.as_slice()], &orders, 5);
    assert_eq!(order, vec![0, 4, 2, 3, 1]);
}

#[test]
fn test_hierarchical_single_row_matches_single_sort() {
    let row = text_row(&["x", "y", "z", "y", "x", "y"]);
    let order = ValueRanker::default().rank(&row);
    assert_eq!(
        order_by_rows(&[row.as_slice()], std::slice::from_ref(&order), 6),
        order_by_single_row(&row, &order, 6)
    );
}

// ============================================================================
// Properties over generated matrices
// ============================================================================

#[test_case(1, 40 ; "one row")]
#[test_case(2, 40 ; "two rows")]
#[test_case(3, 97 ; "three rows")]
fn test_grouping_properties(sort_depth: usize, columns: usize) {
    for seed in 0..8 {
        let store = MatrixStore::new(generated_matrix(4, columns, seed), Vec::new());
        let engine = ColumnOrderEngine::new(&store, ValueRanker::default());
        let sort_rows: Vec<usize> = (0..sort_depth).collect();
        let grouping = engine.group(&sort_rows);

        assert_permutation(&grouping.column_order, columns);
        assert_contiguous_by(&grouping.column_order, |column| {
            sort_rows
                .iter()
                .map(|&r| store.cell(r, column).cloned())
                .collect::<Vec<_>>()
        });
        // outer groups follow the primary value order
        let ranks: Vec<Option<usize>> = grouping
            .column_order
            .iter()
            .map(|&c| grouping.membership[c])
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{ranks:?}");

        assert_eq!(engine.group(&sort_rows), grouping);
    }
}

#[test]
fn test_ragged_matrix_is_still_a_permutation() {
    let store = MatrixStore::new(
        vec![text_row(&["a", "b"]), text_row(&["x", "y", "x", "z", "x"])],
        Vec::new(),
    );
    let engine = ColumnOrderEngine::new(&store, ValueRanker::default());

    let grouping = engine.group(&[0, 1]);
    assert_permutation(&grouping.column_order, 5);
    assert_eq!(grouping.membership, vec![Some(0), Some(1), None, None, None]);
    assert_eq!(&grouping.column_order[..2], &[0, 1]);
}
