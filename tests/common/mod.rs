//! Common test utilities and assertion helpers.
//!
//! Builders for small matrices and checks for the properties every grouping
//! must satisfy.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use resort::{Cell, GroupExtent, LayoutConfig, ResortEngine};

/// Row of string cells
pub fn text_row(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::from(*v)).collect()
}

/// Row of numeric cells
pub fn number_row(values: &[i32]) -> Vec<Cell> {
    values.iter().map(|v| Cell::from(*v)).collect()
}

/// Engine with `config` and `rows` loaded
pub fn engine_with(config: LayoutConfig, rows: Vec<Vec<Cell>>) -> ResortEngine {
    let mut engine = ResortEngine::new(config).expect("valid config");
    engine.load(rows);
    engine
}

/// Config with exact binary sizes so positions compare with `==`
pub fn spaced_config() -> LayoutConfig {
    LayoutConfig {
        bar_width: 4.0,
        bar_padding: 1.0,
        group_padding: 3.0,
        ..LayoutConfig::default()
    }
}

/// Deterministic pseudo-random matrix of `rows` x `columns`; row `r` draws from
/// `r + 2` distinct string values.
pub fn generated_matrix(rows: usize, columns: usize, seed: u64) -> Vec<Vec<Cell>> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..rows)
        .map(|r| {
            (0..columns)
                .map(|_| {
                    state = state
                        .wrapping_mul(6_364_136_223_846_793_005)
                        .wrapping_add(1_442_695_040_888_963_407);
                    let value = (state >> 33) % (r as u64 + 2);
                    Cell::from(format!("v{value}"))
                })
                .collect()
        })
        .collect()
}

/// Panic unless `order` is a permutation of `0..n`
pub fn assert_permutation(order: &[usize], n: usize) {
    assert_eq!(order.len(), n, "order {order:?} has wrong length");
    let mut seen = vec![false; n];
    for &column in order {
        assert!(column < n, "column {column} out of range in {order:?}");
        assert!(!seen[column], "column {column} repeated in {order:?}");
        seen[column] = true;
    }
}

/// Panic unless columns sharing a key are adjacent in `order`
pub fn assert_contiguous_by<K: PartialEq + std::fmt::Debug>(order: &[usize], key: impl Fn(usize) -> K) {
    let mut closed: Vec<K> = Vec::new();
    let mut current: Option<K> = None;
    for &column in order {
        let k = key(column);
        if current.as_ref() == Some(&k) {
            continue;
        }
        assert!(!closed.contains(&k), "group {k:?} is split in {order:?}");
        if let Some(previous) = current.take() {
            closed.push(previous);
        }
        current = Some(k);
    }
}

/// Panic unless every extent is followed by exactly `group_padding` of space
pub fn assert_extents_contiguous(extents: &[GroupExtent], group_padding: f64) {
    for pair in extents.windows(2) {
        let gap = pair[1].start - pair[0].end;
        assert!(
            (gap - group_padding).abs() < 1e-9,
            "gap {gap} between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
    for extent in extents {
        assert!(extent.start <= extent.end, "inverted extent {extent:?}");
    }
}
