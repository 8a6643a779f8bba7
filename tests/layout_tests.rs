//! Layout tests for resort
//!
//! Tests for group extents, group padding, fixed plot widths, and the
//! column index <-> screen position transforms used for hover and brushing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use common::{assert_extents_contiguous, engine_with, generated_matrix, spaced_config, text_row};
use resort::{BoundingBox, Cell, LayoutConfig, RowRef};
use test_case::test_case;

// ============================================================================
// Group extents
// ============================================================================

#[test]
fn test_extents_follow_value_order() {
    let mut engine = engine_with(spaced_config(), vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    let extents = engine.group_extents();
    let spans: Vec<(f64, f64)> = extents.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(spans, vec![(0.0, 10.0), (13.0, 18.0), (21.0, 26.0)]);
    let values: Vec<&Cell> = extents.iter().map(|e| &e.value).collect();
    assert_eq!(values, vec![&Cell::from("a"), &Cell::from("b"), &Cell::from("c")]);
    assert_extents_contiguous(extents, 3.0);
}

#[test]
fn test_extents_only_describe_primary_row() {
    let mut engine = engine_with(
        spaced_config(),
        vec![text_row(&["a", "b", "a", "c"]), text_row(&["x", "x", "y", "y"])],
    );
    engine.group_by_rows(&[RowRef::Index(0), RowRef::Index(1)]).unwrap();
    assert_eq!(engine.group_extents().len(), 3);
    assert_eq!(engine.group_membership(), &[Some(0), Some(1), Some(0), Some(2)]);
}

#[test_case(0.0 ; "no padding")]
#[test_case(2.5 ; "fractional padding")]
#[test_case(40.0 ; "wide padding")]
fn test_extents_contiguous_on_generated_data(group_padding: f64) {
    let config = LayoutConfig {
        bar_width: 0.7,
        bar_padding: 0.1,
        group_padding,
        ..LayoutConfig::default()
    };
    for seed in 0..5 {
        let mut engine = engine_with(config.clone(), generated_matrix(3, 60, seed));
        engine.group_by_row(&RowRef::Index(2)).unwrap();
        assert_extents_contiguous(engine.group_extents(), group_padding);
    }
}

#[test]
fn test_ungrouped_has_no_extents() {
    let engine = engine_with(spaced_config(), vec![text_row(&["a", "b"])]);
    assert!(engine.group_extents().is_empty());
    assert!(engine.mapper().position_to_group(1.0).is_none());
}

// ============================================================================
// Bar sizing
// ============================================================================

#[test]
fn test_fixed_plot_width_stretches_bars() {
    let config = LayoutConfig {
        plot_width: Some(100.0),
        bar_padding: 1.0,
        group_padding: 5.0,
        ..LayoutConfig::default()
    };
    let mut engine = engine_with(config, vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    // (100 - 2 gaps * 5) / 4 columns - 1 padding
    assert_eq!(engine.mapper().metrics().bar_width, 21.5);
    assert_eq!(engine.mapper().total_width(), 100.0);
    assert_eq!(engine.plot_width(), 100.0);
    let last = engine.group_extents().last().unwrap();
    assert_eq!((last.start, last.end), (77.5, 100.0));
}

#[test]
fn test_ungrouped_plot_width() {
    let engine = engine_with(spaced_config(), vec![text_row(&["a", "b", "a"])]);
    assert_eq!(engine.plot_width(), 15.0);
}

// ============================================================================
// Coordinate mapping
// ============================================================================

#[test]
fn test_screen_positions_include_group_padding() {
    let mut engine = engine_with(spaced_config(), vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    let mapper = engine.mapper();
    assert_eq!(mapper.to_screen_position(0, 0), 0.0);
    assert_eq!(mapper.to_screen_position(2, 1), 5.0);
    assert_eq!(mapper.to_screen_position(1, 2), 13.0);
    assert_eq!(mapper.to_screen_position(3, 3), 21.0);
    assert_eq!(mapper.column_position(1), Some(13.0));
}

#[test_case(2.0, Some(0) ; "first bar")]
#[test_case(9.9, Some(2) ; "second bar of first group")]
#[test_case(11.5, None ; "padding")]
#[test_case(13.0, Some(1) ; "left edge of group")]
#[test_case(25.9, Some(3) ; "last bar")]
#[test_case(30.0, None ; "past the end")]
#[test_case(-1.0, None ; "before the start")]
fn test_column_index_lookup(x: f64, expected: Option<usize>) {
    let mut engine = engine_with(spaced_config(), vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();
    assert_eq!(engine.mapper().to_column_index(x), expected);
}

#[test_case(1, 30, 4.0, 1.0, 3.0 ; "exact sizes")]
#[test_case(2, 73, 0.7, 0.1, 2.5 ; "fractional sizes")]
#[test_case(2, 50, 1.3, 0.0, 0.0 ; "no padding")]
fn test_round_trip(depth: usize, columns: usize, bar_width: f64, bar_padding: f64, group_padding: f64) {
    let config = LayoutConfig {
        bar_width,
        bar_padding,
        group_padding,
        ..LayoutConfig::default()
    };
    for seed in 0..5 {
        let mut engine = engine_with(config.clone(), generated_matrix(3, columns, seed));
        let rows: Vec<RowRef> = (0..depth).map(RowRef::Index).collect();
        engine.group_by_rows(&rows).unwrap();

        let mapper = engine.mapper();
        for (order, &column) in engine.column_order().iter().enumerate() {
            let x = mapper.to_screen_position(column, order);
            assert_eq!(mapper.to_column_index(x), Some(column), "seed {seed} x {x}");
            // anywhere inside the bar maps back too
            let inside = x + bar_width * 0.5;
            assert_eq!(mapper.to_column_index(inside), Some(column), "seed {seed} x {inside}");
        }
    }
}

#[test_case(3.0, 23.0 ; "with group padding")]
#[test_case(0.0, 20.0 ; "without group padding")]
fn test_round_trip_with_unranked_tail(group_padding: f64, total_width: f64) {
    let config = LayoutConfig {
        value_order: Some(text_row(&["b"])),
        group_padding,
        ..spaced_config()
    };
    let mut engine = engine_with(config, vec![text_row(&["a", "b", "c", "b"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    assert_eq!(engine.column_order(), &[1, 3, 0, 2]);
    assert_eq!(engine.group_membership(), &[None, Some(0), None, Some(0)]);
    // one group plus the unranked block: one gap
    assert_eq!(engine.mapper().total_width(), total_width);
    for (order, &column) in engine.column_order().iter().enumerate() {
        let x = engine.mapper().to_screen_position(column, order);
        assert_eq!(engine.mapper().to_column_index(x), Some(column), "x {x}");
    }
    assert_eq!(engine.mapper().to_column_index(total_width + 1.0), None);
}

#[test]
fn test_round_trip_ragged_rows_default_config() {
    let mut engine = engine_with(
        LayoutConfig::default(),
        vec![text_row(&["a", "b"]), text_row(&["x", "y", "x"])],
    );
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    assert_eq!(engine.group_membership(), &[Some(0), Some(1), None]);
    for (order, &column) in engine.column_order().iter().enumerate() {
        let x = engine.mapper().to_screen_position(column, order);
        assert_eq!(engine.mapper().to_column_index(x), Some(column), "x {x}");
        let inside = x + 0.25;
        assert_eq!(engine.mapper().to_column_index(inside), Some(column), "x {inside}");
    }
}

#[test]
fn test_unranked_tail_is_not_a_group() {
    let config = LayoutConfig {
        value_order: Some(text_row(&["b"])),
        ..spaced_config()
    };
    let mut engine = engine_with(config, vec![text_row(&["a", "b", "c", "b"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();
    assert!(engine.mapper().position_to_group(15.0).is_none());
}

// ============================================================================
// Hover lookups
// ============================================================================

#[test]
fn test_position_to_group_and_bounding_box() {
    let config = LayoutConfig {
        bar_height: 12.0,
        ..spaced_config()
    };
    let mut engine = engine_with(config, vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    let mapper = engine.mapper();
    let group = mapper.position_to_group(14.0).unwrap();
    assert_eq!(group.index, 1);
    assert_eq!(group.value, Cell::from("b"));
    assert!(mapper.position_to_group(11.0).is_none());

    let bbox = mapper.group_bounding_box(3.0, engine.config().bar_height).unwrap();
    assert_eq!(
        bbox,
        BoundingBox {
            left: 0.0,
            right: 10.0,
            top: 0.0,
            bottom: 12.0
        }
    );
}

#[test]
fn test_bar_rects_in_display_order() {
    let mut engine = engine_with(spaced_config(), vec![text_row(&["a", "b", "a", "c"])]);
    engine.group_by_row(&RowRef::Index(0)).unwrap();

    let rects = engine.bar_rects();
    let columns: Vec<usize> = rects.iter().map(|r| r.column).collect();
    assert_eq!(columns, vec![0, 2, 1, 3]);
    let orders: Vec<usize> = rects.iter().map(|r| r.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert_eq!(rects[2].x, 13.0);
}
