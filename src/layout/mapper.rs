//! Conversion between column indices and screen x positions.
//!
//! A column drawn at display slot `order` sits at
//! `order * pitch + group * group_padding`, where `group` is the column's group
//! index while grouped (unranked columns use the slot after the last group) and
//! the group term is dropped while ungrouped. Hit testing inverts that formula
//! through the group extents, so every position produced by
//! [`CoordinateMapper::to_screen_position`] maps back to the same column.

use std::ops::Range;

use super::BarMetrics;
use crate::types::{BarRect, BoundingBox, GroupExtent};

/// Slack added before flooring a slot so positions computed from running totals
/// still land on their own bar.
const SLOT_EPSILON: f64 = 1e-6;

/// Pre-computed mapping state for one chart layout
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    metrics: BarMetrics,
    /// `column_order[slot]` = column drawn at `slot`
    column_order: Vec<usize>,
    /// `slot_of[column]` = slot the column is drawn at
    slot_of: Vec<usize>,
    /// Group index per column (empty while ungrouped)
    membership: Vec<Option<usize>>,
    /// Group extents, left to right (empty while ungrouped)
    extents: Vec<GroupExtent>,
    /// Display slots owned by each extent
    group_slots: Vec<Range<usize>>,
    /// Display slots of the trailing unranked columns
    unranked_slots: Range<usize>,
    grouped: bool,
}

impl CoordinateMapper {
    /// Mapper for columns drawn without group padding
    pub fn ungrouped(metrics: BarMetrics, column_order: Vec<usize>) -> Self {
        let slot_of = invert(&column_order);
        Self {
            metrics,
            column_order,
            slot_of,
            ..Self::default()
        }
    }

    /// Mapper for a grouped layout.
    ///
    /// `column_order` must list the columns of group 0 first, then group 1, and
    /// so on, with unranked columns last, as the column ordering produces it.
    pub fn grouped(
        metrics: BarMetrics,
        column_order: Vec<usize>,
        membership: Vec<Option<usize>>,
        extents: Vec<GroupExtent>,
    ) -> Self {
        let mut counts = vec![0_usize; extents.len()];
        for group in membership.iter().flatten() {
            if let Some(count) = counts.get_mut(*group) {
                *count += 1;
            }
        }

        let mut next = 0;
        let group_slots: Vec<Range<usize>> = counts
            .into_iter()
            .map(|count| {
                let slots = next..next + count;
                next += count;
                slots
            })
            .collect();
        let unranked_slots = next..column_order.len().max(next);

        let slot_of = invert(&column_order);
        Self {
            metrics,
            column_order,
            slot_of,
            membership,
            extents,
            group_slots,
            unranked_slots,
            grouped: true,
        }
    }

    /// True once a grouping has been applied
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Bar sizes this mapper lays out with
    pub fn metrics(&self) -> &BarMetrics {
        &self.metrics
    }

    /// Group extents, left to right (empty while ungrouped)
    pub fn extents(&self) -> &[GroupExtent] {
        &self.extents
    }

    /// Display order of the columns
    pub fn column_order(&self) -> &[usize] {
        &self.column_order
    }

    /// Group index of each column (empty while ungrouped)
    pub fn membership(&self) -> &[Option<usize>] {
        &self.membership
    }

    /// Display slot of a column
    pub fn slot_of(&self, column: usize) -> Option<usize> {
        self.slot_of.get(column).copied()
    }

    /// X position of the bar for `column` drawn at display slot `order`.
    pub fn to_screen_position(&self, column: usize, order: usize) -> f64 {
        order as f64 * self.metrics.pitch() + self.group_offset(column)
    }

    /// X position of a column at its own display slot
    pub fn column_position(&self, column: usize) -> Option<f64> {
        self.slot_of(column)
            .map(|order| self.to_screen_position(column, order))
    }

    /// Display slot under `x`, or `None` for padding between groups and
    /// positions outside the plot.
    pub fn to_display_order(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        if !self.grouped {
            let slot = slot_index(x, self.metrics.pitch())?;
            return (slot < self.column_order.len()).then_some(slot);
        }

        // without group padding the tail starts on the last group's right edge
        let tail_start = self.unranked_start();
        if !self.unranked_slots.is_empty() && x >= tail_start {
            return slot_within(&self.unranked_slots, x - tail_start, self.metrics.pitch());
        }

        let group = self.position_to_group(x)?;
        let slots = self.group_slots.get(group.index)?;
        slot_within(slots, x - group.start, self.metrics.pitch())
    }

    /// Column data-index under `x`: the inverse of [`Self::to_screen_position`].
    pub fn to_column_index(&self, x: f64) -> Option<usize> {
        self.to_display_order(x)
            .and_then(|slot| self.column_order.get(slot).copied())
    }

    /// Group extent containing `x`; `None` while ungrouped or inside the padding
    /// between groups.
    pub fn position_to_group(&self, x: f64) -> Option<&GroupExtent> {
        if !self.grouped {
            return None;
        }
        // extents are sorted by start and never overlap
        let after = self.extents.partition_point(|extent| extent.start <= x);
        after
            .checked_sub(1)
            .and_then(|i| self.extents.get(i))
            .filter(|extent| extent.contains(x))
    }

    /// Rectangle to highlight while hovering at `x`
    pub fn group_bounding_box(&self, x: f64, bar_height: f64) -> Option<BoundingBox> {
        self.position_to_group(x).map(|group| BoundingBox {
            left: group.start,
            right: group.end,
            top: 0.0,
            bottom: bar_height,
        })
    }

    /// Every bar in display order, ready to draw
    pub fn bar_rects(&self) -> Vec<BarRect> {
        self.column_order
            .iter()
            .enumerate()
            .map(|(order, &column)| BarRect {
                column,
                order,
                x: self.to_screen_position(column, order),
                width: self.metrics.bar_width,
            })
            .collect()
    }

    /// Total width of the bar area, including group padding
    pub fn total_width(&self) -> f64 {
        let bars = self.column_order.len() as f64 * self.metrics.pitch();
        if !self.grouped {
            return bars;
        }
        let gaps = super::padding_gaps(self.extents.len(), !self.unranked_slots.is_empty());
        bars + gaps as f64 * self.metrics.group_padding
    }

    fn group_offset(&self, column: usize) -> f64 {
        if !self.grouped {
            return 0.0;
        }
        let group = self
            .membership
            .get(column)
            .copied()
            .flatten()
            .unwrap_or(self.extents.len());
        group as f64 * self.metrics.group_padding
    }

    /// X position where the unranked columns begin
    fn unranked_start(&self) -> f64 {
        self.unranked_slots.start as f64 * self.metrics.pitch()
            + self.extents.len() as f64 * self.metrics.group_padding
    }
}

/// Inverse permutation; positions missing from `order` are left at 0
fn invert(order: &[usize]) -> Vec<usize> {
    let mut slot_of = vec![0; order.len()];
    for (slot, &column) in order.iter().enumerate() {
        if let Some(entry) = slot_of.get_mut(column) {
            *entry = slot;
        }
    }
    slot_of
}

/// `floor(offset / pitch)` with a little slack, or `None` for a degenerate pitch
/// or a negative offset.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn slot_index(offset: f64, pitch: f64) -> Option<usize> {
    if pitch <= 0.0 || !pitch.is_finite() || !offset.is_finite() {
        return None;
    }
    let slot = (offset / pitch + SLOT_EPSILON).floor();
    if slot < 0.0 || slot >= usize::MAX as f64 {
        return None;
    }
    Some(slot as usize)
}

/// Slot at `offset` from the left edge of a run of slots. The right edge of
/// the run belongs to its last bar; anything further right hits nothing.
fn slot_within(slots: &Range<usize>, offset: f64, pitch: f64) -> Option<usize> {
    let last = slots.len().checked_sub(1)?;
    let run_width = slots.len() as f64 * pitch;
    if offset > run_width + SLOT_EPSILON * pitch {
        return None;
    }
    let local = slot_index(offset, pitch)?.min(last);
    Some(slots.start + local)
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
    use crate::types::Cell;

    fn metrics(bar_width: f64, bar_padding: f64, group_padding: f64) -> BarMetrics {
        BarMetrics {
            bar_width,
            bar_padding,
            group_padding,
        }
    }

    fn extent(index: usize, value: &str, start: f64, end: f64) -> GroupExtent {
        GroupExtent {
            index,
            value: Cell::from(value),
            start,
            end,
        }
    }

    /// Row `a b a c` grouped: order [0, 2, 1, 3], pitch 5, group padding 3
    fn grouped_sample() -> CoordinateMapper {
        CoordinateMapper::grouped(
            metrics(4.0, 1.0, 3.0),
            vec![0, 2, 1, 3],
            vec![Some(0), Some(1), Some(0), Some(2)],
            vec![
                extent(0, "a", 0.0, 10.0),
                extent(1, "b", 13.0, 18.0),
                extent(2, "c", 21.0, 26.0),
            ],
        )
    }

    #[test]
    fn test_ungrouped_positions() {
        let mapper = CoordinateMapper::ungrouped(metrics(2.0, 0.5, 10.0), vec![0, 1, 2]);
        assert!(!mapper.is_grouped());
        assert_eq!(mapper.to_screen_position(2, 2), 5.0);
        assert_eq!(mapper.to_column_index(5.0), Some(2));
        assert_eq!(mapper.to_column_index(7.4), Some(2));
        assert_eq!(mapper.to_column_index(7.5), None);
        assert_eq!(mapper.position_to_group(1.0), None);
        assert_eq!(mapper.total_width(), 7.5);
    }

    #[test]
    fn test_grouped_positions() {
        let mapper = grouped_sample();
        assert_eq!(mapper.to_screen_position(0, 0), 0.0);
        assert_eq!(mapper.to_screen_position(2, 1), 5.0);
        assert_eq!(mapper.to_screen_position(1, 2), 13.0);
        assert_eq!(mapper.to_screen_position(3, 3), 21.0);
        assert_eq!(mapper.total_width(), 26.0);
    }

    #[test]
    fn test_round_trip() {
        let mapper = grouped_sample();
        for (order, &column) in mapper.column_order().iter().enumerate() {
            let x = mapper.to_screen_position(column, order);
            assert_eq!(mapper.to_column_index(x), Some(column));
            assert_eq!(mapper.to_display_order(x), Some(order));
        }
    }

    #[test]
    fn test_position_to_group() {
        let mapper = grouped_sample();
        assert_eq!(mapper.position_to_group(0.0).unwrap().index, 0);
        assert_eq!(mapper.position_to_group(10.0).unwrap().index, 0);
        assert_eq!(mapper.position_to_group(11.0), None);
        assert_eq!(mapper.position_to_group(15.0).unwrap().value, Cell::from("b"));
        assert_eq!(mapper.position_to_group(26.5), None);
        // padding hits no column
        assert_eq!(mapper.to_column_index(12.0), None);
        // right edge belongs to the group's last bar
        assert_eq!(mapper.to_column_index(10.0), Some(2));
    }

    #[test]
    fn test_bounding_box() {
        let mapper = grouped_sample();
        let bbox = mapper.group_bounding_box(14.0, 20.0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                left: 13.0,
                right: 18.0,
                top: 0.0,
                bottom: 20.0
            }
        );
        assert!(mapper.group_bounding_box(11.0, 20.0).is_none());
    }

    #[test]
    fn test_unranked_tail() {
        // row "a a" on a 3-column matrix: column 2 is unranked
        let mapper = CoordinateMapper::grouped(
            metrics(1.0, 0.0, 2.0),
            vec![0, 1, 2],
            vec![Some(0), Some(0), None],
            vec![extent(0, "a", 0.0, 2.0)],
        );
        assert_eq!(mapper.to_screen_position(2, 2), 4.0);
        assert_eq!(mapper.to_column_index(4.0), Some(2));
        assert_eq!(mapper.to_column_index(3.0), None);
        assert_eq!(mapper.total_width(), 5.0);
    }

    #[test]
    fn test_unranked_tail_without_padding() {
        // row "a b" on a 3-column matrix, no group padding: the tail starts
        // exactly where the last group ends
        let mapper = CoordinateMapper::grouped(
            metrics(1.0, 0.0, 0.0),
            vec![0, 1, 2],
            vec![Some(0), Some(1), None],
            vec![extent(0, "a", 0.0, 1.0), extent(1, "b", 1.0, 2.0)],
        );
        assert_eq!(mapper.to_screen_position(2, 2), 2.0);
        assert_eq!(mapper.to_column_index(2.0), Some(2));
        assert_eq!(mapper.to_column_index(1.0), Some(1));
        assert_eq!(mapper.to_column_index(1.99), Some(1));
        assert_eq!(mapper.to_column_index(3.0), Some(2));
        assert_eq!(mapper.to_column_index(3.5), None);
    }

    #[test]
    fn test_bar_rects() {
        let rects = grouped_sample().bar_rects();
        let xs: Vec<f64> = rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 13.0, 21.0]);
        assert!(rects.iter().all(|r| r.width == 4.0));
        assert_eq!(rects[2].column, 1);
    }

    #[test]
    fn test_empty_layout() {
        let mapper = CoordinateMapper::grouped(BarMetrics::default(), Vec::new(), Vec::new(), Vec::new());
        assert_eq!(mapper.to_column_index(0.0), None);
        assert!(mapper.bar_rects().is_empty());
        assert_eq!(mapper.total_width(), 0.0);
    }

    #[test]
    fn test_zero_pitch_hits_nothing() {
        let mapper = CoordinateMapper::ungrouped(metrics(0.0, 0.0, 0.0), vec![0, 1]);
        assert_eq!(mapper.to_column_index(0.0), None);
    }
}
