//! Screen-space extents of the groups of the primary sort row.
//!
//! Groups are laid out left to right in value order. Each group is as wide as
//! its columns (`count * pitch`), and `group_padding` separates neighbors, so
//! `extents[i].end + group_padding == extents[i + 1].start` always holds.

use crate::ranking::ValueOrder;
use crate::types::{Cell, GroupExtent, LayoutConfig};

/// Horizontal sizes of one bar and the gaps around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarMetrics {
    /// Drawn width of a bar
    pub bar_width: f64,
    /// Space after each bar
    pub bar_padding: f64,
    /// Space between adjacent groups
    pub group_padding: f64,
}

impl Default for BarMetrics {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl BarMetrics {
    /// Metrics taken directly from the configured sizes
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            bar_width: config.bar_width,
            bar_padding: config.bar_padding,
            group_padding: config.group_padding,
        }
    }

    /// Metrics for a chart of `column_count` bars with `padding_gaps` group gaps.
    ///
    /// With a fixed `plot_width`, the bar width is chosen so the bars and all
    /// padding fill exactly that width (never below zero).
    pub fn resolve(config: &LayoutConfig, column_count: usize, padding_gaps: usize) -> Self {
        let mut metrics = Self::from_config(config);
        if let Some(plot_width) = config.plot_width {
            if column_count > 0 {
                let gaps = padding_gaps as f64 * config.group_padding;
                let per_column = (plot_width - gaps) / column_count as f64;
                metrics.bar_width = (per_column - config.bar_padding).max(0.0);
            }
        }
        metrics
    }

    /// Horizontal advance from one bar to the next
    pub fn pitch(&self) -> f64 {
        self.bar_width + self.bar_padding
    }
}

/// Lay out the groups of `order` using the column counts found in `primary_row`.
///
/// A group whose value matches no column gets a zero-width slot; the padding
/// after it is kept.
pub fn compute_extents(primary_row: &[Cell], order: &ValueOrder, metrics: &BarMetrics) -> Vec<GroupExtent> {
    let mut counts = vec![0_usize; order.len()];
    for cell in primary_row {
        if let Some(count) = order.rank_of(cell).and_then(|rank| counts.get_mut(rank)) {
            *count += 1;
        }
    }

    let pitch = metrics.pitch();
    let mut slots_before = 0_usize;
    order
        .values()
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(index, (value, count))| {
            // same formula as the bar positions, so a group's first bar sits
            // exactly on its start
            let padding = index as f64 * metrics.group_padding;
            let start = slots_before as f64 * pitch + padding;
            slots_before += count;
            let end = slots_before as f64 * pitch + padding;
            GroupExtent {
                index,
                value: value.clone(),
                start,
                end,
            }
        })
        .collect()
}

/// Number of group gaps in a grouped layout.
///
/// One gap between each pair of groups, plus one before the trailing block of
/// unranked columns when there is one.
pub fn padding_gaps(group_count: usize, has_unranked: bool) -> usize {
    group_count.saturating_sub(1) + usize::from(has_unranked && group_count > 0)
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
    use crate::ranking::ValueRanker;
    use crate::types::UnlistedValues;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    fn metrics(bar_width: f64, bar_padding: f64, group_padding: f64) -> BarMetrics {
        BarMetrics {
            bar_width,
            bar_padding,
            group_padding,
        }
    }

    #[test]
    fn test_group_intervals() {
        let r = row(&["a", "b", "a", "c"]);
        let order = ValueRanker::default().rank(&r);
        let extents = compute_extents(&r, &order, &metrics(4.0, 1.0, 3.0));

        assert_eq!(extents.len(), 3);
        assert_eq!((extents[0].start, extents[0].end), (0.0, 10.0));
        assert_eq!((extents[1].start, extents[1].end), (13.0, 18.0));
        assert_eq!((extents[2].start, extents[2].end), (21.0, 26.0));
        assert_eq!(extents[0].value, Cell::from("a"));
        for pair in extents.windows(2) {
            assert_eq!(pair[0].end + 3.0, pair[1].start);
        }
    }

    #[test]
    fn test_zero_width_group_keeps_contiguity() {
        // order ranked from another row: "z" never occurs in the primary row
        let source = row(&["a", "z", "b"]);
        let order = ValueRanker::default().rank(&source);
        let primary = row(&["a", "b", "b"]);
        let extents = compute_extents(&primary, &order, &metrics(1.0, 0.0, 2.0));

        assert_eq!(extents[1].value, Cell::from("z"));
        assert_eq!(extents[1].width(), 0.0);
        assert_eq!(extents[1].start, 3.0);
        assert_eq!(extents[2].start, 5.0);
        assert_eq!(extents[2].end, 7.0);
    }

    #[test]
    fn test_empty_row_has_no_extents() {
        let order = ValueRanker::default().rank(&[]);
        assert!(compute_extents(&[], &order, &BarMetrics::default()).is_empty());
    }

    #[test]
    fn test_resolve_fills_plot_width() {
        let config = LayoutConfig {
            plot_width: Some(100.0),
            bar_padding: 1.0,
            group_padding: 5.0,
            ..LayoutConfig::default()
        };
        // 10 columns, 2 gaps: (100 - 10) / 10 - 1 = 8
        let m = BarMetrics::resolve(&config, 10, 2);
        assert_eq!(m.bar_width, 8.0);
        assert_eq!(m.pitch() * 10.0 + 2.0 * 5.0, 100.0);

        // too narrow: clamp at zero
        let config = LayoutConfig {
            plot_width: Some(5.0),
            bar_padding: 1.0,
            ..LayoutConfig::default()
        };
        assert_eq!(BarMetrics::resolve(&config, 10, 0).bar_width, 0.0);
    }

    #[test]
    fn test_padding_gaps() {
        assert_eq!(padding_gaps(0, false), 0);
        assert_eq!(padding_gaps(0, true), 0);
        assert_eq!(padding_gaps(1, false), 0);
        assert_eq!(padding_gaps(3, false), 2);
        assert_eq!(padding_gaps(3, true), 3);
    }

    #[test]
    fn test_priority_order_layout() {
        let r = row(&["a", "b", "a", "c"]);
        let priority = row(&["c", "a"]);
        let order = ValueRanker::new(Some(&priority), UnlistedValues::Drop).rank(&r);
        let extents = compute_extents(&r, &order, &metrics(1.0, 0.0, 1.0));
        assert_eq!(extents.len(), 2);
        assert_eq!((extents[0].start, extents[0].end), (0.0, 1.0));
        assert_eq!((extents[1].start, extents[1].end), (2.0, 4.0));
    }
}
