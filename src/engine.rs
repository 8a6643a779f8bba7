//! Per-chart engine state: data, configuration and the current grouping.
//!
//! Everything derived (value orders, column order, membership, extents and the
//! coordinate mapper) is rebuilt from scratch whenever the data, the config or
//! the set of sort rows changes.

use crate::error::{ResortError, Result};
use crate::layout::{compute_extents, padding_gaps, BarMetrics, CoordinateMapper};
use crate::matrix::MatrixStore;
use crate::ordering::{default_order, ColumnOrderEngine, Grouping};
use crate::ranking::{ValueOrder, ValueRanker};
use crate::types::{BarRect, Cell, GroupExtent, LayoutConfig, LayoutPatch, RowRef};

/// Result of a grouping request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingOutcome {
    /// The column order was recomputed
    Applied,
    /// The requested sort rows are already in effect
    Unchanged,
}

/// Column ordering engine for one chart
#[derive(Debug, Clone, Default)]
pub struct ResortEngine {
    config: LayoutConfig,
    store: MatrixStore,
    /// Resolved sort rows, outermost first (empty while ungrouped)
    sort_rows: Vec<usize>,
    value_orders: Vec<ValueOrder>,
    mapper: CoordinateMapper,
}

impl ResortEngine {
    /// Create an engine with no data.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the config fails validation.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let store = MatrixStore::new(Vec::new(), config.row_labels.clone());
        let mut engine = Self {
            config,
            store,
            ..Self::default()
        };
        engine.rebuild();
        Ok(engine)
    }

    /// Replace the matrix.
    ///
    /// The current sort rows are re-applied to the new data when they still
    /// exist; otherwise the engine falls back to the natural column order.
    pub fn load(&mut self, rows: Vec<Vec<Cell>>) {
        self.store = MatrixStore::new(rows, self.config.row_labels.clone());
        self.after_load();
    }

    /// Replace the matrix from a JSON array of rows.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or not an array.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.store = MatrixStore::from_json(json, self.config.row_labels.clone())?;
        self.after_load();
        Ok(())
    }

    /// Replace the matrix from an already-parsed JSON value.
    ///
    /// # Errors
    /// Returns an error if `value` is not an array.
    pub fn load_value(&mut self, value: &serde_json::Value) -> Result<()> {
        self.store = MatrixStore::from_value(value, self.config.row_labels.clone())?;
        self.after_load();
        Ok(())
    }

    fn after_load(&mut self) {
        let row_count = self.store.row_count();
        if self.sort_rows.iter().any(|&row| row >= row_count) {
            log::warn!(
                "Resort: sort rows {:?} do not exist in the new data; grouping cleared",
                self.sort_rows
            );
            self.sort_rows.clear();
        }
        self.rebuild();
    }

    /// Replace the whole configuration and recompute the layout.
    ///
    /// # Errors
    /// Returns `InvalidConfig` and keeps the previous config if validation fails.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<()> {
        config.validate()?;
        self.store.set_labels(config.row_labels.clone());
        self.config = config;
        self.rebuild();
        Ok(())
    }

    /// Merge a partial config update and recompute the layout.
    ///
    /// # Errors
    /// Returns `InvalidConfig` and keeps the previous config if the merged
    /// config fails validation.
    pub fn update_config(&mut self, patch: LayoutPatch) -> Result<()> {
        let mut config = self.config.clone();
        config.apply(patch);
        self.set_config(config)
    }

    /// Ranked distinct values of one row, using the configured priority list.
    ///
    /// # Errors
    /// Returns `InvalidRow` if the row cannot be resolved.
    pub fn value_order(&self, row: &RowRef) -> Result<ValueOrder> {
        let index = self.resolve(row)?;
        Ok(self.order_engine().value_order(index))
    }

    /// Group columns by the values of one row.
    ///
    /// # Errors
    /// Returns `InvalidRow` if the row cannot be resolved; the current order
    /// is left untouched.
    pub fn group_by_row(&mut self, row: &RowRef) -> Result<GroupingOutcome> {
        self.group_by_rows(std::slice::from_ref(row))
    }

    /// Group columns hierarchically: by the first row, then within each group
    /// by the second row, and so on.
    ///
    /// Requesting the sort rows already in effect is a no-op.
    ///
    /// # Errors
    /// Returns `EmptyRowSet` for an empty request and `InvalidRow` if any row
    /// cannot be resolved; in both cases the current order is left untouched.
    pub fn group_by_rows(&mut self, rows: &[RowRef]) -> Result<GroupingOutcome> {
        if rows.is_empty() {
            log::warn!("Resort.groupByRows expects an array of row indices or labels.");
            return Err(ResortError::EmptyRowSet);
        }
        let resolved = rows
            .iter()
            .map(|row| self.resolve(row))
            .collect::<Result<Vec<usize>>>()?;

        if self.is_grouped() && resolved == self.sort_rows {
            return Ok(GroupingOutcome::Unchanged);
        }
        self.sort_rows = resolved;
        self.rebuild();
        Ok(GroupingOutcome::Applied)
    }

    fn resolve(&self, row: &RowRef) -> Result<usize> {
        self.store.resolve_row(row).inspect_err(|_| {
            log::warn!("Resort: could not find data row {row} to sort on");
        })
    }

    fn order_engine(&self) -> ColumnOrderEngine<'_> {
        ColumnOrderEngine::new(&self.store, ValueRanker::from_config(&self.config))
    }

    /// Recompute every derived structure from data, config and sort rows
    fn rebuild(&mut self) {
        let column_count = self.store.max_column_count();
        if self.sort_rows.is_empty() {
            let metrics = BarMetrics::resolve(&self.config, column_count, 0);
            self.value_orders.clear();
            self.mapper = CoordinateMapper::ungrouped(metrics, default_order(column_count));
            return;
        }

        let Grouping {
            value_orders,
            column_order,
            membership,
            ..
        } = self.order_engine().group(&self.sort_rows);

        let primary_row = self
            .sort_rows
            .first()
            .and_then(|&row| self.store.row(row))
            .unwrap_or_default();
        let (metrics, extents) = match value_orders.first() {
            Some(primary) => {
                let has_unranked = membership.iter().any(Option::is_none);
                let gaps = padding_gaps(primary.len(), has_unranked);
                let metrics = BarMetrics::resolve(&self.config, column_count, gaps);
                let extents = compute_extents(primary_row, primary, &metrics);
                (metrics, extents)
            }
            None => (BarMetrics::resolve(&self.config, column_count, 0), Vec::new()),
        };

        log::debug!(
            "Resort: grouped {} columns by rows {:?} into {} groups",
            column_count,
            self.sort_rows,
            extents.len()
        );
        self.value_orders = value_orders;
        self.mapper = CoordinateMapper::grouped(metrics, column_order, membership, extents);
    }

    /// Current configuration
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Loaded matrix
    pub fn store(&self) -> &MatrixStore {
        &self.store
    }

    /// True once a grouping has been applied to the current data
    pub fn is_grouped(&self) -> bool {
        self.mapper.is_grouped()
    }

    /// Resolved sort rows, outermost first
    pub fn sort_rows(&self) -> &[usize] {
        &self.sort_rows
    }

    /// Value order of each sort row
    pub fn value_orders(&self) -> &[ValueOrder] {
        &self.value_orders
    }

    /// Display order: `column_order()[slot]` is the column drawn at `slot`
    pub fn column_order(&self) -> &[usize] {
        self.mapper.column_order()
    }

    /// Group index of each column in the primary sort row
    pub fn group_membership(&self) -> &[Option<usize>] {
        self.mapper.membership()
    }

    /// Group extents, left to right
    pub fn group_extents(&self) -> &[GroupExtent] {
        self.mapper.extents()
    }

    /// Coordinate transforms for rendering and hit testing
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Total width of the bar area
    pub fn plot_width(&self) -> f64 {
        self.config.plot_width.unwrap_or_else(|| self.mapper.total_width())
    }

    /// Every bar in display order
    pub fn bar_rects(&self) -> Vec<BarRect> {
        self.mapper.bar_rects()
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

    fn sample() -> ResortEngine {
        let mut engine = ResortEngine::new(LayoutConfig {
            bar_width: 4.0,
            bar_padding: 1.0,
            group_padding: 3.0,
            row_labels: vec!["kind".into(), "tag".into()],
            ..LayoutConfig::default()
        })
        .unwrap();
        engine
            .load_json(r#"[["a", "b", "a", "c"], ["x", "x", "y", "y"]]"#)
            .unwrap();
        engine
    }

    #[test]
    fn test_starts_ungrouped() {
        let engine = sample();
        assert!(!engine.is_grouped());
        assert_eq!(engine.column_order(), &[0, 1, 2, 3]);
        assert!(engine.group_extents().is_empty());
        assert_eq!(engine.plot_width(), 20.0);
    }

    #[test]
    fn test_group_by_label() {
        let mut engine = sample();
        let outcome = engine.group_by_row(&RowRef::from("kind")).unwrap();
        assert_eq!(outcome, GroupingOutcome::Applied);
        assert!(engine.is_grouped());
        assert_eq!(engine.column_order(), &[0, 2, 1, 3]);
        assert_eq!(engine.group_extents().len(), 3);
        assert_eq!(engine.plot_width(), 26.0);
    }

    #[test]
    fn test_same_rows_is_noop() {
        let mut engine = sample();
        engine.group_by_row(&RowRef::Index(0)).unwrap();
        let outcome = engine.group_by_rows(&[RowRef::from("kind")]).unwrap();
        assert_eq!(outcome, GroupingOutcome::Unchanged);
    }

    #[test]
    fn test_invalid_row_keeps_state() {
        let mut engine = sample();
        engine.group_by_row(&RowRef::Index(0)).unwrap();
        let before = engine.column_order().to_vec();

        let err = engine
            .group_by_rows(&[RowRef::Index(1), RowRef::from("rowX")])
            .unwrap_err();
        assert!(matches!(err, ResortError::InvalidRow(RowRef::Label(_))));
        assert_eq!(engine.column_order(), before.as_slice());
        assert_eq!(engine.sort_rows(), &[0]);
    }

    #[test]
    fn test_empty_request() {
        let mut engine = sample();
        assert!(matches!(
            engine.group_by_rows(&[]),
            Err(ResortError::EmptyRowSet)
        ));
    }

    #[test]
    fn test_reload_regroups() {
        let mut engine = sample();
        engine.group_by_row(&RowRef::Index(1)).unwrap();
        engine.load(vec![
            vec![Cell::from("p")],
            vec![Cell::from("y"), Cell::from("x"), Cell::from("y")],
        ]);
        assert!(engine.is_grouped());
        assert_eq!(engine.column_order(), &[0, 2, 1]);

        engine.load(vec![vec![Cell::from("only")]]);
        assert!(!engine.is_grouped());
        assert!(engine.sort_rows().is_empty());
    }

    #[test]
    fn test_config_change_relayouts() {
        let mut engine = sample();
        engine.group_by_row(&RowRef::Index(0)).unwrap();
        engine
            .update_config(LayoutPatch {
                group_padding: Some(0.0),
                ..LayoutPatch::default()
            })
            .unwrap();
        assert_eq!(engine.group_extents()[1].start, 10.0);

        assert!(engine
            .update_config(LayoutPatch {
                bar_width: Some(-2.0),
                ..LayoutPatch::default()
            })
            .is_err());
        assert_eq!(engine.config().bar_width, 4.0);
    }
}
