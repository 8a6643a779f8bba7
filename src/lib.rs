//! resort - column ordering and grouping for heatmap charts
//!
//! Reorders the columns of a row-major data matrix so that columns sharing a
//! value in a chosen row sit next to each other, and maps between column
//! indices and screen positions for drawing and hit testing:
//! - Value ranking by frequency or by a configured priority list
//! - Single-row and hierarchical (multi-row) grouping
//! - Group extents with padding between groups
//! - Column index <-> x position transforms for hover and brushing
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ResortView } from 'resort';
//! await init();
//! const resort = new ResortView({ barWidth: 6, groupPadding: 4, rowLabels });
//! resort.draw(matrix);
//! resort.groupByRows(['kind', 'tag']);
//! const order = resort.columnOrder();
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod ordering;
pub mod ranking;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use engine::{GroupingOutcome, ResortEngine};
pub use error::{ResortError, Result};
pub use viewer::ResortView;

pub use types::*;

/// Group the columns of a JSON matrix by one or more rows and return the
/// resulting column order as a JSON array.
///
/// `rows` is a JSON array of row indices or labels; `options` is a config
/// object (or empty for defaults).
///
/// # Errors
/// Returns an error if the inputs are malformed or a row cannot be found.
#[wasm_bindgen]
pub fn resort_json(matrix: &str, rows: &str, options: &str) -> std::result::Result<String, JsValue> {
    let order = column_order_json(matrix, rows, options)?;
    serde_json::to_string(&order)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

fn column_order_json(matrix: &str, rows: &str, options: &str) -> Result<Vec<usize>> {
    let config: LayoutConfig = if options.trim().is_empty() {
        LayoutConfig::default()
    } else {
        serde_json::from_str(options)?
    };
    let rows: Vec<RowRef> = serde_json::from_str(rows)?;

    let mut engine = ResortEngine::new(config)?;
    engine.load_json(matrix)?;
    engine.group_by_rows(&rows)?;
    Ok(engine.column_order().to_vec())
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_json() {
        let order = column_order_json(r#"[["a", "b", "a", "c"]]"#, "[0]", "").unwrap();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_column_order_json_by_label() {
        let order = column_order_json(
            r#"[[1, 2, 3], ["y", "x", "y"]]"#,
            r#"["tag"]"#,
            r#"{"rowLabels": ["n", "tag"]}"#,
        )
        .unwrap();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_column_order_json_bad_row() {
        assert!(column_order_json(r#"[["a"]]"#, r#"["rowX"]"#, "").is_err());
    }
}
