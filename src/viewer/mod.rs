//! `ResortView` - the WASM-exported entry point for the JavaScript widget.
//!
//! The rendering layer owns the canvas and the event listeners; it hands data
//! and options to this object, asks it to group columns, and reads back the
//! column order, group extents and position lookups it needs to draw bars and
//! resolve pointer events. Invalid requests never throw: they log a console
//! warning and report `false` or an empty result, as the widget always has.

#[cfg(target_arch = "wasm32")]
mod console;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::engine::ResortEngine;
use crate::types::{LayoutConfig, LayoutPatch, RowRef};

/// Column ordering engine for one chart, exposed to JavaScript
#[wasm_bindgen]
pub struct ResortView {
    engine: ResortEngine,
}

#[wasm_bindgen]
impl ResortView {
    /// Create an engine from an options object (`undefined` for defaults).
    ///
    /// Accepts the camelCase fields of the chart config: `barWidth`,
    /// `barPadding`, `groupPadding`, `plotWidth`, `rowLabels`, `valueOrder`, ...
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ResortView, JsValue> {
        console_error_panic_hook::set_once();
        #[cfg(target_arch = "wasm32")]
        console::init();

        let config: LayoutConfig = if options.is_undefined() || options.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        Ok(ResortView {
            engine: ResortEngine::new(config)?,
        })
    }

    /// Replace the matrix (an array of row arrays)
    #[wasm_bindgen]
    pub fn draw(&mut self, matrix: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(matrix)?;
        self.engine.load_value(&value)?;
        Ok(())
    }

    /// Merge a partial options object into the current config
    #[wasm_bindgen(js_name = "setOptions")]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let patch: LayoutPatch = serde_wasm_bindgen::from_value(options)?;
        self.engine.update_config(patch)?;
        Ok(())
    }

    /// Ranked distinct values of a row; empty if the row cannot be found
    #[wasm_bindgen(js_name = "valueOrder")]
    pub fn value_order(&self, row: JsValue) -> Result<JsValue, JsValue> {
        let values = row_ref(&row)
            .and_then(|row| self.engine.value_order(&row).ok())
            .map(|order| order.values().to_vec())
            .unwrap_or_default();
        to_js(&values)
    }

    /// Group by one row (index or label). Returns `false` if it cannot be found.
    #[wasm_bindgen(js_name = "groupByRow")]
    pub fn group_by_row(&mut self, row: JsValue) -> bool {
        match row_ref(&row) {
            Some(row) => self.engine.group_by_row(&row).is_ok(),
            None => {
                log::warn!("Resort.groupByRow expects a row index or label.");
                false
            }
        }
    }

    /// Group hierarchically by an array of rows (indices or labels).
    /// Returns `false` if any row cannot be found.
    #[wasm_bindgen(js_name = "groupByRows")]
    pub fn group_by_rows(&mut self, rows: JsValue) -> bool {
        if !js_sys::Array::is_array(&rows) {
            log::warn!("Resort.groupByRows expects an array of row indices or labels.");
            return false;
        }
        let refs: Option<Vec<RowRef>> = js_sys::Array::from(&rows)
            .iter()
            .map(|row| row_ref(&row))
            .collect();
        match refs {
            Some(refs) => self.engine.group_by_rows(&refs).is_ok(),
            None => {
                log::warn!("Resort.groupByRows expects an array of row indices or labels.");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = "isGrouped")]
    pub fn is_grouped(&self) -> bool {
        self.engine.is_grouped()
    }

    /// Column data-indices in display order
    #[wasm_bindgen(js_name = "columnOrder")]
    pub fn column_order(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.column_order())
    }

    /// Group index per column (`null` for ungrouped columns)
    #[wasm_bindgen(js_name = "groupMembership")]
    pub fn group_membership(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.group_membership())
    }

    /// `[{index, value, start, end}]`, left to right
    #[wasm_bindgen(js_name = "groupExtents")]
    pub fn group_extents(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.group_extents())
    }

    /// `[{column, order, x, width}]` for every bar, in display order
    #[wasm_bindgen(js_name = "barRects")]
    pub fn bar_rects(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.bar_rects())
    }

    #[wasm_bindgen(js_name = "plotWidth")]
    pub fn plot_width(&self) -> f64 {
        self.engine.plot_width()
    }

    #[wasm_bindgen(js_name = "toScreenPosition")]
    pub fn to_screen_position(&self, column: usize, order: usize) -> f64 {
        self.engine.mapper().to_screen_position(column, order)
    }

    #[wasm_bindgen(js_name = "toColumnIndex")]
    pub fn to_column_index(&self, x: f64) -> Option<usize> {
        self.engine.mapper().to_column_index(x)
    }

    /// Extent under `x`, or `null`
    #[wasm_bindgen(js_name = "positionToGroup")]
    pub fn position_to_group(&self, x: f64) -> Result<JsValue, JsValue> {
        to_js(&self.engine.mapper().position_to_group(x))
    }

    /// `{left, right, top, bottom}` of the group under `x`, or `null`
    #[wasm_bindgen(js_name = "groupBoundingBox")]
    pub fn group_bounding_box(&self, x: f64) -> Result<JsValue, JsValue> {
        let bar_height = self.engine.config().bar_height;
        to_js(&self.engine.mapper().group_bounding_box(x, bar_height))
    }
}

/// Row identifier from a JS number (non-negative integer) or string
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn row_ref(value: &JsValue) -> Option<RowRef> {
    if let Some(n) = value.as_f64() {
        let valid = n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX);
        return valid.then_some(RowRef::Index(n as usize));
    }
    value.as_string().map(RowRef::Label)
}

/// Serialize with `null` for `None` and plain objects for structs
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(JsValue::from)
}
