//! Structured error types for resort.
//!
//! Every fallible engine operation returns [`Result`]; nothing in the engine panics
//! on bad input.

use crate::types::RowRef;

/// All errors that can occur while loading data or computing an ordering.
#[derive(Debug, thiserror::Error)]
pub enum ResortError {
    /// Row identifier matches neither a row index nor a configured row label.
    #[error("Could not find data row {0}")]
    InvalidRow(RowRef),

    /// A multi-row grouping request named no rows.
    #[error("Grouping expects at least one row index or label")]
    EmptyRowSet,

    /// Layout configuration rejected (negative or non-finite sizes).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON input could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Matrix input is not an array of rows.
    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResortError>;

impl From<ResortError> for wasm_bindgen::JsValue {
    fn from(e: ResortError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
