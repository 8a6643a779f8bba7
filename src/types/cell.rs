use serde::{Deserialize, Serialize};
use std::fmt;

/// A single categorical value in the matrix.
///
/// Numbers and strings are kept apart so a row made only of numbers can be
/// compared numerically; see [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// True if this cell holds a number
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Equality key for this cell under the given comparison kind.
    pub(crate) fn key(&self, kind: ValueKind) -> CellKey {
        match (kind, self) {
            (ValueKind::Numeric, Self::Number(n)) => CellKey::Number(normalized_bits(*n)),
            _ => CellKey::Text(self.to_string()),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&serde_json::Value> for Cell {
    /// Numbers and strings map directly; anything else is keyed by its JSON text
    /// (`null`, `true`, `false`, ...).
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // -0 prints as 0
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// How the values of one row are compared for equality.
///
/// A row whose distinct values are all numbers is `Numeric`; a row mixing
/// numbers and strings (or holding only strings) is `Text`, and its numbers are
/// compared by their printed form, so `1` and `"1"` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Numeric,
    Text,
}

impl ValueKind {
    /// Classify a row by inspecting all of its values
    pub fn classify<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        if cells.into_iter().all(Cell::is_number) {
            Self::Numeric
        } else {
            Self::Text
        }
    }
}

/// Hashable identity of a cell within one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Number(u64),
    Text(String),
}

/// Bit pattern with all zeros and all NaNs collapsed to one representative each
fn normalized_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0_f64.to_bits()
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
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

    #[test]
    fn test_display_matches_js_string_form() {
        assert_eq!(Cell::Number(1.0).to_string(), "1");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Number(-0.0).to_string(), "0");
        assert_eq!(Cell::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Cell::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Cell::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_classify() {
        let numbers = [Cell::from(1), Cell::from(2)];
        let mixed = [Cell::from(1), Cell::from("2")];
        assert_eq!(ValueKind::classify(&numbers), ValueKind::Numeric);
        assert_eq!(ValueKind::classify(&mixed), ValueKind::Text);
        assert_eq!(
            ValueKind::classify(std::iter::empty::<&Cell>()),
            ValueKind::Numeric
        );
    }

    #[test]
    fn test_keys_follow_kind() {
        let one = Cell::from(1);
        let one_text = Cell::from("1");
        assert_ne!(one.key(ValueKind::Numeric), one_text.key(ValueKind::Numeric));
        assert_eq!(one.key(ValueKind::Text), one_text.key(ValueKind::Text));
        assert_eq!(
            Cell::Number(0.0).key(ValueKind::Numeric),
            Cell::Number(-0.0).key(ValueKind::Numeric)
        );
    }

    #[test]
    fn test_from_json_value() {
        let v: serde_json::Value = serde_json::json!([1, "a", null, true]);
        let cells: Vec<Cell> = v.as_array().unwrap().iter().map(Cell::from).collect();
        assert_eq!(
            cells,
            vec![
                Cell::Number(1.0),
                Cell::from("a"),
                Cell::from("null"),
                Cell::from("true")
            ]
        );
    }
}
