use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a row of the matrix either by position or by its configured label.
///
/// Deserializes from a JSON number (`Index`) or a JSON string (`Label`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRef {
    Index(usize),
    Label(String),
}

impl From<usize> for RowRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for RowRef {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for RowRef {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Label(label) => write!(f, "\"{label}\""),
        }
    }
}
