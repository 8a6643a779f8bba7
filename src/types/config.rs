use serde::{Deserialize, Serialize};

use super::Cell;
use crate::error::{ResortError, Result};

/// What happens to row values missing from an explicit value priority list
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum UnlistedValues {
    /// Leave them out of the value order; their columns become ungrouped
    #[default]
    Drop,
    /// Rank them after the listed values, most frequent first
    Append,
}

/// Chart configuration consumed by the engine.
///
/// Every field is optional in JSON; missing fields take the widget defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Height of one row of bars in pixels
    pub bar_height: f64,
    /// Width of one bar in pixels (ignored when `plot_width` is set)
    pub bar_width: f64,
    /// Horizontal space after each bar
    pub bar_padding: f64,
    /// Horizontal space between adjacent groups
    pub group_padding: f64,
    /// Fixed total width; bars are resized to fill it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_width: Option<f64>,
    /// Labels used to resolve `RowRef::Label`, by row index
    pub row_labels: Vec<String>,
    /// Explicit value priority applied to every sort row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_order: Option<Vec<Cell>>,
    /// Policy for values missing from `value_order`
    pub unlisted_values: UnlistedValues,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bar_height: 20.0,
            bar_width: 0.5,
            bar_padding: 0.0,
            group_padding: 0.0,
            plot_width: None,
            row_labels: Vec::new(),
            value_order: None,
            unlisted_values: UnlistedValues::Drop,
        }
    }
}

impl LayoutConfig {
    /// Reject sizes that would break the layout arithmetic.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a negative or non-finite size.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("barHeight", Some(self.bar_height)),
            ("barWidth", Some(self.bar_width)),
            ("barPadding", Some(self.bar_padding)),
            ("groupPadding", Some(self.group_padding)),
            ("plotWidth", self.plot_width),
        ];
        for (name, value) in sizes {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ResortError::InvalidConfig(format!(
                        "{name} must be a finite, non-negative number (got {v})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Merge a partial update into this config
    pub fn apply(&mut self, patch: LayoutPatch) {
        if let Some(v) = patch.bar_height {
            self.bar_height = v;
        }
        if let Some(v) = patch.bar_width {
            self.bar_width = v;
        }
        if let Some(v) = patch.bar_padding {
            self.bar_padding = v;
        }
        if let Some(v) = patch.group_padding {
            self.group_padding = v;
        }
        if let Some(v) = patch.plot_width {
            self.plot_width = Some(v);
        }
        if let Some(v) = patch.row_labels {
            self.row_labels = v;
        }
        if let Some(v) = patch.value_order {
            self.value_order = Some(v);
        }
        if let Some(v) = patch.unlisted_values {
            self.unlisted_values = v;
        }
    }
}

/// Partial [`LayoutConfig`] update; absent fields keep their current value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPatch {
    pub bar_height: Option<f64>,
    pub bar_width: Option<f64>,
    pub bar_padding: Option<f64>,
    pub group_padding: Option<f64>,
    pub plot_width: Option<f64>,
    pub row_labels: Option<Vec<String>>,
    pub value_order: Option<Vec<Cell>>,
    pub unlisted_values: Option<UnlistedValues>,
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
    fn test_defaults_from_empty_json() {
        let config: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.bar_height, 20.0);
        assert_eq!(config.bar_width, 0.5);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"barWidth": 4, "groupPadding": 2, "rowLabels": ["a"], "valueOrder": ["x", 1], "unlistedValues": "append"}"#,
        )
        .unwrap();
        assert_eq!(config.bar_width, 4.0);
        assert_eq!(config.group_padding, 2.0);
        assert_eq!(config.row_labels, vec!["a".to_string()]);
        assert_eq!(
            config.value_order,
            Some(vec![Cell::from("x"), Cell::Number(1.0)])
        );
        assert_eq!(config.unlisted_values, UnlistedValues::Append);
    }

    #[test]
    fn test_validate_rejects_negative_sizes() {
        let config = LayoutConfig {
            group_padding: -1.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ResortError::InvalidConfig(_))
        ));

        let config = LayoutConfig {
            plot_width: Some(f64::NAN),
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields() {
        let mut config = LayoutConfig {
            bar_width: 3.0,
            ..LayoutConfig::default()
        };
        let patch: LayoutPatch = serde_json::from_str(r#"{"groupPadding": 5}"#).unwrap();
        config.apply(patch);
        assert_eq!(config.bar_width, 3.0);
        assert_eq!(config.group_padding, 5.0);
    }
}
