//! Sentinel rules for detecting invalid model output.
//!
//! Modeling tools mark unusable cells in different ways: NaN, infinities, or
//! a magic number such as MODFLOW's `1e30` no-flow value. A [`SentinelRule`]
//! captures one such convention so the same filter can be reused across
//! fields.

use serde::{Deserialize, Serialize};

/// Decides whether a per-cell value is usable.
///
/// NaN and infinite values are always invalid. Values exactly equal to one of
/// `values` are invalid as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelRule {
    /// Explicit sentinel values, compared for exact equality.
    pub values: Vec<f64>,
}

impl SentinelRule {
    /// Rule that rejects only non-finite values.
    #[must_use]
    pub fn non_finite() -> Self {
        Self::default()
    }

    /// Rule that also rejects the given sentinel values.
    #[must_use]
    pub fn with_values(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Returns true if `value` is usable under this rule.
    #[must_use]
    pub fn is_valid(&self, value: f64) -> bool {
        #[allow(clippy::float_cmp)]
        let is_sentinel = self.values.iter().any(|&s| s == value);
        value.is_finite() && !is_sentinel
    }
}
