//! Validity filtering of per-cell fields.

use gwmesh_core::{Result, SentinelRule};

use crate::grid::UnstructuredGrid;

/// Per-cell inclusion flags; `true` retains the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionMask {
    source: String,
    keep: Vec<bool>,
}

impl InclusionMask {
    /// Creates a mask from explicit flags. `source` names what produced it.
    pub fn new(source: impl Into<String>, keep: Vec<bool>) -> Self {
        Self {
            source: source.into(),
            keep,
        }
    }

    /// A mask of `len` cells that retains everything.
    pub fn all(len: usize) -> Self {
        Self::new("all", vec![true; len])
    }

    /// Name of the field (or description) the mask was derived from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of entries, equal to the source grid's cell count.
    pub fn len(&self) -> usize {
        self.keep.len()
    }

    /// Returns true if the mask has no entries.
    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    /// Returns the flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.keep
    }

    /// Number of retained cells.
    pub fn retained_count(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /// Returns true if no cell is excluded.
    pub fn is_all_retained(&self) -> bool {
        self.keep.iter().all(|&k| k)
    }
}

/// Scans one field of a grid and flags the cells whose value is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityFilter {
    field: String,
    rule: SentinelRule,
}

impl ValidityFilter {
    /// Creates a filter for `field` under `rule`.
    pub fn new(field: impl Into<String>, rule: SentinelRule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }

    /// Returns the filtered field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the sentinel rule.
    pub fn rule(&self) -> &SentinelRule {
        &self.rule
    }

    /// Builds the inclusion mask for `grid`.
    ///
    /// Fails with `FieldNotFound` before scanning if the field is absent.
    pub fn mask(&self, grid: &UnstructuredGrid) -> Result<InclusionMask> {
        let field = grid.field(&self.field)?;
        let keep: Vec<bool> = field
            .values()
            .iter()
            .map(|&v| self.rule.is_valid(v))
            .collect();

        let mask = InclusionMask::new(self.field.clone(), keep);
        log::debug!(
            "validity filter on '{}': {} of {} cells valid",
            self.field,
            mask.retained_count(),
            mask.len()
        );
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::strip_grid;
    use gwmesh_core::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_nan_cells_excluded() {
        let grid = strip_grid(vec![("cond", vec![5.0, f64::NAN, 3.0, f64::NAN])]);
        let mask = ValidityFilter::new("cond", SentinelRule::non_finite())
            .mask(&grid)
            .unwrap();
        assert_eq!(mask.as_slice(), &[true, false, true, false]);
        assert_eq!(mask.retained_count(), 2);
        assert_eq!(mask.source(), "cond");
        assert!(!mask.is_all_retained());
    }

    #[test]
    fn test_explicit_sentinel_excluded() {
        let grid = strip_grid(vec![("head", vec![1e30, 250.0, f64::INFINITY])]);
        let mask = ValidityFilter::new("head", SentinelRule::with_values([1e30]))
            .mask(&grid)
            .unwrap();
        assert_eq!(mask.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_missing_field() {
        let grid = strip_grid(vec![("k", vec![1.0, 2.0])]);
        let err = ValidityFilter::new("riv_0_cond", SentinelRule::non_finite())
            .mask(&grid)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    }

    #[test]
    fn test_all_mask() {
        let mask = InclusionMask::all(3);
        assert_eq!(mask.len(), 3);
        assert!(mask.is_all_retained());
        assert!(!mask.is_empty());
    }

    proptest! {
        #[test]
        fn mask_length_matches_cell_count(
            values in prop::collection::vec(
                prop_oneof![Just(f64::NAN), Just(f64::INFINITY), -1.0e6f64..1.0e6],
                1..40,
            )
        ) {
            let grid = strip_grid(vec![("f", values.clone())]);
            let mask = ValidityFilter::new("f", SentinelRule::non_finite()).mask(&grid).unwrap();
            prop_assert_eq!(mask.len(), grid.num_cells());
            for (keep, v) in mask.as_slice().iter().zip(&values) {
                prop_assert_eq!(*keep, v.is_finite());
            }
        }
    }
}
