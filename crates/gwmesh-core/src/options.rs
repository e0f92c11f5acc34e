//! Configuration options for the gwmesh pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GwMeshError, Result};
use crate::sentinel::SentinelRule;

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Path of the legacy VTK unstructured-grid snapshot.
    pub snapshot: PathBuf,

    /// Render layers, in stacking order (first is drawn first).
    pub layers: Vec<LayerOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("data/raspad/data_000000.vtk"),
            layers: vec![
                LayerOptions::new("geology", "k"),
                LayerOptions::new("river", "riv_0_cond").with_filter(SentinelRule::non_finite()),
            ],
        }
    }
}

impl PipelineOptions {
    /// Parses options from a JSON string and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file and validates them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GwMeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("read pipeline options from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Checks the options without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(GwMeshError::Config("no layers configured".into()));
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.name.as_str()) {
                return Err(GwMeshError::Config(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
            if layer.field.is_empty() {
                return Err(GwMeshError::Config(format!(
                    "layer '{}' has an empty field name",
                    layer.name
                )));
            }
            if let Some([min, max]) = layer.range {
                check_range(min, max)?;
            }
        }
        Ok(())
    }
}

/// Options for one stacked render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// Layer name, unique within a pipeline.
    pub name: String,

    /// Per-cell field to color by.
    pub field: String,

    /// When set, cells whose value of `field` is invalid are removed first.
    pub filter: Option<SentinelRule>,

    /// Explicit `[min, max]` color range. Derived from the data when unset.
    pub range: Option<[f64; 2]>,

    /// Where the attribute buffer is aligned.
    pub location: AttributeLocation,

    /// Which geometry is emitted.
    pub geometry: GeometryMode,

    /// Name of the color map preset.
    pub color_map: String,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            field: String::new(),
            filter: None,
            range: None,
            location: AttributeLocation::Cell,
            geometry: GeometryMode::ExteriorSurface,
            color_map: "viridis".to_string(),
        }
    }
}

impl LayerOptions {
    /// Creates an unfiltered layer colored by `field`.
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            ..Self::default()
        }
    }

    /// Removes cells that fail `rule` before building the layer.
    #[must_use]
    pub fn with_filter(mut self, rule: SentinelRule) -> Self {
        self.filter = Some(rule);
        self
    }

    /// Sets an explicit color range.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }

    /// Sets the attribute location.
    #[must_use]
    pub fn with_location(mut self, location: AttributeLocation) -> Self {
        self.location = location;
        self
    }

    /// Sets the geometry mode.
    #[must_use]
    pub fn with_geometry(mut self, geometry: GeometryMode) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the color map preset.
    #[must_use]
    pub fn with_color_map(mut self, name: impl Into<String>) -> Self {
        self.color_map = name.into();
        self
    }
}

/// Where attribute values live in a mesh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeLocation {
    /// One value per emitted polygon or cell.
    #[default]
    Cell,
    /// One value per point, averaged from the cells using it.
    Point,
}

/// Which geometry a mesh state carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeometryMode {
    /// Boundary faces of the volume (plus 2-D cells).
    #[default]
    ExteriorSurface,
    /// The grid's own cells.
    Cells,
}

/// Validates an explicit color range.
pub fn check_range(min: f64, max: f64) -> Result<()> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(GwMeshError::InvalidRange { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_layers() {
        let options = PipelineOptions::default();
        assert_eq!(options.layers.len(), 2);
        assert_eq!(options.layers[0].field, "k");
        assert!(options.layers[0].filter.is_none());
        assert_eq!(options.layers[1].field, "riv_0_cond");
        assert!(options.layers[1].filter.is_some());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "snapshot": "model.vtk",
            "layers": [
                { "name": "heads", "field": "head", "range": [250.0, 500.0] },
                { "name": "wells", "field": "wel_q", "filter": { "values": [1e30] },
                  "location": "point", "geometry": "cells", "color_map": "coolwarm" }
            ]
        }"#;
        let options = PipelineOptions::from_json_str(json).unwrap();
        assert_eq!(options.snapshot, PathBuf::from("model.vtk"));
        assert_eq!(options.layers[0].range, Some([250.0, 500.0]));
        assert_eq!(options.layers[0].color_map, "viridis");
        assert_eq!(options.layers[1].location, AttributeLocation::Point);
        assert_eq!(options.layers[1].geometry, GeometryMode::Cells);
        assert_eq!(
            options.layers[1].filter,
            Some(SentinelRule::with_values([1e30]))
        );
    }

    #[test]
    fn test_duplicate_layer_names_rejected() {
        let options = PipelineOptions {
            snapshot: PathBuf::from("x.vtk"),
            layers: vec![LayerOptions::new("a", "k"), LayerOptions::new("a", "h")],
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_empty_layers_rejected() {
        let options = PipelineOptions {
            snapshot: PathBuf::from("x.vtk"),
            layers: Vec::new(),
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let options = PipelineOptions {
            snapshot: PathBuf::from("x.vtk"),
            layers: vec![LayerOptions::new("a", "k").with_range(5.0, 1.0)],
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(0.0, 1.0).is_ok());
        assert!(check_range(1.0, 1.0).is_err());
        assert!(check_range(f64::NAN, 1.0).is_err());
        assert!(check_range(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineOptions::from_json_file("/nonexistent/gwmesh.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }
}
