//! Renderer-ready mesh states.
//!
//! A [`MeshState`] is the hand-off value between the pipeline and the 3-D
//! view: a point buffer, a connectivity buffer, and exactly one attribute
//! buffer with its color range. Construction validates the buffers against
//! each other, so a `MeshState` that exists never carries dangling indices or
//! an attribute buffer of the wrong length.

use glam::DVec3;
use gwmesh_core::options::check_range;
use gwmesh_core::{AttributeLocation, GeometryMode, GwMeshError, Result};
use serde::Serialize;

use crate::color_maps::ColorMapRegistry;

/// A validated `[min, max]` color scale range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    min: f64,
    max: f64,
}

impl ColorRange {
    /// Creates an explicit range. `min` must be strictly below `max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self { min, max })
    }

    /// Derives the range from the finite entries of `values`.
    ///
    /// Returns `None` if no value is finite. A constant field gives `min == max`.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for &v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `[min, max]`.
    pub fn as_array(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// Maps `value` into `[0, 1]`, clamping values outside the range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn normalize(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }
}

/// The single attribute carried by a mesh state.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Source field name.
    pub name: String,
    /// Whether values are aligned to polygons/cells or to points.
    pub location: AttributeLocation,
    /// Attribute values.
    pub values: Vec<f64>,
    /// Color scale range.
    pub color_range: ColorRange,
    /// Color map preset name.
    pub color_map: String,
}

const VTK_VERTEX: u8 = 1;
const VTK_POLY_VERTEX: u8 = 2;
const VTK_LINE: u8 = 3;
const VTK_POLY_LINE: u8 = 4;

/// Renderer-ready geometry plus one attribute buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshState {
    points: Vec<DVec3>,
    connectivity: Vec<Vec<u32>>,
    cell_types: Vec<u8>,
    geometry: GeometryMode,
    field: FieldData,
}

impl MeshState {
    /// Creates a mesh state, validating buffer consistency.
    ///
    /// `cell_types` holds one VTK cell type code per connectivity entry.
    pub fn new(
        points: Vec<DVec3>,
        connectivity: Vec<Vec<u32>>,
        cell_types: Vec<u8>,
        geometry: GeometryMode,
        field: FieldData,
    ) -> Result<Self> {
        let state = Self {
            points,
            connectivity,
            cell_types,
            geometry,
            field,
        };
        state.validate()?;
        Ok(state)
    }

    /// Checks that every index is in range and the attribute length matches
    /// its location.
    pub fn validate(&self) -> Result<()> {
        if self.cell_types.len() != self.connectivity.len() {
            return Err(GwMeshError::MalformedState(format!(
                "{} cell types for {} connectivity entries",
                self.cell_types.len(),
                self.connectivity.len()
            )));
        }

        let num_points = self.points.len();
        for (i, entry) in self.connectivity.iter().enumerate() {
            if entry.is_empty() {
                return Err(GwMeshError::MalformedState(format!(
                    "connectivity entry {i} is empty"
                )));
            }
            if let Some(&idx) = entry.iter().find(|&&idx| idx as usize >= num_points) {
                return Err(GwMeshError::MalformedState(format!(
                    "connectivity entry {i} references point {idx} of {num_points}"
                )));
            }
        }

        let expected = match self.field.location {
            AttributeLocation::Cell => self.connectivity.len(),
            AttributeLocation::Point => num_points,
        };
        if self.field.values.len() != expected {
            return Err(GwMeshError::MalformedState(format!(
                "attribute '{}' has {} values, expected {expected}",
                self.field.name,
                self.field.values.len()
            )));
        }
        Ok(())
    }

    /// Returns the point buffer.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the point buffer as flat `x, y, z` coordinates.
    pub fn flat_points(&self) -> &[f64] {
        bytemuck::cast_slice(&self.points)
    }

    /// Returns the connectivity buffer.
    pub fn connectivity(&self) -> &[Vec<u32>] {
        &self.connectivity
    }

    /// Returns the VTK cell type code of each connectivity entry.
    pub fn cell_types(&self) -> &[u8] {
        &self.cell_types
    }

    /// Returns the geometry mode the state was built with.
    pub fn geometry(&self) -> GeometryMode {
        self.geometry
    }

    /// Returns the attribute.
    pub fn field(&self) -> &FieldData {
        &self.field
    }

    /// Returns the color range.
    pub fn color_range(&self) -> ColorRange {
        self.field.color_range
    }

    /// Returns the number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of connectivity entries: surface primitives or
    /// cells, depending on the geometry mode.
    pub fn num_polys(&self) -> usize {
        self.connectivity.len()
    }

    /// Maps the attribute through its color map, one RGB per value.
    pub fn colors(&self, registry: &ColorMapRegistry) -> Result<Vec<glam::Vec3>> {
        let map = registry
            .get(&self.field.color_map)
            .ok_or_else(|| GwMeshError::UnknownColorMap(self.field.color_map.clone()))?;
        Ok(map.map_values(&self.field.values, self.field.color_range))
    }

    /// Returns a serializable view in the vtk.js mesh-state layout.
    ///
    /// Connectivity is flattened as `[n, i0, .., in-1, n, ...]`. In surface
    /// mode vertex and line cells go to `verts` and `lines`, everything else
    /// to `polys`. Non-finite attribute values serialize as `null`.
    pub fn to_vtk_js(&self) -> VtkJsState<'_> {
        let mut verts = Vec::new();
        let mut lines = Vec::new();
        let mut flat = Vec::with_capacity(
            self.connectivity.len() + self.connectivity.iter().map(Vec::len).sum::<usize>(),
        );
        for (entry, &code) in self.connectivity.iter().zip(&self.cell_types) {
            let target = match (self.geometry, code) {
                (GeometryMode::ExteriorSurface, VTK_VERTEX | VTK_POLY_VERTEX) => &mut verts,
                (GeometryMode::ExteriorSurface, VTK_LINE | VTK_POLY_LINE) => &mut lines,
                _ => &mut flat,
            };
            target.push(entry.len() as u32);
            target.extend_from_slice(entry);
        }
        let non_empty = |buffer: Vec<u32>| (!buffer.is_empty()).then_some(buffer);

        let (polys, cells, cell_types) = match self.geometry {
            GeometryMode::ExteriorSurface => (Some(flat), None, None),
            GeometryMode::Cells => (None, Some(flat), Some(self.cell_types.as_slice())),
        };

        VtkJsState {
            mesh: VtkJsMesh {
                points: self.flat_points(),
                verts: non_empty(verts),
                lines: non_empty(lines),
                polys,
                cells,
                cell_types,
            },
            field: VtkJsField {
                name: &self.field.name,
                location: match self.field.location {
                    AttributeLocation::Cell => "CellData",
                    AttributeLocation::Point => "PointData",
                },
                values: &self.field.values,
                data_range: self.field.color_range.as_array(),
                color_map_preset: &self.field.color_map,
            },
        }
    }

    /// Serializes [`Self::to_vtk_js`] to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_vtk_js())?)
    }
}

/// vtk.js mesh-state view of a [`MeshState`].
#[derive(Debug, Serialize)]
pub struct VtkJsState<'a> {
    pub mesh: VtkJsMesh<'a>,
    pub field: VtkJsField<'a>,
}

/// Geometry part of [`VtkJsState`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VtkJsMesh<'a> {
    pub points: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verts: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polys: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_types: Option<&'a [u8]>,
}

/// Attribute part of [`VtkJsState`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VtkJsField<'a> {
    pub name: &'a str,
    pub location: &'static str,
    pub values: &'a [f64],
    pub data_range: [f64; 2],
    pub color_map_preset: &'a str,
}
