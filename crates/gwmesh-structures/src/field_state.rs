//! Building renderer-ready mesh states from a grid field.

use gwmesh_core::{AttributeLocation, GeometryMode, GwMeshError, LayerOptions, Result};
use gwmesh_render::{ColorMapRegistry, ColorRange, FieldData, MeshState};

use crate::grid::UnstructuredGrid;
use crate::surface::exterior_surface;

/// Turns one field of a grid into a [`MeshState`].
///
/// # Example
///
/// ```rust,ignore
/// let state = FieldStateBuilder::new("riv_0_cond")
///     .color_map("blues")
///     .build(&filtered_grid)?;
/// assert_eq!(state.color_range().as_array(), [3.0, 5.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStateBuilder {
    field: String,
    range: Option<[f64; 2]>,
    location: AttributeLocation,
    geometry: GeometryMode,
    color_map: String,
}

impl FieldStateBuilder {
    /// Creates a builder coloring by `field`, with an automatic range,
    /// cell-aligned values, exterior-surface geometry and the viridis map.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            range: None,
            location: AttributeLocation::Cell,
            geometry: GeometryMode::ExteriorSurface,
            color_map: "viridis".to_string(),
        }
    }

    /// Creates a builder from layer options.
    pub fn from_layer(layer: &LayerOptions) -> Self {
        Self {
            field: layer.field.clone(),
            range: layer.range,
            location: layer.location,
            geometry: layer.geometry,
            color_map: layer.color_map.clone(),
        }
    }

    /// Sets an explicit color range.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }

    /// Sets the attribute location.
    #[must_use]
    pub fn location(mut self, location: AttributeLocation) -> Self {
        self.location = location;
        self
    }

    /// Sets the geometry mode.
    #[must_use]
    pub fn geometry(mut self, geometry: GeometryMode) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the color map preset.
    #[must_use]
    pub fn color_map(mut self, name: impl Into<String>) -> Self {
        self.color_map = name.into();
        self
    }

    /// Returns the field this builder colors by.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Builds the mesh state for `grid`.
    ///
    /// Without an explicit range, the color range spans the finite values of
    /// the field over the cells of `grid`, so values removed by an earlier
    /// extraction never widen it.
    pub fn build(&self, grid: &UnstructuredGrid) -> Result<MeshState> {
        let field = grid.field(&self.field)?;

        let explicit = self
            .range
            .map(|[min, max]| ColorRange::new(min, max))
            .transpose()?;

        if !ColorMapRegistry::new().contains(&self.color_map) {
            return Err(GwMeshError::UnknownColorMap(self.color_map.clone()));
        }

        let color_range = match explicit {
            Some(range) => range,
            None => ColorRange::from_values(field.values())
                .ok_or_else(|| GwMeshError::NoFiniteValues(self.field.clone()))?,
        };

        let point_values = match self.location {
            AttributeLocation::Point => Some(cell_to_point(grid, field.values())),
            AttributeLocation::Cell => None,
        };

        let (points, connectivity, cell_types, values) = match self.geometry {
            GeometryMode::ExteriorSurface => {
                let surface = exterior_surface(grid);
                let values = match &point_values {
                    Some(per_point) => surface
                        .source_points
                        .iter()
                        .map(|&p| per_point[p as usize])
                        .collect(),
                    None => surface
                        .source_cells
                        .iter()
                        .map(|&c| field.values()[c])
                        .collect(),
                };
                (surface.points, surface.polys, surface.poly_types, values)
            }
            GeometryMode::Cells => {
                let connectivity = grid.cells().iter().map(|c| c.points().to_vec()).collect();
                let cell_types = grid.cells().iter().map(|c| c.kind().vtk_code()).collect();
                let values = point_values.unwrap_or_else(|| field.values().to_vec());
                (grid.points().to_vec(), connectivity, cell_types, values)
            }
        };

        log::debug!(
            "mesh state for '{}': {} points, {} polys, range [{}, {}]",
            self.field,
            points.len(),
            connectivity.len(),
            color_range.min(),
            color_range.max()
        );

        MeshState::new(
            points,
            connectivity,
            cell_types,
            self.geometry,
            FieldData {
                name: self.field.clone(),
                location: self.location,
                values,
                color_range,
                color_map: self.color_map.clone(),
            },
        )
    }
}

/// Averages per-cell values onto points.
///
/// Each point takes the mean of the finite values of the cells that use it,
/// or NaN if none of them is finite.
pub fn cell_to_point(grid: &UnstructuredGrid, cell_values: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; grid.num_points()];
    let mut counts = vec![0u32; grid.num_points()];
    for (cell, &value) in grid.cells().iter().zip(cell_values) {
        if !value.is_finite() {
            continue;
        }
        for &idx in cell.points() {
            sums[idx as usize] += value;
            counts[idx as usize] += 1;
        }
    }
    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            if count == 0 {
                f64::NAN
            } else {
                sum / f64::from(count)
            }
        })
        .collect()
}
