//! Unstructured grid with named per-cell scalar fields.
//!
//! # Overview
//!
//! An [`UnstructuredGrid`] holds an ordered point list, an ordered cell list
//! (each cell an explicit list of point indices, shapes may be mixed) and a
//! map from field name to one value per cell.
//!
//! Grids are immutable. The only constructor, [`UnstructuredGrid::new`],
//! checks that every cell's point indices are in range, that every cell has a
//! legal point count for its kind, and that every field has exactly one value
//! per cell. Everything downstream relies on those invariants.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use glam::DVec3;
//! use gwmesh_structures::{Cell, CellKind, UnstructuredGrid};
//!
//! let points = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
//! let cells = vec![Cell::new(CellKind::Tetra, vec![0, 1, 2, 3])];
//! let mut fields = BTreeMap::new();
//! fields.insert("k".to_string(), vec![12.5]);
//!
//! let grid = UnstructuredGrid::new(points, cells, fields).unwrap();
//! assert_eq!(grid.num_cells(), 1);
//! ```

mod cell_kind;

pub use cell_kind::{polygon_type_code, CellKind};

use std::collections::BTreeMap;

use glam::DVec3;
use gwmesh_core::{GwMeshError, Result};

/// One grid cell: a shape and its point indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    points: Vec<u32>,
}

impl Cell {
    /// Creates a cell. Point counts are checked when the cell joins a grid.
    pub fn new(kind: CellKind, points: Vec<u32>) -> Self {
        Self { kind, points }
    }

    /// Returns the cell kind.
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Returns the point indices.
    pub fn points(&self) -> &[u32] {
        &self.points
    }
}

/// A borrowed per-cell field.
#[derive(Debug, Clone, Copy)]
pub struct ScalarField<'a> {
    name: &'a str,
    values: &'a [f64],
}

impl<'a> ScalarField<'a> {
    /// Field name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// One value per cell.
    pub fn values(&self) -> &'a [f64] {
        self.values
    }
}

/// Immutable mesh of points, mixed-shape cells and per-cell fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredGrid {
    points: Vec<DVec3>,
    cells: Vec<Cell>,
    fields: BTreeMap<String, Vec<f64>>,
}

impl UnstructuredGrid {
    /// Creates a grid, validating topology and field lengths.
    pub fn new(
        points: Vec<DVec3>,
        cells: Vec<Cell>,
        fields: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        let num_points = points.len();
        for (cell_idx, cell) in cells.iter().enumerate() {
            if !cell.kind.accepts_point_count(cell.points.len()) {
                return Err(GwMeshError::InvalidTopology {
                    cell: cell_idx,
                    reason: format!(
                        "{:?} cannot have {} points",
                        cell.kind,
                        cell.points.len()
                    ),
                });
            }
            if let Some(&idx) = cell.points.iter().find(|&&idx| idx as usize >= num_points) {
                return Err(GwMeshError::InvalidTopology {
                    cell: cell_idx,
                    reason: format!("point index {idx} out of range (grid has {num_points} points)"),
                });
            }
        }

        for (name, values) in &fields {
            if values.len() != cells.len() {
                return Err(GwMeshError::FieldLength {
                    field: name.clone(),
                    expected: cells.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(Self {
            points,
            cells,
            fields,
        })
    }

    /// Returns the number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns the points.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns true if a field with this name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Result<ScalarField<'_>> {
        self.fields
            .get_key_value(name)
            .map(|(name, values)| ScalarField { name, values })
            .ok_or_else(|| GwMeshError::FieldNotFound(name.to_string()))
    }

    /// Returns the field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.fields
    }

    /// Marks each point that at least one cell references.
    pub fn referenced_points(&self) -> Vec<bool> {
        let mut referenced = vec![false; self.points.len()];
        for cell in &self.cells {
            for &idx in &cell.points {
                referenced[idx as usize] = true;
            }
        }
        referenced
    }
}
