//! Grid structures and processing stages for gwmesh.
//!
//! This crate provides the pipeline stages that run on an unstructured grid:
//! - Loading legacy VTK snapshots ([`load_vtk`])
//! - Validity filtering of a per-cell field ([`ValidityFilter`])
//! - Threshold extraction of the retained cells ([`extract`])
//! - Exterior surface extraction ([`exterior_surface`])
//! - Building renderer-ready mesh states ([`FieldStateBuilder`])

// Mesh indices are u32 and point counts stay far below u32::MAX
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod field_state;
pub mod grid;
pub mod io;
pub mod surface;
pub mod threshold;
pub mod validity;

pub use field_state::{cell_to_point, FieldStateBuilder};
pub use grid::{Cell, CellKind, ScalarField, UnstructuredGrid};
pub use io::{load_vtk, parse_vtk};
pub use surface::{exterior_surface, SurfaceMesh};
pub use threshold::extract;
pub use validity::{InclusionMask, ValidityFilter};
