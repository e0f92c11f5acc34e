//! gwmesh: turns groundwater-model mesh snapshots into render layers.
//!
//! A snapshot is a legacy VTK unstructured grid with per-cell fields such as
//! hydraulic conductivity (`k`) or river conductance (`riv_0_cond`). The
//! pipeline loads it, optionally removes the cells whose field value is
//! invalid, and builds one [`MeshState`] per configured layer for a 3-D view.
//!
//! # Quick Start
//!
//! ```no_run
//! use gwmesh::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     // Geology on `k`, then the river on `riv_0_cond` with NaN cells removed
//!     let scene = Pipeline::new(PipelineOptions::default()).run()?;
//!     for layer in &scene {
//!         println!("{}: {} polygons", layer.name, layer.state.num_polys());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Stages
//!
//! - [`load_vtk`] - read a snapshot into an [`UnstructuredGrid`]
//! - [`ValidityFilter`] - flag the cells whose value passes a [`SentinelRule`]
//! - [`extract`] - keep the flagged cells, pruning unused points
//! - [`FieldStateBuilder`] - build the renderer-ready [`MeshState`]

// Documentation lints - internal functions don't need exhaustive error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod pipeline;
pub mod state;

pub use gwmesh_core::{
    options::check_range, AttributeLocation, ErrorKind, GeometryMode, GwMeshError, LayerOptions,
    PipelineOptions, Result, SentinelRule,
};
pub use gwmesh_render::{ColorMap, ColorMapRegistry, ColorRange, FieldData, MeshState, VtkJsState};
pub use gwmesh_structures::{
    cell_to_point, exterior_surface, extract, load_vtk, parse_vtk, Cell, CellKind,
    FieldStateBuilder, InclusionMask, ScalarField, SurfaceMesh, UnstructuredGrid, ValidityFilter,
};

pub use glam::{DVec3, Vec3};

pub use pipeline::{Layer, Pipeline, Scene};
pub use state::{init, init_with_scene, is_initialized, scene};

/// Starts `env_logger` from `RUST_LOG`. Repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
