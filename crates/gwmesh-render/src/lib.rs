//! Renderer-facing types for gwmesh.
//!
//! The 3-D view that displays the pipeline output is an external component.
//! This crate defines what it receives:
//! - [`MeshState`] - validated geometry and attribute buffers
//! - [`ColorRange`] - the color scale bounds of an attribute
//! - [`ColorMap`] / [`ColorMapRegistry`] - named color map presets

// Documentation lints - internal functions don't need exhaustive error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Point counts stay far below u32::MAX
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod color_maps;
pub mod mesh_state;

pub use color_maps::{ColorMap, ColorMapRegistry, NAN_COLOR};
pub use mesh_state::{ColorRange, FieldData, MeshState, VtkJsState};
