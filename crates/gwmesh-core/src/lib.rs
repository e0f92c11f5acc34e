//! Core types for gwmesh.
//!
//! This crate provides the pieces shared by every stage of the mesh pipeline:
//! - [`GwMeshError`] and its [`ErrorKind`] taxonomy
//! - [`PipelineOptions`] / [`LayerOptions`] configuration, loadable from JSON
//! - [`SentinelRule`] for detecting invalid per-cell values

// Documentation lints - internal functions don't need exhaustive error docs
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod options;
pub mod sentinel;

pub use error::{ErrorKind, GwMeshError, Result};
pub use options::{AttributeLocation, GeometryMode, LayerOptions, PipelineOptions};
pub use sentinel::SentinelRule;
