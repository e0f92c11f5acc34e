//! Error types for gwmesh.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for gwmesh operations.
#[derive(Error, Debug)]
pub enum GwMeshError {
    /// The snapshot file could not be opened or read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is malformed.
    #[error("failed to parse '{origin}' at line {line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },

    /// The snapshot declares a cell type the loader does not handle.
    #[error("cell {cell} has unsupported VTK cell type {code}")]
    UnsupportedCellType { cell: usize, code: u32 },

    /// A cell's connectivity is inconsistent with the grid.
    #[error("cell {cell} has invalid topology: {reason}")]
    InvalidTopology { cell: usize, reason: String },

    /// A per-cell field has the wrong number of values.
    #[error("field '{field}' has {actual} values, expected one per cell ({expected})")]
    FieldLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A requested field is absent from the grid.
    #[error("field '{0}' not found on grid")]
    FieldNotFound(String),

    /// Extraction removed every cell.
    #[error("no cells of field '{0}' passed the validity filter")]
    EmptyResult(String),

    /// An explicit color range is not strictly increasing or not finite.
    #[error("invalid color range [{min}, {max}]: min must be finite and below max")]
    InvalidRange { min: f64, max: f64 },

    /// A field has no finite value to derive a color range from.
    #[error("field '{0}' has no finite values to derive a color range from")]
    NoFiniteValues(String),

    /// A color map with the given name is not registered.
    #[error("color map '{0}' not found")]
    UnknownColorMap(String),

    /// A built mesh state violates its own buffer invariants.
    #[error("malformed mesh state: {0}")]
    MalformedState(String),

    /// Invalid pipeline configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The process-wide scene has already been built.
    #[error("scene already initialized")]
    AlreadyInitialized,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`GwMeshError`], used by viewers to pick an
/// error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unreadable snapshot or inconsistent topology.
    Load,
    /// Requested field absent from a grid.
    FieldNotFound,
    /// Extraction left zero cells.
    EmptyResult,
    /// Invalid or underivable color range.
    Range,
    /// Bad configuration or misuse of the process-wide state.
    Config,
    /// Broken internal invariant.
    Internal,
}

impl GwMeshError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. }
            | Self::Parse { .. }
            | Self::UnsupportedCellType { .. }
            | Self::InvalidTopology { .. }
            | Self::FieldLength { .. } => ErrorKind::Load,
            Self::FieldNotFound(_) => ErrorKind::FieldNotFound,
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::InvalidRange { .. } | Self::NoFiniteValues(_) => ErrorKind::Range,
            Self::UnknownColorMap(_)
            | Self::Config(_)
            | Self::AlreadyInitialized
            | Self::Json(_) => ErrorKind::Config,
            Self::MalformedState(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a parse error.
    pub fn parse(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }
}

/// A specialized Result type for gwmesh operations.
pub type Result<T> = std::result::Result<T, GwMeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_buckets() {
        assert_eq!(
            GwMeshError::parse("grid.vtk", 3, "bad token").kind(),
            ErrorKind::Load
        );
        assert_eq!(
            GwMeshError::FieldNotFound("k".into()).kind(),
            ErrorKind::FieldNotFound
        );
        assert_eq!(
            GwMeshError::EmptyResult("riv".into()).kind(),
            ErrorKind::EmptyResult
        );
        assert_eq!(
            GwMeshError::InvalidRange { min: 1.0, max: 1.0 }.kind(),
            ErrorKind::Range
        );
        assert_eq!(GwMeshError::AlreadyInitialized.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_parse_message() {
        let err = GwMeshError::parse("grid.vtk", 7, "expected CELLS");
        assert_eq!(
            err.to_string(),
            "failed to parse 'grid.vtk' at line 7: expected CELLS"
        );
    }
}
