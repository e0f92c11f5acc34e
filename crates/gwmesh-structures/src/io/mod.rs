//! Snapshot loading.
//!
//! Groundwater model runs write one legacy VTK unstructured-grid file per
//! output step. [`load_vtk`] reads one such snapshot into an
//! [`UnstructuredGrid`], keeping every single-component cell array as a
//! named field.

mod vtk_legacy;

pub use vtk_legacy::parse_vtk;

use std::path::Path;

use gwmesh_core::{GwMeshError, Result};

use crate::grid::UnstructuredGrid;

/// Loads a legacy VTK unstructured-grid snapshot from disk.
pub fn load_vtk(path: impl AsRef<Path>) -> Result<UnstructuredGrid> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| GwMeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = parse_vtk(&data, &path.display().to_string())?;
    log::info!(
        "loaded '{}': {} points, {} cells, fields [{}]",
        path.display(),
        grid.num_points(),
        grid.num_cells(),
        grid.field_names().collect::<Vec<_>>().join(", ")
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwmesh_core::ErrorKind;

    #[test]
    fn test_missing_file() {
        let err = load_vtk("/nonexistent/raspad/data_000000.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("data_000000.vtk"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_000000.vtk");
        std::fs::write(
            &path,
            "# vtk DataFile Version 3.0\n\
             single tet\n\
             ASCII\n\
             DATASET UNSTRUCTURED_GRID\n\
             POINTS 4 double\n\
             0 0 0 1 0 0 0 1 0 0 0 1\n\
             CELLS 1 5\n\
             4 0 1 2 3\n\
             CELL_TYPES 1\n\
             10\n\
             CELL_DATA 1\n\
             SCALARS k double 1\n\
             LOOKUP_TABLE default\n\
             7.5\n",
        )
        .unwrap();

        let grid = load_vtk(&path).unwrap();
        assert_eq!(grid.num_cells(), 1);
        assert_eq!(grid.field("k").unwrap().values(), &[7.5]);
    }
}
