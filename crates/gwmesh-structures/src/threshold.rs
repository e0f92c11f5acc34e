//! Threshold extraction: keeping only the cells an inclusion mask retains.

use std::collections::BTreeMap;

use gwmesh_core::{GwMeshError, Result};

use crate::grid::{Cell, UnstructuredGrid};
use crate::validity::InclusionMask;

/// Sentinel for points that do not survive extraction.
const DROPPED: u32 = u32::MAX;

/// Extracts the cells of `grid` retained by `mask`.
///
/// Cells keep their relative order and every field is subset identically.
/// Points referenced by no retained cell are dropped, the rest keep their
/// relative order and cell connectivity is renumbered to match.
///
/// Returns `EmptyResult` if the mask retains no cell.
///
/// # Panics
///
/// Panics if `mask.len() != grid.num_cells()`; a mask must come from the
/// grid it is applied to.
pub fn extract(grid: &UnstructuredGrid, mask: &InclusionMask) -> Result<UnstructuredGrid> {
    assert_eq!(
        mask.len(),
        grid.num_cells(),
        "inclusion mask from '{}' does not match the grid's cell count",
        mask.source()
    );

    let keep = mask.as_slice();
    if !keep.iter().any(|&k| k) {
        return Err(GwMeshError::EmptyResult(mask.source().to_string()));
    }

    // Mark points used by retained cells
    let mut remap = vec![DROPPED; grid.num_points()];
    for (cell, _) in grid.cells().iter().zip(keep).filter(|&(_, &k)| k) {
        for &idx in cell.points() {
            remap[idx as usize] = 0;
        }
    }

    // Assign new indices in original point order
    let mut points = Vec::new();
    for (old_idx, slot) in remap.iter_mut().enumerate() {
        if *slot != DROPPED {
            *slot = points.len() as u32;
            points.push(grid.points()[old_idx]);
        }
    }

    let cells: Vec<Cell> = grid
        .cells()
        .iter()
        .zip(keep)
        .filter(|&(_, &k)| k)
        .map(|(cell, _)| {
            Cell::new(
                cell.kind(),
                cell.points().iter().map(|&idx| remap[idx as usize]).collect(),
            )
        })
        .collect();

    let fields: BTreeMap<String, Vec<f64>> = grid
        .fields()
        .iter()
        .map(|(name, values)| {
            let subset = values
                .iter()
                .zip(keep)
                .filter(|&(_, &k)| k)
                .map(|(&v, _)| v)
                .collect();
            (name.clone(), subset)
        })
        .collect();

    log::debug!(
        "extracted {} of {} cells ({} of {} points) by '{}'",
        cells.len(),
        grid.num_cells(),
        points.len(),
        grid.num_points(),
        mask.source()
    );

    UnstructuredGrid::new(points, cells, fields)
}
