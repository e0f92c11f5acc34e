//! Exterior surface extraction.
//!
//! A face of a solid cell is exterior when no other solid cell shares it.
//! Shared faces are found by hashing the sorted point indices of every face
//! and counting occurrences. 2-D cells are surface polygons already and pass
//! through, as do vertex and line cells.

use std::collections::HashMap;

use glam::DVec3;

use crate::grid::{polygon_type_code, UnstructuredGrid};

/// Polygonal boundary of a grid, with back-references into the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Surface points, in original grid order.
    pub points: Vec<DVec3>,
    /// Surface primitives as indices into `points`: vertices first, then
    /// lines, then polygons.
    pub polys: Vec<Vec<u32>>,
    /// VTK cell type code of each primitive.
    pub poly_types: Vec<u8>,
    /// Grid cell each primitive came from.
    pub source_cells: Vec<usize>,
    /// Grid point index of each surface point.
    pub source_points: Vec<u32>,
}

/// Canonical key of a face: its point indices, sorted.
fn canonical_face_key(face: &[u32]) -> Vec<u32> {
    let mut key = face.to_vec();
    key.sort_unstable();
    key
}

/// Counts how many solid cells use each face.
fn compute_face_counts(grid: &UnstructuredGrid) -> HashMap<Vec<u32>, usize> {
    let mut face_counts: HashMap<Vec<u32>, usize> = HashMap::new();
    for cell in grid.cells() {
        let points = cell.points();
        for face in cell.kind().faces() {
            let global: Vec<u32> = face.iter().map(|&i| points[i]).collect();
            *face_counts.entry(canonical_face_key(&global)).or_insert(0) += 1;
        }
    }
    face_counts
}

#[derive(Default)]
struct Primitives {
    conn: Vec<Vec<u32>>,
    types: Vec<u8>,
    sources: Vec<usize>,
}

impl Primitives {
    fn push(&mut self, conn: Vec<u32>, code: u8, source: usize) {
        self.conn.push(conn);
        self.types.push(code);
        self.sources.push(source);
    }

    fn len(&self) -> usize {
        self.conn.len()
    }

    fn is_empty(&self) -> bool {
        self.conn.is_empty()
    }
}

/// Extracts the exterior surface of `grid`.
pub fn exterior_surface(grid: &UnstructuredGrid) -> SurfaceMesh {
    let face_counts = compute_face_counts(grid);

    // Vertices, lines and polygons, kept apart so the output is grouped
    let mut groups: [Primitives; 3] = Default::default();

    for (cell_idx, cell) in grid.cells().iter().enumerate() {
        let points = cell.points();
        match cell.kind().dimension() {
            3 => {
                for face in cell.kind().faces() {
                    let global: Vec<u32> = face.iter().map(|&i| points[i]).collect();
                    if face_counts[&canonical_face_key(&global)] == 1 {
                        let code = polygon_type_code(global.len());
                        groups[2].push(global, code, cell_idx);
                    }
                }
            }
            2 => {
                let global: Vec<u32> = cell
                    .kind()
                    .polygon_order(points.len())
                    .into_iter()
                    .map(|i| points[i])
                    .collect();
                let code = polygon_type_code(global.len());
                groups[2].push(global, code, cell_idx);
            }
            dim => {
                groups[usize::from(dim)].push(points.to_vec(), cell.kind().vtk_code(), cell_idx);
            }
        }
    }

    let [verts, lines, faces] = groups;
    if !verts.is_empty() || !lines.is_empty() {
        log::debug!(
            "surface keeps {} vertex and {} line cells",
            verts.len(),
            lines.len()
        );
    }
    let mut polys = Vec::new();
    let mut poly_types = Vec::new();
    let mut source_cells = Vec::new();
    for group in [verts, lines, faces] {
        polys.extend(group.conn);
        poly_types.extend(group.types);
        source_cells.extend(group.sources);
    }

    // Compact to the points the surface uses, keeping grid order
    let mut remap = vec![u32::MAX; grid.num_points()];
    for poly in &polys {
        for &idx in poly {
            remap[idx as usize] = 0;
        }
    }
    let mut points = Vec::new();
    let mut source_points = Vec::new();
    for (old_idx, slot) in remap.iter_mut().enumerate() {
        if *slot != u32::MAX {
            *slot = points.len() as u32;
            points.push(grid.points()[old_idx]);
            source_points.push(old_idx as u32);
        }
    }
    for poly in &mut polys {
        for idx in poly.iter_mut() {
            *idx = remap[*idx as usize];
        }
    }

    SurfaceMesh {
        points,
        polys,
        poly_types,
        source_cells,
        source_points,
    }
}
