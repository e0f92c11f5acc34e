//! Linear VTK cell kinds and their boundary-face stencils.

/// Shape of a grid cell, numbered as VTK numbers its linear cell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Vertex,
    PolyVertex,
    Line,
    PolyLine,
    Triangle,
    Polygon,
    Pixel,
    Quad,
    Tetra,
    Voxel,
    Hexahedron,
    Wedge,
    Pyramid,
}

impl CellKind {
    /// Looks up a kind by its VTK cell type code.
    pub fn from_vtk(code: u32) -> Option<Self> {
        Some(match code {
            1 => Self::Vertex,
            2 => Self::PolyVertex,
            3 => Self::Line,
            4 => Self::PolyLine,
            5 => Self::Triangle,
            7 => Self::Polygon,
            8 => Self::Pixel,
            9 => Self::Quad,
            10 => Self::Tetra,
            11 => Self::Voxel,
            12 => Self::Hexahedron,
            13 => Self::Wedge,
            14 => Self::Pyramid,
            _ => return None,
        })
    }

    /// Returns the VTK cell type code.
    pub fn vtk_code(self) -> u8 {
        match self {
            Self::Vertex => 1,
            Self::PolyVertex => 2,
            Self::Line => 3,
            Self::PolyLine => 4,
            Self::Triangle => 5,
            Self::Polygon => 7,
            Self::Pixel => 8,
            Self::Quad => 9,
            Self::Tetra => 10,
            Self::Voxel => 11,
            Self::Hexahedron => 12,
            Self::Wedge => 13,
            Self::Pyramid => 14,
        }
    }

    /// Topological dimension (0 for vertices up to 3 for solids).
    pub fn dimension(self) -> u8 {
        match self {
            Self::Vertex | Self::PolyVertex => 0,
            Self::Line | Self::PolyLine => 1,
            Self::Triangle | Self::Polygon | Self::Pixel | Self::Quad => 2,
            Self::Tetra | Self::Voxel | Self::Hexahedron | Self::Wedge | Self::Pyramid => 3,
        }
    }

    /// Returns true if a cell of this kind may have `n` points.
    pub fn accepts_point_count(self, n: usize) -> bool {
        match self {
            Self::Vertex => n == 1,
            Self::PolyVertex => n >= 1,
            Self::Line => n == 2,
            Self::PolyLine => n >= 2,
            Self::Triangle => n == 3,
            Self::Polygon => n >= 3,
            Self::Pixel | Self::Quad | Self::Tetra => n == 4,
            Self::Pyramid => n == 5,
            Self::Wedge => n == 6,
            Self::Voxel | Self::Hexahedron => n == 8,
        }
    }

    /// Boundary faces of a solid cell as local point indices, ordered so the
    /// right-hand normal points out of the cell. Empty for non-solid kinds.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            Self::Tetra => TETRA_FACES,
            Self::Voxel => VOXEL_FACES,
            Self::Hexahedron => HEXAHEDRON_FACES,
            Self::Wedge => WEDGE_FACES,
            Self::Pyramid => PYRAMID_FACES,
            _ => &[],
        }
    }

    /// Local point order that turns a 2-D cell into a simple polygon.
    ///
    /// Pixels store their corners row by row rather than around the boundary.
    pub fn polygon_order(self, n: usize) -> Vec<usize> {
        match self {
            Self::Pixel => vec![0, 1, 3, 2],
            _ => (0..n).collect(),
        }
    }
}

/// VTK cell type code for a polygon of `n` points.
pub fn polygon_type_code(n: usize) -> u8 {
    match n {
        3 => CellKind::Triangle.vtk_code(),
        4 => CellKind::Quad.vtk_code(),
        _ => CellKind::Polygon.vtk_code(),
    }
}

const TETRA_FACES: &[&[usize]] = &[&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[0, 2, 1]];

const VOXEL_FACES: &[&[usize]] = &[
    &[0, 4, 6, 2],
    &[1, 3, 7, 5],
    &[0, 1, 5, 4],
    &[2, 6, 7, 3],
    &[0, 2, 3, 1],
    &[4, 5, 7, 6],
];

const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 4, 7, 3], // Left
    &[1, 2, 6, 5], // Right
    &[0, 1, 5, 4], // Front
    &[3, 7, 6, 2], // Back
    &[0, 3, 2, 1], // Bottom
    &[4, 5, 6, 7], // Top
];

const WEDGE_FACES: &[&[usize]] = &[
    &[0, 1, 2],
    &[3, 5, 4],
    &[0, 3, 4, 1],
    &[1, 4, 5, 2],
    &[2, 5, 3, 0],
];

const PYRAMID_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
];

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CellKind; 13] = [
        CellKind::Vertex,
        CellKind::PolyVertex,
        CellKind::Line,
        CellKind::PolyLine,
        CellKind::Triangle,
        CellKind::Polygon,
        CellKind::Pixel,
        CellKind::Quad,
        CellKind::Tetra,
        CellKind::Voxel,
        CellKind::Hexahedron,
        CellKind::Wedge,
        CellKind::Pyramid,
    ];

    #[test]
    fn test_vtk_codes_roundtrip() {
        for kind in ALL {
            assert_eq!(CellKind::from_vtk(u32::from(kind.vtk_code())), Some(kind));
        }
        assert_eq!(CellKind::from_vtk(6), None); // triangle strip
        assert_eq!(CellKind::from_vtk(42), None); // polyhedron
    }

    #[test]
    fn test_only_solids_have_faces() {
        for kind in ALL {
            assert_eq!(kind.faces().is_empty(), kind.dimension() != 3, "{kind:?}");
        }
    }

    #[test]
    fn test_face_stencils_in_range() {
        for (kind, n) in [
            (CellKind::Tetra, 4),
            (CellKind::Voxel, 8),
            (CellKind::Hexahedron, 8),
            (CellKind::Wedge, 6),
            (CellKind::Pyramid, 5),
        ] {
            assert!(kind.accepts_point_count(n));
            let mut used = vec![false; n];
            for face in kind.faces() {
                for &i in *face {
                    assert!(i < n);
                    used[i] = true;
                }
            }
            assert!(used.iter().all(|&u| u), "{kind:?} leaves a point off every face");
        }
    }

    #[test]
    fn test_point_counts() {
        assert!(CellKind::Polygon.accepts_point_count(7));
        assert!(!CellKind::Polygon.accepts_point_count(2));
        assert!(!CellKind::Hexahedron.accepts_point_count(6));
        assert!(CellKind::PolyLine.accepts_point_count(5));
    }

    #[test]
    fn test_pixel_polygon_order() {
        assert_eq!(CellKind::Pixel.polygon_order(4), vec![0, 1, 3, 2]);
        assert_eq!(CellKind::Quad.polygon_order(4), vec![0, 1, 2, 3]);
        assert_eq!(polygon_type_code(3), 5);
        assert_eq!(polygon_type_code(4), 9);
        assert_eq!(polygon_type_code(6), 7);
    }
}
