//! The unit cube every leaf of the sponge is stamped from.
//!
//! The cube spans -0.5 to 0.5 on all axes. Each face owns four vertices so
//! that every vertex carries the flat normal of its face. Faces are stored in
//! a fixed order, and that order is part of the mesh layout contract:
//!
//! | Index | Face | Normal |
//! |-------|------|--------|
//! | 0     | -Z   | (0, 0, -1) |
//! | 1     | +Z   | (0, 0, 1)  |
//! | 2     | +X   | (1, 0, 0)  |
//! | 3     | -X   | (-1, 0, 0) |
//! | 4     | +Y   | (0, 1, 0)  |
//! | 5     | -Y   | (0, -1, 0) |
//!
//! Opposite faces share the same corner ordering, so the corners of every
//! odd face run counter-clockwise around its outward normal while those of
//! every even face run clockwise. [`Face::winding`] compensates for this.

use glam::Vec4;

/// Number of faces on a cube.
pub const FACES_PER_CUBE: usize = 6;
/// Number of vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 4;
/// Number of vertices emitted per cube.
pub const VERTICES_PER_CUBE: usize = FACES_PER_CUBE * VERTICES_PER_FACE;
/// Number of triangle indices emitted per face (two triangles).
pub const INDICES_PER_FACE: usize = 6;
/// Number of triangle indices emitted per cube.
pub const INDICES_PER_CUBE: usize = FACES_PER_CUBE * INDICES_PER_FACE;

/// One face of the template cube, in template order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    NegZ,
    PosZ,
    PosX,
    NegX,
    PosY,
    NegY,
}

impl Face {
    /// All faces in template order.
    pub const ALL: [Face; FACES_PER_CUBE] = [
        Face::NegZ,
        Face::PosZ,
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
    ];

    /// Position of this face in the template.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Outward unit normal as a direction (`w = 0`).
    pub fn normal(self) -> Vec4 {
        match self {
            Face::NegZ => Vec4::new(0.0, 0.0, -1.0, 0.0),
            Face::PosZ => Vec4::new(0.0, 0.0, 1.0, 0.0),
            Face::PosX => Vec4::new(1.0, 0.0, 0.0, 0.0),
            Face::NegX => Vec4::new(-1.0, 0.0, 0.0, 0.0),
            Face::PosY => Vec4::new(0.0, 1.0, 0.0, 0.0),
            Face::NegY => Vec4::new(0.0, -1.0, 0.0, 0.0),
        }
    }

    /// The four corners of this face on the unit cube (`w = 1`).
    pub fn corners(self) -> [Vec4; VERTICES_PER_FACE] {
        #[rustfmt::skip]
        let corners: [[f32; 3]; VERTICES_PER_FACE] = match self {
            Face::NegZ => [
                [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
            ],
            Face::PosZ => [
                [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
            ],
            Face::PosX => [
                [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5],
            ],
            Face::NegX => [
                [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
            ],
            Face::PosY => [
                [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
            ],
            Face::NegY => [
                [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
            ],
        };
        corners.map(|[x, y, z]| Vec4::new(x, y, z, 1.0))
    }

    /// Index pattern for this face's two triangles, relative to its first vertex.
    ///
    /// Even faces reverse the corner order so every triangle winds
    /// counter-clockwise when seen from outside the cube.
    pub fn winding(self) -> [u32; INDICES_PER_FACE] {
        if self.index() % 2 == 0 {
            [2, 1, 0, 0, 3, 2]
        } else {
            [0, 1, 2, 2, 3, 0]
        }
    }
}

/// Immutable vertex and normal data for a unit cube.
#[derive(Clone, Copy, Debug, Default)]
pub struct CubeTemplate;

impl CubeTemplate {
    /// The 24 template vertices grouped by face in template order.
    pub fn base_vertices() -> [Vec4; VERTICES_PER_CUBE] {
        let mut out = [Vec4::ZERO; VERTICES_PER_CUBE];
        for face in Face::ALL {
            let start = face.index() * VERTICES_PER_FACE;
            out[start..start + VERTICES_PER_FACE].copy_from_slice(&face.corners());
        }
        out
    }

    /// The 24 template normals, parallel to [`CubeTemplate::base_vertices`].
    pub fn base_normals() -> [Vec4; VERTICES_PER_CUBE] {
        let mut out = [Vec4::ZERO; VERTICES_PER_CUBE];
        for face in Face::ALL {
            let start = face.index() * VERTICES_PER_FACE;
            out[start..start + VERTICES_PER_FACE].fill(face.normal());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn template_sizes() {
        assert_eq!(CubeTemplate::base_vertices().len(), 24);
        assert_eq!(CubeTemplate::base_normals().len(), 24);
        assert_eq!(INDICES_PER_CUBE, 36);
    }

    #[test]
    fn corners_lie_on_their_face() {
        for face in Face::ALL {
            let n = face.normal().truncate();
            for corner in face.corners() {
                assert_eq!(corner.w, 1.0);
                // Every corner sits half a unit out along the face normal.
                assert_eq!(corner.truncate().dot(n), 0.5);
            }
        }
    }

    #[test]
    fn normals_are_directions() {
        for n in CubeTemplate::base_normals() {
            assert_eq!(n.w, 0.0);
            assert_eq!(n.truncate().length(), 1.0);
        }
    }

    #[test]
    fn face_order_is_stable() {
        let normals = CubeTemplate::base_normals();
        let expected = [
            Vec3::NEG_Z,
            Vec3::Z,
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
        ];
        for (face, n) in expected.iter().enumerate() {
            assert_eq!(normals[face * VERTICES_PER_FACE].truncate(), *n);
        }
    }

    #[test]
    fn winding_faces_outward() {
        for face in Face::ALL {
            let corners = face.corners();
            let n = face.normal().truncate();
            for tri in face.winding().chunks(3) {
                let p0 = corners[tri[0] as usize].truncate();
                let p1 = corners[tri[1] as usize].truncate();
                let p2 = corners[tri[2] as usize].truncate();
                let area = (p1 - p0).cross(p2 - p0).dot(n);
                assert!(area > 0.0, "{face:?} triangle {tri:?} faces inward");
            }
        }
    }
}
