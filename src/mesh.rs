//! CPU-side sponge geometry and the assembler that fills it.
//!
//! - [`SpongeMesh`]: three parallel buffers (positions, normals, indices)
//!   ready to be copied to the GPU as-is
//! - [`MeshAssembler`]: appends one transformed template cube at a time
//!
//! # Buffer Layout
//!
//! | Buffer    | Element        | Per cube | Notes |
//! |-----------|----------------|----------|-------|
//! | positions | `Vec4`, w = 1  | 24       | 4 per face, template face order |
//! | normals   | `Vec4`, w = 0  | 24       | parallel to positions |
//! | indices   | `u32`          | 36       | 2 CCW triangles per face |
//!
//! Invariants held by every mesh produced here: `positions.len() ==
//! normals.len()`, `indices.len() % 3 == 0`, and every index is smaller than
//! the vertex count.

use glam::{Vec3, Vec4};

use crate::cube::{CubeTemplate, Face, INDICES_PER_CUBE, VERTICES_PER_CUBE, VERTICES_PER_FACE};
use crate::transform::Transform;

/// Generated sponge geometry.
///
/// A `SpongeMesh` is built once and never edited afterwards. Regenerating
/// the sponge produces a brand new mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpongeMesh {
    positions: Vec<Vec4>,
    normals: Vec<Vec4>,
    indices: Vec<u32>,
}

impl SpongeMesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty mesh with room for `cubes` leaf cubes.
    pub fn with_cube_capacity(cubes: usize) -> Self {
        Self {
            positions: Vec::with_capacity(cubes * VERTICES_PER_CUBE),
            normals: Vec::with_capacity(cubes * VERTICES_PER_CUBE),
            indices: Vec::with_capacity(cubes * INDICES_PER_CUBE),
        }
    }

    pub fn positions(&self) -> &[Vec4] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec4] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Positions as a flat `[x, y, z, w, x, y, z, w, ...]` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat `[x, y, z, 0, x, y, z, 0, ...]` slice.
    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of template cubes in this mesh.
    pub fn cube_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_CUBE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`.
    ///
    /// Returns infinities for an empty mesh.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for p in &self.positions {
            let p = p.truncate();
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    /// Iterates triangles as `(p0, p1, p2, normal)`.
    pub fn triangles(&self) -> impl Iterator<Item = (Vec3, Vec3, Vec3, Vec3)> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let p = |i: u32| self.positions[i as usize].truncate();
            let normal = self.normals[tri[0] as usize].truncate();
            (p(tri[0]), p(tri[1]), p(tri[2]), normal)
        })
    }
}

/// Appends transformed template cubes to a [`SpongeMesh`].
///
/// Each call to [`emit_cube`](Self::emit_cube) adds exactly one whole cube:
/// 24 vertices, 24 normals and 36 indices.
#[derive(Debug)]
pub struct MeshAssembler {
    mesh: SpongeMesh,
    template: [Vec4; VERTICES_PER_CUBE],
    normals: [Vec4; VERTICES_PER_CUBE],
}

impl Default for MeshAssembler {
    fn default() -> Self {
        Self::with_cube_capacity(0)
    }
}

impl MeshAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// An assembler whose buffers are pre-sized for `cubes` leaf cubes.
    pub fn with_cube_capacity(cubes: usize) -> Self {
        Self {
            mesh: SpongeMesh::with_cube_capacity(cubes),
            template: CubeTemplate::base_vertices(),
            normals: CubeTemplate::base_normals(),
        }
    }

    /// Appends the template cube placed by `transform`.
    ///
    /// Positions go through the transform; normals are copied unchanged since
    /// transforms never rotate.
    pub fn emit_cube(&mut self, transform: &Transform) {
        for face in Face::ALL {
            let start = face.index() * VERTICES_PER_FACE;
            let end = start + VERTICES_PER_FACE;

            let base = u32::try_from(self.mesh.positions.len())
                .expect("sponge vertex count exceeds u32 index range");

            self.mesh
                .positions
                .extend(self.template[start..end].iter().map(|&v| transform.apply(v)));
            self.mesh
                .normals
                .extend_from_slice(&self.normals[start..end]);
            self.mesh
                .indices
                .extend(face.winding().iter().map(|&offset| base + offset));
        }

        debug_assert_eq!(self.mesh.positions.len(), self.mesh.normals.len());
    }

    /// Cubes emitted so far.
    pub fn cube_count(&self) -> usize {
        self.mesh.cube_count()
    }

    /// Finishes assembly and hands over the mesh.
    pub fn finish(self) -> SpongeMesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cube_counts() {
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&Transform::IDENTITY);
        let mesh = asm.finish();

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.normals().len(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.positions_flat().len(), 96);
        assert_eq!(mesh.normals_flat().len(), 96);
    }

    #[test]
    fn first_face_indices() {
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&Transform::IDENTITY);
        let mesh = asm.finish();

        // -Z (even) then +Z (odd), each offset by its first vertex.
        assert_eq!(&mesh.indices()[..6], &[2, 1, 0, 0, 3, 2]);
        assert_eq!(&mesh.indices()[6..12], &[4, 5, 6, 6, 7, 4]);
        assert_eq!(&mesh.indices()[30..], &[20, 21, 22, 22, 23, 20]);
    }

    #[test]
    fn second_cube_offsets_indices() {
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&Transform::IDENTITY);
        asm.emit_cube(&Transform::from_translation(Vec3::X * 2.0));
        let mesh = asm.finish();

        assert_eq!(mesh.cube_count(), 2);
        assert_eq!(mesh.indices()[36], 24 + 2);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn normals_are_not_transformed() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)).scaled(0.25);
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&t);
        let mesh = asm.finish();

        assert_eq!(mesh.normals(), &CubeTemplate::base_normals()[..]);
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::new(0.875, 1.875, 2.875));
        assert_eq!(max, Vec3::new(1.125, 2.125, 3.125));
    }

    #[test]
    fn flat_views_match_vectors() {
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&Transform::from_uniform_scale(2.0));
        let mesh = asm.finish();

        let flat = mesh.positions_flat();
        assert_eq!(&flat[..4], &mesh.positions()[0].to_array());
        assert_eq!(flat[3], 1.0);
        assert_eq!(mesh.normals_flat()[3], 0.0);
    }

    #[test]
    fn emitted_triangles_face_outward() {
        let t = Transform::from_translation(Vec3::new(-0.3, 0.1, 0.7)).scaled(0.5);
        let mut asm = MeshAssembler::new();
        asm.emit_cube(&t);
        let mesh = asm.finish();

        for (p0, p1, p2, n) in mesh.triangles() {
            assert!((p1 - p0).cross(p2 - p0).dot(n) > 0.0);
        }
    }

    #[test]
    fn empty_mesh() {
        let mesh = SpongeMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.positions_flat().len(), 0);
        assert_eq!(mesh.triangles().count(), 0);
    }
}
