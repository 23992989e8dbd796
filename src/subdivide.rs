//! Recursive Menger subdivision.
//!
//! Each level splits a cube into a 3×3×3 grid and keeps the 20 sub-cubes
//! that touch an edge or corner of the parent. The 6 face centers and the
//! body center are dropped. At level 0 the cube itself is emitted.
//!
//! Growth is exponential: a sponge of level `L` has `20^L` leaf cubes,
//! `24 · 20^L` vertices and `36 · 20^L` indices. Callers are expected to cap
//! `L` before generating; see [`SpongeConfig`](crate::SpongeConfig).

use glam::{IVec3, Vec4};

use crate::cube::{INDICES_PER_CUBE, VERTICES_PER_CUBE};
use crate::mesh::MeshAssembler;
use crate::transform::Transform;

/// Sub-cubes kept per subdivision step.
pub const RETAINED_PER_LEVEL: usize = 20;

const THIRD: f32 = 1.0 / 3.0;

/// Grid offsets of the sub-cubes kept at each subdivision step.
///
/// Offsets are in `{-1, 0, 1}³`, ordered with `x` outermost and `z`
/// innermost. An offset is dropped when two or more of its components are
/// zero.
pub fn retained_offsets() -> impl Iterator<Item = IVec3> {
    (-1..=1).flat_map(|i| {
        (-1..=1).flat_map(move |j| {
            (-1..=1)
                .map(move |k| IVec3::new(i, j, k))
                .filter(|offset| offset.to_array().iter().filter(|&&c| c == 0).count() < 2)
        })
    })
}

/// Placement of the sub-cube at `offset` inside `parent`.
///
/// The offset is applied in parent units before shrinking to a third.
pub fn child_transform(parent: &Transform, offset: IVec3) -> Transform {
    parent
        .translated(offset.as_vec3() * THIRD)
        .scaled(THIRD)
}

/// Generates a sponge of `level` inside the cube placed by `transform`.
///
/// Every leaf cube is handed to `out`, one whole cube at a time, in a fixed
/// depth-first order. Recursion depth equals `level`.
pub fn generate(transform: Transform, level: u32, out: &mut MeshAssembler) {
    if level == 0 {
        out.emit_cube(&transform);
        return;
    }

    for offset in retained_offsets() {
        generate(child_transform(&transform, offset), level - 1, out);
    }
}

/// Leaf cubes in a sponge of `level`, or `None` on overflow.
pub fn leaf_count(level: u32) -> Option<usize> {
    RETAINED_PER_LEVEL.checked_pow(level)
}

/// Vertices in a sponge of `level`, or `None` on overflow.
pub fn vertex_count(level: u32) -> Option<usize> {
    leaf_count(level)?.checked_mul(VERTICES_PER_CUBE)
}

/// Triangle indices in a sponge of `level`, or `None` on overflow.
pub fn index_count(level: u32) -> Option<usize> {
    leaf_count(level)?.checked_mul(INDICES_PER_CUBE)
}

/// CPU-side bytes held by a sponge of `level`, or `None` on overflow.
///
/// Counts one `Vec4` position and one `Vec4` normal per vertex plus one
/// `u32` per index.
pub fn mesh_bytes(level: u32) -> Option<usize> {
    let vertex_bytes = vertex_count(level)?.checked_mul(2 * std::mem::size_of::<Vec4>())?;
    let index_bytes = index_count(level)?.checked_mul(std::mem::size_of::<u32>())?;
    vertex_bytes.checked_add(index_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SpongeMesh;
    use glam::Vec3;

    fn build(level: u32) -> SpongeMesh {
        let mut asm = MeshAssembler::with_cube_capacity(leaf_count(level).unwrap());
        generate(Transform::IDENTITY, level, &mut asm);
        asm.finish()
    }

    #[test]
    fn twenty_offsets_kept() {
        let offsets: Vec<_> = retained_offsets().collect();
        assert_eq!(offsets.len(), RETAINED_PER_LEVEL);
        assert!(!offsets.contains(&IVec3::ZERO));
        assert!(!offsets.contains(&IVec3::new(0, 0, 1)));
        assert!(!offsets.contains(&IVec3::new(-1, 0, 0)));
        assert!(offsets.contains(&IVec3::new(1, 1, 0)));
        assert!(offsets.contains(&IVec3::new(-1, -1, -1)));
    }

    #[test]
    fn offsets_order_is_x_major() {
        let offsets: Vec<_> = retained_offsets().collect();
        assert_eq!(offsets[0], IVec3::new(-1, -1, -1));
        assert_eq!(offsets[1], IVec3::new(-1, -1, 0));
        assert_eq!(offsets[19], IVec3::new(1, 1, 1));
    }

    #[test]
    fn growth_law() {
        for level in 0..=2 {
            let mesh = build(level);
            let leaves = 20usize.pow(level);
            assert_eq!(mesh.cube_count(), leaves);
            assert_eq!(mesh.vertex_count(), 24 * leaves);
            assert_eq!(mesh.index_count(), 36 * leaves);
            assert_eq!(Some(mesh.vertex_count()), vertex_count(level));
            assert_eq!(Some(mesh.index_count()), index_count(level));
        }
    }

    #[test]
    fn count_helpers() {
        assert_eq!(leaf_count(4), Some(160_000));
        assert_eq!(vertex_count(4), Some(3_840_000));
        assert_eq!(index_count(4), Some(5_760_000));
        assert_eq!(leaf_count(64), None);
    }

    #[test]
    fn mesh_bytes_counts_all_buffers() {
        assert_eq!(mesh_bytes(0), Some(24 * 32 + 36 * 4));
        assert_eq!(mesh_bytes(4), Some(3_840_000 * 32 + 5_760_000 * 4));
        assert_eq!(mesh_bytes(64), None);
    }

    #[test]
    fn indices_in_range() {
        let mesh = build(2);
        assert_eq!(mesh.index_count() % 3, 0);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn stays_inside_unit_cube() {
        let mesh = build(2);
        let (min, max) = mesh.bounds();
        assert!((min - Vec3::splat(-0.5)).abs().max_element() < 1e-5);
        assert!((max - Vec3::splat(0.5)).abs().max_element() < 1e-5);
    }

    #[test]
    fn face_and_body_centers_removed() {
        let mesh = build(1);
        for cube in mesh.positions().chunks_exact(24) {
            let centroid = cube.iter().map(|p| p.truncate()).sum::<Vec3>() / 24.0;
            let zeros = centroid.to_array().iter().filter(|c| c.abs() < 1e-4).count();
            assert!(zeros < 2, "kept a removed sub-cube at {centroid}");
        }
    }

    #[test]
    fn winding_survives_recursion() {
        for level in 0..=3 {
            let mesh = build(level);
            for (p0, p1, p2, n) in mesh.triangles() {
                let area = (p1 - p0).cross(p2 - p0).dot(n);
                assert!(area > 0.0, "inward triangle at level {level}");
            }
        }
    }

    #[test]
    fn leaf_cube_size() {
        let mesh = build(2);
        let first = &mesh.positions()[..24];
        let (min, max) = first.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.truncate()), hi.max(p.truncate())),
        );
        assert!(((max - min).x - 1.0 / 9.0).abs() < 1e-6);
        // First leaf sits in the (-1, -1, -1) corner of the (-1, -1, -1) corner.
        let center = (min + max) * 0.5;
        let expected = Vec3::splat(-1.0 / 3.0 - 1.0 / 9.0);
        assert!((center - expected).abs().max_element() < 1e-6);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(build(2), build(2));
    }
}
