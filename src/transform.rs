//! Placement transforms for sub-cubes.
//!
//! A [`Transform`] is an immutable 4×4 affine matrix built only from
//! translations and uniform scales. Composition always right-multiplies the
//! parent by the child, so a chain reads outermost-first:
//!
//! ```
//! use menger::{Transform, Vec3, Vec4};
//!
//! // Move a third of a unit along +X, then shrink to a third.
//! let child = Transform::IDENTITY
//!     .translated(Vec3::new(1.0 / 3.0, 0.0, 0.0))
//!     .scaled(1.0 / 3.0);
//!
//! let corner = child.apply(Vec4::new(0.5, 0.5, 0.5, 1.0));
//! assert!((corner.x - 0.5).abs() < 1e-6);
//! ```
//!
//! Because there is never any rotation or shear, direction vectors such as
//! face normals keep their orientation under every transform in this crate
//! and do not need an inverse-transpose correction.

use glam::{Mat4, Vec3, Vec4};

/// Composed translation and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The transform that leaves every point where it is.
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    /// Creates a new identity transform.
    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// A transform that only translates.
    pub fn from_translation(offset: Vec3) -> Self {
        Self {
            matrix: Mat4::from_translation(offset),
        }
    }

    /// A transform that only scales, uniformly on all axes.
    pub fn from_uniform_scale(factor: f32) -> Self {
        Self {
            matrix: Mat4::from_scale(Vec3::splat(factor)),
        }
    }

    /// Returns `self ∘ other`: `other` is applied first, in `self`'s frame.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Returns `self ∘ translate(offset)`.
    ///
    /// The offset is expressed in this transform's local units.
    pub fn translated(&self, offset: Vec3) -> Self {
        self.then(&Self::from_translation(offset))
    }

    /// Returns `self ∘ scale(factor)`.
    pub fn scaled(&self, factor: f32) -> Self {
        self.then(&Self::from_uniform_scale(factor))
    }

    /// Applies the transform to a homogeneous vector.
    ///
    /// Points (`w = 1`) are scaled and translated; directions (`w = 0`)
    /// are only scaled.
    pub fn apply(&self, v: Vec4) -> Vec4 {
        self.matrix * v
    }
}
