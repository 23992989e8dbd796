//! The sponge state consumed by the renderer.
//!
//! [`MengerSponge`] owns the current level, the generated [`SpongeMesh`] and a
//! dirty flag. Changing the level regenerates the whole mesh synchronously and
//! raises the flag; the renderer copies the flat buffers to the GPU and then
//! lowers it with [`MengerSponge::set_clean`].
//!
//! ```
//! use menger::MengerSponge;
//!
//! let mut sponge = MengerSponge::new(0).unwrap();
//! sponge.set_level(1).unwrap();
//!
//! // Once per frame in the render loop:
//! if sponge.is_dirty() {
//!     let positions = sponge.positions_flat();
//!     let normals = sponge.normals_flat();
//!     let indices = sponge.indices_flat();
//!     assert_eq!(positions.len(), 1920);
//!     assert_eq!(normals.len(), 1920);
//!     assert_eq!(indices.len(), 720);
//!     // ...upload...
//!     sponge.set_clean();
//! }
//! ```

use std::time::Instant;

use thiserror::Error;

use crate::config::{self, SpongeConfig};
use crate::mesh::{MeshAssembler, SpongeMesh};
use crate::subdivide;
use crate::transform::Transform;

/// Reasons a level change is refused.
///
/// A refused change leaves the sponge exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpongeError {
    #[error("sponge level must be non-negative, got {0}")]
    NegativeLevel(i32),
    #[error("sponge level {level} exceeds the maximum of {max}")]
    LevelTooDeep { level: u32, max: u32 },
}

/// A Menger sponge mesh at a chosen recursion level.
#[derive(Debug)]
pub struct MengerSponge {
    level: u32,
    max_level: u32,
    dirty: bool,
    mesh: SpongeMesh,
}

impl MengerSponge {
    /// Creates a sponge at `level` with the default limits.
    pub fn new(level: i32) -> Result<Self, SpongeError> {
        let mut sponge = Self::empty(SpongeConfig::default());
        sponge.set_level(level)?;
        Ok(sponge)
    }

    /// Creates a sponge at the configured initial level, enforcing the
    /// configured cap.
    ///
    /// The cap never exceeds [`HARD_MAX_LEVEL`](crate::HARD_MAX_LEVEL).
    pub fn with_config(config: SpongeConfig) -> Result<Self, SpongeError> {
        let mut sponge = Self::empty(config);
        let mesh = sponge.build(config.initial_level())?;
        sponge.replace(config.initial_level(), mesh);
        Ok(sponge)
    }

    fn empty(config: SpongeConfig) -> Self {
        Self {
            level: 0,
            max_level: config.clamped().max_level(),
            dirty: true,
            mesh: SpongeMesh::new(),
        }
    }

    /// Regenerates the mesh at `level`.
    ///
    /// Runs to completion before returning. On error nothing changes: the
    /// previous level, mesh and dirty flag are kept.
    pub fn set_level(&mut self, level: i32) -> Result<(), SpongeError> {
        let level = u32::try_from(level).map_err(|_| {
            log::warn!("rejecting negative sponge level {}", level);
            SpongeError::NegativeLevel(level)
        })?;
        let mesh = self.build(level)?;
        self.replace(level, mesh);
        Ok(())
    }

    fn build(&self, level: u32) -> Result<SpongeMesh, SpongeError> {
        let leaves = match subdivide::leaf_count(level) {
            Some(leaves) if level <= self.max_level && config::within_budget(level) => leaves,
            _ => {
                log::warn!(
                    "rejecting sponge level {} (max {})",
                    level,
                    self.max_level
                );
                return Err(SpongeError::LevelTooDeep {
                    level,
                    max: self.max_level,
                });
            }
        };

        log::debug!("generating sponge level {} ({} leaf cubes)", level, leaves);
        let start = Instant::now();

        let mut assembler = MeshAssembler::with_cube_capacity(leaves);
        subdivide::generate(Transform::IDENTITY, level, &mut assembler);
        let mesh = assembler.finish();

        assert_eq!(mesh.cube_count(), leaves);
        log::info!(
            "sponge level {}: {} cubes, {} vertices, {} indices in {:.2?}",
            level,
            leaves,
            mesh.vertex_count(),
            mesh.index_count(),
            start.elapsed()
        );

        Ok(mesh)
    }

    fn replace(&mut self, level: u32, mesh: SpongeMesh) {
        self.level = level;
        self.mesh = mesh;
        self.dirty = true;
    }

    /// True when the mesh changed since the last [`set_clean`](Self::set_clean).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the current mesh as consumed by the renderer.
    pub fn set_clean(&mut self) {
        self.dirty = false;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn mesh(&self) -> &SpongeMesh {
        &self.mesh
    }

    /// Vertex positions, 4 floats per vertex.
    pub fn positions_flat(&self) -> &[f32] {
        self.mesh.positions_flat()
    }

    /// Vertex normals, 4 floats per vertex.
    pub fn normals_flat(&self) -> &[f32] {
        self.mesh.normals_flat()
    }

    /// Triangle indices, 3 per triangle.
    pub fn indices_flat(&self) -> &[u32] {
        self.mesh.indices()
    }
}
