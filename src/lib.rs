//! # Menger
//!
//! **Procedural Menger sponge meshes, plus a small viewer to look at them.**
//!
//! The core is a recursive generator: each level splits every cube into a
//! 3×3×3 grid and keeps the 20 sub-cubes on its edges and corners. The result
//! is three flat buffers (positions, normals, indices) and a dirty flag that a
//! renderer polls once per frame.
//!
//! ## Quick Start
//!
//! ```
//! use menger::MengerSponge;
//!
//! let mut sponge = MengerSponge::new(0).unwrap();
//! assert_eq!(sponge.positions_flat().len(), 96);
//! assert_eq!(sponge.indices_flat().len(), 36);
//!
//! sponge.set_level(2).unwrap();
//! assert_eq!(sponge.mesh().vertex_count(), 24 * 20 * 20);
//!
//! // Negative and oversized levels are refused without touching the mesh.
//! assert!(sponge.set_level(-1).is_err());
//! assert!(sponge.set_level(9).is_err());
//! assert_eq!(sponge.level(), 2);
//! ```
//!
//! ## Growth
//!
//! | Level | Leaf cubes | Vertices   | Indices    |
//! |-------|------------|------------|------------|
//! | 0     | 1          | 24         | 36         |
//! | 1     | 20         | 480        | 720        |
//! | 2     | 400        | 9,600      | 14,400     |
//! | 3     | 8,000      | 192,000    | 288,000    |
//! | 4     | 160,000    | 3,840,000  | 5,760,000  |
//!
//! Level 4 is the deepest level whose mesh fits in [`MESH_BYTE_BUDGET`] and
//! the hard cap for every sponge; see [`SpongeConfig`].
//!
//! ## Viewer
//!
//! [`run`] opens a wgpu window: number keys `1`–`4` select levels 0–3, left
//! drag orbits, right drag and the scroll wheel zoom, `W`/`A`/`S`/`D` move
//! the camera, the arrow keys pitch and roll it, and `R` resets the view.

mod app;
mod camera;
mod config;
mod controls;
pub mod cube;
mod gpu;
mod input;
mod mesh;
mod orbit_camera;
mod sponge;
mod sponge_pass;
pub mod subdivide;
mod transform;

pub use app::{AppConfig, RunError, run};
pub use camera::Camera;
pub use config::{DEFAULT_MAX_LEVEL, HARD_MAX_LEVEL, MESH_BYTE_BUDGET, SpongeConfig};
pub use controls::LevelBindings;
pub use cube::{CubeTemplate, Face};
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use mesh::{MeshAssembler, SpongeMesh};
pub use orbit_camera::OrbitCamera;
pub use sponge::{MengerSponge, SpongeError};
pub use sponge_pass::{SceneUniforms, SpongePass};
pub use transform::Transform;

// Re-export glam math types for convenience
pub use glam::{IVec3, Mat4, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
