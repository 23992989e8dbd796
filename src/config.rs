//! Generation limits and startup settings for a [`MengerSponge`](crate::MengerSponge).

use crate::subdivide;

/// Most CPU-side mesh memory a sponge may hold, in bytes (256 MiB).
///
/// Positions and normals cost 32 bytes per vertex and indices 4 bytes each,
/// so level 4 needs about 146 MB and level 5 about 2.9 GB.
pub const MESH_BYTE_BUDGET: usize = 256 * 1024 * 1024;

/// Deepest level whose mesh fits in [`MESH_BYTE_BUDGET`].
///
/// No configuration can raise the cap past this.
pub const HARD_MAX_LEVEL: u32 = 4;

/// Default cap on the recursion level.
///
/// Level 4 is 160,000 leaf cubes and 3,840,000 vertices.
pub const DEFAULT_MAX_LEVEL: u32 = HARD_MAX_LEVEL;

/// True when a sponge of `level` stays inside [`MESH_BYTE_BUDGET`].
pub(crate) fn within_budget(level: u32) -> bool {
    subdivide::mesh_bytes(level).is_some_and(|bytes| bytes <= MESH_BYTE_BUDGET)
}

/// Settings for sponge generation.
///
/// # Example
///
/// ```
/// use menger::{MengerSponge, SpongeConfig};
///
/// let config = SpongeConfig::new().with_initial_level(2).with_max_level(3);
/// let sponge = MengerSponge::with_config(config).unwrap();
/// assert_eq!(sponge.level(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpongeConfig {
    pub(crate) initial_level: u32,
    pub(crate) max_level: u32,
}

impl Default for SpongeConfig {
    fn default() -> Self {
        Self {
            initial_level: 1,
            max_level: DEFAULT_MAX_LEVEL,
        }
    }
}

impl SpongeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_level(mut self, level: u32) -> Self {
        self.initial_level = level;
        self
    }

    /// Sets the deepest accepted level, clamped to [`HARD_MAX_LEVEL`].
    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level = level;
        self.clamped()
    }

    /// Level generated when the sponge is created.
    pub fn initial_level(&self) -> u32 {
        self.initial_level
    }

    /// Deepest level [`set_level`](crate::MengerSponge::set_level) accepts.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// This config with `max_level` pulled down to [`HARD_MAX_LEVEL`].
    pub(crate) fn clamped(mut self) -> Self {
        if self.max_level > HARD_MAX_LEVEL {
            log::warn!(
                "max level {} exceeds the mesh memory budget, clamping to {}",
                self.max_level,
                HARD_MAX_LEVEL
            );
            self.max_level = HARD_MAX_LEVEL;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SpongeConfig::default();
        assert_eq!(config.initial_level(), 1);
        assert_eq!(config.max_level(), DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn builder() {
        let config = SpongeConfig::new().with_initial_level(3).with_max_level(2);
        assert_eq!(config.initial_level(), 3);
        assert_eq!(config.max_level(), 2);
    }

    #[test]
    fn max_level_is_clamped() {
        let config = SpongeConfig::new().with_max_level(40);
        assert_eq!(config.max_level(), HARD_MAX_LEVEL);
    }

    #[test]
    fn literal_config_is_clamped() {
        let config = SpongeConfig {
            initial_level: 0,
            max_level: 40,
        };
        assert_eq!(config.clamped().max_level(), HARD_MAX_LEVEL);
    }

    #[test]
    fn hard_cap_is_deepest_level_in_budget() {
        assert!(within_budget(HARD_MAX_LEVEL));
        assert!(!within_budget(HARD_MAX_LEVEL + 1));
        assert!(!within_budget(64));
    }

    #[test]
    fn hard_cap_fits_u32_indices() {
        let deepest = subdivide::vertex_count(HARD_MAX_LEVEL).unwrap();
        assert!(deepest <= u32::MAX as usize);
    }
}
