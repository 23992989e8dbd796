use glam::{Mat4, Vec3};

/// A perspective camera for viewing the sponge.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 45f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the right vector from forward and up.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    /// World-to-view transform (right-handed, looking down -Z).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    /// View-to-clip transform with a [0, 1] depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_lands_on_view_axis() {
        let position = Vec3::new(3.0, 2.0, 4.0);
        let camera = Camera {
            position,
            forward: -position.normalize(),
            ..Camera::new()
        };
        let target = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!(target.z < 0.0);
    }

    #[test]
    fn right_is_perpendicular() {
        let camera = Camera {
            forward: Vec3::new(1.0, 0.0, -4.0).normalize(),
            ..Camera::new()
        };
        assert!(camera.right().dot(camera.forward).abs() < 1e-6);
        assert!((camera.right().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn projection_depth_range() {
        let camera = Camera::new();
        let proj = camera.projection_matrix(16.0 / 9.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }
}
