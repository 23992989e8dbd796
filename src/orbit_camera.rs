use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec2, Vec3};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::camera::Camera;
use crate::input::Input;

const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// A camera controller that orbits around the sponge.
///
/// - Left drag rotates around the target
/// - Right drag (vertical) and the scroll wheel zoom
/// - `W`/`S` move along the view direction, `A`/`D` strafe
/// - `Up`/`Down` pitch the view, `Left`/`Right` roll it
/// - `R` returns to the starting pose
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::new().distance(6.0);
///
/// // In frame loop:
/// orbit.update(&input, dt);
/// let camera = orbit.camera();
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians (yaw).
    pub azimuth: f32,
    /// Vertical angle in radians (pitch), kept short of the poles.
    pub elevation: f32,
    /// Rotation of the up vector around the view direction, in radians.
    pub roll: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Radians of rotation per pixel of drag.
    pub sensitivity: f32,
    /// Distance change per scroll line or per pixel of right drag.
    pub zoom_sensitivity: f32,
    /// Units per second while a movement key is held.
    pub move_speed: f32,
    /// Radians per second while a pitch or roll key is held.
    pub turn_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    home: Pose,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pose {
    target: Vec3,
    distance: f32,
    azimuth: f32,
    elevation: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Looking at the sponge from -Z, six units out.
        let home = Pose {
            target: Vec3::ZERO,
            distance: 6.0,
            azimuth: PI,
            elevation: 0.0,
        };
        Self {
            target: home.target,
            distance: home.distance,
            azimuth: home.azimuth,
            elevation: home.elevation,
            roll: 0.0,
            fov: 45f32.to_radians(),
            sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            move_speed: 3.0,
            turn_speed: 1.5,
            min_distance: 1.0,
            max_distance: 100.0,
            home,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance from target. Also becomes the reset distance.
    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.home.distance = self.distance;
        self
    }

    /// Rotate by a drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.sensitivity;
        self.elevation =
            (self.elevation + delta.y * self.sensitivity).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Move towards (positive) or away from (negative) the target.
    pub fn zoom(&mut self, amount: f32) {
        self.distance =
            (self.distance - amount * self.zoom_sensitivity).clamp(self.min_distance, self.max_distance);
    }

    /// Slide the camera and its target along the view's forward and right axes.
    pub fn translate(&mut self, forward: f32, right: f32) {
        let camera = self.camera();
        self.target += camera.forward * forward + camera.right() * right;
    }

    /// Tilt the view direction up (positive) or down without moving the eye.
    pub fn pitch(&mut self, angle: f32) {
        let eye = self.target + self.offset();
        // Looking up means the eye sits lower on the sphere around the target.
        self.elevation = (self.elevation - angle).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        self.target = eye - self.offset();
    }

    /// Roll clockwise (positive) or counter-clockwise around the view direction.
    pub fn roll(&mut self, angle: f32) {
        self.roll = (self.roll + angle).rem_euclid(2.0 * PI);
    }

    /// Return to the starting pose.
    pub fn reset(&mut self) {
        self.target = self.home.target;
        self.distance = self.home.distance;
        self.azimuth = self.home.azimuth;
        self.elevation = self.home.elevation;
        self.roll = 0.0;
    }

    /// Apply this frame's input. `dt` is the frame time in seconds.
    pub fn update(&mut self, input: &Input, dt: f32) {
        if input.key_pressed(KeyCode::KeyR) {
            self.reset();
        }

        self.steer(|key| input.key_down(key), dt);

        let delta = input.mouse_delta();
        if input.mouse_down(MouseButton::Left) {
            self.orbit(delta);
        } else if input.mouse_down(MouseButton::Right) {
            // Dragging down pulls the camera back.
            self.zoom(-delta.y);
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.zoom(scroll);
        }
    }

    /// Keyboard movement for the keys `held` reports as down.
    fn steer(&mut self, held: impl Fn(KeyCode) -> bool, dt: f32) {
        let axis = |positive: KeyCode, negative: KeyCode| {
            (held(positive) as i8 - held(negative) as i8) as f32
        };

        let step = self.move_speed * dt;
        let forward = axis(KeyCode::KeyW, KeyCode::KeyS);
        let right = axis(KeyCode::KeyD, KeyCode::KeyA);
        if forward != 0.0 || right != 0.0 {
            self.translate(forward * step, right * step);
        }

        let turn = self.turn_speed * dt;
        let pitch = axis(KeyCode::ArrowUp, KeyCode::ArrowDown);
        if pitch != 0.0 {
            self.pitch(pitch * turn);
        }
        let roll = axis(KeyCode::ArrowRight, KeyCode::ArrowLeft);
        if roll != 0.0 {
            self.roll(roll * turn);
        }
    }

    // Spherical to Cartesian, relative to the target.
    fn offset(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        )
    }

    /// Get the current camera state.
    pub fn camera(&self) -> Camera {
        let position = self.target + self.offset();
        let forward = (self.target - position).normalize_or(Vec3::Z);

        Camera {
            position,
            forward,
            up: Quat::from_axis_angle(forward, self.roll) * Vec3::Y,
            fov: self.fov,
            ..Camera::default()
        }
    }
}
