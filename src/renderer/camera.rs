use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec2, Vec3};
use winit::event::{ElementState, MouseButton};

use crate::config::{CameraConfig, DEFAULT_WINDOW_SIZE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last: Vec2 },
}

/// A matrix together with its inverse, computed at the same time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
    pub inverse: Mat4,
}

impl Transform {
    pub fn new(matrix: Mat4) -> Self {
        Self {
            matrix,
            inverse: matrix.inverse(),
        }
    }
}

/// Camera orbiting the origin on a sphere of fixed radius.
///
/// Azimuth is measured around +Z and elevation down from +Z, so elevation
/// `0` looks down from the north pole and `PI` up from the south pole.
pub struct OrbitCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub drag: DragState,

    pub radius: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub near: f32,

    projection: Transform,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            azimuth: PI,
            elevation: FRAC_PI_2,
            drag: DragState::Idle,

            radius: config.orbit_radius,
            sensitivity: config.sensitivity,
            fov: config.fov,
            near: config.near,

            projection: Transform::new(Mat4::IDENTITY),
        };
        let (width, height) = DEFAULT_WINDOW_SIZE;
        camera.set_viewport(width, height);
        camera
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState, position: Vec2) {
        if button != MouseButton::Left {
            return;
        }
        self.drag = match state {
            ElementState::Pressed => DragState::Dragging { last: position },
            ElementState::Released => DragState::Idle,
        };
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) {
        let DragState::Dragging { last } = self.drag else {
            return;
        };
        self.rotate(position - last);
        self.drag = DragState::Dragging { last: position };
    }

    /// Ends a drag whose release the window will never see, e.g. after
    /// losing focus or the cursor leaving the window.
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth = wrap_angle(self.azimuth - self.sensitivity * delta.x);
        self.elevation = (self.elevation - self.sensitivity * delta.y).clamp(0.0, PI);
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn eye(&self) -> Vec3 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        self.radius * Vec3::new(se * ca, se * sa, ce)
    }

    /// Tangent of the eye path along increasing elevation, negated. It is
    /// perpendicular to the view direction at every elevation, the poles
    /// included.
    pub fn up(&self) -> Vec3 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        Vec3::new(-ce * ca, -ce * sa, se)
    }

    pub fn view(&self) -> Transform {
        Transform::new(Mat4::look_at_rh(self.eye(), Vec3::ZERO, self.up()))
    }

    pub fn projection(&self) -> Transform {
        self.projection
    }

    /// Horizontal field of view, recovered by unprojecting the right screen edge.
    pub fn horizontal_fov(&self) -> f32 {
        let edge = self.projection.inverse.project_point3(Vec3::new(1.0, 0.0, 0.5));
        2.0 * (edge.x / -edge.z).atan()
    }

    /// Rebuilds the infinite perspective projection for a new viewport.
    /// Zero-sized viewports (minimized windows) keep the previous projection.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = width as f32 / height as f32;
        self.projection = Transform::new(Mat4::perspective_infinite_rh(self.fov, aspect, self.near));
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
