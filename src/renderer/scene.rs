use glam::{Mat4, Vec3};

use crate::renderer::camera::OrbitCamera;

pub const EARTH_SCALE: f32 = 0.5;
pub const MOON_SCALE: f32 = 0.25;
/// Applied before the moon's scale, so the moon ends up at `MOON_SCALE * MOON_OFFSET`.
pub const MOON_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 0.0);

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub model_view_projection: [[f32; 4]; 4],
}

impl SceneUniforms {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            model_view_projection: mvp.to_cols_array_2d(),
        }
    }
}

pub fn earth_model() -> Mat4 {
    Mat4::from_scale(Vec3::splat(EARTH_SCALE))
}

pub fn moon_model() -> Mat4 {
    Mat4::from_scale(Vec3::splat(MOON_SCALE)) * Mat4::from_translation(MOON_OFFSET)
}

/// Model-view-projection matrices for everything drawn in one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameTransforms {
    pub earth: Mat4,
    pub moon: Mat4,
    /// Plain view-projection. The skybox shader feeds directions with `w = 0`,
    /// which drops the camera translation.
    pub skybox: Mat4,
}

impl FrameTransforms {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let view_projection = camera.projection().matrix * camera.view().matrix;
        Self {
            earth: view_projection * earth_model(),
            moon: view_projection * moon_model(),
            skybox: view_projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat3, Vec4};

    use super::*;

    #[test]
    fn moon_sits_above_the_earth() {
        let center = moon_model().transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(0.0, 1.25, 0.0), 1e-6));

        let rim = moon_model().transform_point3(Vec3::X);
        assert!((rim.distance(center) - MOON_SCALE).abs() < 1e-6);

        let earth_rim = earth_model().transform_point3(Vec3::Z);
        assert!((earth_rim.length() - EARTH_SCALE).abs() < 1e-6);
    }

    #[test]
    fn skybox_ignores_camera_position() {
        let camera = OrbitCamera::default();
        let frame = FrameTransforms::from_camera(&camera);

        let rotation_only = Mat4::from_mat3(Mat3::from_mat4(camera.view().matrix));
        let direction = Vec4::new(0.3, -0.7, 0.2, 0.0);
        let expected = camera.projection().matrix * rotation_only * direction;
        assert!((frame.skybox * direction).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn earth_center_projects_to_screen_center() {
        let frame = FrameTransforms::from_camera(&OrbitCamera::default());
        let ndc = frame.earth.project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniforms_are_column_major() {
        let mvp = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let uniforms = SceneUniforms::new(mvp);
        assert_eq!(uniforms.model_view_projection[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 64);
    }
}
