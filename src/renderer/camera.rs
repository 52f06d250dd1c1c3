use crate::renderer::util;
use glam::{Mat4, Vec3};

/// Per-frame camera values written to the block program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

/// Free-flying camera steered by yaw and pitch angles in degrees
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    fov_y_deg: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
}

impl Camera {
    const DEFAULT_FOV_Y_DEG: f32 = 45.0;
    const MAX_PITCH_DEG: f32 = 89.0;
    const FOV_RANGE_DEG: (f32, f32) = (1.0, 90.0);

    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw_deg: -90.0,
            pitch_deg: 0.0,
            fov_y_deg: Self::DEFAULT_FOV_Y_DEG,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_yaw(&mut self, yaw_deg: f32) {
        self.yaw_deg = yaw_deg;
        self.update_vectors();
    }

    /// Clamped short of straight up or down, where the view basis degenerates
    pub fn set_pitch(&mut self, pitch_deg: f32) {
        self.pitch_deg = pitch_deg.clamp(-Self::MAX_PITCH_DEG, Self::MAX_PITCH_DEG);
        self.update_vectors();
    }

    pub fn set_fov(&mut self, fov_y_deg: f32) {
        self.fov_y_deg = fov_y_deg.clamp(Self::FOV_RANGE_DEG.0, Self::FOV_RANGE_DEG.1);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn get_view_mat(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    pub fn get_proj_mat(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_deg.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn get_uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            view: self.get_view_mat(),
            projection: self.get_proj_mat(),
            position: self.position,
        }
    }

    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    pub fn get_front(&self) -> Vec3 {
        self.front
    }

    pub fn get_up(&self) -> Vec3 {
        self.up
    }

    pub fn get_right(&self) -> Vec3 {
        self.right
    }

    pub fn get_yaw(&self) -> f32 {
        self.yaw_deg
    }

    pub fn get_pitch(&self) -> f32 {
        self.pitch_deg
    }

    pub fn get_fov(&self) -> f32 {
        self.fov_y_deg
    }

    pub fn get_aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn update_vectors(&mut self) {
        self.front = util::calculate_direction(
            self.pitch_deg.to_radians(),
            self.yaw_deg.to_radians(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
