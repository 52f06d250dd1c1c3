use glam::Vec3;

/// Unit direction for a pitch and yaw in radians, yaw measured from +X towards +Z
pub fn calculate_direction(pitch: f32, yaw: f32) -> Vec3 {
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}
