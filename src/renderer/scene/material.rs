use glam::Vec3;

/// Surface parameters multiplied into the sampled diffuse and specular maps.
///
/// A missing tint leaves the sampled color as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Option<Vec3>,
    pub specular: Option<Vec3>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: None,
            specular: Some(Vec3::splat(0.5)),
            shininess: 32.0,
        }
    }
}
