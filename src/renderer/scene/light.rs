use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

/// One light of any kind.
///
/// Fields a kind does not use are ignored: `position` and the attenuation
/// terms for directional lights, `direction` and the cone for point lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub enabled: bool,
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Cosine of the inner cone angle
    pub cut_off: f32,
    /// Cosine of the outer cone angle, where the light fades to nothing
    pub outer_cut_off: f32,
}

impl Light {
    pub fn directional() -> Self {
        Self {
            kind: LightKind::Directional,
            enabled: true,
            position: Vec3::ZERO,
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
            cut_off: 0.0,
            outer_cut_off: 0.0,
        }
    }

    /// Disabled point light with attenuation reaching roughly 50 units
    pub fn point() -> Self {
        Self {
            kind: LightKind::Point,
            enabled: false,
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            linear: 0.09,
            quadratic: 0.032,
            ..Self::directional()
        }
    }

    /// Disabled spot light with a 12.5 degree cone and no ambient term
    pub fn spot() -> Self {
        Self {
            kind: LightKind::Spot,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            direction: Vec3::NEG_Z,
            ..Self::point()
        }
        .with_cone(12.5, 12.5)
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_ambient(mut self, ambient: Vec3) -> Self {
        self.ambient = ambient;
        self
    }

    /// Inner and outer cone half-angles in degrees
    pub fn with_cone(mut self, inner_deg: f32, outer_deg: f32) -> Self {
        self.cut_off = inner_deg.to_radians().cos();
        self.outer_cut_off = outer_deg.to_radians().cos();
        self
    }
}

/// Lights of a scene: one directional light, and point and spot lists whose
/// length is fixed at construction to the shader's array sizes.
///
/// A slot's position in its list is its index in the shader array.
#[derive(Debug, Clone)]
pub struct LightRig {
    directional: Light,
    points: Vec<Light>,
    spots: Vec<Light>,
}

impl LightRig {
    pub const FLASHLIGHT: usize = 0;

    /// All point and spot slots present but disabled
    pub fn new(max_point_lights: usize, max_spot_lights: usize) -> Self {
        Self {
            directional: Light::directional(),
            points: vec![Light::point(); max_point_lights],
            spots: vec![Light::spot(); max_spot_lights],
        }
    }

    /// Four point lights flanking the corridor along -Z, a flashlight and a
    /// cyan top-down spot. Lights past the capacity are left out.
    pub fn with_default_lights(max_point_lights: usize, max_spot_lights: usize) -> Self {
        let mut rig = Self::new(max_point_lights, max_spot_lights);

        let point_positions = [
            Vec3::new(-5.0, 2.0, -10.0),
            Vec3::new(-5.0, 2.0, -20.0),
            Vec3::new(5.0, 2.0, -10.0),
            Vec3::new(5.0, 2.0, -20.0),
        ];
        for (slot, position) in rig.points.iter_mut().zip(point_positions) {
            *slot = Light::point().enabled().with_position(position);
        }

        let spots = [
            Light::spot().enabled().with_cone(12.5, 30.5),
            Light::spot()
                .enabled()
                .with_position(Vec3::new(0.0, 6.0, -15.0))
                .with_direction(Vec3::NEG_Y)
                .with_ambient(Vec3::new(0.0, 1.0, 1.0)),
        ];
        for (slot, light) in rig.spots.iter_mut().zip(spots) {
            *slot = light;
        }

        rig
    }

    pub fn directional(&self) -> &Light {
        &self.directional
    }

    pub fn point_lights(&self) -> &[Light] {
        &self.points
    }

    pub fn spot_lights(&self) -> &[Light] {
        &self.spots
    }

    /// `None` past the fixed capacity
    pub fn point_light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.points.get_mut(index)
    }

    pub fn spot_light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.spots.get_mut(index)
    }

    /// Move the flashlight spot to the eye, pointing where the camera looks
    pub fn attach_flashlight(&mut self, position: Vec3, direction: Vec3) {
        if let Some(flashlight) = self.spots.get_mut(Self::FLASHLIGHT) {
            flashlight.position = position;
            flashlight.direction = direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_fixed_at_construction() {
        let mut rig = LightRig::new(3, 2);

        assert_eq!(rig.point_lights().len(), 3);
        assert_eq!(rig.spot_lights().len(), 2);
        assert!(rig.point_lights().iter().all(|l| !l.enabled && l.kind == LightKind::Point));
        assert!(rig.point_light_mut(3).is_none());
    }

    #[test]
    fn default_rig_fills_what_fits() {
        let rig = LightRig::with_default_lights(8, 1);

        let enabled: Vec<_> = rig.point_lights().iter().map(|l| l.enabled).collect();
        assert_eq!(enabled, [true, true, true, true, false, false, false, false]);
        assert_eq!(rig.point_lights()[3].position, Vec3::new(5.0, 2.0, -20.0));
        assert_eq!(rig.spot_lights().len(), 1);
        assert!(rig.spot_lights()[0].enabled);
    }

    #[test]
    fn flashlight_has_soft_edge_and_top_down_spot_does_not() {
        let rig = LightRig::with_default_lights(4, 4);
        let [flashlight, top_down, ..] = rig.spot_lights() else {
            panic!("expected at least two spot lights");
        };

        assert!(flashlight.outer_cut_off < flashlight.cut_off);
        assert!((flashlight.cut_off - 12.5_f32.to_radians().cos()).abs() < 1e-6);
        assert_eq!(top_down.cut_off, top_down.outer_cut_off);
        assert_eq!(top_down.direction, Vec3::NEG_Y);
    }

    #[test]
    fn flashlight_follows_camera() {
        let mut rig = LightRig::with_default_lights(4, 4);

        rig.attach_flashlight(Vec3::new(1.0, 2.0, 3.0), Vec3::X);

        assert_eq!(rig.spot_lights()[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(rig.spot_lights()[0].direction, Vec3::X);
        assert_eq!(rig.spot_lights()[1].position, Vec3::new(0.0, 6.0, -15.0));
    }

    #[test]
    fn flashlight_without_spot_slots_is_ignored() {
        let mut rig = LightRig::new(0, 0);
        rig.attach_flashlight(Vec3::ONE, Vec3::X);
        assert!(rig.spot_lights().is_empty());
    }
}
