use glam::Mat4;
use crate::renderer::camera::CameraUniforms;
use crate::renderer::core::binding::BindGuard;
use crate::renderer::core::error::GlError;
use crate::renderer::resources::program::{ShaderProgram, UniformWriter};
use crate::renderer::scene::light::{Light, LightRig};
use crate::renderer::scene::material::Material;

/// Writes camera, material, light and model values into a bound block program.
///
/// The bound check happens once, when the applier is created from the
/// program's bind guard; every group written afterwards goes through the same
/// writer, which cannot outlive that guard.
pub struct SceneUniformApplier<'a> {
    uniforms: UniformWriter<'a>,
}

impl<'a> SceneUniformApplier<'a> {
    pub fn new(program: &'a ShaderProgram, bound: &'a BindGuard<'a>) -> Result<Self, GlError> {
        Ok(Self { uniforms: program.uniforms(bound)? })
    }

    pub fn apply_camera(&self, camera: &CameraUniforms) -> Result<(), GlError> {
        self.uniforms.set("view", camera.view)?;
        self.uniforms.set("projection", camera.projection)?;
        self.uniforms.set("viewPos", camera.position)
    }

    /// Each tint is preceded by its `has*` flag; an absent tint only writes the flag
    pub fn apply_material(&self, material: &Material) -> Result<(), GlError> {
        self.uniforms.set("material.hasDiffuse", material.diffuse.is_some())?;
        if let Some(diffuse) = material.diffuse {
            self.uniforms.set("material.diffuse", diffuse)?;
        }

        self.uniforms.set("material.hasSpecular", material.specular.is_some())?;
        if let Some(specular) = material.specular {
            self.uniforms.set("material.specular", specular)?;
        }

        self.uniforms.set("material.shininess", material.shininess)
    }

    /// Slots are addressed by their position in the rig's lists. A disabled
    /// light only writes `enabled = 0`; its other fields keep whatever the
    /// shader last received.
    pub fn apply_lights(&self, lights: &LightRig) -> Result<(), GlError> {
        let directional = lights.directional();
        self.uniforms.set("dirLight.direction", directional.direction)?;
        self.uniforms.set("dirLight.ambient", directional.ambient)?;
        self.uniforms.set("dirLight.diffuse", directional.diffuse)?;
        self.uniforms.set("dirLight.specular", directional.specular)?;

        for (index, light) in lights.point_lights().iter().enumerate() {
            let prefix = format!("pointLights[{index}]");
            self.uniforms.set(&format!("{prefix}.enabled"), light.enabled)?;
            if light.enabled {
                self.apply_positional(&prefix, light)?;
            }
        }

        for (index, light) in lights.spot_lights().iter().enumerate() {
            let prefix = format!("spotLights[{index}]");
            self.uniforms.set(&format!("{prefix}.enabled"), light.enabled)?;
            if !light.enabled {
                continue;
            }
            self.apply_positional(&prefix, light)?;
            self.uniforms.set(&format!("{prefix}.direction"), light.direction)?;
            self.uniforms.set(&format!("{prefix}.cutOff"), light.cut_off)?;
            self.uniforms.set(&format!("{prefix}.outerCutOff"), light.outer_cut_off)?;
        }

        Ok(())
    }

    pub fn apply_model(&self, model: Mat4) -> Result<(), GlError> {
        self.uniforms.set("model", model)
    }

    fn apply_positional(&self, prefix: &str, light: &Light) -> Result<(), GlError> {
        self.uniforms.set(&format!("{prefix}.position"), light.position)?;
        self.uniforms.set(&format!("{prefix}.ambient"), light.ambient)?;
        self.uniforms.set(&format!("{prefix}.diffuse"), light.diffuse)?;
        self.uniforms.set(&format!("{prefix}.specular"), light.specular)?;
        self.uniforms.set(&format!("{prefix}.constant"), light.constant)?;
        self.uniforms.set(&format!("{prefix}.linear"), light.linear)?;
        self.uniforms.set(&format!("{prefix}.quadratic"), light.quadratic)
    }
}
