use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::camera::Viewport;
use crate::clock::FrameSignals;
use crate::config::{parse_color, HologramConfig};
use crate::error::SceneError;
use crate::geometry::{octahedron, wireframe, MeshData};
use crate::resources::Material;
use crate::shader::HoloUniforms;

/// Wireframe child of the holographic octahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireframeShell {
    pub color: Vec3,
    pub opacity: f32,
}

/// Point light child at the octahedron's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub distance: f32,
}

/// Octahedron with the CRT material, a wireframe shell and a light. The
/// three materials share one pulse but none of them owns it.
#[derive(Debug, Clone)]
pub struct HolographicShape {
    rotation: Vec3,
    uniforms: HoloUniforms,
    wireframe: WireframeShell,
    light: PointLight,
    radius: f32,
    wireframe_radius: f32,
    wireframe_detail: u32,
    opacity_gain: f32,
    light_gain: f32,
    wireframe_gain: f32,
}

impl HolographicShape {
    pub fn new(config: &HologramConfig, viewport: Viewport) -> Result<Self, SceneError> {
        let color = Vec3::from_array(parse_color(&config.color)?);
        Ok(Self {
            rotation: Vec3::ZERO,
            uniforms: HoloUniforms {
                time: 0.0,
                color,
                opacity: config.opacity,
                resolution: Vec2::from_array(viewport.as_vec()),
            },
            wireframe: WireframeShell {
                color,
                opacity: config.wireframe_opacity,
            },
            light: PointLight {
                color,
                intensity: config.light_intensity,
                distance: config.light_distance,
            },
            radius: config.radius,
            wireframe_radius: config.wireframe_radius,
            wireframe_detail: config.wireframe_detail,
            opacity_gain: config.opacity_gain,
            light_gain: config.light_gain,
            wireframe_gain: config.wireframe_gain,
        })
    }

    pub fn advance(&mut self, signals: &FrameSignals) {
        let t = signals.time;
        self.rotation = Vec3::new(t * 0.2, t * 0.3, (t * 0.1).sin() * 0.2);

        self.uniforms.opacity = signals.pulse * self.opacity_gain;
        self.light.intensity = signals.pulse * self.light_gain;
        self.wireframe.opacity = signals.pulse * self.wireframe_gain;
        self.uniforms.time = t;
    }

    pub fn set_resolution(&mut self, viewport: Viewport) {
        self.uniforms.resolution = Vec2::from_array(viewport.as_vec());
    }

    pub fn uniforms(&self) -> &HoloUniforms {
        &self.uniforms
    }

    pub fn wireframe(&self) -> &WireframeShell {
        &self.wireframe
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn mesh(&self) -> MeshData {
        octahedron(self.radius, 0)
    }

    pub fn wireframe_mesh(&self) -> MeshData {
        wireframe(&octahedron(self.wireframe_radius, self.wireframe_detail))
    }

    pub fn material(&self) -> Material {
        Material::Holographic(self.uniforms)
    }

    pub fn wireframe_material(&self) -> Material {
        Material::Basic {
            color: self.wireframe.color,
            opacity: self.wireframe.opacity,
        }
    }
}
