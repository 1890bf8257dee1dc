use glam::{EulerRot, Mat4, Vec2};
use rand::Rng;

use crate::config::{parse_color, ParticleConfig};
use crate::error::SceneError;
use crate::geometry::{point_cloud, MeshData};
use crate::pointer::PointerState;
use crate::resources::Material;

/// Static point cloud that only ever rotates as a whole.
#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    /// Euler x/y rotation of the whole field.
    rotation: Vec2,
    spin: f32,
    pointer_gain: f32,
    material: Material,
}

impl ParticleField {
    /// Scatter `config.count` points uniformly in a cube of side
    /// `config.extent`, each colored with a dimmed palette entry.
    pub fn generate<R: Rng>(config: &ParticleConfig, rng: &mut R) -> Result<Self, SceneError> {
        let palette = config
            .palette
            .iter()
            .map(|hex| parse_color(hex).map(|c| c.map(|ch| ch * config.dim)))
            .collect::<Result<Vec<_>, _>>()?;
        if palette.is_empty() {
            return Err(SceneError::Config("particles.palette must not be empty".to_owned()));
        }

        let mut positions = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            positions.push([(); 3].map(|()| (rng.random::<f32>() - 0.5) * config.extent));
            colors.push(palette[rng.random_range(0..palette.len())]);
        }

        Ok(Self {
            positions,
            colors,
            rotation: Vec2::ZERO,
            spin: config.spin_per_frame,
            pointer_gain: config.pointer_gain,
            material: Material::Points {
                size: config.point_size,
                opacity: config.opacity,
            },
        })
    }

    /// Constant spin plus a nudge proportional to the pointer. The nudge
    /// accumulates; the field never snaps to the pointer.
    pub fn advance(&mut self, pointer: PointerState) {
        self.rotation.x += self.spin + pointer.y * self.pointer_gain;
        self.rotation.y += self.spin + pointer.x * self.pointer_gain;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn mesh(&self) -> MeshData {
        point_cloud(self.positions.clone(), self.colors.clone())
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}
