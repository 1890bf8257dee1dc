//! Sphere of small grains that drift apart and back together.

use std::f32::consts::PI;

use glam::{Mat4, Quat, Vec3};
use rand::Rng;

use crate::clock::FrameSignals;
use crate::config::GranularConfig;
use crate::geometry::{uv_sphere, MeshData};
use crate::resources::Material;

/// One grain. Only `position` and `scale` change after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grain {
    pub base: Vec3,
    pub displace: Vec3,
    pub phase: f32,
    pub color: Vec3,
    pub position: Vec3,
    pub scale: f32,
}

impl Grain {
    /// Position for a given scene-wide disintegration progress.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.base + self.displace * progress
    }
}

#[derive(Debug, Clone)]
pub struct GranularSphere {
    grains: Vec<Grain>,
    rotation_y: f32,
    spin: f32,
    grain_radius: f32,
    grain_segments: u32,
    opacity: f32,
}

impl GranularSphere {
    /// Place grains on a jittered shell. Latitude comes from `acos(2u - 1)`
    /// so coverage is uniform by area rather than bunched at the poles.
    pub fn generate<R: Rng>(config: &GranularConfig, rng: &mut R) -> Self {
        let range = config.displacement;
        let grains = (0..config.count)
            .map(|index| {
                let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
                let theta = 2.0 * PI * rng.random::<f32>();
                let jitter = 1.0 - config.radius_jitter + rng.random::<f32>() * 2.0 * config.radius_jitter;
                let r = config.radius * jitter;
                let base = Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                );
                let displace = Vec3::new(
                    (rng.random::<f32>() - 0.5) * range,
                    (rng.random::<f32>() - 0.5) * range,
                    (rng.random::<f32>() - 0.5) * range,
                );
                let color = hsl_to_rgb(rng.random::<f32>(), config.saturation, config.lightness);
                Grain {
                    base,
                    displace,
                    phase: index as f32 * 0.1,
                    color,
                    position: base,
                    scale: 1.0,
                }
            })
            .collect();

        Self {
            grains,
            rotation_y: 0.0,
            spin: config.spin_per_frame,
            grain_radius: config.grain_radius,
            grain_segments: config.grain_segments,
            opacity: config.opacity,
        }
    }

    /// Move every grain to `base + displace * progress`, pulse its scale,
    /// and turn the group.
    pub fn advance(&mut self, signals: &FrameSignals) {
        for grain in &mut self.grains {
            grain.position = grain.position_at(signals.disintegration);
            grain.scale = 0.9 + 0.1 * (signals.time * 2.0 + grain.phase).sin();
        }
        self.rotation_y += self.spin;
    }

    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub fn len(&self) -> usize {
        self.grains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Mesh each grain gets its own copy of.
    pub fn grain_mesh(&self) -> MeshData {
        uv_sphere(self.grain_radius, self.grain_segments, self.grain_segments)
    }

    pub fn material(&self, grain: &Grain) -> Material {
        Material::Basic {
            color: grain.color,
            opacity: self.opacity,
        }
    }

    /// World transform of grain `index`: group rotation, then the grain's own
    /// translation and uniform scale.
    pub fn grain_model(&self, index: usize) -> Option<Mat4> {
        let grain = self.grains.get(index)?;
        Some(
            Mat4::from_rotation_y(self.rotation_y)
                * Mat4::from_scale_rotation_translation(
                    Vec3::splat(grain.scale),
                    Quat::IDENTITY,
                    grain.position,
                ),
        )
    }
}

/// HSL to linear RGB, hue wrapping at 1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;
    Vec3::new(
        hue_to_rgb(q, p, h + 1.0 / 3.0),
        hue_to_rgb(q, p, h),
        hue_to_rgb(q, p, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
