//! Scene entities and the pure per-frame update.
//!
//! Nothing in here knows about a graphics API: the update step takes the
//! frame's [`FrameSignals`] and the pointer and mutates plain data, which is
//! what the tests drive directly.

mod granular;
mod hologram;
mod particles;

pub use granular::{hsl_to_rgb, Grain, GranularSphere};
pub use hologram::{HolographicShape, PointLight, WireframeShell};
pub use particles::ParticleField;

use rand::Rng;

use crate::camera::Viewport;
use crate::clock::FrameSignals;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::pointer::PointerState;

/// All visual entities of one mounted background.
#[derive(Debug, Clone)]
pub struct Scene {
    pub particles: ParticleField,
    pub granular: GranularSphere,
    pub hologram: HolographicShape,
}

impl Scene {
    pub fn generate<R: Rng>(config: &SceneConfig, viewport: Viewport, rng: &mut R) -> Result<Self, SceneError> {
        Ok(Self {
            particles: ParticleField::generate(&config.particles, rng)?,
            granular: GranularSphere::generate(&config.granular, rng),
            hologram: HolographicShape::new(&config.hologram, viewport)?,
        })
    }

    /// Apply one frame's worth of motion.
    pub fn advance(&mut self, signals: &FrameSignals, pointer: PointerState) {
        self.granular.advance(signals);
        self.particles.advance(pointer);
        self.hologram.advance(signals);
    }
}
