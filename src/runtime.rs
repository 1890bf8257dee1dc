//! Scene lifecycle: construct, advance per frame, resize, tear down.
//!
//! [`SceneRuntime`] is the single release handle for everything a mounted
//! background allocates. Dropping it tears the scene down.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{PerspectiveCamera, Viewport};
use crate::clock::{Clock, FrameSignals};
use crate::config::{SceneConfig, TimingConfig};
use crate::error::SceneError;
use crate::pointer::PointerState;
use crate::resources::{DrawItem, GeometryHandle, GraphicsBackend, Material, MaterialHandle, ResourceLedger};
use crate::scene::Scene;

type Pair = (GeometryHandle, MaterialHandle);

/// Backend handles for each drawable, in draw order.
struct SceneHandles {
    particles: Pair,
    grains: Vec<Pair>,
    hologram: Pair,
    wireframe: Pair,
}

pub struct SceneRuntime<B: GraphicsBackend> {
    backend: B,
    timing: TimingConfig,
    camera: PerspectiveCamera,
    viewport: Viewport,
    scene: Scene,
    clock: Clock,
    ledger: ResourceLedger,
    handles: SceneHandles,
    draw_list: Vec<DrawItem>,
    last_signals: Option<FrameSignals>,
    released: bool,
}

impl<B: GraphicsBackend> SceneRuntime<B> {
    /// Build the whole scene on `backend`. On failure every resource created
    /// so far is released before the error is returned.
    pub fn construct(mut backend: B, config: &SceneConfig, viewport: Viewport, seed: u64) -> Result<Self, SceneError> {
        let generated = config.validate().and_then(|()| {
            let mut rng = StdRng::seed_from_u64(seed);
            Scene::generate(config, viewport, &mut rng)
        });
        let scene = match generated {
            Ok(scene) => scene,
            Err(err) => {
                backend.release_renderer();
                return Err(err);
            }
        };
        let camera = PerspectiveCamera::new(&config.camera, viewport);
        backend.set_viewport(viewport);

        let mut ledger = ResourceLedger::default();
        let handles = match upload(&scene, &mut ledger, &mut backend) {
            Ok(handles) => handles,
            Err(err) => {
                let released = ledger.release_all(&mut backend);
                backend.release_renderer();
                log::error!("scene construction failed after {released} resources: {err}");
                return Err(err);
            }
        };

        log::info!(
            "scene constructed: {} particles, {} grains, {} backend resources, seed {seed}",
            scene.particles.len(),
            scene.granular.len(),
            ledger.len()
        );

        Ok(Self {
            backend,
            timing: config.timing.clone(),
            camera,
            viewport,
            scene,
            clock: Clock::new(config.timing.clock_step),
            ledger,
            handles,
            draw_list: Vec::new(),
            last_signals: None,
            released: false,
        })
    }

    /// Advance one frame and draw it. `wall_elapsed` is real time since
    /// mount; it only gates the start of the disintegration. Returns `None`
    /// once torn down.
    pub fn frame(&mut self, wall_elapsed: Duration, pointer: PointerState) -> Result<Option<FrameSignals>, SceneError> {
        if self.released {
            return Ok(None);
        }
        let time = self.clock.tick();
        let signals = FrameSignals::compute(time, wall_elapsed, &self.timing);
        self.scene.advance(&signals, pointer);
        self.last_signals = Some(signals);

        self.rebuild_draw_list();
        self.backend.render(&self.camera, &self.draw_list)?;
        Ok(Some(signals))
    }

    /// Apply a new viewport to the camera, the backend and the shader before
    /// the next frame is drawn.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.released {
            return;
        }
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
        self.backend.set_viewport(viewport);
        self.scene.hologram.set_resolution(viewport);
        log::debug!("resized to {}x{}", viewport.width, viewport.height);
    }

    /// Release every backend resource and then the renderer. Returns `false`
    /// if the scene was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        let released = self.ledger.release_all(&mut self.backend);
        self.backend.release_renderer();
        self.draw_list.clear();
        log::info!("scene torn down, {released} resources released");
        true
    }

    fn rebuild_draw_list(&mut self) {
        let scene = &self.scene;
        let handles = &self.handles;
        self.draw_list.clear();

        self.draw_list.push(DrawItem {
            geometry: handles.particles.0,
            material: handles.particles.1,
            params: scene.particles.material(),
            model: scene.particles.model(),
        });

        for (index, (grain, &(geometry, material))) in scene.granular.grains().iter().zip(&handles.grains).enumerate() {
            if let Some(model) = scene.granular.grain_model(index) {
                self.draw_list.push(DrawItem {
                    geometry,
                    material,
                    params: scene.granular.material(grain),
                    model,
                });
            }
        }

        // Both children inherit the octahedron's transform.
        let hologram_model = scene.hologram.model();
        self.draw_list.push(DrawItem {
            geometry: handles.hologram.0,
            material: handles.hologram.1,
            params: scene.hologram.material(),
            model: hologram_model,
        });
        self.draw_list.push(DrawItem {
            geometry: handles.wireframe.0,
            material: handles.wireframe.1,
            params: scene.hologram.wireframe_material(),
            model: hologram_model,
        });
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn last_signals(&self) -> Option<FrameSignals> {
        self.last_signals
    }

    pub fn draw_list(&self) -> &[DrawItem] {
        &self.draw_list
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<B: GraphicsBackend> Drop for SceneRuntime<B> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

fn upload<B: GraphicsBackend>(
    scene: &Scene,
    ledger: &mut ResourceLedger,
    backend: &mut B,
) -> Result<SceneHandles, SceneError> {
    let particles = (
        ledger.geometry(backend, &scene.particles.mesh())?,
        ledger.material(backend, &scene.particles.material())?,
    );

    let grain_mesh = scene.granular.grain_mesh();
    let mut grains = Vec::with_capacity(scene.granular.len());
    for grain in scene.granular.grains() {
        let material: Material = scene.granular.material(grain);
        grains.push((ledger.geometry(backend, &grain_mesh)?, ledger.material(backend, &material)?));
    }

    let hologram = (
        ledger.geometry(backend, &scene.hologram.mesh())?,
        ledger.material(backend, &scene.hologram.material())?,
    );
    let wireframe = (
        ledger.geometry(backend, &scene.hologram.wireframe_mesh())?,
        ledger.material(backend, &scene.hologram.wireframe_material())?,
    );

    Ok(SceneHandles {
        particles,
        grains,
        hologram,
        wireframe,
    })
}
