#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ambient_scene::camera::{PerspectiveCamera, Viewport};
use ambient_scene::error::SceneError;
use ambient_scene::geometry::MeshData;
use ambient_scene::resources::{DrawItem, GeometryHandle, GraphicsBackend, Material, MaterialHandle};
use ambient_scene::{SceneConfig, SceneRuntime};

/// Everything a [`RecordingBackend`] saw, shared with the test body.
#[derive(Debug, Default)]
pub struct Record {
    pub geometries_created: u32,
    pub materials_created: u32,
    /// Release count per handle id.
    pub geometry_releases: HashMap<u32, u32>,
    pub material_releases: HashMap<u32, u32>,
    pub renderer_releases: u32,
    pub viewports: Vec<Viewport>,
    /// Camera aspect seen by each render call.
    pub rendered_aspects: Vec<f32>,
    pub draw_counts: Vec<usize>,
    /// Fail the creation after this many successful ones.
    pub fail_after: Option<u32>,
}

impl Record {
    pub fn created(&self) -> u32 {
        self.geometries_created + self.materials_created
    }

    pub fn released(&self) -> u32 {
        self.geometry_releases.values().sum::<u32>() + self.material_releases.values().sum::<u32>()
    }

    fn budget_left(&self) -> bool {
        self.fail_after.map_or(true, |limit| self.created() < limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub record: Rc<RefCell<Record>>,
}

impl RecordingBackend {
    pub fn failing_after(count: u32) -> Self {
        let backend = Self::default();
        backend.record.borrow_mut().fail_after = Some(count);
        backend
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle, SceneError> {
        let mut record = self.record.borrow_mut();
        if !record.budget_left() {
            return Err(SceneError::Allocation("out of buffers".to_owned()));
        }
        assert!(!mesh.positions.is_empty());
        record.geometries_created += 1;
        Ok(GeometryHandle(record.geometries_created - 1))
    }

    fn create_material(&mut self, _material: &Material) -> Result<MaterialHandle, SceneError> {
        let mut record = self.record.borrow_mut();
        if !record.budget_left() {
            return Err(SceneError::Allocation("out of programs".to_owned()));
        }
        record.materials_created += 1;
        Ok(MaterialHandle(record.materials_created - 1))
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        *self.record.borrow_mut().geometry_releases.entry(handle.0).or_default() += 1;
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        *self.record.borrow_mut().material_releases.entry(handle.0).or_default() += 1;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record.borrow_mut().viewports.push(viewport);
    }

    fn render(&mut self, camera: &PerspectiveCamera, items: &[DrawItem]) -> Result<(), SceneError> {
        let mut record = self.record.borrow_mut();
        record.rendered_aspects.push(camera.aspect());
        record.draw_counts.push(items.len());
        Ok(())
    }

    fn release_renderer(&mut self) {
        self.record.borrow_mut().renderer_releases += 1;
    }
}

pub const SEED: u64 = 0x5eed;

pub fn runtime() -> (SceneRuntime<RecordingBackend>, Rc<RefCell<Record>>) {
    runtime_with(&SceneConfig::default(), Viewport::new(1280, 720))
}

pub fn runtime_with(config: &SceneConfig, viewport: Viewport) -> (SceneRuntime<RecordingBackend>, Rc<RefCell<Record>>) {
    let backend = RecordingBackend::default();
    let record = backend.record.clone();
    let runtime = SceneRuntime::construct(backend, config, viewport, SEED).unwrap();
    (runtime, record)
}
