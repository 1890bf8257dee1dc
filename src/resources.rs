//! Seam between the scene and whatever draws it.
//!
//! The scene never touches a graphics API directly. It creates geometries
//! and materials through a [`GraphicsBackend`], records every handle in a
//! [`ResourceLedger`], and hands the backend a flat draw list each frame.
//! Teardown drains the ledger, so every create has exactly one release.

use glam::{Mat3, Mat4, Vec3};

use crate::camera::{PerspectiveCamera, Viewport};
use crate::error::SceneError;
use crate::geometry::MeshData;
use crate::shader::HoloUniforms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// Material parameters. Used both to create a material and, each frame, to
/// carry its current uniform values to the draw call. All materials blend
/// additively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Per-vertex colored points with distance attenuation.
    Points { size: f32, opacity: f32 },
    /// Flat unlit color.
    Basic { color: Vec3, opacity: f32 },
    /// CRT shader; owns its own program.
    Holographic(HoloUniforms),
}

/// One draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub params: Material,
    pub model: Mat4,
}

impl DrawItem {
    /// Inverse-transpose of the model-view rotation, for view-space normals.
    pub fn normal_matrix(&self, view: Mat4) -> Mat3 {
        Mat3::from_mat4(view * self.model).inverse().transpose()
    }
}

/// Something that owns GPU-side objects and can draw a frame.
pub trait GraphicsBackend {
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle, SceneError>;

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle, SceneError>;

    fn release_geometry(&mut self, handle: GeometryHandle);

    fn release_material(&mut self, handle: MaterialHandle);

    /// Resize the output surface. Called synchronously from resize events.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clear to transparent and draw `items` in order.
    fn render(&mut self, camera: &PerspectiveCamera, items: &[DrawItem]) -> Result<(), SceneError>;

    /// Free the context-level objects (shared programs, the context itself).
    /// Called once, after every geometry and material has been released.
    fn release_renderer(&mut self);
}

/// Every handle created for one scene, in creation order.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    geometries: Vec<GeometryHandle>,
    materials: Vec<MaterialHandle>,
}

impl ResourceLedger {
    pub fn geometry<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        mesh: &MeshData,
    ) -> Result<GeometryHandle, SceneError> {
        let handle = backend.create_geometry(mesh)?;
        self.geometries.push(handle);
        Ok(handle)
    }

    pub fn material<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        material: &Material,
    ) -> Result<MaterialHandle, SceneError> {
        let handle = backend.create_material(material)?;
        self.materials.push(handle);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.materials.is_empty()
    }

    /// Release everything recorded so far. The ledger is empty afterwards,
    /// so calling this again releases nothing.
    pub fn release_all<B: GraphicsBackend>(&mut self, backend: &mut B) -> usize {
        let released = self.len();
        for handle in self.geometries.drain(..) {
            backend.release_geometry(handle);
        }
        for handle in self.materials.drain(..) {
            backend.release_material(handle);
        }
        released
    }
}
