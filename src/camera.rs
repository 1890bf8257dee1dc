//! Perspective camera and viewport bookkeeping.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Output surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero-sized regions are clamped to 1x1 so the aspect stays finite.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn as_vec(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Right-handed perspective camera on the +z axis looking at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    position: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        let mut camera = Self {
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: viewport.aspect(),
            position: Vec3::new(0.0, 0.0, config.distance),
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Track a new viewport: aspect first, then the projection matrix.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
