mod common;

use std::time::Duration;

use ambient_scene::config::CameraConfig;
use ambient_scene::{PerspectiveCamera, PointerState, SceneConfig, Viewport};
use glam::{Mat4, Vec3};

use common::runtime_with;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn camera_matches_the_mount_viewport() {
    let camera = PerspectiveCamera::new(&CameraConfig::default(), Viewport::new(1920, 1080));
    assert!(approx_eq(camera.aspect(), 1920.0 / 1080.0, 1e-6));
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 30.0));
    let expected = Mat4::perspective_rh_gl(75f32.to_radians(), 1920.0 / 1080.0, 0.1, 1000.0);
    assert_eq!(camera.projection(), expected);
}

#[test]
fn resize_sequence_tracks_the_latest_size() {
    let (mut rt, record) = runtime_with(&SceneConfig::default(), Viewport::new(1920, 1080));
    let sizes = [(1080, 1920), (800, 600), (2560, 1440), (375, 812)];

    for (frame, &(w, h)) in sizes.iter().enumerate() {
        let viewport = Viewport::new(w, h);
        rt.resize(viewport);

        // Resize is applied synchronously, before any frame is drawn.
        assert_eq!(record.borrow().viewports.last(), Some(&viewport));
        assert!(approx_eq(rt.camera().aspect(), w as f32 / h as f32, 1e-6));
        assert_eq!(rt.scene().hologram.uniforms().resolution.to_array(), [w as f32, h as f32]);

        rt.frame(Duration::from_millis(frame as u64 * 16), PointerState::default()).unwrap();
        let rendered = *record.borrow().rendered_aspects.last().unwrap();
        assert!(approx_eq(rendered, w as f32 / h as f32, 1e-6));
    }
    assert_eq!(rt.viewport(), Viewport::new(375, 812));
}

#[test]
fn zero_sized_viewport_is_clamped() {
    let viewport = Viewport::new(0, 0);
    assert_eq!(viewport, Viewport::new(1, 1));
    assert!(viewport.aspect().is_finite());
}
