mod common;

use std::time::Duration;

use ambient_scene::{PointerState, SceneConfig, SceneError, SceneRuntime, Viewport};

use common::{runtime, RecordingBackend, SEED};

#[test]
fn teardown_releases_everything_once() {
    let (mut rt, record) = runtime();
    rt.frame(Duration::from_millis(16), PointerState::default()).unwrap();
    assert!(rt.teardown());

    let record = record.borrow();
    assert_eq!(record.released(), record.created());
    assert_eq!(record.geometry_releases.len() as u32, record.geometries_created);
    assert_eq!(record.material_releases.len() as u32, record.materials_created);
    assert!(record.geometry_releases.values().all(|&n| n == 1));
    assert!(record.material_releases.values().all(|&n| n == 1));
    assert_eq!(record.renderer_releases, 1);
}

#[test]
fn teardown_is_idempotent() {
    let (mut rt, record) = runtime();
    assert!(rt.teardown());
    let released = record.borrow().released();
    assert!(!rt.teardown());
    assert!(rt.is_released());
    assert_eq!(record.borrow().released(), released);
    assert_eq!(record.borrow().renderer_releases, 1);

    drop(rt);
    assert_eq!(record.borrow().renderer_releases, 1);
}

#[test]
fn dropping_the_runtime_tears_down() {
    let (rt, record) = runtime();
    drop(rt);
    let record = record.borrow();
    assert_eq!(record.released(), record.created());
    assert_eq!(record.renderer_releases, 1);
}

#[test]
fn no_frames_or_resizes_after_teardown() {
    let (mut rt, record) = runtime();
    rt.teardown();
    let viewports = record.borrow().viewports.len();
    assert_eq!(rt.frame(Duration::from_secs(1), PointerState::default()).unwrap(), None);
    rt.resize(Viewport::new(10, 10));
    assert!(record.borrow().rendered_aspects.is_empty());
    assert_eq!(record.borrow().viewports.len(), viewports);
}

#[test]
fn failed_construction_leaves_nothing_behind() {
    let backend = RecordingBackend::failing_after(37);
    let record = backend.record.clone();
    let result = SceneRuntime::construct(backend, &SceneConfig::default(), Viewport::new(800, 600), SEED);
    assert!(matches!(result, Err(SceneError::Allocation(_))));

    let record = record.borrow();
    assert_eq!(record.created(), 37);
    assert_eq!(record.released(), 37);
    assert_eq!(record.renderer_releases, 1);
}

#[test]
fn invalid_config_fails_before_touching_the_backend() {
    let mut config = SceneConfig::default();
    config.granular.count = 0;
    let backend = RecordingBackend::default();
    let record = backend.record.clone();
    let result = SceneRuntime::construct(backend, &config, Viewport::new(800, 600), SEED);
    assert!(matches!(result, Err(SceneError::Config(_))));
    assert_eq!(record.borrow().created(), 0);
}

#[test]
fn same_seed_same_layout() {
    let (a, _) = runtime();
    let (b, _) = runtime();
    assert_eq!(a.scene().granular.grains(), b.scene().granular.grains());
    assert_eq!(a.scene().particles.positions(), b.scene().particles.positions());
}
