mod common;

use std::f64::consts::PI;
use std::time::Duration;

use ambient_scene::clock::{disintegration_progress, pulse_intensity};
use ambient_scene::config::hex_to_rgb;
use ambient_scene::PointerState;
use glam::Vec3;

use common::runtime;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn construction_counts() {
    let (rt, record) = runtime();
    assert_eq!(rt.scene().particles.len(), 1500);
    assert_eq!(rt.scene().granular.len(), 800);
    // particles + one pair per grain + octahedron + wireframe
    let record = record.borrow();
    assert_eq!(record.geometries_created, 1 + 800 + 2);
    assert_eq!(record.materials_created, 1 + 800 + 2);
}

#[test]
fn particles_fill_the_cube_with_dimmed_palette_colors() {
    let (rt, _) = runtime();
    let particles = &rt.scene().particles;
    assert!(particles
        .positions()
        .iter()
        .flatten()
        .all(|c| (-50.0..=50.0).contains(c)));

    let palette: Vec<[f32; 3]> = ["#00aaaa", "#aa00aa", "#29cc10"]
        .iter()
        .map(|hex| hex_to_rgb(hex).unwrap().map(|c| c * 0.7))
        .collect();
    for color in particles.colors() {
        assert!(palette.contains(color), "{color:?} not in palette");
    }
    // all three hues show up
    for entry in &palette {
        assert!(particles.colors().contains(entry));
    }
}

#[test]
fn base_positions_respect_radius_jitter() {
    let (rt, _) = runtime();
    for grain in rt.scene().granular.grains() {
        let r = grain.base.length();
        assert!((9.5 - 1e-4..=10.5 + 1e-4).contains(&r), "radius {r}");
        assert!(grain.displace.abs().max_element() <= 25.0);
    }
}

#[test]
fn shell_coverage_is_area_uniform() {
    // With latitude from acos(2u - 1), cos(phi) = z / r is uniform on
    // [-1, 1]; sampling phi uniformly would pile grains up at the poles.
    let (rt, _) = runtime();
    let mut bins = [0usize; 4];
    for grain in rt.scene().granular.grains() {
        let cos_phi = grain.base.z / grain.base.length();
        let bin = (((cos_phi + 1.0) / 2.0) * 4.0).clamp(0.0, 3.0) as usize;
        bins[bin] += 1;
    }
    for count in bins {
        assert!((140..=260).contains(&count), "bins {bins:?}");
    }
}

#[test]
fn grains_follow_the_shared_progress_every_frame() {
    let (mut rt, _) = runtime();
    for frame in 0..1200u64 {
        let signals = rt
            .frame(ms(frame * 16), PointerState::default())
            .unwrap()
            .unwrap();
        for grain in rt.scene().granular.grains() {
            assert_eq!(grain.position, grain.base + grain.displace * signals.disintegration);
        }
    }
}

#[test]
fn grain_scale_pulses_out_of_phase() {
    let (mut rt, _) = runtime();
    let signals = rt.frame(ms(16), PointerState::default()).unwrap().unwrap();
    let grains = rt.scene().granular.grains();
    for (index, grain) in grains.iter().enumerate().take(50) {
        let expected = 0.9 + 0.1 * (signals.time * 2.0 + index as f32 * 0.1).sin();
        assert!((grain.scale - expected).abs() < 1e-6);
        assert!((0.8..=1.0).contains(&grain.scale));
    }
    assert_ne!(grains[0].scale, grains[10].scale);
}

#[test]
fn progress_waits_for_the_delay_then_oscillates() {
    let (mut rt, _) = runtime();
    // 300 frames, 10ms apart: clock at 3.0, wall clock at 3000ms
    for frame in 1..=300u64 {
        let signals = rt.frame(ms(frame * 10), PointerState::default()).unwrap().unwrap();
        assert_eq!(signals.disintegration, 0.0);
    }
    assert!((rt.clock().time() - 3.0).abs() < 1e-3);

    for frame in 301..=3000u64 {
        let signals = rt.frame(ms(frame * 10), PointerState::default()).unwrap().unwrap();
        assert!((0.0..=1.0).contains(&signals.disintegration));
    }
}

#[test]
fn progress_peaks_and_returns() {
    let after_delay = ms(60_000);
    assert_eq!(disintegration_progress(10.0, ms(3999), 4000.0, 0.5), 0.0);

    let peak = disintegration_progress(4.0 + PI, after_delay, 4000.0, 0.5);
    assert!((peak - 1.0).abs() < 1e-5, "peak {peak}");

    let trough = disintegration_progress(4.0 + 3.0 * PI, after_delay, 4000.0, 0.5);
    assert!(trough.abs() < 1e-5, "trough {trough}");

    let start = disintegration_progress(4.0, after_delay, 4000.0, 0.5);
    assert!((start - 0.5).abs() < 1e-6);
}

#[test]
fn pulse_fans_out_to_three_materials() {
    let (mut rt, _) = runtime();
    for frame in 0..500u64 {
        let signals = rt.frame(ms(frame * 16), PointerState::default()).unwrap().unwrap();
        assert_eq!(signals.pulse, pulse_intensity(rt.clock().time(), 0.5));
        assert!((0.5..=0.9).contains(&signals.pulse));

        let hologram = &rt.scene().hologram;
        assert_eq!(hologram.uniforms().opacity, signals.pulse * 0.25);
        assert_eq!(hologram.light().intensity, signals.pulse * 0.7);
        assert_eq!(hologram.wireframe().opacity, signals.pulse * 0.1);
        assert_eq!(hologram.uniforms().time, signals.time);
    }
}

#[test]
fn hologram_spins_on_all_axes() {
    let (mut rt, _) = runtime();
    let signals = rt.frame(ms(16), PointerState::default()).unwrap().unwrap();
    let t = signals.time;
    assert_eq!(
        rt.scene().hologram.rotation(),
        Vec3::new(t * 0.2, t * 0.3, (t * 0.1).sin() * 0.2)
    );
}

#[test]
fn pointer_nudges_accumulate() {
    let (mut still, _) = runtime();
    let (mut steered, _) = runtime();
    let pointer = PointerState { x: 1.0, y: -0.5 };
    for frame in 0..100u64 {
        still.frame(ms(frame), PointerState::default()).unwrap();
        steered.frame(ms(frame), pointer).unwrap();
    }
    let base = still.scene().particles.rotation();
    let nudged = steered.scene().particles.rotation();
    assert!((base.x - 0.05).abs() < 1e-4);
    assert!((nudged.y - base.y - 100.0 * 0.0005).abs() < 1e-4);
    assert!((nudged.x - base.x + 100.0 * 0.5 * 0.0005).abs() < 1e-4);
}

#[test]
fn granular_group_turns_slowly() {
    let (mut rt, record) = runtime();
    for frame in 0..10u64 {
        rt.frame(ms(frame), PointerState::default()).unwrap();
    }
    assert!((rt.scene().granular.rotation_y() - 0.01).abs() < 1e-6);
    assert_eq!(rt.draw_list().len(), 1 + 800 + 2);
    assert_eq!(record.borrow().draw_counts, vec![803; 10]);
}
