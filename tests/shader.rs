use ambient_scene::shader::{
    fresnel, glitch, glitch_tick, grain, lens_distortion, rand, scanlines, shade, shader_pulse, value_noise,
    vignette, Fragment, HoloUniforms, GLITCH_INTENSITY,
};
use glam::{Vec2, Vec3};

fn uniforms(time: f32) -> HoloUniforms {
    HoloUniforms {
        time,
        color: Vec3::new(0.0, 0x88 as f32 / 255.0, 0x88 as f32 / 255.0),
        opacity: 0.3,
        resolution: Vec2::new(1280.0, 720.0),
    }
}

fn samples() -> impl Iterator<Item = Vec2> {
    (0..16).flat_map(|i| (0..16).map(move |j| Vec2::new(i as f32 / 15.0, j as f32 / 15.0)))
}

#[test]
fn hash_and_noise_stay_in_unit_range() {
    for p in samples() {
        let q = p * 1000.0 + Vec2::splat(3.7);
        assert!((0.0..=1.0).contains(&rand(q)));
        assert!((0.0..=1.0).contains(&value_noise(q)));
        assert!(grain(p, 2.5).abs() <= 0.01 + 1e-6);
    }
}

#[test]
fn lens_keeps_the_center_and_pushes_corners_out() {
    assert_eq!(lens_distortion(Vec2::splat(0.5), 0.15), Vec2::splat(0.5));
    let corner = lens_distortion(Vec2::new(1.0, 1.0), 0.15);
    assert!(corner.x > 1.0);
}

#[test]
fn glitch_is_gated_per_tick() {
    let mut seen_active = false;
    let mut seen_idle = false;
    for step in 0..300 {
        let time = (step as f32 + 0.5) / 15.0;
        let u = uniforms(time);
        let roll = rand(Vec2::splat(glitch_tick(time)));
        let sample = glitch(Vec2::new(0.3, 0.6), &u, GLITCH_INTENSITY);
        assert_eq!(sample.active, roll > 0.5, "time {time}");
        if sample.active {
            seen_active = true;
            assert_eq!(sample.alpha, u.opacity * 0.8);
            // red pushed up relative to blue
            assert!(sample.color.x >= u.color.x);
        } else {
            seen_idle = true;
            assert_eq!(sample.color, u.color);
            assert_eq!(sample.uv, Vec2::new(0.3, 0.6));
        }
    }
    assert!(seen_active && seen_idle);
}

#[test]
fn glitch_tick_is_constant_within_a_step() {
    for step in 0..100 {
        let early = glitch_tick((step as f32 + 0.2) / 15.0);
        let late = glitch_tick((step as f32 + 0.8) / 15.0);
        assert_eq!(early, late);
    }
}

#[test]
fn scanlines_and_vignette_are_bounded() {
    for p in samples() {
        let lines = scanlines(p, 1.3, 800.0);
        assert!((0.72 - 1e-5..=1.0 + 1e-5).contains(&lines));
        let vig = vignette(p, 1.3);
        assert!((0.0..=1.0).contains(&vig));
    }
    assert_eq!(vignette(Vec2::new(0.0, 0.5), 0.0), 0.0);
    assert!(vignette(Vec2::splat(0.5), 0.0) > vignette(Vec2::new(0.05, 0.5), 0.0));
}

#[test]
fn fresnel_is_dark_facing_and_bright_at_grazing() {
    assert_eq!(fresnel(Vec3::Z), 0.0);
    assert_eq!(fresnel(-Vec3::Z), 0.0);
    assert_eq!(fresnel(Vec3::X), 1.0);
}

#[test]
fn alpha_composes_both_pulses() {
    for step in 0..50 {
        let time = step as f32 * 0.37;
        let u = uniforms(time);
        let normal = Vec3::new(0.6, 0.0, 0.8);
        let out = shade(Fragment { uv: Vec2::new(0.4, 0.7), normal }, &u);
        let expected = u.opacity * shader_pulse(time) * (0.6 + fresnel(normal) * 0.2);
        assert_eq!(out.w, expected);
        assert!(out.truncate().is_finite());
    }
}

#[test]
fn shading_is_a_pure_function_of_its_inputs() {
    let frag = Fragment {
        uv: Vec2::new(0.25, 0.75),
        normal: Vec3::new(0.0, 0.6, 0.8),
    };
    let u = uniforms(12.34);
    assert_eq!(shade(frag, &u), shade(frag, &u));
}
