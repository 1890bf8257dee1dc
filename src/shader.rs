//! Holographic CRT material.
//!
//! The fragment stage is written twice: as GLSL ES 3.00 for the WebGL
//! backend and as plain Rust functions below, stage by stage, so the look can
//! be checked without a GPU. Both use `f32` and the same constants; keep them
//! in step when editing either.

use std::f32::consts::PI;

use glam::{Vec2, Vec3, Vec4};

/// Barrel strength of the lens warp.
pub const LENS_DISTORTION: f32 = 0.15;
/// Strength passed to the glitch stage.
pub const GLITCH_INTENSITY: f32 = 0.5;
/// Glitch decisions are re-rolled this many times per clock unit.
pub const GLITCH_STEPS: f32 = 15.0;
pub const SCANLINE_COUNT: f32 = 800.0;
pub const GRAIN_SCALE: f32 = 1000.0;
pub const GRAIN_AMOUNT: f32 = 0.02;

/// Uniform block of the holographic material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoloUniforms {
    pub time: f32,
    pub color: Vec3,
    pub opacity: f32,
    pub resolution: Vec2,
}

/// Per-fragment inputs interpolated from the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub uv: Vec2,
    /// Surface normal in view space.
    pub normal: Vec3,
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hash of a 2D point into `[0, 1)`.
pub fn rand(n: Vec2) -> f32 {
    fract(n.dot(Vec2::new(12.9898, 4.1414)).sin() * 43758.5453)
}

/// Smoothstep-interpolated lattice noise, squared. Output in `[0, 1]`.
pub fn value_noise(p: Vec2) -> f32 {
    let ip = p.floor();
    let mut u = p - ip;
    u = u * u * (Vec2::splat(3.0) - 2.0 * u);
    let res = mix(
        mix(rand(ip), rand(ip + Vec2::new(1.0, 0.0)), u.x),
        mix(rand(ip + Vec2::new(0.0, 1.0)), rand(ip + Vec2::new(1.0, 1.0)), u.x),
        u.y,
    );
    res * res
}

/// Barrel warp around the center plus a vertical ripple across x.
pub fn lens_distortion(uv: Vec2, distortion: f32) -> Vec2 {
    let mut uv = uv - Vec2::splat(0.5);
    let r2 = uv.x * uv.x + uv.y * uv.y;
    uv *= 1.0 + distortion * r2;
    uv.y += (uv.x * PI).sin() * 0.05;
    uv + Vec2::splat(0.5)
}

/// Result of the glitch stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchSample {
    pub color: Vec3,
    pub alpha: f32,
    /// UV after wave and block perturbation.
    pub uv: Vec2,
    pub active: bool,
}

/// Time quantized onto the glitch grid.
pub fn glitch_tick(time: f32) -> f32 {
    (time * GLITCH_STEPS).floor() / GLITCH_STEPS
}

/// Tick-gated glitch: above 0.5 the row wobbles and the color shifts, above
/// 0.8 the UV also snaps to a random block grid.
pub fn glitch(uv: Vec2, u: &HoloUniforms, intensity: f32) -> GlitchSample {
    let tick = glitch_tick(u.time);
    let roll = rand(Vec2::splat(tick));
    if roll <= 0.5 {
        return GlitchSample {
            color: u.color,
            alpha: u.opacity,
            uv,
            active: false,
        };
    }

    let mut uv = uv;
    uv.x += (uv.y * 30.0 + u.time * 10.0).sin() * 0.02 * intensity;

    if roll > 0.8 {
        let block = 0.05 + rand(Vec2::new(tick, uv.y)) * 0.15;
        let block_x = (uv.x / block).floor() * block;
        let block_y = (uv.y / (block * 0.5)).floor() * block * 0.5;
        uv.x = block_x + (uv.x - block_x) * (1.0 - intensity * 0.7);
        uv.y = block_y + (uv.y - block_y) * (1.0 - intensity * 0.7);
    }

    let shift = intensity * 0.15 * rand(Vec2::new(tick, uv.y));
    let shifted = Vec3::new(u.color.x + shift, u.color.y - shift * 0.5, u.color.z - shift);
    GlitchSample {
        color: shifted.lerp(Vec3::splat(shifted.x), 0.3),
        alpha: u.opacity * 0.8,
        uv,
        active: true,
    }
}

/// Horizontal scanlines, slowly amplitude modulated.
pub fn scanlines(uv: Vec2, time: f32, count: f32) -> f32 {
    let scan = (uv.y * count * PI * 2.0).sin() * 0.1 + 0.9;
    scan * (0.95 + 0.05 * (time * 2.0 + uv.y * 100.0).sin())
}

/// Edge darkening with a slow breathing term.
pub fn vignette(uv: Vec2, time: f32) -> f32 {
    let uv = uv * (Vec2::ONE - Vec2::new(uv.y, uv.x));
    let vig = (uv.x * uv.y * 15.0).max(0.0).powf(0.25);
    vig * (0.95 + 0.05 * (time * 3.0).sin())
}

/// Film grain offset around zero.
pub fn grain(uv: Vec2, time: f32) -> f32 {
    (value_noise(uv * GRAIN_SCALE + Vec2::splat(time)) - 0.5) * GRAIN_AMOUNT
}

/// Rim factor: 0 facing the viewer, 1 at grazing angles.
pub fn fresnel(view_normal: Vec3) -> f32 {
    (1.0 - view_normal.dot(Vec3::Z).abs()).powi(2)
}

/// Fast local brightness oscillation of the shader.
pub fn shader_pulse(time: f32) -> f32 {
    ((time * 2.0).sin() + 1.0) * 0.2 + 0.5
}

/// Full fragment pipeline: color in `xyz`, alpha in `w`.
pub fn shade(frag: Fragment, u: &HoloUniforms) -> Vec4 {
    let rim = fresnel(frag.normal);
    let uv = lens_distortion(frag.uv, LENS_DISTORTION);
    let glitched = glitch(uv, u, GLITCH_INTENSITY);
    let lines = scanlines(uv, u.time, SCANLINE_COUNT);
    let vig = vignette(uv, u.time);

    let mut color = glitched.color * lines * vig;
    color = color.lerp(Vec3::splat(0.8), rim * 0.2);
    color += Vec3::splat(grain(frag.uv, u.time));
    color = color.lerp(Vec3::splat(color.x), 0.1);

    let alpha = u.opacity * shader_pulse(u.time) * (0.6 + rim * 0.2);
    color.extend(alpha)
}

pub const HOLO_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;
uniform mat3 u_normal_matrix;

out vec2 v_uv;
out vec3 v_normal;

void main() {
    v_uv = a_uv;
    v_normal = normalize(u_normal_matrix * a_normal);
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

pub const HOLO_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform float time;
uniform vec3 color;
uniform float opacity;
uniform vec2 resolution;

in vec2 v_uv;
in vec3 v_normal;
out vec4 out_color;

const float PI = 3.14159265359;

float rand(vec2 n) {
    return fract(sin(dot(n, vec2(12.9898, 4.1414))) * 43758.5453);
}

float value_noise(vec2 p) {
    vec2 ip = floor(p);
    vec2 u = fract(p);
    u = u * u * (3.0 - 2.0 * u);
    float res = mix(
        mix(rand(ip), rand(ip + vec2(1.0, 0.0)), u.x),
        mix(rand(ip + vec2(0.0, 1.0)), rand(ip + vec2(1.0, 1.0)), u.x),
        u.y);
    return res * res;
}

vec2 lens_distortion(vec2 uv, float distortion) {
    uv -= 0.5;
    float r2 = uv.x * uv.x + uv.y * uv.y;
    uv *= 1.0 + distortion * r2;
    uv.y += sin(uv.x * PI) * 0.05;
    return uv + 0.5;
}

vec3 glitch(vec2 uv, float intensity) {
    float tick = floor(time * 15.0) / 15.0;
    float roll = rand(vec2(tick));
    if (roll <= 0.5) {
        return color;
    }
    uv.x += sin(uv.y * 30.0 + time * 10.0) * 0.02 * intensity;
    if (roll > 0.8) {
        float block = 0.05 + rand(vec2(tick, uv.y)) * 0.15;
        float bx = floor(uv.x / block) * block;
        float by = floor(uv.y / (block * 0.5)) * block * 0.5;
        uv.x = bx + (uv.x - bx) * (1.0 - intensity * 0.7);
        uv.y = by + (uv.y - by) * (1.0 - intensity * 0.7);
    }
    float shift = intensity * 0.15 * rand(vec2(tick, uv.y));
    vec3 shifted = vec3(color.r + shift, color.g - shift * 0.5, color.b - shift);
    return mix(shifted, vec3(shifted.r), 0.3);
}

float scanlines(vec2 uv, float count) {
    float scan = sin(uv.y * count * PI * 2.0) * 0.1 + 0.9;
    return scan * (0.95 + 0.05 * sin(time * 2.0 + uv.y * 100.0));
}

float vignette(vec2 uv) {
    uv *= 1.0 - uv.yx;
    float vig = pow(max(uv.x * uv.y * 15.0, 0.0), 0.25);
    return vig * (0.95 + 0.05 * sin(time * 3.0));
}

void main() {
    float rim = pow(1.0 - abs(dot(v_normal, vec3(0.0, 0.0, 1.0))), 2.0);
    vec2 uv = lens_distortion(v_uv, 0.15);
    vec3 c = glitch(uv, 0.5) * scanlines(uv, 800.0) * vignette(uv);
    c = mix(c, vec3(0.8), rim * 0.2);
    c += (value_noise(v_uv * 1000.0 + time) - 0.5) * 0.02;
    c = mix(c, vec3(c.r), 0.1);
    float pulse = (sin(time * 2.0) + 1.0) * 0.2 + 0.5;
    out_color = vec4(c, opacity * pulse * (0.6 + rim * 0.2));
}
"#;

pub const POINTS_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 3) in vec3 a_color;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;
uniform float u_size;
uniform float u_half_height;

out vec3 v_color;

void main() {
    v_color = a_color;
    vec4 mv = u_view * u_model * vec4(a_position, 1.0);
    gl_PointSize = u_size * (u_half_height / -mv.z);
    gl_Position = u_projection * mv;
}
"#;

pub const POINTS_FRAGMENT: &str = r#"#version 300 es
precision mediump float;

uniform float u_opacity;

in vec3 v_color;
out vec4 out_color;

void main() {
    out_color = vec4(v_color, u_opacity);
}
"#;

pub const BASIC_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;

void main() {
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

pub const BASIC_FRAGMENT: &str = r#"#version 300 es
precision mediump float;

uniform vec3 u_color;
uniform float u_opacity;

out vec4 out_color;

void main() {
    out_color = vec4(u_color, u_opacity);
}
"#;
