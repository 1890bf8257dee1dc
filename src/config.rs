//! Tunable scene constants with serde support.
//!
//! Every section uses `#[serde(default)]`, so a host can pass a partial JSON
//! document (e.g. only `{"particles": {"count": 500}}`) and the rest keeps
//! its default value. Defaults reproduce the shipped look of the background.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::geometry::{octahedron_vertex_count, uv_sphere_vertex_count, MAX_INDEXED_VERTICES};

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Perspective camera parameters.
    pub camera: CameraConfig,
    /// Background point cloud.
    pub particles: ParticleConfig,
    /// Disintegrating sphere of small grains.
    pub granular: GranularConfig,
    /// Holographic octahedron and its children.
    pub hologram: HologramConfig,
    /// Clock step and oscillator schedule.
    pub timing: TimingConfig,
    /// Fixed RNG seed for reproducible layouts. `None` draws a fresh one.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Perspective camera parameters.
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Distance from the origin along +z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Background point cloud parameters.
pub struct ParticleConfig {
    pub count: usize,
    /// Side length of the cube the points are scattered in.
    pub extent: f32,
    /// Base hues, `#RRGGBB`.
    pub palette: Vec<String>,
    /// Brightness multiplier applied to every palette color.
    pub dim: f32,
    pub point_size: f32,
    pub opacity: f32,
    /// Rotation added to both axes every frame.
    pub spin_per_frame: f32,
    /// Extra rotation per frame per unit of pointer offset.
    pub pointer_gain: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1500,
            extent: 100.0,
            palette: vec![
                "#00aaaa".to_owned(),
                "#aa00aa".to_owned(),
                "#29cc10".to_owned(),
            ],
            dim: 0.7,
            point_size: 0.15,
            opacity: 0.4,
            spin_per_frame: 0.0005,
            pointer_gain: 0.0005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Granular sphere parameters.
pub struct GranularConfig {
    pub count: usize,
    /// Shell radius before jitter.
    pub radius: f32,
    /// Relative radius jitter; 0.05 means +/-5%.
    pub radius_jitter: f32,
    /// Full width of the per-axis displacement range.
    pub displacement: f32,
    /// Radius of each grain mesh.
    pub grain_radius: f32,
    /// Longitude/latitude segments of each grain mesh.
    pub grain_segments: u32,
    pub saturation: f32,
    pub lightness: f32,
    pub opacity: f32,
    /// Group rotation about y per frame.
    pub spin_per_frame: f32,
}

impl Default for GranularConfig {
    fn default() -> Self {
        Self {
            count: 800,
            radius: 10.0,
            radius_jitter: 0.05,
            displacement: 50.0,
            grain_radius: 0.1,
            grain_segments: 6,
            saturation: 0.7,
            lightness: 0.4,
            opacity: 0.5,
            spin_per_frame: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Holographic octahedron parameters.
pub struct HologramConfig {
    pub radius: f32,
    pub color: String,
    /// Shader opacity before the first frame.
    pub opacity: f32,
    pub wireframe_radius: f32,
    pub wireframe_detail: u32,
    pub wireframe_opacity: f32,
    pub light_intensity: f32,
    pub light_distance: f32,
    /// Per-material multipliers applied to the shared pulse.
    pub opacity_gain: f32,
    pub light_gain: f32,
    pub wireframe_gain: f32,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            color: "#008888".to_owned(),
            opacity: 0.3,
            wireframe_radius: 4.2,
            wireframe_detail: 1,
            wireframe_opacity: 0.05,
            light_intensity: 0.8,
            light_distance: 15.0,
            opacity_gain: 0.25,
            light_gain: 0.7,
            wireframe_gain: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Clock and oscillator schedule.
pub struct TimingConfig {
    /// Clock advance per rendered frame (not wall-clock locked).
    pub clock_step: f64,
    /// Wall-clock pause before the sphere starts to disintegrate.
    pub disintegration_delay_ms: f64,
    /// Angular rate of the disintegration oscillator.
    pub disintegration_rate: f32,
    /// Angular rate of the scene-wide pulse.
    pub pulse_rate: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_step: 0.01,
            disintegration_delay_ms: 4000.0,
            disintegration_rate: 0.5,
            pulse_rate: 0.5,
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scene cannot be built from.
    pub fn validate(&self) -> Result<(), SceneError> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid(format!("camera.fov_degrees {} outside (0, 180)", cam.fov_degrees)));
        }
        if !(cam.near > 0.0 && cam.near < cam.far) {
            return Err(invalid(format!(
                "camera planes must satisfy 0 < near < far (near {}, far {})",
                cam.near, cam.far
            )));
        }
        if self.particles.count == 0 {
            return Err(invalid("particles.count must be positive".to_owned()));
        }
        if self.particles.palette.is_empty() {
            return Err(invalid("particles.palette must not be empty".to_owned()));
        }
        for hex in &self.particles.palette {
            parse_color(hex)?;
        }
        if self.granular.count == 0 {
            return Err(invalid("granular.count must be positive".to_owned()));
        }
        if !(0.0..1.0).contains(&self.granular.radius_jitter) {
            return Err(invalid(format!(
                "granular.radius_jitter {} outside [0, 1)",
                self.granular.radius_jitter
            )));
        }
        if self.granular.grain_segments < 3 {
            return Err(invalid("granular.grain_segments must be at least 3".to_owned()));
        }
        let grain_vertices = uv_sphere_vertex_count(self.granular.grain_segments, self.granular.grain_segments);
        if grain_vertices > MAX_INDEXED_VERTICES {
            return Err(invalid(format!(
                "granular.grain_segments {} needs {grain_vertices} vertices, limit is {MAX_INDEXED_VERTICES}",
                self.granular.grain_segments
            )));
        }
        let wire_vertices = octahedron_vertex_count(self.hologram.wireframe_detail);
        if wire_vertices > MAX_INDEXED_VERTICES {
            return Err(invalid(format!(
                "hologram.wireframe_detail {} needs {wire_vertices} vertices, limit is {MAX_INDEXED_VERTICES}",
                self.hologram.wireframe_detail
            )));
        }
        parse_color(&self.hologram.color)?;
        if self.timing.clock_step <= 0.0 {
            return Err(invalid("timing.clock_step must be positive".to_owned()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> SceneError {
    SceneError::Config(msg)
}

/// Parse a "#RRGGBB" hex string into normalized `[f32; 3]` values in 0.0..=1.0.
///
/// Returns `None` if the string is not a valid 6-digit hex color (with or
/// without the leading `#`).
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

pub(crate) fn parse_color(hex: &str) -> Result<[f32; 3], SceneError> {
    hex_to_rgb(hex).ok_or_else(|| invalid(format!("bad color {hex:?}, expected #RRGGBB")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(r#"{"particles": {"count": 20}, "seed": 7}"#).unwrap();
        assert_eq!(config.particles.count, 20);
        assert_eq!(config.particles.palette.len(), 3);
        assert_eq!(config.granular.count, 800);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = SceneConfig::from_json(r#"{"particle": {}}"#).unwrap_err();
        assert!(matches!(err, SceneError::ConfigParse(_)));
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = SceneConfig::from_json(r#"{"timing": {"clock_step": 0.0}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn grain_segments_beyond_u16_indices_are_rejected() {
        // 255 segments give 256^2 = 65536 vertices, one past the limit.
        assert!(SceneConfig::from_json(r#"{"granular": {"grain_segments": 254}}"#).is_ok());
        let err = SceneConfig::from_json(r#"{"granular": {"grain_segments": 255}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
        let err = SceneConfig::from_json(r#"{"granular": {"grain_segments": 300}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn wireframe_detail_beyond_u16_indices_is_rejected() {
        assert!(SceneConfig::from_json(r#"{"hologram": {"wireframe_detail": 51}}"#).is_ok());
        let err = SceneConfig::from_json(r#"{"hologram": {"wireframe_detail": 52}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
        let err = SceneConfig::from_json(r#"{"hologram": {"wireframe_detail": 64}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_rgb("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(hex_to_rgb("008888").map(|c| c[0]), Some(0.0));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
    }
}
