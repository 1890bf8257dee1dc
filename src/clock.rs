//! Scene clock and the two scene-wide oscillators.
//!
//! The clock advances by a fixed step per rendered frame, so the animation
//! speed follows the display refresh rate. Wall-clock time is only used to
//! gate the start of the disintegration.

use std::time::Duration;

use crate::config::TimingConfig;

/// Fixed-step animation clock, zero at mount. Accumulates in `f64` so the
/// step keeps registering on long-running pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    time: f64,
    step: f64,
}

impl Clock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    /// Advance one frame and return the new time.
    pub fn tick(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

/// Oscillator values for one frame, computed once and handed to every
/// consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Clock time after this frame's tick, narrowed for shader uniforms.
    pub time: f32,
    /// How far grains sit from their shell positions, in `[0, 1]`.
    pub disintegration: f32,
    /// Shared brightness oscillator, in `[0.5, 0.9]`.
    pub pulse: f32,
}

impl FrameSignals {
    pub fn compute(time: f64, wall_elapsed: Duration, timing: &TimingConfig) -> Self {
        Self {
            time: time as f32,
            disintegration: disintegration_progress(
                time,
                wall_elapsed,
                timing.disintegration_delay_ms,
                timing.disintegration_rate,
            ),
            pulse: pulse_intensity(time, timing.pulse_rate),
        }
    }
}

/// Zero until `delay_ms` of wall-clock time has passed since mount, then
/// `(sin(rate * (time - delay)) + 1) / 2` with `time` in clock units.
pub fn disintegration_progress(time: f64, wall_elapsed: Duration, delay_ms: f64, rate: f32) -> f32 {
    if wall_elapsed.as_secs_f64() * 1000.0 < delay_ms {
        return 0.0;
    }
    let delay = delay_ms / 1000.0;
    let progress = ((f64::from(rate) * (time - delay)).sin() + 1.0) / 2.0;
    progress.clamp(0.0, 1.0) as f32
}

/// `(sin(rate * time) + 1) * 0.2 + 0.5`, which stays within `[0.5, 0.9]`.
pub fn pulse_intensity(time: f64, rate: f32) -> f32 {
    (((f64::from(rate) * time).sin() + 1.0) * 0.2 + 0.5) as f32
}
