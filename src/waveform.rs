//! Brightness waveform generation.
//!
//! Pure functions mapping elapsed time to an 8-bit PWM duty cycle.
//! The phase angle grows without bound; periodicity falls out of the
//! trigonometric/fractional reduction, so callers may pass raw
//! monotonic elapsed time directly.

use core::f32::consts::PI;
use libm::{floorf, sinf};

/// Maximum PWM duty cycle value.
pub const DUTY_MAX: u8 = 255;

/// The shape of the breathing waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveShape {
    /// Smooth sinusoidal oscillation.
    Sine,

    /// Piecewise-linear ramp up and down with sharp peaks.
    Triangle,
}

/// Calculates the brightness at `elapsed_ms` into a waveform of the
/// given period and shape.
///
/// * Sine: `(sin(angle) + 1) * 127.5` where `angle = 2π·t/p`.
/// * Triangle: linear rise over the first half of the cycle, linear
///   fall over the second half.
///
/// Fractional intermediate values are truncated toward zero and the
/// result is clamped into `0..=255`, so the function is total for any
/// non-negative elapsed time and positive period.
pub fn brightness(elapsed_ms: u64, period_ms: f32, shape: WaveShape) -> u8 {
    let angle = (2.0 * PI * elapsed_ms as f32) / period_ms;

    let level = match shape {
        WaveShape::Sine => (sinf(angle) + 1.0) * 127.5,
        WaveShape::Triangle => {
            let cycles = angle / (2.0 * PI);
            let phase = cycles - floorf(cycles);
            if phase < 0.5 {
                phase * 2.0 * 255.0
            } else {
                (1.0 - phase) * 2.0 * 255.0
            }
        }
    };

    level.clamp(0.0, 255.0) as u8
}
