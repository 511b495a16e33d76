//! Per-channel breathing control.
//!
//! A [`ChannelController`] owns one PWM output and its waveform
//! period. The period tracks a live analog reading each tick; the
//! synchronized-mode override (all channels sharing one period) is the
//! control loop's policy, not the channel's.

use crate::mode::Mode;
use crate::waveform;

/// Shortest selectable waveform period, in milliseconds.
pub const PERIOD_MIN_MS: f32 = 500.0;

/// Longest selectable waveform period, in milliseconds.
pub const PERIOD_MAX_MS: f32 = 5000.0;

/// Highest raw value produced by the 10-bit analog inputs.
pub const ANALOG_MAX: u16 = 1023;

/// Trait for abstracting a single PWM output channel.
///
/// Implement this for your PWM peripheral. The duty value is an 8-bit
/// brightness; convert to your hardware's native resolution if it
/// differs. Handle any hardware errors internally - this method
/// cannot fail.
pub trait PwmChannel {
    /// Sets the output duty cycle.
    fn set_duty(&mut self, duty: u8);
}

/// Drives one color channel's breathing waveform.
pub struct ChannelController<P: PwmChannel> {
    output: P,
    period_ms: f32,
}

impl<P: PwmChannel> ChannelController<P> {
    /// Creates a controller with a mid-range default period.
    pub fn new(output: P) -> Self {
        Self {
            output,
            period_ms: 3000.0,
        }
    }

    /// Maps a raw 10-bit analog reading linearly onto the period range.
    ///
    /// Inclusive at both ends: raw 0 selects [`PERIOD_MIN_MS`], raw
    /// 1023 selects [`PERIOD_MAX_MS`]. No smoothing or hysteresis.
    pub fn set_period_from_raw(&mut self, raw: u16) {
        let raw = raw.min(ANALOG_MAX);
        let span = PERIOD_MAX_MS - PERIOD_MIN_MS;
        self.set_period_ms(PERIOD_MIN_MS + (raw as f32 / ANALOG_MAX as f32) * span);
    }

    /// Sets the period directly, clamped to the valid range.
    ///
    /// Used by the control loop to impose the shared period in
    /// synchronized mode.
    pub fn set_period_ms(&mut self, period_ms: f32) {
        self.period_ms = period_ms.clamp(PERIOD_MIN_MS, PERIOD_MAX_MS);
    }

    /// Recomputes brightness for the elapsed time and writes it out.
    ///
    /// Exactly one duty write per call.
    pub fn update(&mut self, elapsed_ms: u64, mode: Mode) {
        let duty = waveform::brightness(elapsed_ms, self.period_ms, mode.shape());
        self.output.set_duty(duty);
    }

    /// Current period in whole milliseconds, for display.
    pub fn period_ms(&self) -> u32 {
        self.period_ms as u32
    }
}
