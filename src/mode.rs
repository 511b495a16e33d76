//! Display mode table.
//!
//! The three operating modes differ in waveform shape and in whether
//! the channels share one period. Everything mode-dependent (shape,
//! synchronization policy, display label) is answered here so no other
//! module interprets the raw mode value.

use crate::waveform::WaveShape;

/// Number of selectable modes.
pub const MODE_COUNT: u8 = 3;

/// Operating mode of the breathing effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Sine waveform, each channel follows its own control input.
    SineIndependent,
    /// Triangle waveform, each channel follows its own control input.
    TriangleIndependent,
    /// Sine waveform, all channels share one period.
    SineSynchronized,
}

impl Mode {
    /// Decodes a persisted byte. Returns `None` for out-of-range values.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Mode::SineIndependent),
            1 => Some(Mode::TriangleIndependent),
            2 => Some(Mode::SineSynchronized),
            _ => None,
        }
    }

    /// The byte value stored in non-volatile memory.
    pub fn as_raw(self) -> u8 {
        match self {
            Mode::SineIndependent => 0,
            Mode::TriangleIndependent => 1,
            Mode::SineSynchronized => 2,
        }
    }

    /// The next mode in the cycle, wrapping back to the first.
    pub fn next(self) -> Self {
        match self {
            Mode::SineIndependent => Mode::TriangleIndependent,
            Mode::TriangleIndependent => Mode::SineSynchronized,
            Mode::SineSynchronized => Mode::SineIndependent,
        }
    }

    /// Waveform shape used by the channels in this mode.
    pub fn shape(self) -> WaveShape {
        match self {
            Mode::TriangleIndependent => WaveShape::Triangle,
            _ => WaveShape::Sine,
        }
    }

    /// Whether all channels share one period in this mode.
    pub fn is_synchronized(self) -> bool {
        self == Mode::SineSynchronized
    }

    /// Fixed-width display label (10 characters).
    pub fn label(self) -> &'static str {
        match self {
            Mode::SineIndependent => "Sine Indep",
            Mode::TriangleIndependent => "Triang Ind",
            Mode::SineSynchronized => "Sine Sync ",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label().trim_end())
    }
}
