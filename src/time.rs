//! Time abstraction traits for platform-agnostic timing.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by wrapping hardware counters should
    /// compute this with wrapping subtraction so interval checks stay
    /// correct across counter rollover.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// A named periodic task gate: fires once per elapsed interval.
///
/// Formalizes the classic `now - last >= interval` polling check so
/// each of the control loop's sub-tasks (heartbeat, display refresh)
/// carries its own cadence state and can be tested against a mock
/// clock.
#[derive(Clone, Copy)]
pub struct Periodic<I: TimeInstant> {
    interval: I::Duration,
    last_fired: I,
}

impl<I: TimeInstant> Periodic<I> {
    /// Creates a gate that first fires one interval after `start`.
    pub fn new(interval: I::Duration, start: I) -> Self {
        Self {
            interval,
            last_fired: start,
        }
    }

    /// Returns true once per elapsed interval, recording the fire time.
    pub fn due(&mut self, now: I) -> bool {
        if now.duration_since(self.last_fired).as_millis() >= self.interval.as_millis() {
            self.last_fired = now;
            true
        } else {
            false
        }
    }

    /// Re-arms the gate so the next fire is one interval after `now`.
    pub fn reset(&mut self, now: I) {
        self.last_fired = now;
    }

    /// The configured interval.
    pub fn interval(&self) -> I::Duration {
        self.interval
    }
}
