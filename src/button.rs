//! Button edge handling: debounce gate and the shared mode cell.
//!
//! ## Concurrency contract
//!
//! [`SharedMode`] is the only state shared between the button ISR and
//! the main loop. Both fields are atomics so neither context can
//! observe a torn value:
//!
//! * mode — written by the ISR (single writer), read by the loop; the
//!   loop tolerates a value stale by one tick.
//! * persist-pending — set by the ISR, consumed by the loop with an
//!   atomic swap so a set can never be silently lost.
//!
//! The debounce timestamp is touched only inside the ISR and therefore
//! lives in [`DebounceGate`], owned by that context.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::mode::Mode;
use crate::time::{TimeDuration, TimeInstant};

/// Minimum gap between accepted button edges, in milliseconds.
pub const DEBOUNCE_WINDOW_MS: u64 = 200;

/// Cross-context cell holding the current mode and the deferred
/// persistence request.
///
/// `const fn new` so it can live in a `static` shared with the ISR.
pub struct SharedMode {
    mode: AtomicU8,
    persist_pending: AtomicBool,
}

impl SharedMode {
    /// Creates a cell holding the default mode with no pending write.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(0),
            persist_pending: AtomicBool::new(false),
        }
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        // The ISR only ever stores values produced by Mode::as_raw.
        Mode::from_raw(self.mode.load(Ordering::Acquire)).unwrap_or(Mode::SineIndependent)
    }

    /// Restores a mode without raising a persistence request.
    ///
    /// Used at boot to load the persisted mode before the ISR is armed.
    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode.as_raw(), Ordering::Release);
    }

    /// Advances to the next mode and raises the persistence request.
    ///
    /// ISR side. Single-writer: only the button interrupt may call this.
    pub fn cycle(&self) -> Mode {
        let next = self.mode().next();
        self.mode.store(next.as_raw(), Ordering::Release);
        self.persist_pending.store(true, Ordering::Release);
        next
    }

    /// Consumes the persistence request, returning whether one was set.
    ///
    /// Main-loop side. The swap clears the flag *before* the caller
    /// performs the storage write, so a press landing mid-write raises
    /// the flag again and is committed by the next flush.
    pub fn take_persist_request(&self) -> bool {
        self.persist_pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a persistence request is currently raised.
    pub fn persist_pending(&self) -> bool {
        self.persist_pending.load(Ordering::Acquire)
    }
}

impl Default for SharedMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Filters raw falling-edge events through a minimum-interval rule.
///
/// Owned by the interrupt context. `on_press` is the entire ISR body:
/// it touches only [`SharedMode`] and its own timestamp, so its
/// latency is bounded — no display or storage work happens here.
#[derive(Debug, Clone, Copy)]
pub struct DebounceGate<I: TimeInstant> {
    last_accepted: Option<I>,
}

impl<I: TimeInstant> DebounceGate<I> {
    /// Creates a gate that will accept the first edge it sees.
    pub fn new() -> Self {
        Self {
            last_accepted: None,
        }
    }

    /// Handles one falling edge at time `now`.
    ///
    /// Returns true if the edge was accepted (mode advanced), false if
    /// it was absorbed as switch bounce. Bounce is not an error and is
    /// not counted.
    pub fn on_press(&mut self, now: I, shared: &SharedMode) -> bool {
        let accepted = match self.last_accepted {
            None => true,
            Some(last) => now.duration_since(last).as_millis() > DEBOUNCE_WINDOW_MS,
        };

        if accepted {
            shared.cycle();
            self.last_accepted = Some(now);
        }
        accepted
    }
}

impl<I: TimeInstant> Default for DebounceGate<I> {
    fn default() -> Self {
        Self::new()
    }
}
