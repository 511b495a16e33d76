//! Deferred, rate-limited mode persistence.
//!
//! Storage writes never happen in the interrupt context. The ISR only
//! raises the pending flag in [`SharedMode`]; the main loop drains it
//! here, once per iteration, with a write-if-different policy to bound
//! wear on the non-volatile cell.

use crate::button::SharedMode;
use crate::mode::Mode;

/// One reserved byte slot in non-volatile storage.
///
/// Implement for your storage peripheral (EEPROM cell, flash page
/// wrapper, ...). The store is assumed to either complete or be
/// fatally unreachable; there is no retry path at this layer.
pub trait ModeStore {
    /// Reads the stored byte.
    fn read(&mut self) -> u8;

    /// Writes the byte unconditionally.
    fn write(&mut self, value: u8);
}

/// Reads the persisted mode at boot.
///
/// A byte outside the valid mode range means "no valid saved mode" and
/// yields the default mode. Not reported anywhere; the correction is
/// silent by design.
pub fn load_mode<S: ModeStore>(store: &mut S) -> Mode {
    Mode::from_raw(store.read()).unwrap_or(Mode::SineIndependent)
}

/// Commits the current mode to storage when a request is pending.
///
/// Call once per main-loop iteration. Clears the pending flag before
/// touching storage: a button press that lands between the clear and
/// the write re-raises the flag and is handled by the next flush
/// rather than lost. Skips the physical write when storage already
/// holds the current mode.
///
/// Returns true if a physical write was performed.
pub fn flush_if_pending<S: ModeStore>(shared: &SharedMode, store: &mut S) -> bool {
    if !shared.take_persist_request() {
        return false;
    }

    let raw = shared.mode().as_raw();
    if store.read() == raw {
        return false;
    }

    store.write(raw);
    true
}
