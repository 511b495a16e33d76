//! Mode and period rendering for a 2x16 character display.
//!
//! The display peripheral has no clear-line operation, so every line
//! is padded out to the full 16 columns to overwrite whatever longer
//! text a previous mode may have left behind.

use core::fmt::Write as _;

use heapless::String;

use crate::mode::Mode;
use crate::time::{Periodic, TimeDuration, TimeInstant};

/// Display refresh interval, in milliseconds.
pub const REFRESH_INTERVAL_MS: u64 = 300;

/// Number of character columns per display line.
pub const LINE_WIDTH: usize = 16;

/// Trait for abstracting a cursor-addressable character display.
///
/// Models the usual 2x16 LCD interface: position the cursor, then
/// write fixed-width text. Handle any bus errors internally - these
/// methods cannot fail.
pub trait CharacterDisplay {
    /// Moves the cursor to the given column and row.
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Writes text at the cursor position.
    fn print(&mut self, text: &str);
}

/// Periodic display refresh with forced re-render on mode change.
pub struct DisplayTask<I: TimeInstant> {
    refresh: Periodic<I>,
    displayed_mode: Option<Mode>,
}

impl<I: TimeInstant> DisplayTask<I> {
    /// Creates the task; the first `refresh` call always renders.
    pub fn new(start: I) -> Self {
        Self {
            refresh: Periodic::new(I::Duration::from_millis(REFRESH_INTERVAL_MS), start),
            displayed_mode: None,
        }
    }

    /// Re-renders if the refresh interval elapsed or the mode changed.
    ///
    /// `periods` are the three channel periods in milliseconds, in
    /// red/green/blue order. In synchronized mode only the first entry
    /// is shown. Returns true if the display was written.
    pub fn refresh<D: CharacterDisplay>(
        &mut self,
        now: I,
        mode: Mode,
        periods: [u32; 3],
        display: &mut D,
    ) -> bool {
        let interval_due = self.refresh.due(now);
        if !interval_due && self.displayed_mode == Some(mode) {
            return false;
        }
        if !interval_due {
            // Forced render on mode change re-arms the interval too.
            self.refresh.reset(now);
        }
        self.displayed_mode = Some(mode);

        display.set_cursor(0, 0);
        display.print(&render_mode_line(mode));
        display.set_cursor(0, 1);
        display.print(&render_period_line(mode, periods));
        true
    }

    /// The mode most recently rendered, if any.
    pub fn displayed_mode(&self) -> Option<Mode> {
        self.displayed_mode
    }
}

/// Builds line 1: `Mode: <label>` padded to the full line width.
pub fn render_mode_line(mode: Mode) -> String<LINE_WIDTH> {
    let mut line = String::new();
    let _ = write!(line, "Mode: {}", mode.label());
    pad(&mut line);
    line
}

/// Builds line 2: the shared period in synchronized mode, otherwise
/// the three per-channel periods divided by 100.
pub fn render_period_line(mode: Mode, periods: [u32; 3]) -> String<LINE_WIDTH> {
    let mut line = String::new();
    if mode.is_synchronized() {
        let _ = write!(line, "Speed: {} ms", periods[0]);
    } else {
        let _ = write!(
            line,
            "R{} G{} B{}",
            periods[0] / 100,
            periods[1] / 100,
            periods[2] / 100
        );
    }
    pad(&mut line);
    line
}

// Pads with trailing spaces so shorter text overwrites longer text.
fn pad(line: &mut String<LINE_WIDTH>) {
    while line.push(' ').is_ok() {}
}
