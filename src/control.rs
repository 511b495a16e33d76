//! The cooperative main-loop kernel.
//!
//! [`ControlLoop::tick`] is one iteration of the classic embedded
//! superloop: feed the watchdog, drain the deferred persistence
//! request, toggle the heartbeat on its cadence, track the analog
//! inputs, drive the three PWM channels, refresh the display. Every
//! step completes in bounded time; there is no exit and no error
//! path. A stalled iteration is caught by the external watchdog
//! supervisor, whose expiry hard-resets the whole system.

use crate::button::SharedMode;
use crate::channel::{ChannelController, PwmChannel};
use crate::display::{CharacterDisplay, DisplayTask};
use crate::mode::Mode;
use crate::persist::{self, ModeStore};
use crate::time::{Periodic, TimeDuration, TimeInstant, TimeSource};

/// Heartbeat toggle interval, in milliseconds.
pub const HEARTBEAT_INTERVAL_MS: u64 = 1000;

/// Watchdog timeout the supervisor is expected to be armed with, in
/// milliseconds. The loop must feed at least this often.
pub const WATCHDOG_TIMEOUT_MS: u64 = 2000;

/// Trait for abstracting the hardware watchdog supervisor.
///
/// The supervisor is armed once at startup by platform code; the loop
/// only ever feeds it. Letting the timeout expire is the system's
/// sole fatal-recovery mechanism (full hardware reset), so there is
/// nothing to return here.
pub trait Watchdog {
    /// Resets the watchdog countdown.
    fn feed(&mut self);
}

/// Trait for abstracting the heartbeat status output.
///
/// A single digital output toggled at 1 Hz as a liveness signal. On
/// register-level targets this is one port XOR.
pub trait HeartbeatPin {
    /// Inverts the output level.
    fn toggle(&mut self);
}

/// Trait for abstracting one raw analog input.
pub trait AnalogInput {
    /// Samples the input, returning a raw 10-bit value (0..=1023).
    fn read(&mut self) -> u16;
}

/// The breathing-LED control kernel.
///
/// Owns the three channel controllers and all peripheral handles;
/// borrows the time source and the ISR-shared mode cell. Call
/// [`tick`](Self::tick) from the superloop as fast as possible - all
/// sub-tasks are interval-gated internally.
///
/// # Type Parameters
/// * `'a` - Lifetime of the time source and shared-mode borrows
/// * `I` - Time instant type
/// * `T` - Time source implementation
/// * `P` - PWM channel implementation
/// * `A` - Analog input implementation
/// * `D` - Character display implementation
/// * `S` - Mode store implementation
/// * `W` - Watchdog implementation
/// * `H` - Heartbeat pin implementation
pub struct ControlLoop<'a, I, T, P, A, D, S, W, H>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmChannel,
    A: AnalogInput,
    D: CharacterDisplay,
    S: ModeStore,
    W: Watchdog,
    H: HeartbeatPin,
{
    time_source: &'a T,
    shared: &'a SharedMode,
    channels: [ChannelController<P>; 3],
    inputs: [A; 3],
    display: D,
    display_task: DisplayTask<I>,
    store: S,
    watchdog: W,
    heartbeat: H,
    heartbeat_gate: Periodic<I>,
    started_at: I,
}

impl<'a, I, T, P, A, D, S, W, H> ControlLoop<'a, I, T, P, A, D, S, W, H>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmChannel,
    A: AnalogInput,
    D: CharacterDisplay,
    S: ModeStore,
    W: Watchdog,
    H: HeartbeatPin,
{
    /// Builds the kernel and restores the persisted mode.
    ///
    /// Reads the stored mode byte into `shared` (an invalid byte
    /// falls back to the default mode) so the restore happens before
    /// the button interrupt is armed and before the first tick.
    pub fn new(
        pwm_outputs: [P; 3],
        inputs: [A; 3],
        display: D,
        mut store: S,
        watchdog: W,
        heartbeat: H,
        shared: &'a SharedMode,
        time_source: &'a T,
    ) -> Self {
        shared.set_mode(persist::load_mode(&mut store));

        let started_at = time_source.now();
        Self {
            time_source,
            shared,
            channels: pwm_outputs.map(ChannelController::new),
            inputs,
            display,
            display_task: DisplayTask::new(started_at),
            store,
            watchdog,
            heartbeat,
            heartbeat_gate: Periodic::new(
                I::Duration::from_millis(HEARTBEAT_INTERVAL_MS),
                started_at,
            ),
            started_at,
        }
    }

    /// Runs one cooperative iteration.
    ///
    /// Step order is load-bearing: the watchdog feed happens before
    /// anything else so no other sub-task can stand between the loop
    /// and its liveness deadline, and the persistence flush runs from
    /// this context precisely because it must never run in the ISR.
    pub fn tick(&mut self) {
        self.watchdog.feed();

        persist::flush_if_pending(self.shared, &mut self.store);

        let now = self.time_source.now();
        if self.heartbeat_gate.due(now) {
            self.heartbeat.toggle();
        }

        let mode = self.shared.mode();
        let raw = [
            self.inputs[0].read(),
            self.inputs[1].read(),
            self.inputs[2].read(),
        ];

        if mode.is_synchronized() {
            // One shared period, derived from the first input.
            for channel in &mut self.channels {
                channel.set_period_from_raw(raw[0]);
            }
        } else {
            for (channel, raw) in self.channels.iter_mut().zip(raw) {
                channel.set_period_from_raw(raw);
            }
        }

        let elapsed_ms = now.duration_since(self.started_at).as_millis();
        for channel in &mut self.channels {
            channel.update(elapsed_ms, mode);
        }

        let periods = self.channel_periods();
        self.display_task
            .refresh(now, mode, periods, &mut self.display);
    }

    /// The current mode as seen by the loop.
    pub fn mode(&self) -> Mode {
        self.shared.mode()
    }

    /// The three channel periods in whole milliseconds.
    pub fn channel_periods(&self) -> [u32; 3] {
        [
            self.channels[0].period_ms(),
            self.channels[1].period_ms(),
            self.channels[2].period_ms(),
        ]
    }

    /// The instant the loop was constructed at.
    pub fn started_at(&self) -> I {
        self.started_at
    }
}
