//! Shared test infrastructure for rgb-breather integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rgb_breather::{
    AnalogInput, CharacterDisplay, HeartbeatPin, ModeStore, PwmChannel, TimeDuration, TimeInstant,
    TimeSource, Watchdog,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Clock
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockClock {
    now_ms: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            now_ms: Cell::new(0),
        })
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl TimeSource<TestInstant> for MockClock {
    fn now(&self) -> TestInstant {
        TestInstant(self.now_ms.get())
    }
}

// ============================================================================
// Mock PWM Channel
// ============================================================================

/// Mock PWM output that records every duty write
pub struct MockPwm {
    history: Rc<RefCell<Vec<u8>>>,
}

impl MockPwm {
    /// Returns the mock and a probe handle for inspecting writes
    pub fn new() -> (Self, PwmProbe) {
        let history = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                history: history.clone(),
            },
            PwmProbe { history },
        )
    }
}

impl PwmChannel for MockPwm {
    fn set_duty(&mut self, duty: u8) {
        self.history.borrow_mut().push(duty);
    }
}

pub struct PwmProbe {
    history: Rc<RefCell<Vec<u8>>>,
}

impl PwmProbe {
    pub fn last_duty(&self) -> Option<u8> {
        self.history.borrow().last().copied()
    }

    pub fn write_count(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn history(&self) -> Vec<u8> {
        self.history.borrow().clone()
    }
}

// ============================================================================
// Mock Analog Input
// ============================================================================

/// Mock analog input whose value can be changed mid-test
pub struct MockAnalog {
    value: Rc<Cell<u16>>,
}

impl MockAnalog {
    pub fn new(initial: u16) -> (Self, AnalogKnob) {
        let value = Rc::new(Cell::new(initial));
        (
            Self {
                value: value.clone(),
            },
            AnalogKnob { value },
        )
    }
}

impl AnalogInput for MockAnalog {
    fn read(&mut self) -> u16 {
        self.value.get()
    }
}

/// Handle for turning a mock potentiometer during a test
pub struct AnalogKnob {
    value: Rc<Cell<u16>>,
}

impl AnalogKnob {
    pub fn set(&self, raw: u16) {
        self.value.set(raw);
    }
}

// ============================================================================
// Mock Character Display
// ============================================================================

#[derive(Debug)]
struct Frame {
    lines: [[u8; 16]; 2],
    cursor: (usize, usize),
}

/// Mock 2x16 display that keeps a framebuffer of the visible text
pub struct MockDisplay {
    frame: Rc<RefCell<Frame>>,
}

impl MockDisplay {
    pub fn new() -> (Self, DisplayProbe) {
        let frame = Rc::new(RefCell::new(Frame {
            lines: [[b' '; 16]; 2],
            cursor: (0, 0),
        }));
        (
            Self {
                frame: frame.clone(),
            },
            DisplayProbe { frame },
        )
    }
}

impl CharacterDisplay for MockDisplay {
    fn set_cursor(&mut self, col: u8, row: u8) {
        self.frame.borrow_mut().cursor = (col as usize, row as usize);
    }

    fn print(&mut self, text: &str) {
        let mut frame = self.frame.borrow_mut();
        let (mut col, row) = frame.cursor;
        for byte in text.bytes() {
            // Writes past the right edge fall off, as on real panels.
            if col >= 16 || row >= 2 {
                break;
            }
            frame.lines[row][col] = byte;
            col += 1;
        }
        frame.cursor = (col, row);
    }
}

pub struct DisplayProbe {
    frame: Rc<RefCell<Frame>>,
}

impl DisplayProbe {
    /// The visible text of the given line, padding included
    pub fn line(&self, row: usize) -> String {
        String::from_utf8(self.frame.borrow().lines[row].to_vec()).unwrap()
    }
}

// ============================================================================
// Mock Byte Store
// ============================================================================

#[derive(Debug)]
struct StoreState {
    value: u8,
    physical_writes: u32,
}

/// Mock one-byte non-volatile store with a write counter
pub struct MockStore {
    state: Rc<RefCell<StoreState>>,
}

impl MockStore {
    pub fn holding(value: u8) -> (Self, StoreProbe) {
        let state = Rc::new(RefCell::new(StoreState {
            value,
            physical_writes: 0,
        }));
        (
            Self {
                state: state.clone(),
            },
            StoreProbe { state },
        )
    }
}

impl MockStore {
    /// Probe over this store's shared cell
    pub fn probe(&self) -> StoreProbe {
        StoreProbe {
            state: self.state.clone(),
        }
    }
}

impl ModeStore for MockStore {
    fn read(&mut self) -> u8 {
        self.state.borrow().value
    }

    fn write(&mut self, value: u8) {
        let mut state = self.state.borrow_mut();
        state.value = value;
        state.physical_writes += 1;
    }
}

pub struct StoreProbe {
    state: Rc<RefCell<StoreState>>,
}

impl StoreProbe {
    pub fn value(&self) -> u8 {
        self.state.borrow().value
    }

    pub fn physical_writes(&self) -> u32 {
        self.state.borrow().physical_writes
    }

    /// A second store view over the same cell, for simulated reboots
    pub fn reopen(&self) -> MockStore {
        MockStore {
            state: self.state.clone(),
        }
    }
}

// ============================================================================
// Mock Watchdog
// ============================================================================

#[derive(Debug)]
struct WatchdogState {
    last_fed_ms: u64,
    feed_count: u32,
}

/// Mock watchdog that timestamps every feed against the mock clock
pub struct MockWatchdog {
    clock: Rc<MockClock>,
    state: Rc<RefCell<WatchdogState>>,
}

impl MockWatchdog {
    pub fn new(clock: Rc<MockClock>) -> (Self, WatchdogProbe) {
        let state = Rc::new(RefCell::new(WatchdogState {
            last_fed_ms: 0,
            feed_count: 0,
        }));
        (
            Self {
                clock: clock.clone(),
                state: state.clone(),
            },
            WatchdogProbe { clock, state },
        )
    }
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        let mut state = self.state.borrow_mut();
        state.last_fed_ms = self.clock.now_ms();
        state.feed_count += 1;
    }
}

/// Simulates the supervisor side of the watchdog for fault injection
pub struct WatchdogProbe {
    clock: Rc<MockClock>,
    state: Rc<RefCell<WatchdogState>>,
}

impl WatchdogProbe {
    pub fn feed_count(&self) -> u32 {
        self.state.borrow().feed_count
    }

    /// Whether the supervisor would have reset the system by now
    pub fn expired(&self, timeout_ms: u64) -> bool {
        self.clock.now_ms() - self.state.borrow().last_fed_ms > timeout_ms
    }
}

// ============================================================================
// Mock Heartbeat Pin
// ============================================================================

/// Mock status output counting toggles
pub struct MockHeartbeat {
    toggles: Rc<Cell<u32>>,
}

impl MockHeartbeat {
    pub fn new() -> (Self, HeartbeatProbe) {
        let toggles = Rc::new(Cell::new(0));
        (
            Self {
                toggles: toggles.clone(),
            },
            HeartbeatProbe { toggles },
        )
    }
}

impl HeartbeatPin for MockHeartbeat {
    fn toggle(&mut self) {
        self.toggles.set(self.toggles.get() + 1);
    }
}

pub struct HeartbeatProbe {
    toggles: Rc<Cell<u32>>,
}

impl HeartbeatProbe {
    pub fn count(&self) -> u32 {
        self.toggles.get()
    }
}

// ============================================================================
// Control Loop Rig
// ============================================================================

use rgb_breather::{ControlLoop, SharedMode};

pub type TestLoop<'a> = ControlLoop<
    'a,
    TestInstant,
    MockClock,
    MockPwm,
    MockAnalog,
    MockDisplay,
    MockStore,
    MockWatchdog,
    MockHeartbeat,
>;

/// Probe handles into every peripheral the loop owns
pub struct Probes {
    pub pwm: [PwmProbe; 3],
    pub knobs: [AnalogKnob; 3],
    pub display: DisplayProbe,
    pub store: StoreProbe,
    pub watchdog: WatchdogProbe,
    pub heartbeat: HeartbeatProbe,
}

/// Builds a fully mocked control loop around the given clock and
/// shared-mode cell, with `stored` in non-volatile memory and the
/// three analog inputs reading `raws`.
pub fn build_control<'a>(
    shared: &'a SharedMode,
    clock: &'a Rc<MockClock>,
    stored: u8,
    raws: [u16; 3],
) -> (TestLoop<'a>, Probes) {
    let (pwm_r, probe_r) = MockPwm::new();
    let (pwm_g, probe_g) = MockPwm::new();
    let (pwm_b, probe_b) = MockPwm::new();
    let (in_r, knob_r) = MockAnalog::new(raws[0]);
    let (in_g, knob_g) = MockAnalog::new(raws[1]);
    let (in_b, knob_b) = MockAnalog::new(raws[2]);
    let (display, display_probe) = MockDisplay::new();
    let (store, store_probe) = MockStore::holding(stored);
    let (watchdog, watchdog_probe) = MockWatchdog::new(clock.clone());
    let (heartbeat, heartbeat_probe) = MockHeartbeat::new();

    let control = ControlLoop::new(
        [pwm_r, pwm_g, pwm_b],
        [in_r, in_g, in_b],
        display,
        store,
        watchdog,
        heartbeat,
        shared,
        clock.as_ref(),
    );

    (
        control,
        Probes {
            pwm: [probe_r, probe_g, probe_b],
            knobs: [knob_r, knob_g, knob_b],
            display: display_probe,
            store: store_probe,
            watchdog: watchdog_probe,
            heartbeat: heartbeat_probe,
        },
    )
}

/// Same as [`build_control`] but over an existing store cell, for
/// simulated reboots.
pub fn build_control_with_store<'a>(
    shared: &'a SharedMode,
    clock: &'a Rc<MockClock>,
    store: MockStore,
    raws: [u16; 3],
) -> (TestLoop<'a>, Probes) {
    let (pwm_r, probe_r) = MockPwm::new();
    let (pwm_g, probe_g) = MockPwm::new();
    let (pwm_b, probe_b) = MockPwm::new();
    let (in_r, knob_r) = MockAnalog::new(raws[0]);
    let (in_g, knob_g) = MockAnalog::new(raws[1]);
    let (in_b, knob_b) = MockAnalog::new(raws[2]);
    let (display, display_probe) = MockDisplay::new();
    let store_probe = store.probe();
    let (watchdog, watchdog_probe) = MockWatchdog::new(clock.clone());
    let (heartbeat, heartbeat_probe) = MockHeartbeat::new();

    let control = ControlLoop::new(
        [pwm_r, pwm_g, pwm_b],
        [in_r, in_g, in_b],
        display,
        store,
        watchdog,
        heartbeat,
        shared,
        clock.as_ref(),
    );

    (
        control,
        Probes {
            pwm: [probe_r, probe_g, probe_b],
            knobs: [knob_r, knob_g, knob_b],
            display: display_probe,
            store: store_probe,
            watchdog: watchdog_probe,
            heartbeat: heartbeat_probe,
        },
    )
}
