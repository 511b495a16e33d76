#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ControlLoop`**: the cooperative superloop kernel; one `tick()` per iteration
//! - **`ChannelController`**: one PWM channel plus its waveform period
//! - **`Mode`**: the three-entry mode table (shape, synchronization, display label)
//! - **`SharedMode`**: the atomic cell shared between the button ISR and the loop
//! - **`DebounceGate`**: minimum-interval filter for raw button edges
//! - **`DisplayTask`**: rate-limited 2x16 text rendering with forced refresh on mode change
//! - **`PwmChannel` / `AnalogInput` / `CharacterDisplay` / `ModeStore` / `Watchdog` /
//!   `HeartbeatPin`**: traits to implement for your hardware
//! - **`TimeSource`**: trait to implement for your timing system
//!
//! Brightness values are 8-bit duty cycles (0-255). When implementing `PwmChannel`
//! for your hardware, convert to your device's native resolution.

pub mod button;
pub mod channel;
pub mod control;
pub mod display;
pub mod mode;
pub mod persist;
pub mod time;
pub mod waveform;

pub use button::{DEBOUNCE_WINDOW_MS, DebounceGate, SharedMode};
pub use channel::{ANALOG_MAX, ChannelController, PERIOD_MAX_MS, PERIOD_MIN_MS, PwmChannel};
pub use control::{
    AnalogInput, ControlLoop, HEARTBEAT_INTERVAL_MS, HeartbeatPin, WATCHDOG_TIMEOUT_MS, Watchdog,
};
pub use display::{CharacterDisplay, DisplayTask, LINE_WIDTH, REFRESH_INTERVAL_MS};
pub use mode::{MODE_COUNT, Mode};
pub use persist::{ModeStore, flush_if_pending, load_mode};
pub use time::{Periodic, TimeDuration, TimeInstant, TimeSource};
pub use waveform::{DUTY_MAX, WaveShape, brightness};
