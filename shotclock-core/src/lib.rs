#![cfg_attr(not(feature = "std"), no_std)]

//! # Shot Clock Core
//!
//! Pool shot clock logic for embedded systems.
//! Supports APA, BCA, WNT, Ultimate Pool and a plain timeouts mode, with
//! debounced button input and a cooperative countdown scheduler.

pub mod types;
pub mod state;
pub mod config;
pub mod game;
pub mod rules;
pub mod setup;
pub mod menu;
pub mod dispatch;
pub mod input;
pub mod scheduler;
pub mod hal;

#[cfg(feature = "embassy-time")]
pub mod tasks;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use state::{State, StateMachine};
pub use config::RulesConfig;
pub use game::{Match, PlayerStats};
pub use rules::Rules;
pub use dispatch::{Followup, ShotClock};
pub use input::{ButtonBridge, ChordDetector, EdgeOutcome};
pub use scheduler::CountdownScheduler;
pub use hal::{AudioAdapter, ButtonLines, DisplayAdapter, HalError, Instant, Duration};

/// Shot clock library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: 200/120 ms debounce, one second ticks
pub fn default_config() -> ShotClockConfig {
    ShotClockConfig::default()
}
