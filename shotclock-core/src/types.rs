//! Core data types for the shot clock

use crate::hal::{Duration, Instant};

/// Physical buttons on the device
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Ball made / confirm
    Make,
    /// Extension request / value up
    Up,
    /// Extension cancel / value down
    Down,
    /// Missed shot / back
    Miss,
}

impl Button {
    /// All buttons in line order
    pub const ALL: [Button; 4] = [Button::Make, Button::Up, Button::Down, Button::Miss];

    /// Line index used for per-button bookkeeping
    pub const fn index(&self) -> usize {
        match self {
            Button::Make => 0,
            Button::Up => 1,
            Button::Down => 2,
            Button::Miss => 3,
        }
    }

    /// Returns true for the lines with the long debounce window
    pub const fn is_primary(&self) -> bool {
        match self {
            Button::Make | Button::Miss => true,
            Button::Up | Button::Down => false,
        }
    }

    /// The other half of the Make+Miss chord
    pub const fn chord_partner(&self) -> Option<Button> {
        match self {
            Button::Make => Some(Button::Miss),
            Button::Miss => Some(Button::Make),
            Button::Up | Button::Down => None,
        }
    }
}

/// Logical event handed to the dispatcher
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    Make,
    Up,
    Down,
    Miss,
    /// Make and Miss held together
    NewRack,
}

impl From<Button> for InputEvent {
    fn from(button: Button) -> Self {
        match button {
            Button::Make => InputEvent::Make,
            Button::Up => InputEvent::Up,
            Button::Down => InputEvent::Down,
            Button::Miss => InputEvent::Miss,
        }
    }
}

/// Debounced press, timestamped in interrupt context
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ButtonPress {
    pub button: Button,
    pub at: Instant,
}

/// Game profiles in selection order
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    Apa,
    Bca,
    TimeoutsMode,
    UltimatePool,
    Wnt,
}

impl Profile {
    /// Selection list order
    pub const ALL: [Profile; 5] = [
        Profile::Apa,
        Profile::Bca,
        Profile::TimeoutsMode,
        Profile::UltimatePool,
        Profile::Wnt,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Profile::Apa => "APA",
            Profile::Bca => "BCA",
            Profile::TimeoutsMode => "Timeouts Mode",
            Profile::UltimatePool => "Ultimate Pool",
            Profile::Wnt => "WNT",
        }
    }

    /// Position in the selection list
    pub fn index(&self) -> usize {
        Profile::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    /// Shot clock length in seconds
    pub const fn shot_clock_secs(&self) -> u16 {
        match self {
            Profile::Apa => 20,
            Profile::Bca => 45,
            Profile::TimeoutsMode => 60,
            Profile::UltimatePool => 30,
            Profile::Wnt => 30,
        }
    }

    /// Extension length in seconds, 0 when extensions are not offered
    pub const fn extension_secs(&self) -> u16 {
        match self {
            Profile::Apa => 25,
            Profile::Bca => 45,
            Profile::TimeoutsMode => 0,
            Profile::UltimatePool => 15,
            Profile::Wnt => 30,
        }
    }

    /// Minimum remaining seconds for an extension to be cancelled
    pub const fn cancel_threshold(&self) -> u16 {
        20
    }

    /// Profiles playing a race to a target score, with per-rack timeouts
    pub const fn is_race(&self) -> bool {
        !matches!(self, Profile::TimeoutsMode)
    }

    /// Extensions paid from the shooter's timeouts instead of their per-rack allowance
    pub const fn spends_timeouts(&self) -> bool {
        matches!(self, Profile::Apa)
    }

    /// Profiles running a match clock alongside the shot clock
    pub const fn has_match_clock(&self) -> bool {
        matches!(self, Profile::UltimatePool)
    }
}

/// APA game type
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatchType {
    EightBall,
    NineBall,
}

impl MatchType {
    /// Setup-screen encoding: 0 = 8-Ball, 1 = 9-Ball
    pub const fn from_setting(value: u16) -> Self {
        if value == 0 {
            MatchType::EightBall
        } else {
            MatchType::NineBall
        }
    }

    pub const fn as_setting(&self) -> u16 {
        match self {
            MatchType::EightBall => 0,
            MatchType::NineBall => 1,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            MatchType::EightBall => "8-Ball",
            MatchType::NineBall => "9-Ball",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub const fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Outcome awaiting confirmation at the end of an 8-Ball rack
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RackResult {
    Win,
    Lose,
}

/// In-match menu entries
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    PlayerOneScore,
    PlayerTwoScore,
    Inning,
    Rack,
    ExitMatch,
    Mute,
}

impl MenuItem {
    pub const fn label(&self) -> &'static str {
        match self {
            MenuItem::PlayerOneScore => "Player 1",
            MenuItem::PlayerTwoScore => "Player 2",
            MenuItem::Inning => "Inning",
            MenuItem::Rack => "Rack",
            MenuItem::ExitMatch => "Exit Match",
            MenuItem::Mute => "Mute",
        }
    }

    /// Lowest value the editor allows
    pub const fn floor(&self) -> u16 {
        match self {
            MenuItem::Inning | MenuItem::Rack => 1,
            _ => 0,
        }
    }
}

/// Configuration errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Debounce window out of range
    InvalidDebounce,
    /// Scheduler interval out of range
    InvalidInterval,
    /// Rules file could not be parsed
    Malformed,
}

#[cfg(feature = "std")]
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidDebounce => write!(f, "Debounce must be between 10 and 1000ms"),
            ConfigError::InvalidInterval => write!(f, "Scheduler intervals must be non-zero"),
            ConfigError::Malformed => write!(f, "Rules configuration is malformed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Timing parameters for input handling and the countdown scheduler
#[derive(Copy, Clone, Debug)]
pub struct ShotClockConfig {
    /// Debounce window for Make and Miss
    pub primary_debounce_ms: u32,
    /// Debounce window for Up and Down
    pub secondary_debounce_ms: u32,
    /// Make and Miss pressed within this window form a chord
    pub chord_window: Duration,
    /// Shot clock decrement period
    pub tick: Duration,
    /// Expired clock flash period
    pub flash_interval: Duration,
    /// Selection highlight blink period
    pub blink_interval: Duration,
    /// Inactivity before the highlight starts blinking
    pub blink_grace: Duration,
    /// Shootout stopwatch refresh period
    pub stopwatch_interval: Duration,
    /// Scheduler and input polling period
    pub poll_interval: Duration,
    /// Audio cue plays while the countdown is below this
    pub alert_below: u16,
    /// Ultimate Pool match clock in seconds
    pub match_clock_secs: u16,
    /// Pause showing the final shootout time
    pub shootout_pause: Duration,
}

impl Default for ShotClockConfig {
    fn default() -> Self {
        Self {
            primary_debounce_ms: 200,
            secondary_debounce_ms: 120,
            chord_window: Duration::from_millis(300),
            tick: Duration::from_millis(1000),
            flash_interval: Duration::from_millis(500),
            blink_interval: Duration::from_millis(500),
            blink_grace: Duration::from_millis(1000),
            stopwatch_interval: Duration::from_millis(100),
            poll_interval: Duration::from_millis(50),
            alert_below: 5,
            match_clock_secs: 1800,
            shootout_pause: Duration::from_millis(2000),
        }
    }
}

impl ShotClockConfig {
    /// Create a new configuration with validation
    pub fn new(
        primary_debounce_ms: u32,
        secondary_debounce_ms: u32,
        tick_ms: u64,
        poll_ms: u64,
    ) -> Result<Self, ConfigError> {
        for debounce in [primary_debounce_ms, secondary_debounce_ms] {
            if !(10..=1000).contains(&debounce) {
                return Err(ConfigError::InvalidDebounce);
            }
        }
        if tick_ms == 0 || poll_ms == 0 || poll_ms > tick_ms {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(Self {
            primary_debounce_ms,
            secondary_debounce_ms,
            tick: Duration::from_millis(tick_ms),
            poll_interval: Duration::from_millis(poll_ms),
            ..Self::default()
        })
    }

    /// Debounce window for a line
    pub const fn debounce_ms(&self, button: Button) -> u32 {
        if button.is_primary() {
            self.primary_debounce_ms
        } else {
            self.secondary_debounce_ms
        }
    }
}
