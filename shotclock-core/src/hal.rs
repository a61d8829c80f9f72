//! Hardware Abstraction Layer for the shot clock

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock instant type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.0)
        }
    }

    /// Mock duration type
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }
}

use crate::game::Match;
use crate::types::{Button, MatchType, MenuItem, Player};

/// Milliseconds from `earlier` to `later`, zero if the clock went backwards
pub fn millis_between(earlier: Instant, later: Instant) -> u64 {
    later.as_millis().saturating_sub(earlier.as_millis())
}

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Audio peripheral did not accept the cue
    AudioError,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::AudioError => write!(f, "Audio playback failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Display sink. Every call is a rendering intent; nothing flows back.
pub trait DisplayAdapter {
    /// Idle screen between shots
    fn enter_idle_mode(&mut self, game: &Match);

    /// Running shot clock screen
    fn enter_shot_clock(&mut self, game: &Match);

    /// Refresh countdown digits and, with a match clock, the match time
    fn update_timer_display(&mut self, game: &Match);

    fn render_profile_selection(&mut self, index: usize, clear_all: bool);

    fn render_menu(&mut self, game: &Match);

    /// Value editor for one menu entry
    fn render_menu_value(&mut self, item: MenuItem, value: u16);

    fn render_exit_confirmation(&mut self);

    fn render_skill_level_selection(&mut self, player: Player, level: u16);

    fn render_game_type_selection(&mut self, match_type: MatchType);

    fn render_wnt_target_selection(&mut self, target: u16);

    fn render_victory(&mut self, winner: Player);

    fn render_message(&mut self, text: &str);

    fn render_shootout_announcement(&mut self);

    fn render_shootout_stopwatch(&mut self, elapsed_ms: u32);

    /// Expired clock digits on/off
    fn flash_timer(&mut self, visible: bool);

    /// Current selection highlight on/off
    fn blink_highlight(&mut self, visible: bool);
}

/// Audio sink for the low-time cue
pub trait AudioAdapter {
    fn play_alert(&mut self) -> Result<(), HalError>;
}

/// Live level of the button lines
pub trait ButtonLines {
    fn is_pressed(&self, button: Button) -> bool;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use heapless::{String, Vec};

    /// One recorded display intent
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DisplayCall {
        EnterIdle(u16),
        EnterShotClock(u16),
        UpdateTimer(u16),
        ProfileSelection { index: usize, clear_all: bool },
        Menu(usize),
        MenuValue(MenuItem, u16),
        ExitConfirmation,
        SkillLevel(Player, u16),
        GameType(MatchType),
        WntTarget(u16),
        Victory(Player),
        Message(String<24>),
        ShootoutAnnouncement,
        Stopwatch(u32),
        FlashTimer(bool),
        BlinkHighlight(bool),
    }

    const HISTORY: usize = 128;

    /// Display that records intents, keeping the most recent ones
    #[derive(Default)]
    pub struct RecordingDisplay {
        calls: Vec<DisplayCall, HISTORY>,
    }

    impl RecordingDisplay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> &[DisplayCall] {
            &self.calls
        }

        pub fn last(&self) -> Option<&DisplayCall> {
            self.calls.last()
        }

        pub fn contains(&self, call: &DisplayCall) -> bool {
            self.calls.contains(call)
        }

        pub fn clear(&mut self) {
            self.calls.clear();
        }

        fn record(&mut self, call: DisplayCall) {
            if self.calls.is_full() {
                self.calls.remove(0);
            }
            let _ = self.calls.push(call);
        }
    }

    impl DisplayAdapter for RecordingDisplay {
        fn enter_idle_mode(&mut self, game: &Match) {
            self.record(DisplayCall::EnterIdle(game.countdown));
        }

        fn enter_shot_clock(&mut self, game: &Match) {
            self.record(DisplayCall::EnterShotClock(game.countdown));
        }

        fn update_timer_display(&mut self, game: &Match) {
            self.record(DisplayCall::UpdateTimer(game.countdown));
        }

        fn render_profile_selection(&mut self, index: usize, clear_all: bool) {
            self.record(DisplayCall::ProfileSelection { index, clear_all });
        }

        fn render_menu(&mut self, game: &Match) {
            self.record(DisplayCall::Menu(game.current_menu_index));
        }

        fn render_menu_value(&mut self, item: MenuItem, value: u16) {
            self.record(DisplayCall::MenuValue(item, value));
        }

        fn render_exit_confirmation(&mut self) {
            self.record(DisplayCall::ExitConfirmation);
        }

        fn render_skill_level_selection(&mut self, player: Player, level: u16) {
            self.record(DisplayCall::SkillLevel(player, level));
        }

        fn render_game_type_selection(&mut self, match_type: MatchType) {
            self.record(DisplayCall::GameType(match_type));
        }

        fn render_wnt_target_selection(&mut self, target: u16) {
            self.record(DisplayCall::WntTarget(target));
        }

        fn render_victory(&mut self, winner: Player) {
            self.record(DisplayCall::Victory(winner));
        }

        fn render_message(&mut self, text: &str) {
            let mut message = String::new();
            for c in text.chars() {
                if message.push(c).is_err() {
                    break;
                }
            }
            self.record(DisplayCall::Message(message));
        }

        fn render_shootout_announcement(&mut self) {
            self.record(DisplayCall::ShootoutAnnouncement);
        }

        fn render_shootout_stopwatch(&mut self, elapsed_ms: u32) {
            self.record(DisplayCall::Stopwatch(elapsed_ms));
        }

        fn flash_timer(&mut self, visible: bool) {
            self.record(DisplayCall::FlashTimer(visible));
        }

        fn blink_highlight(&mut self, visible: bool) {
            self.record(DisplayCall::BlinkHighlight(visible));
        }
    }

    /// Audio sink counting cues, optionally failing every call
    #[derive(Default)]
    pub struct MockAudio {
        pub alerts: u32,
        pub failing: bool,
    }

    impl MockAudio {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self { alerts: 0, failing: true }
        }
    }

    impl AudioAdapter for MockAudio {
        fn play_alert(&mut self) -> Result<(), HalError> {
            if self.failing {
                return Err(HalError::AudioError);
            }
            self.alerts += 1;
            Ok(())
        }
    }

    /// Button levels set directly by the test
    #[derive(Default)]
    pub struct MockLines {
        pressed: [bool; 4],
    }

    impl MockLines {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pressed(&mut self, button: Button, pressed: bool) {
            self.pressed[button.index()] = pressed;
        }
    }

    impl ButtonLines for MockLines {
        fn is_pressed(&self, button: Button) -> bool {
            self.pressed[button.index()]
        }
    }
}
