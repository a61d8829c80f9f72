//! Match data: scores, timers, per-player bookkeeping and menu state

use heapless::Vec;

use crate::config::RulesConfig;
use crate::hal::Instant;
use crate::rules::Rules;
use crate::types::{MatchType, MenuItem, Player, Profile, RackResult};

/// Per-player bookkeeping
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub score: u16,
    /// Race target, 0 while no race is set
    pub target: u16,
    pub skill_level: u8,
    pub extension_available: bool,
    pub timeouts_remaining: u8,
    pub timeouts_per_rack: u8,
}

impl PlayerStats {
    fn fresh() -> Self {
        Self {
            extension_available: true,
            ..Self::default()
        }
    }

    /// Give back the per-rack allowances
    pub fn refresh_rack(&mut self) {
        self.timeouts_remaining = self.timeouts_per_rack;
        self.extension_available = true;
    }

    pub fn has_won(&self) -> bool {
        self.target > 0 && self.score >= self.target
    }
}

/// Everything the device knows about the match in progress
#[derive(Clone, Debug)]
pub struct Match {
    /// Seconds left on the shot clock
    pub countdown: u16,
    /// Base shot clock for the selected profile
    pub profile_based_countdown: u16,
    pub extension_duration: u16,
    /// One extension per turn, shared by both players
    pub extension_available: bool,
    pub extension_used: bool,

    /// Ultimate Pool match clock in seconds
    pub match_countdown: u16,
    /// Value last shown, for display diffing
    pub prev_match_countdown: u16,
    pub match_timer_running: bool,

    pub players: [PlayerStats; 2],
    /// Innings counted in halves: even means player one is at the table
    pub half_innings: u16,
    pub rack_counter: u16,
    pub break_shot: bool,
    pub pending_rack_result: Option<RackResult>,

    pub selected_profile: Option<Profile>,
    pub match_type: MatchType,
    pub rules_config: RulesConfig,
    pub timeouts_only: bool,
    pub rules: Option<Rules>,

    pub menu_items: Vec<MenuItem, 6>,
    pub current_menu_index: usize,
    /// Scratch value for setup screens and the menu editor
    pub temp_setting_value: u16,
    pub profile_selection_index: usize,
    pub speaker_muted: bool,

    pub shootout_start: Option<Instant>,
    pub p1_shootout_time: Option<u32>,
    pub p2_shootout_time: Option<u32>,
    pub winner: Option<Player>,
}

impl Match {
    pub fn new(rules_config: RulesConfig) -> Self {
        Self {
            countdown: 0,
            profile_based_countdown: 0,
            extension_duration: 0,
            extension_available: true,
            extension_used: false,
            match_countdown: 0,
            prev_match_countdown: 0,
            match_timer_running: false,
            players: [PlayerStats::fresh(); 2],
            half_innings: 2,
            rack_counter: 1,
            break_shot: true,
            pending_rack_result: None,
            selected_profile: None,
            match_type: MatchType::NineBall,
            rules_config,
            timeouts_only: false,
            rules: None,
            menu_items: Vec::new(),
            current_menu_index: 0,
            temp_setting_value: 0,
            profile_selection_index: 0,
            speaker_muted: false,
            shootout_start: None,
            p1_shootout_time: None,
            p2_shootout_time: None,
            winner: None,
        }
    }

    /// Back to defaults. Mute and the loaded rules survive.
    pub fn reset(&mut self) {
        let muted = self.speaker_muted;
        let rules_config = core::mem::take(&mut self.rules_config);
        *self = Self::new(rules_config);
        self.speaker_muted = muted;
    }

    pub fn player(&self, player: Player) -> &PlayerStats {
        &self.players[player.index()]
    }

    pub fn player_mut(&mut self, player: Player) -> &mut PlayerStats {
        &mut self.players[player.index()]
    }

    /// Player at the table, derived from the inning counter
    pub fn shooter(&self) -> Player {
        if self.half_innings % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Whole inning number
    pub fn inning(&self) -> u16 {
        self.half_innings / 2
    }

    /// End of turn: the other player comes to the table
    pub fn advance_inning(&mut self) {
        self.half_innings = self.half_innings.saturating_add(1);
    }

    pub fn profile(&self) -> Option<Profile> {
        self.selected_profile
    }

    /// Load timer defaults for a profile
    pub fn apply_profile(&mut self, profile: Profile) {
        self.selected_profile = Some(profile);
        self.profile_based_countdown = profile.shot_clock_secs();
        self.extension_duration = profile.extension_secs();
        self.countdown = self.profile_based_countdown;
        self.timeouts_only = profile == Profile::TimeoutsMode;
    }

    /// Shot clock for the next shot: a pending break adds the extension
    pub fn idle_countdown(&self) -> u16 {
        if self.timeouts_only || !self.break_shot {
            self.profile_based_countdown
        } else {
            self.profile_based_countdown
                .saturating_add(self.extension_duration)
        }
    }

    pub fn clear_turn_extension(&mut self) {
        self.extension_available = true;
        self.extension_used = false;
    }

    /// Per-rack allowances back for both players
    pub fn refresh_rack_allowances(&mut self) {
        for player in self.players.iter_mut() {
            player.refresh_rack();
        }
    }

    pub fn set_targets(&mut self, p1: u16, p2: u16) {
        self.players[0].target = p1;
        self.players[1].target = p2;
    }

    pub fn set_timeouts_per_rack(&mut self, p1: u8, p2: u8) {
        self.players[0].timeouts_per_rack = p1;
        self.players[1].timeouts_per_rack = p2;
        self.refresh_rack_allowances();
    }

    pub fn add_point(&mut self, player: Player) {
        let stats = self.player_mut(player);
        stats.score = stats.score.saturating_add(1);
    }

    /// First player at or past their target
    pub fn leader_at_target(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|p| self.player(*p).has_won())
    }

    /// Higher score, or None on a tie
    pub fn leader(&self) -> Option<Player> {
        let (p1, p2) = (self.players[0].score, self.players[1].score);
        match p1.cmp(&p2) {
            core::cmp::Ordering::Greater => Some(Player::One),
            core::cmp::Ordering::Less => Some(Player::Two),
            core::cmp::Ordering::Equal => None,
        }
    }

    /// Menu entries for the selected profile
    pub fn build_menu(&mut self) {
        self.menu_items.clear();
        let items: &[MenuItem] = if self.timeouts_only {
            &[MenuItem::Inning, MenuItem::Rack, MenuItem::ExitMatch, MenuItem::Mute]
        } else {
            &[
                MenuItem::PlayerOneScore,
                MenuItem::PlayerTwoScore,
                MenuItem::ExitMatch,
                MenuItem::Mute,
            ]
        };
        for item in items {
            let _ = self.menu_items.push(*item);
        }
        self.current_menu_index = 0;
    }

    pub fn current_menu_item(&self) -> Option<MenuItem> {
        self.menu_items.get(self.current_menu_index).copied()
    }

    /// Value shown for a menu entry
    pub fn menu_value(&self, item: MenuItem) -> u16 {
        match item {
            MenuItem::PlayerOneScore => self.players[0].score,
            MenuItem::PlayerTwoScore => self.players[1].score,
            MenuItem::Inning => self.inning(),
            MenuItem::Rack => self.rack_counter,
            MenuItem::ExitMatch => 0,
            MenuItem::Mute => self.speaker_muted as u16,
        }
    }

    /// Lowest value an edit may set. Innings and racks never go backwards.
    pub fn menu_floor(&self, item: MenuItem) -> u16 {
        match item {
            MenuItem::Inning => self.inning(),
            MenuItem::Rack => self.rack_counter,
            _ => item.floor(),
        }
    }

    /// Write an edited value back; the half-inning (who is shooting) is kept
    pub fn apply_menu_value(&mut self, item: MenuItem, value: u16) {
        let value = value.max(self.menu_floor(item));
        match item {
            MenuItem::PlayerOneScore => self.players[0].score = value,
            MenuItem::PlayerTwoScore => self.players[1].score = value,
            MenuItem::Inning => {
                self.half_innings = value.saturating_mul(2).saturating_add(self.half_innings % 2);
            }
            MenuItem::Rack => self.rack_counter = value,
            MenuItem::ExitMatch => {}
            MenuItem::Mute => self.speaker_muted = value != 0,
        }
    }
}
