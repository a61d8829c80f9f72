//! Application context and top-level event dispatch

use crate::config::RulesConfig;
use crate::game::Match;
use crate::hal::{millis_between, DisplayAdapter, Duration, Instant};
use crate::menu::{self, MenuOutcome};
use crate::rules::{check_victory, declare_winner, enter_idle};
use crate::setup;
use crate::state::{State, StateMachine};
use crate::types::{InputEvent, Player, RackResult, ShotClockConfig};

/// Work the caller must do after a handled event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Followup {
    None,
    /// Wait this long without holding the context, then call [`ShotClock::resume`]
    Pause(Duration),
}

/// The single owned context all handlers and the scheduler operate on
pub struct ShotClock {
    pub state: StateMachine,
    pub game: Match,
    pub config: ShotClockConfig,
    last_press: Option<Instant>,
    /// Presses stamped before this are dropped
    hold_until: Option<Instant>,
}

impl ShotClock {
    pub fn new(config: ShotClockConfig, rules_config: RulesConfig) -> Self {
        Self {
            state: StateMachine::new(),
            game: Match::new(rules_config),
            config,
            last_press: None,
            hold_until: None,
        }
    }

    /// Time of the last handled press
    pub fn last_press(&self) -> Option<Instant> {
        self.last_press
    }

    /// Draw the initial screen
    pub fn boot<D: DisplayAdapter>(&mut self, display: &mut D) {
        display.render_profile_selection(self.game.profile_selection_index, true);
    }

    /// Route one logical event by current state
    pub fn handle<D: DisplayAdapter>(
        &mut self,
        event: InputEvent,
        at: Instant,
        display: &mut D,
    ) -> Followup {
        if let Some(until) = self.hold_until {
            if at < until {
                #[cfg(feature = "defmt")]
                defmt::debug!("Event {:?} dropped during result pause", event);
                return Followup::None;
            }
            self.hold_until = None;
        }
        self.last_press = Some(at);
        let current = self.state.current();
        #[cfg(feature = "defmt")]
        defmt::debug!("Event {:?} in {:?}", event, current);

        if event == InputEvent::NewRack {
            if current.is_gameplay() {
                self.new_rack(display);
            }
            return Followup::None;
        }

        match current {
            s if s.is_setup() => {
                setup::handle(event, &self.config, &mut self.state, &mut self.game, display);
            }
            State::Menu | State::EditingValue | State::ExitMatchConfirmation => {
                if menu::handle(event, &mut self.state, &mut self.game, display)
                    == MenuOutcome::ExitMatch
                {
                    self.reset(display);
                }
            }
            State::ConfirmRackEnd => self.handle_confirm_rack_end(event, display),
            State::Victory => {
                if event == InputEvent::Make {
                    self.reset(display);
                }
            }
            s if s.is_shootout() => {
                if event == InputEvent::Make {
                    return self.advance_shootout(at, display);
                }
            }
            _ => self.handle_gameplay(event, display),
        }
        Followup::None
    }

    fn handle_gameplay<D: DisplayAdapter>(&mut self, event: InputEvent, display: &mut D) {
        let Some(rules) = self.game.rules else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Gameplay without rules, resetting");
            self.reset(display);
            return;
        };
        let (sm, game) = (&mut self.state, &mut self.game);
        match event {
            InputEvent::Make => rules.handle_make(sm, game, display),
            InputEvent::Miss => rules.handle_miss(sm, game, display),
            InputEvent::Up => rules.handle_up(sm, game, display),
            InputEvent::Down => rules.handle_down(sm, game, display),
            InputEvent::NewRack => {}
        }
    }

    fn new_rack<D: DisplayAdapter>(&mut self, display: &mut D) {
        let game = &mut self.game;
        game.rack_counter = game.rack_counter.saturating_add(1);
        if game.profile().is_some_and(|p| p.is_race()) {
            game.refresh_rack_allowances();
        } else {
            game.break_shot = true;
        }
        game.clear_turn_extension();
        #[cfg(feature = "defmt")]
        defmt::info!("New rack {}", game.rack_counter);
        enter_idle(&mut self.state, game, display);
    }

    fn handle_confirm_rack_end<D: DisplayAdapter>(&mut self, event: InputEvent, display: &mut D) {
        let (sm, game) = (&mut self.state, &mut self.game);
        match event {
            InputEvent::Make => {
                let Some(result) = game.pending_rack_result.take() else {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Rack confirmation with nothing pending");
                    enter_idle(sm, game, display);
                    return;
                };
                let shooter = game.shooter();
                match result {
                    RackResult::Win => game.add_point(shooter),
                    RackResult::Lose => {
                        game.add_point(shooter.opponent());
                        game.advance_inning();
                    }
                }
                game.rack_counter = game.rack_counter.saturating_add(1);
                game.refresh_rack_allowances();
                game.clear_turn_extension();
                game.match_timer_running = false;
                if check_victory(sm, game, display) {
                    return;
                }
                game.break_shot = true;
                enter_idle(sm, game, display);
            }
            InputEvent::Miss => {
                game.pending_rack_result = None;
                enter_idle(sm, game, display);
            }
            _ => {}
        }
    }

    fn advance_shootout<D: DisplayAdapter>(&mut self, at: Instant, display: &mut D) -> Followup {
        let (sm, game) = (&mut self.state, &mut self.game);
        match sm.current() {
            State::ShootoutAnnouncement => {
                sm.transition_to(State::ShootoutP1Wait);
                display.render_shootout_stopwatch(0);
            }
            State::ShootoutP1Wait => {
                game.shootout_start = Some(at);
                sm.transition_to(State::ShootoutP1Running);
            }
            State::ShootoutP1Running => {
                game.p1_shootout_time = Some(elapsed_ms(game.shootout_start, at));
                game.shootout_start = None;
                sm.transition_to(State::ShootoutP2Wait);
                display.render_shootout_stopwatch(0);
            }
            State::ShootoutP2Wait => {
                game.shootout_start = Some(at);
                sm.transition_to(State::ShootoutP2Running);
            }
            State::ShootoutP2Running => {
                if game.p2_shootout_time.is_some() {
                    // Result already on screen, waiting out the pause
                    return Followup::None;
                }
                let elapsed = elapsed_ms(game.shootout_start, at);
                game.p2_shootout_time = Some(elapsed);
                display.render_shootout_stopwatch(elapsed);
                let pause = self.config.shootout_pause;
                self.hold_until = Some(at + pause);
                return Followup::Pause(pause);
            }
            _ => {}
        }
        Followup::None
    }

    /// Finish work deferred by [`Followup::Pause`]; a no-op if the state moved on
    pub fn resume<D: DisplayAdapter>(&mut self, display: &mut D) {
        if !self.state.shootout_p2_running() {
            return;
        }
        let (Some(p1), Some(p2)) = (self.game.p1_shootout_time, self.game.p2_shootout_time) else {
            return;
        };
        let winner = if p1 < p2 { Player::One } else { Player::Two };
        declare_winner(&mut self.state, &mut self.game, display, winner);
    }

    /// Match clock ran out: leader wins, a tie goes to a shootout
    pub fn expire_match_clock<D: DisplayAdapter>(&mut self, display: &mut D) {
        self.game.match_timer_running = false;
        match self.game.leader() {
            Some(winner) => declare_winner(&mut self.state, &mut self.game, display, winner),
            None => {
                #[cfg(feature = "defmt")]
                defmt::info!("Match clock expired on a tie, shootout");
                self.game.shootout_start = None;
                self.game.p1_shootout_time = None;
                self.game.p2_shootout_time = None;
                self.state.transition_to(State::ShootoutAnnouncement);
                display.render_shootout_announcement();
            }
        }
    }

    /// Abandon the match and return to profile selection
    pub fn reset<D: DisplayAdapter>(&mut self, display: &mut D) {
        #[cfg(feature = "defmt")]
        defmt::info!("Match reset");
        self.game.reset();
        self.state.reset();
        display.render_profile_selection(self.game.profile_selection_index, true);
    }
}

fn elapsed_ms(start: Option<Instant>, at: Instant) -> u32 {
    start.map_or(0, |s| millis_between(s, at) as u32)
}
