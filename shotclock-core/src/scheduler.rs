//! Countdown scheduler: shot clock, match clock and screen cadences
//!
//! [`CountdownScheduler::poll`] is called periodically from one cooperative
//! task. It re-reads the state on every call and restarts its phase whenever
//! the state machine reports a transition, so a press handled between two
//! polls always cancels the tick that was pending.

use crate::dispatch::ShotClock;
use crate::hal::{millis_between, AudioAdapter, DisplayAdapter, Duration, Instant};
use crate::state::State;
use crate::types::{Profile, ShotClockConfig};

const MATCH_CLOCK_TICK: Duration = Duration::from_millis(1000);

pub struct CountdownScheduler {
    config: ShotClockConfig,
    seen_transition: Option<u32>,
    next_tick: Option<Instant>,
    next_flash: Option<Instant>,
    flash_visible: bool,
    next_match_tick: Option<Instant>,
    next_blink: Option<Instant>,
    blink_visible: bool,
    next_stopwatch: Option<Instant>,
}

impl CountdownScheduler {
    pub fn new(config: ShotClockConfig) -> Self {
        Self {
            config,
            seen_transition: None,
            next_tick: None,
            next_flash: None,
            flash_visible: true,
            next_match_tick: None,
            next_blink: None,
            blink_visible: true,
            next_stopwatch: None,
        }
    }

    /// Run everything due at `now`
    pub fn poll<D: DisplayAdapter, A: AudioAdapter>(
        &mut self,
        app: &mut ShotClock,
        now: Instant,
        display: &mut D,
        audio: &mut A,
    ) {
        self.sync_phase(app, now);

        match app.state.current() {
            State::CountdownInProgress => self.run_shot_clock(app, now, display, audio),
            State::CountdownComplete => self.run_flash(now, display),
            State::ShootoutP1Running | State::ShootoutP2Running => {
                self.run_stopwatch(app, now, display)
            }
            _ => {}
        }

        self.run_match_clock(app, now, display);

        if app.state.current().blinks() {
            self.run_blink(app, now, display);
        }
    }

    /// Restart phases after any transition
    fn sync_phase(&mut self, app: &ShotClock, now: Instant) {
        let transitions = app.state.transitions();
        if self.seen_transition == Some(transitions) {
            return;
        }
        self.seen_transition = Some(transitions);
        // A press seen within the last tick is taken as the start of the phase
        let origin = app
            .last_press()
            .filter(|at| *at <= now && millis_between(*at, now) <= self.config.tick.as_millis())
            .unwrap_or(now);
        self.next_tick = Some(origin + self.config.tick);
        self.next_flash = Some(origin + self.config.flash_interval);
        self.flash_visible = true;
        self.next_stopwatch = Some(origin + self.config.stopwatch_interval);
        self.next_blink = None;
        self.blink_visible = true;
    }

    fn run_shot_clock<D: DisplayAdapter, A: AudioAdapter>(
        &mut self,
        app: &mut ShotClock,
        now: Instant,
        display: &mut D,
        audio: &mut A,
    ) {
        let Some(mut due) = self.next_tick else {
            return;
        };
        while now >= due {
            let game = &mut app.game;
            game.countdown = game.countdown.saturating_sub(1);
            #[cfg(feature = "defmt")]
            defmt::trace!("Shot clock {}", game.countdown);
            display.update_timer_display(game);

            if game.countdown < self.config.alert_below && !game.speaker_muted {
                // Peripheral failures never reach the game
                let _ = audio.play_alert();
            }

            if game.countdown == 0 {
                if game.profile() == Some(Profile::Apa) {
                    game.clear_turn_extension();
                }
                app.state.transition_to(State::CountdownComplete);
                self.seen_transition = Some(app.state.transitions());
                self.next_tick = None;
                self.flash_visible = true;
                self.next_flash = Some(now + self.config.flash_interval);
                return;
            }
            due = due + self.config.tick;
        }
        self.next_tick = Some(due);
    }

    fn run_flash<D: DisplayAdapter>(&mut self, now: Instant, display: &mut D) {
        let Some(due) = self.next_flash else {
            return;
        };
        if now >= due {
            self.flash_visible = !self.flash_visible;
            display.flash_timer(self.flash_visible);
            self.next_flash = Some(now + self.config.flash_interval);
        }
    }

    fn run_stopwatch<D: DisplayAdapter>(&mut self, app: &ShotClock, now: Instant, display: &mut D) {
        let game = &app.game;
        let finished = match app.state.current() {
            State::ShootoutP1Running => game.p1_shootout_time.is_some(),
            _ => game.p2_shootout_time.is_some(),
        };
        let (Some(start), Some(due)) = (game.shootout_start, self.next_stopwatch) else {
            return;
        };
        if finished || now < due {
            return;
        }
        display.render_shootout_stopwatch(millis_between(start, now) as u32);
        self.next_stopwatch = Some(now + self.config.stopwatch_interval);
    }

    /// Match clock runs only while play is on screen; overlays freeze it
    fn run_match_clock<D: DisplayAdapter>(&mut self, app: &mut ShotClock, now: Instant, display: &mut D) {
        if !app.game.match_timer_running || !app.state.current().is_gameplay() {
            self.next_match_tick = None;
            return;
        }
        let mut due = match self.next_match_tick {
            Some(due) => due,
            None => {
                self.next_match_tick = Some(now + MATCH_CLOCK_TICK);
                return;
            }
        };
        while now >= due {
            let game = &mut app.game;
            game.prev_match_countdown = game.match_countdown;
            game.match_countdown = game.match_countdown.saturating_sub(1);
            display.update_timer_display(game);
            if game.match_countdown == 0 {
                self.next_match_tick = None;
                app.expire_match_clock(display);
                return;
            }
            due = due + MATCH_CLOCK_TICK;
        }
        self.next_match_tick = Some(due);
    }

    /// Highlight stays solid until the grace period after the last press
    fn run_blink<D: DisplayAdapter>(&mut self, app: &ShotClock, now: Instant, display: &mut D) {
        let idle_for = app
            .last_press()
            .map_or(u64::MAX, |last| millis_between(last, now));
        if idle_for < self.config.blink_grace.as_millis() {
            if !self.blink_visible {
                self.blink_visible = true;
                display.blink_highlight(true);
            }
            self.next_blink = None;
            return;
        }
        match self.next_blink {
            None => self.next_blink = Some(now + self.config.blink_interval),
            Some(due) if now >= due => {
                self.blink_visible = !self.blink_visible;
                display.blink_highlight(self.blink_visible);
                self.next_blink = Some(now + self.config.blink_interval);
            }
            Some(_) => {}
        }
    }
}

/// Scheduler phase snapshot (for testing)
#[cfg(feature = "test-utils")]
impl CountdownScheduler {
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }
}
