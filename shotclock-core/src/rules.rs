//! Rule variants interpreting buttons during play
//!
//! Gameplay states (`ShotClockIdle`, `CountdownInProgress`,
//! `CountdownComplete`) hand every button to the active [`Rules`]. Behavior
//! shared by all variants lives in the free functions at the bottom; the
//! variants only differ where scoring and rack handling differ.

use crate::game::Match;
use crate::hal::DisplayAdapter;
use crate::state::{State, StateMachine};
use crate::types::{MatchType, Player, Profile, RackResult};

/// Active rule set for a match
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rules {
    /// Plain shot clock
    Standard,
    /// Points per ball, rack counted on the break
    NineBall,
    /// Racks won or lost, confirmed by the operator
    EightBall,
}

impl Rules {
    pub fn handle_make<D: DisplayAdapter>(
        &self,
        sm: &mut StateMachine,
        game: &mut Match,
        display: &mut D,
    ) {
        match sm.current() {
            State::ShotClockIdle => start_countdown(sm, game, display),
            State::CountdownInProgress | State::CountdownComplete => match self {
                Rules::Standard | Rules::EightBall => {
                    game.break_shot = false;
                    game.clear_turn_extension();
                    enter_idle(sm, game, display);
                }
                Rules::NineBall => {
                    let shooter = game.shooter();
                    game.add_point(shooter);
                    game.clear_turn_extension();
                    if check_victory(sm, game, display) {
                        return;
                    }
                    game.break_shot = false;
                    enter_idle(sm, game, display);
                }
            },
            _ => {}
        }
    }

    pub fn handle_miss<D: DisplayAdapter>(
        &self,
        sm: &mut StateMachine,
        game: &mut Match,
        display: &mut D,
    ) {
        match sm.current() {
            State::ShotClockIdle => open_menu(sm, game, display),
            State::CountdownInProgress | State::CountdownComplete => {
                game.advance_inning();
                game.break_shot = false;
                game.clear_turn_extension();
                #[cfg(feature = "defmt")]
                defmt::debug!("Turn over, inning {} shooter {:?}", game.inning(), game.shooter());
                enter_idle(sm, game, display);
            }
            _ => {}
        }
    }

    pub fn handle_up<D: DisplayAdapter>(
        &self,
        sm: &mut StateMachine,
        game: &mut Match,
        display: &mut D,
    ) {
        match (sm.current(), self) {
            (State::CountdownInProgress, _) | (State::ShotClockIdle, Rules::Standard) => {
                if request_extension(game) {
                    display.update_timer_display(game);
                }
            }
            (State::ShotClockIdle, Rules::NineBall) => {
                if game.break_shot {
                    return;
                }
                game.rack_counter = game.rack_counter.saturating_add(1);
                game.break_shot = true;
                let shooter = game.shooter();
                game.add_point(shooter);
                if check_victory(sm, game, display) {
                    return;
                }
                game.refresh_rack_allowances();
                enter_idle(sm, game, display);
            }
            (State::ShotClockIdle, Rules::EightBall) => {
                game.pending_rack_result = Some(RackResult::Win);
                sm.transition_to(State::ConfirmRackEnd);
                display.render_message("Confirm Win?");
            }
            _ => {}
        }
    }

    pub fn handle_down<D: DisplayAdapter>(
        &self,
        sm: &mut StateMachine,
        game: &mut Match,
        display: &mut D,
    ) {
        match (sm.current(), self) {
            (State::CountdownInProgress, _) | (State::ShotClockIdle, Rules::Standard) => {
                if cancel_extension(game) {
                    display.update_timer_display(game);
                }
            }
            (State::ShotClockIdle, Rules::NineBall) => {
                // Undo of the rack just started by Up
                if !game.break_shot {
                    return;
                }
                game.rack_counter = game.rack_counter.saturating_sub(1).max(1);
                let shooter = game.shooter();
                let stats = game.player_mut(shooter);
                stats.score = stats.score.saturating_sub(1);
                game.break_shot = false;
                enter_idle(sm, game, display);
            }
            (State::ShotClockIdle, Rules::EightBall) => {
                game.pending_rack_result = Some(RackResult::Lose);
                sm.transition_to(State::ConfirmRackEnd);
                display.render_message("Confirm Loss?");
            }
            _ => {}
        }
    }
}

/// Rules variant for a profile once setup is done
pub fn rules_for(profile: Profile, match_type: MatchType) -> Rules {
    match profile {
        Profile::TimeoutsMode => Rules::Standard,
        Profile::Apa => match match_type {
            MatchType::NineBall => Rules::NineBall,
            MatchType::EightBall => Rules::EightBall,
        },
        Profile::Bca | Profile::UltimatePool | Profile::Wnt => Rules::EightBall,
    }
}

/// Reset the shot clock for the next shot and show the idle screen
pub fn enter_idle<D: DisplayAdapter>(sm: &mut StateMachine, game: &mut Match, display: &mut D) {
    game.countdown = game.idle_countdown();
    sm.transition_to(State::ShotClockIdle);
    display.enter_idle_mode(game);
}

fn start_countdown<D: DisplayAdapter>(sm: &mut StateMachine, game: &mut Match, display: &mut D) {
    if game.profile().is_some_and(|p| p.has_match_clock()) && game.match_countdown > 0 {
        game.match_timer_running = true;
    }
    sm.transition_to(State::CountdownInProgress);
    display.enter_shot_clock(game);
}

fn open_menu<D: DisplayAdapter>(sm: &mut StateMachine, game: &mut Match, display: &mut D) {
    game.current_menu_index = 0;
    sm.transition_to(State::Menu);
    display.render_menu(game);
}

/// Move to `Victory` if either player reached their target
pub fn check_victory<D: DisplayAdapter>(
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) -> bool {
    match game.leader_at_target() {
        Some(winner) => {
            declare_winner(sm, game, display, winner);
            true
        }
        None => false,
    }
}

pub fn declare_winner<D: DisplayAdapter>(
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
    winner: Player,
) {
    #[cfg(feature = "defmt")]
    defmt::info!("Victory: {:?}", winner);
    game.winner = Some(winner);
    game.match_timer_running = false;
    sm.transition_to(State::Victory);
    display.render_victory(winner);
}

/// Add an extension for the shooter if their allowance permits.
/// Returns false when the request is rejected.
pub fn request_extension(game: &mut Match) -> bool {
    if game.extension_duration == 0 || !game.extension_available {
        return false;
    }
    let spends_timeouts = game.profile().is_some_and(|p| p.spends_timeouts());
    let shooter = game.shooter();
    let stats = game.player_mut(shooter);
    if spends_timeouts {
        if stats.timeouts_remaining == 0 {
            return false;
        }
        stats.timeouts_remaining -= 1;
    } else {
        if !stats.extension_available {
            return false;
        }
        stats.extension_available = false;
    }

    game.countdown = game.countdown.saturating_add(game.extension_duration);
    game.extension_available = false;
    game.extension_used = true;
    #[cfg(feature = "defmt")]
    defmt::debug!("Extension applied, {}s left", game.countdown);
    true
}

/// Take back an applied extension while enough time remains.
/// Returns false when nothing changed.
pub fn cancel_extension(game: &mut Match) -> bool {
    if !game.extension_used {
        return false;
    }
    let threshold = game.profile().map_or(0, |p| p.cancel_threshold());
    if game.countdown < threshold {
        #[cfg(feature = "defmt")]
        defmt::debug!("Extension cancel rejected at {}s", game.countdown);
        return false;
    }

    let spends_timeouts = game.profile().is_some_and(|p| p.spends_timeouts());
    let shooter = game.shooter();
    game.countdown = game.countdown.saturating_sub(game.extension_duration);
    game.extension_available = true;
    game.extension_used = false;
    let stats = game.player_mut(shooter);
    if spends_timeouts {
        if stats.timeouts_remaining < stats.timeouts_per_rack {
            stats.timeouts_remaining += 1;
        }
    } else {
        stats.extension_available = true;
    }
    true
}
