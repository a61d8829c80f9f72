//! In-match menu, value editor and exit confirmation

use crate::game::Match;
use crate::hal::DisplayAdapter;
use crate::rules::enter_idle;
use crate::state::{State, StateMachine};
use crate::types::{InputEvent, MenuItem};

/// Outcome the dispatcher has to act on
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MenuOutcome {
    Stay,
    /// Operator confirmed leaving the match
    ExitMatch,
}

pub fn handle<D: DisplayAdapter>(
    event: InputEvent,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) -> MenuOutcome {
    match sm.current() {
        State::Menu => handle_menu(event, sm, game, display),
        State::EditingValue => {
            handle_editing(event, sm, game, display);
            MenuOutcome::Stay
        }
        State::ExitMatchConfirmation => match event {
            InputEvent::Make => MenuOutcome::ExitMatch,
            InputEvent::Miss => {
                back_to_menu(sm, game, display);
                MenuOutcome::Stay
            }
            _ => MenuOutcome::Stay,
        },
        _ => MenuOutcome::Stay,
    }
}

fn handle_menu<D: DisplayAdapter>(
    event: InputEvent,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) -> MenuOutcome {
    let count = game.menu_items.len().max(1);
    match event {
        InputEvent::Up => {
            game.current_menu_index = (game.current_menu_index + count - 1) % count;
            display.render_menu(game);
        }
        InputEvent::Down => {
            game.current_menu_index = (game.current_menu_index + 1) % count;
            display.render_menu(game);
        }
        InputEvent::Make => match game.current_menu_item() {
            Some(MenuItem::ExitMatch) => {
                sm.transition_to(State::ExitMatchConfirmation);
                display.render_exit_confirmation();
            }
            Some(item) => {
                game.temp_setting_value = game.menu_value(item);
                sm.transition_to(State::EditingValue);
                display.render_menu_value(item, game.temp_setting_value);
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Menu cursor out of range");
                game.current_menu_index = 0;
                display.render_menu(game);
            }
        },
        InputEvent::Miss => enter_idle(sm, game, display),
        InputEvent::NewRack => {}
    }
    MenuOutcome::Stay
}

fn handle_editing<D: DisplayAdapter>(
    event: InputEvent,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    let Some(item) = game.current_menu_item() else {
        back_to_menu(sm, game, display);
        return;
    };
    match event {
        InputEvent::Up | InputEvent::Down if item == MenuItem::Mute => {
            game.temp_setting_value = (game.temp_setting_value == 0) as u16;
            display.render_menu_value(item, game.temp_setting_value);
        }
        InputEvent::Up => {
            game.temp_setting_value = game.temp_setting_value.saturating_add(1);
            display.render_menu_value(item, game.temp_setting_value);
        }
        InputEvent::Down => {
            game.temp_setting_value = game
                .temp_setting_value
                .saturating_sub(1)
                .max(game.menu_floor(item));
            display.render_menu_value(item, game.temp_setting_value);
        }
        InputEvent::Make => {
            game.apply_menu_value(item, game.temp_setting_value);
            #[cfg(feature = "defmt")]
            defmt::debug!("Menu {} set to {}", item.label(), game.temp_setting_value);
            back_to_menu(sm, game, display);
        }
        InputEvent::Miss => back_to_menu(sm, game, display),
        InputEvent::NewRack => {}
    }
}

fn back_to_menu<D: DisplayAdapter>(sm: &mut StateMachine, game: &mut Match, display: &mut D) {
    sm.transition_to(State::Menu);
    display.render_menu(game);
}
