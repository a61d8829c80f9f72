//! Profile selection and the per-profile setup wizards

use crate::game::Match;
use crate::hal::DisplayAdapter;
use crate::rules::{enter_idle, rules_for, Rules};
use crate::state::{State, StateMachine};
use crate::types::{InputEvent, MatchType, Player, Profile, ShotClockConfig};

/// Skill level offered first on the APA screens
pub const DEFAULT_SKILL_LEVEL: u16 = 3;

/// Handle a button on a profile or setup screen
pub fn handle<D: DisplayAdapter>(
    event: InputEvent,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    match sm.current() {
        State::ProfileSelection => handle_profile_selection(event, config, sm, game, display),
        State::ApaSkillLevelP1 => handle_skill_level(Player::One, event, sm, game, display),
        State::ApaSkillLevelP2 => handle_skill_level(Player::Two, event, sm, game, display),
        State::ApaGameTypeSelection => handle_game_type(event, config, sm, game, display),
        State::WntTargetSelection => handle_wnt_target(event, config, sm, game, display),
        _ => {}
    }
}

fn handle_profile_selection<D: DisplayAdapter>(
    event: InputEvent,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    let count = Profile::ALL.len();
    match event {
        InputEvent::Up => {
            game.profile_selection_index = (game.profile_selection_index + count - 1) % count;
            display.render_profile_selection(game.profile_selection_index, false);
        }
        InputEvent::Down => {
            game.profile_selection_index = (game.profile_selection_index + 1) % count;
            display.render_profile_selection(game.profile_selection_index, false);
        }
        InputEvent::Make => {
            let profile = Profile::ALL[game.profile_selection_index % count];
            select_profile(profile, config, sm, game, display);
        }
        InputEvent::Miss | InputEvent::NewRack => {}
    }
}

/// Apply a profile and open its first setup step
pub fn select_profile<D: DisplayAdapter>(
    profile: Profile,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    #[cfg(feature = "defmt")]
    defmt::info!("Profile selected: {}", profile.name());
    game.apply_profile(profile);
    match profile {
        Profile::Apa => {
            game.temp_setting_value = DEFAULT_SKILL_LEVEL;
            sm.transition_to(State::ApaSkillLevelP1);
            display.render_skill_level_selection(Player::One, game.temp_setting_value);
        }
        Profile::Wnt => {
            let targets = game.rules_config.wnt_targets();
            game.temp_setting_value = targets.get(2).or(targets.last()).copied().unwrap_or(9);
            sm.transition_to(State::WntTargetSelection);
            display.render_wnt_target_selection(game.temp_setting_value);
        }
        Profile::Bca | Profile::UltimatePool => {
            let (target, timeouts) = game.rules_config.fixed_race(profile);
            game.set_targets(target, target);
            game.set_timeouts_per_rack(timeouts, timeouts);
            start_match(rules_for(profile, game.match_type), config, sm, game, display);
        }
        Profile::TimeoutsMode => {
            start_match(Rules::Standard, config, sm, game, display);
        }
    }
}

/// Skill levels wrap within 1..=9
pub fn next_skill_level(level: u16) -> u16 {
    if level >= 9 {
        1
    } else {
        level + 1
    }
}

pub fn previous_skill_level(level: u16) -> u16 {
    if level <= 1 {
        9
    } else {
        level - 1
    }
}

fn handle_skill_level<D: DisplayAdapter>(
    player: Player,
    event: InputEvent,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    match event {
        InputEvent::Up => {
            game.temp_setting_value = next_skill_level(game.temp_setting_value);
            display.render_skill_level_selection(player, game.temp_setting_value);
        }
        InputEvent::Down => {
            game.temp_setting_value = previous_skill_level(game.temp_setting_value);
            display.render_skill_level_selection(player, game.temp_setting_value);
        }
        InputEvent::Make => {
            game.player_mut(player).skill_level = game.temp_setting_value as u8;
            match player {
                Player::One => {
                    game.temp_setting_value = DEFAULT_SKILL_LEVEL;
                    sm.transition_to(State::ApaSkillLevelP2);
                    display.render_skill_level_selection(Player::Two, game.temp_setting_value);
                }
                Player::Two => {
                    game.temp_setting_value = MatchType::NineBall.as_setting();
                    sm.transition_to(State::ApaGameTypeSelection);
                    display.render_game_type_selection(MatchType::NineBall);
                }
            }
        }
        InputEvent::Miss => match player {
            Player::One => back_to_profiles(Profile::Apa, sm, game, display),
            Player::Two => {
                game.temp_setting_value = game.players[0].skill_level as u16;
                sm.transition_to(State::ApaSkillLevelP1);
                display.render_skill_level_selection(Player::One, game.temp_setting_value);
            }
        },
        InputEvent::NewRack => {}
    }
}

fn handle_game_type<D: DisplayAdapter>(
    event: InputEvent,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    match event {
        InputEvent::Up | InputEvent::Down => {
            let toggled = match MatchType::from_setting(game.temp_setting_value) {
                MatchType::EightBall => MatchType::NineBall,
                MatchType::NineBall => MatchType::EightBall,
            };
            game.temp_setting_value = toggled.as_setting();
            display.render_game_type_selection(toggled);
        }
        InputEvent::Make => {
            let match_type = MatchType::from_setting(game.temp_setting_value);
            game.match_type = match_type;
            configure_apa(game);
            start_match(rules_for(Profile::Apa, match_type), config, sm, game, display);
        }
        InputEvent::Miss => {
            game.temp_setting_value = game.players[1].skill_level as u16;
            sm.transition_to(State::ApaSkillLevelP2);
            display.render_skill_level_selection(Player::Two, game.temp_setting_value);
        }
        InputEvent::NewRack => {}
    }
}

/// Targets and timeouts from the skill levels and game type
fn configure_apa(game: &mut Match) {
    let sl1 = game.players[0].skill_level;
    let sl2 = game.players[1].skill_level;
    let config = &game.rules_config;
    let (targets, timeouts) = match game.match_type {
        MatchType::NineBall => (
            [config.apa_nine_ball_target(sl1), config.apa_nine_ball_target(sl2)],
            [
                config.apa_timeouts(MatchType::NineBall, sl1),
                config.apa_timeouts(MatchType::NineBall, sl2),
            ],
        ),
        MatchType::EightBall => (
            config.apa_eight_ball_race(sl1, sl2),
            [
                config.apa_timeouts(MatchType::EightBall, sl1),
                config.apa_timeouts(MatchType::EightBall, sl2),
            ],
        ),
    };
    game.set_targets(targets[0], targets[1]);
    game.set_timeouts_per_rack(timeouts[0], timeouts[1]);
}

fn handle_wnt_target<D: DisplayAdapter>(
    event: InputEvent,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    let targets = game.rules_config.wnt_targets();
    match event {
        InputEvent::Up | InputEvent::Down => {
            let current = targets.iter().position(|t| *t == game.temp_setting_value);
            let next = match (event, current) {
                (InputEvent::Up, Some(i)) => targets.get(i + 1).or(targets.first()),
                (InputEvent::Up, None) => targets.first(),
                (_, Some(i)) if i > 0 => targets.get(i - 1),
                _ => targets.last(),
            };
            if let Some(target) = next {
                game.temp_setting_value = *target;
                display.render_wnt_target_selection(*target);
            }
        }
        InputEvent::Make => {
            let target = game.temp_setting_value;
            let timeouts = game.rules_config.wnt_timeouts();
            game.set_targets(target, target);
            game.set_timeouts_per_rack(timeouts, timeouts);
            start_match(Rules::EightBall, config, sm, game, display);
        }
        InputEvent::Miss => back_to_profiles(Profile::Wnt, sm, game, display),
        InputEvent::NewRack => {}
    }
}

fn back_to_profiles<D: DisplayAdapter>(
    profile: Profile,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    game.profile_selection_index = profile.index();
    sm.transition_to(State::ProfileSelection);
    display.render_profile_selection(game.profile_selection_index, true);
}

/// Set up the first rack and show the idle clock
pub fn start_match<D: DisplayAdapter>(
    rules: Rules,
    config: &ShotClockConfig,
    sm: &mut StateMachine,
    game: &mut Match,
    display: &mut D,
) {
    #[cfg(feature = "defmt")]
    defmt::info!("Match started with {:?} rules", rules);
    game.rules = Some(rules);
    game.rack_counter = 1;
    game.half_innings = 2;
    game.break_shot = true;
    game.clear_turn_extension();
    game.refresh_rack_allowances();
    if game.profile().is_some_and(|p| p.has_match_clock()) {
        game.match_countdown = config.match_clock_secs;
        game.prev_match_countdown = game.match_countdown;
        game.match_timer_running = false;
    }
    game.build_menu();
    sm.set_game_on(true);
    enter_idle(sm, game, display);
}
