//! Table-driven checks of profile timers and race lookups

use rstest::rstest;
use tokio_test::{assert_err, assert_ok};

use shotclock_core::test_utils::harness::Harness;
use shotclock_core::{ConfigError, MatchType, Profile, RulesConfig, ShotClockConfig, State};

#[rstest]
#[case::apa(Profile::Apa, 20, 25)]
#[case::bca(Profile::Bca, 45, 45)]
#[case::timeouts_mode(Profile::TimeoutsMode, 60, 0)]
#[case::ultimate_pool(Profile::UltimatePool, 30, 15)]
#[case::wnt(Profile::Wnt, 30, 30)]
fn test_profile_timers(#[case] profile: Profile, #[case] base: u16, #[case] extension: u16) {
    let mut h = Harness::new();
    h.start(profile);

    assert_eq!(h.state(), State::ShotClockIdle);
    assert_eq!(h.clock.game.selected_profile, Some(profile));
    assert_eq!(h.clock.game.profile_based_countdown, base);
    assert_eq!(h.clock.game.extension_duration, extension);
    // First shot of the match is a break
    assert_eq!(h.clock.game.countdown, base + extension);
}

#[rstest]
#[case(1, 14)]
#[case(2, 19)]
#[case(3, 25)]
#[case(4, 31)]
#[case(5, 38)]
#[case(6, 46)]
#[case(7, 55)]
#[case(8, 65)]
#[case(9, 75)]
fn test_apa_nine_ball_targets(#[case] skill: u16, #[case] target: u16) {
    let mut h = Harness::new();
    h.start_apa(skill, 3, MatchType::NineBall);
    assert_eq!(h.clock.game.players[0].skill_level as u16, skill);
    assert_eq!(h.clock.game.players[0].target, target);
    assert_eq!(h.clock.game.players[1].target, 25);
}

#[rstest]
#[case(2, 2, [2, 2])]
#[case(3, 5, [2, 4])]
#[case(5, 3, [4, 2])]
#[case(7, 2, [7, 2])]
#[case(6, 6, [5, 5])]
// Skill levels outside the chart are clamped to 2..=7
#[case(1, 9, [2, 7])]
fn test_apa_eight_ball_races(#[case] p1: u16, #[case] p2: u16, #[case] race: [u16; 2]) {
    let mut h = Harness::new();
    h.start_apa(p1, p2, MatchType::EightBall);
    assert_eq!(h.clock.game.rules, Some(shotclock_core::Rules::EightBall));
    assert_eq!([h.clock.game.players[0].target, h.clock.game.players[1].target], race);
}

#[rstest]
#[case(1, 2)]
#[case(3, 2)]
#[case(4, 1)]
#[case(9, 1)]
fn test_apa_timeouts_by_skill(#[case] skill: u8, #[case] timeouts: u8) {
    let rules = RulesConfig::builtin();
    assert_eq!(rules.apa_timeouts(MatchType::NineBall, skill), timeouts);
    assert_eq!(rules.apa_timeouts(MatchType::EightBall, skill), timeouts);
}

#[test]
fn test_rules_file_overrides_wnt_targets() {
    let text = r#"{ "WNT": { "targets": [3, 5], "timeouts": 2 } }"#;
    let rules = assert_ok!(RulesConfig::from_json(text));
    let mut h = Harness::with_config(ShotClockConfig::default(), rules);

    h.start(Profile::Wnt);
    // Fewer than three choices: the default is the last one
    assert_eq!(h.clock.game.players[0].target, 5);
    assert_eq!(h.clock.game.players[0].timeouts_per_rack, 2);
    // Sections missing from the file fall back
    assert_eq!(h.clock.game.rules_config.apa_nine_ball_target(3), 14);
}

#[rstest]
#[case::debounce_too_short(5, 120, 1000, 50, ConfigError::InvalidDebounce)]
#[case::debounce_too_long(200, 1500, 1000, 50, ConfigError::InvalidDebounce)]
#[case::poll_slower_than_tick(200, 120, 1000, 2000, ConfigError::InvalidInterval)]
#[case::zero_tick(200, 120, 0, 50, ConfigError::InvalidInterval)]
fn test_config_validation(
    #[case] primary: u32,
    #[case] secondary: u32,
    #[case] tick: u64,
    #[case] poll: u64,
    #[case] error: ConfigError,
) {
    let result = ShotClockConfig::new(primary, secondary, tick, poll);
    assert_eq!(assert_err!(result), error);
}

#[test]
fn test_config_accepts_defaults() {
    let config = assert_ok!(ShotClockConfig::new(200, 120, 1000, 50));
    assert_eq!(config.primary_debounce_ms, 200);
    assert_eq!(config.secondary_debounce_ms, 120);
    assert_eq!(config.poll_interval.as_millis(), 50);
}
