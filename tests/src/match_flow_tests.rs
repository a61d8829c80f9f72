//! End-to-end match flows through the dispatcher and scheduler

use shotclock_core::hal::mock::DisplayCall;
use shotclock_core::test_utils::harness::Harness;
use shotclock_core::{InputEvent, MatchType, Player, Profile, Rules, State};

use InputEvent::{Down, Make, Miss, NewRack, Up};

#[test]
fn test_wnt_race_won_by_rack_confirmations() {
    println!("🎱 WNT race to 9 by confirmed racks");
    let mut h = Harness::new();
    h.start(Profile::Wnt);
    assert_eq!(h.state(), State::ShotClockIdle);
    assert_eq!(h.clock.game.rules, Some(Rules::EightBall));
    assert_eq!(h.clock.game.players[0].target, 9);
    assert_eq!(h.clock.game.players[1].target, 9);

    for rack in 1..9 {
        h.press(Up);
        assert_eq!(h.state(), State::ConfirmRackEnd);
        h.press(Make);
        assert_eq!(h.state(), State::ShotClockIdle);
        assert_eq!(h.clock.game.players[0].score, rack);
        assert!(h.clock.game.break_shot);
    }
    assert_eq!(h.clock.game.rack_counter, 9);

    h.press_all(&[Up, Make]);
    assert_eq!(h.state(), State::Victory);
    assert_eq!(h.clock.game.winner, Some(Player::One));
    assert!(h.display.contains(&DisplayCall::Victory(Player::One)));

    // Any Make leaves the victory screen for a fresh match
    h.press(Make);
    assert_eq!(h.state(), State::ProfileSelection);
    assert_eq!(h.clock.game.rules, None);
    assert_eq!(h.clock.game.players[0].score, 0);
    println!("  ✅ Player one wins 9-0");
}

#[test]
fn test_lost_rack_passes_the_table() {
    let mut h = Harness::new();
    h.start(Profile::Bca);
    assert_eq!(h.clock.game.shooter(), Player::One);

    h.press(Down);
    assert_eq!(h.state(), State::ConfirmRackEnd);
    assert!(matches!(h.display.last(), Some(DisplayCall::Message(m)) if m.as_str() == "Confirm Loss?"));
    h.press(Make);

    assert_eq!(h.clock.game.players[0].score, 0);
    assert_eq!(h.clock.game.players[1].score, 1);
    assert_eq!(h.clock.game.shooter(), Player::Two);
    assert_eq!(h.clock.game.rack_counter, 2);
    assert_eq!(h.state(), State::ShotClockIdle);
}

#[test]
fn test_rack_confirmation_can_be_withdrawn() {
    let mut h = Harness::new();
    h.start(Profile::Bca);

    h.press_all(&[Up, Miss]);
    assert_eq!(h.state(), State::ShotClockIdle);
    assert_eq!(h.clock.game.pending_rack_result, None);
    assert_eq!(h.clock.game.players[0].score, 0);
    assert_eq!(h.clock.game.rack_counter, 1);
}

#[test]
fn test_turns_alternate_on_miss() {
    let mut h = Harness::new();
    h.start(Profile::Bca);
    // Break shot gets the extension on top
    assert_eq!(h.clock.game.countdown, 90);

    h.press(Make);
    assert_eq!(h.state(), State::CountdownInProgress);
    h.advance(3000);
    assert_eq!(h.clock.game.countdown, 87);

    h.press(Miss);
    assert_eq!(h.state(), State::ShotClockIdle);
    assert_eq!(h.clock.game.shooter(), Player::Two);
    assert!(!h.clock.game.break_shot);
    assert_eq!(h.clock.game.countdown, 45);

    h.press(Make);
    h.advance(1000);
    assert_eq!(h.clock.game.countdown, 44);

    // Pocketed ball: same shooter, fresh clock
    h.press(Make);
    assert_eq!(h.state(), State::ShotClockIdle);
    assert_eq!(h.clock.game.shooter(), Player::Two);
    assert_eq!(h.clock.game.countdown, 45);
}

#[test]
fn test_apa_extension_and_cancel_track_timeouts() {
    let mut h = Harness::new();
    h.start(Profile::Apa);
    assert_eq!(h.clock.game.rules, Some(Rules::NineBall));
    assert_eq!(h.clock.game.countdown, 45);

    h.press(Make);
    h.press(Up);
    assert_eq!(h.clock.game.countdown, 70);
    assert_eq!(h.clock.game.players[0].timeouts_remaining, 1);
    assert!(h.clock.game.extension_used);

    // Second request in the same turn is ignored
    h.press(Up);
    assert_eq!(h.clock.game.countdown, 70);

    h.press(Down);
    assert_eq!(h.clock.game.countdown, 45);
    assert_eq!(h.clock.game.players[0].timeouts_remaining, 2);
    assert!(h.clock.game.extension_available);
}

#[test]
fn test_apa_nine_ball_points_and_racks() {
    let mut h = Harness::new();
    h.start_apa(2, 3, MatchType::NineBall);
    assert_eq!(h.clock.game.players[0].target, 19);
    assert_eq!(h.clock.game.players[1].target, 25);

    // Each pocketed ball scores and resets the clock to idle
    for _ in 0..3 {
        h.press_all(&[Make, Make]);
    }
    assert_eq!(h.clock.game.players[0].score, 3);
    assert_eq!(h.clock.game.countdown, 20);
    assert!(!h.clock.game.break_shot);

    // Rack over: Up in idle counts the 9 and starts the next rack
    h.press(Up);
    assert_eq!(h.clock.game.rack_counter, 2);
    assert_eq!(h.clock.game.players[0].score, 4);
    assert!(h.clock.game.break_shot);

    // Down takes it back while still on the break
    h.press(Down);
    assert_eq!(h.clock.game.rack_counter, 1);
    assert_eq!(h.clock.game.players[0].score, 3);
}

#[test]
fn test_timeouts_mode_menu_mutes_the_alert() {
    let mut h = Harness::new();
    h.start(Profile::TimeoutsMode);
    assert!(h.clock.game.timeouts_only);
    assert_eq!(h.clock.game.countdown, 60);

    // No extension exists in this mode
    h.press(Up);
    assert_eq!(h.clock.game.countdown, 60);

    h.press(Miss);
    assert_eq!(h.state(), State::Menu);
    h.press_all(&[Down, Down, Down, Make]);
    assert_eq!(h.state(), State::EditingValue);
    h.press_all(&[Up, Make]);
    assert!(h.clock.game.speaker_muted);
    h.press(Miss);
    assert_eq!(h.state(), State::ShotClockIdle);

    h.press(Make);
    h.advance(60_000);
    assert_eq!(h.state(), State::CountdownComplete);
    assert_eq!(h.audio.alerts, 0);
}

#[test]
fn test_alert_sounds_for_the_last_seconds() {
    let mut h = Harness::new();
    h.start(Profile::TimeoutsMode);
    h.press(Make);
    h.advance(60_000);
    assert_eq!(h.state(), State::CountdownComplete);
    assert_eq!(h.clock.game.countdown, 0);
    assert_eq!(h.audio.alerts, 5);
}

#[test]
fn test_new_rack_chord_in_timeouts_mode() {
    let mut h = Harness::new();
    h.start(Profile::TimeoutsMode);
    h.press_all(&[Make, Miss]);
    assert!(!h.clock.game.break_shot);

    h.press(NewRack);
    assert_eq!(h.clock.game.rack_counter, 2);
    assert!(h.clock.game.break_shot);
    assert_eq!(h.state(), State::ShotClockIdle);
}

#[test]
fn test_ultimate_pool_leader_wins_on_time() {
    let mut h = Harness::new();
    h.start(Profile::UltimatePool);
    assert_eq!(h.clock.game.match_countdown, 1800);
    assert!(!h.clock.game.match_timer_running);

    h.clock.game.players[1].score = 2;
    h.press(Make);
    assert!(h.clock.game.match_timer_running);
    h.clock.game.match_countdown = 1;
    h.advance(1100);

    assert_eq!(h.state(), State::Victory);
    assert_eq!(h.clock.game.winner, Some(Player::Two));
    assert!(!h.clock.game.match_timer_running);
}

#[test]
fn test_ultimate_pool_tie_goes_to_shootout() {
    println!("⚔️ Shootout after a tied match clock");
    let mut h = Harness::new();
    h.start(Profile::UltimatePool);
    h.press(Make);
    h.clock.game.match_countdown = 2;
    h.advance(2100);
    assert_eq!(h.state(), State::ShootoutAnnouncement);

    h.press(Make);
    assert_eq!(h.state(), State::ShootoutP1Wait);
    h.press(Make);
    h.advance(1500);
    h.press(Make);
    assert_eq!(h.clock.game.p1_shootout_time, Some(1500));
    assert_eq!(h.state(), State::ShootoutP2Wait);

    // Slower second run: the harness sits out the result pause
    h.press(Make);
    h.advance(2000);
    h.press(Make);
    assert_eq!(h.clock.game.p2_shootout_time, Some(2000));
    assert_eq!(h.state(), State::Victory);
    assert_eq!(h.clock.game.winner, Some(Player::One));
    println!("  ✅ Faster shooter wins");
}

#[test]
fn test_menu_exit_abandons_match() {
    let mut h = Harness::new();
    h.start(Profile::Wnt);
    h.press(Miss);
    assert_eq!(h.state(), State::Menu);

    // Race menu: P1, P2, Exit, Mute
    h.press_all(&[Down, Down, Make]);
    assert_eq!(h.state(), State::ExitMatchConfirmation);
    h.press(Miss);
    assert_eq!(h.state(), State::Menu);
    h.press_all(&[Make, Make]);
    assert_eq!(h.state(), State::ProfileSelection);
    assert_eq!(h.clock.game.selected_profile, None);
}
