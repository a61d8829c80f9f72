//! The embassy input and countdown tasks on the mock time driver
//!
//! Presses go through the real path: `ButtonBridge::on_edge` into the SPSC
//! queue, drained by `input_task`, with `countdown_task` ticking alongside.
//! The mock driver is global and never rewinds, so these tests take turns and
//! only rely on time relative to their own start.

use std::future::Future;
use std::sync::Mutex as StdMutex;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, MockDriver};
use heapless::spsc::{Producer, Queue};

use shotclock_core::hal::mock::{DisplayCall, MockAudio, RecordingDisplay};
use shotclock_core::tasks::{countdown_task, input_task, Device};
use shotclock_core::test_utils::harness::Harness;
use shotclock_core::{
    Button, ButtonBridge, ButtonPress, EdgeOutcome, InputEvent, Player, Profile, ShotClockConfig,
    State,
};

type TestDevice = Mutex<NoopRawMutex, Device<RecordingDisplay, MockAudio>>;

static DRIVER: StdMutex<()> = StdMutex::new(());

fn device_from(h: Harness) -> TestDevice {
    Mutex::new(Device::new(h.clock, h.display, h.audio))
}

/// Move mock time forward in small steps, letting the tasks run in between
async fn advance(ms: u64) {
    for _ in 0..ms / 10 {
        MockDriver::get().advance(Duration::from_millis(10));
        tokio::task::yield_now().await;
    }
}

fn edge(
    bridge: &ButtonBridge,
    producer: &mut Producer<'_, ButtonPress, 16>,
    button: Button,
    pressed: bool,
) -> EdgeOutcome {
    bridge.on_edge(button, pressed, Instant::now(), Some(producer))
}

/// Run both tasks until `script` finishes
async fn run_tasks<'q, F>(
    device: &TestDevice,
    bridge: &ButtonBridge,
    presses: heapless::spsc::Consumer<'q, ButtonPress, 16>,
    script: F,
) where
    F: Future<Output = ()>,
{
    let config = ShotClockConfig::default();
    tokio::select! {
        _ = input_task(device, bridge, presses, config) => {}
        _ = countdown_task(device, config) => {}
        _ = script => {}
    }
}

#[tokio::test]
async fn test_skewed_chord_starts_one_new_rack() {
    let _turn = DRIVER.lock().unwrap_or_else(|e| e.into_inner());

    let mut h = Harness::new();
    h.start(Profile::Wnt);
    let device = device_from(h);
    let bridge = ButtonBridge::from_config(&ShotClockConfig::default());
    let mut queue: Queue<ButtonPress, 16> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let script = async {
        advance(100).await;
        // Miss lands a poll ahead of Make
        assert_eq!(edge(&bridge, &mut producer, Button::Miss, true), EdgeOutcome::Accepted);
        advance(60).await;
        assert_eq!(edge(&bridge, &mut producer, Button::Make, true), EdgeOutcome::Accepted);
        advance(100).await;
        edge(&bridge, &mut producer, Button::Make, false);
        edge(&bridge, &mut producer, Button::Miss, false);
        advance(500).await;
    };
    run_tasks(&device, &bridge, consumer, script).await;

    let dev = device.lock().await;
    assert_eq!(dev.clock.game.rack_counter, 2);
    assert_eq!(dev.clock.state.current(), State::ShotClockIdle);
    // Neither single-button handler ran
    assert!(!dev
        .display
        .calls()
        .iter()
        .any(|call| matches!(call, DisplayCall::Menu(_) | DisplayCall::EnterShotClock(_))));
}

#[tokio::test]
async fn test_single_make_still_starts_the_clock() {
    let _turn = DRIVER.lock().unwrap_or_else(|e| e.into_inner());

    let mut h = Harness::new();
    h.start(Profile::Bca);
    let device = device_from(h);
    let bridge = ButtonBridge::from_config(&ShotClockConfig::default());
    let mut queue: Queue<ButtonPress, 16> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let script = async {
        advance(100).await;
        edge(&bridge, &mut producer, Button::Make, true);
        advance(100).await;
        edge(&bridge, &mut producer, Button::Make, false);
        advance(1500).await;
    };
    run_tasks(&device, &bridge, consumer, script).await;

    let dev = device.lock().await;
    assert_eq!(dev.clock.state.current(), State::CountdownInProgress);
    assert_eq!(dev.clock.game.rack_counter, 1);
    // Ticked from the press, not from when the chord window closed
    assert_eq!(dev.clock.game.countdown, 89);
}

#[tokio::test]
async fn test_presses_during_result_pause_keep_the_winner_on_screen() {
    println!("🏆 Shootout result pause swallows queued presses");
    let _turn = DRIVER.lock().unwrap_or_else(|e| e.into_inner());

    let mut h = Harness::new();
    h.start(Profile::UltimatePool);
    h.press(InputEvent::Make);
    h.clock.game.match_countdown = 1;
    h.advance(1100);
    h.press_all(&[InputEvent::Make, InputEvent::Make]);
    h.advance(800);
    h.press_all(&[InputEvent::Make, InputEvent::Make]);
    assert_eq!(h.state(), State::ShootoutP2Running);
    // Player two starts on the mock timeline
    h.clock.game.shootout_start = Some(Instant::now());

    let device = device_from(h);
    let bridge = ButtonBridge::from_config(&ShotClockConfig::default());
    let mut queue: Queue<ButtonPress, 16> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let script = async {
        advance(1200).await;
        edge(&bridge, &mut producer, Button::Make, true);
        advance(100).await;
        edge(&bridge, &mut producer, Button::Make, false);

        // Impatient press while the result is showing
        advance(900).await;
        edge(&bridge, &mut producer, Button::Make, true);
        advance(100).await;
        edge(&bridge, &mut producer, Button::Make, false);

        advance(1600).await;
        {
            let dev = device.lock().await;
            assert_eq!(dev.clock.game.p2_shootout_time, Some(1200));
            assert_eq!(dev.clock.state.current(), State::Victory);
            assert_eq!(dev.clock.game.winner, Some(Player::One));
        }

        // After the pause a press leaves the victory screen
        edge(&bridge, &mut producer, Button::Make, true);
        advance(500).await;
    };
    run_tasks(&device, &bridge, consumer, script).await;

    let dev = device.lock().await;
    assert!(dev.display.contains(&DisplayCall::Victory(Player::One)));
    assert_eq!(dev.clock.state.current(), State::ProfileSelection);
    println!("  ✅ Winner shown until the pause is over");
}
