//! Scheduler and input handling interleaved on tokio tasks with paused time
//!
//! A background task polls the harness every 50 ms of tokio time, mirroring
//! the firmware countdown task. The test body plays the input task: it takes
//! the lock only to handle an event and never holds it across an await.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, sleep};

use shotclock_core::test_utils::harness::Harness;
use shotclock_core::{Followup, InputEvent, Instant, Player, Profile, State};

const POLL: Duration = Duration::from_millis(50);

type Shared = Arc<Mutex<Harness>>;

fn spawn_scheduler(harness: Shared) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(POLL);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            harness.lock().unwrap().advance(POLL.as_millis() as u64);
        }
    })
}

/// Handle one event at the harness's current time
fn handle(harness: &Shared, event: InputEvent) -> Followup {
    let mut guard = harness.lock().unwrap();
    let h = &mut *guard;
    let now = h.now();
    h.clock.handle(event, now, &mut h.display)
}

fn countdown(harness: &Shared) -> u16 {
    harness.lock().unwrap().clock.game.countdown
}

#[tokio::test(start_paused = true)]
async fn test_press_between_polls_restarts_the_tick() {
    println!("🕒 Press between polls restarts the one-second phase");
    let mut h = Harness::new();
    h.start(Profile::Bca);
    let harness: Shared = Arc::new(Mutex::new(h));
    let scheduler = spawn_scheduler(harness.clone());

    sleep(Duration::from_millis(25)).await;
    handle(&harness, InputEvent::Make);

    sleep(Duration::from_millis(1000)).await; // t = 1025
    assert_eq!(countdown(&harness), 89);

    sleep(Duration::from_millis(500)).await; // t = 1525
    handle(&harness, InputEvent::Miss);
    assert_eq!(countdown(&harness), 45);

    sleep(Duration::from_millis(200)).await; // t = 1725
    handle(&harness, InputEvent::Make);

    // Next decrement is a full second after the press, not on the old phase
    sleep(Duration::from_millis(900)).await; // t = 2625
    assert_eq!(countdown(&harness), 45);
    assert_eq!(
        harness.lock().unwrap().scheduler.next_tick(),
        Some(Instant::from_millis(2700))
    );
    sleep(Duration::from_millis(100)).await; // t = 2725
    assert_eq!(countdown(&harness), 44);

    scheduler.abort();
    println!("  ✅ Phase follows the press");
}

#[tokio::test(start_paused = true)]
async fn test_shootout_pause_does_not_hold_the_lock() {
    let mut h = Harness::new();
    h.start(Profile::UltimatePool);
    h.press(InputEvent::Make);
    h.clock.game.match_countdown = 1;
    h.advance(1100);
    assert_eq!(h.state(), State::ShootoutAnnouncement);
    h.press_all(&[InputEvent::Make, InputEvent::Make]);
    h.advance(800);
    h.press_all(&[InputEvent::Make, InputEvent::Make]);
    assert_eq!(h.state(), State::ShootoutP2Running);

    let harness: Shared = Arc::new(Mutex::new(h));
    let scheduler = spawn_scheduler(harness.clone());

    sleep(Duration::from_millis(1225)).await;
    let pause = match handle(&harness, InputEvent::Make) {
        Followup::Pause(pause) => pause,
        other => panic!("expected a pause, got {:?}", other),
    };
    assert_eq!(pause.as_millis(), 2000);

    // Mid-pause the scheduler keeps running and extra presses are ignored
    sleep(Duration::from_millis(1000)).await;
    assert!(matches!(handle(&harness, InputEvent::Make), Followup::None));
    {
        let h = harness.lock().unwrap();
        assert_eq!(h.state(), State::ShootoutP2Running);
        assert_eq!(h.clock.game.p2_shootout_time, Some(1200));
    }

    sleep(Duration::from_millis(1000)).await;
    {
        let mut guard = harness.lock().unwrap();
        let h = &mut *guard;
        h.clock.resume(&mut h.display);
        assert_eq!(h.state(), State::Victory);
        // 800 ms beat 1200 ms
        assert_eq!(h.clock.game.winner, Some(Player::One));
    }

    scheduler.abort();
}

#[tokio::test(start_paused = true)]
async fn test_scripted_input_task_plays_a_wnt_rack() {
    let mut h = Harness::new();
    h.start(Profile::Wnt);
    let harness: Shared = Arc::new(Mutex::new(h));
    let scheduler = spawn_scheduler(harness.clone());

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(u64, InputEvent)>(16);
    let input = {
        let harness = harness.clone();
        tokio::spawn(async move {
            while let Some((delay_ms, event)) = rx.recv().await {
                sleep(Duration::from_millis(delay_ms)).await;
                handle(&harness, event);
            }
        })
    };

    // Break, run two seconds, miss; player two then wins the rack
    let script = [
        (25, InputEvent::Make),
        (2000, InputEvent::Miss),
        (500, InputEvent::Up),
        (500, InputEvent::Make),
    ];
    for step in script {
        tx.send(step).await.unwrap();
    }
    drop(tx);
    input.await.unwrap();

    {
        let h = harness.lock().unwrap();
        assert_eq!(h.state(), State::ShotClockIdle);
        assert_eq!(h.clock.game.players[1].score, 1);
        assert_eq!(h.clock.game.rack_counter, 2);
        assert_eq!(h.clock.game.shooter(), Player::Two);
        assert!(h.clock.game.break_shot);
        assert_eq!(h.clock.game.countdown, 60);
    }

    scheduler.abort();
}
