//! Cooperative task bodies for an embassy executor
//!
//! Both tasks share one [`Device`] behind an async mutex. The lock is only held
//! for synchronous work and is always released before awaiting a timer, so the
//! other task observes every state change at its next poll.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Ticker, Timer};
use heapless::spsc::Consumer;

use crate::dispatch::{Followup, ShotClock};
use crate::hal::{AudioAdapter, ButtonLines, DisplayAdapter};
use crate::input::ChordDetector;
use crate::scheduler::CountdownScheduler;
use crate::types::{ButtonPress, InputEvent, ShotClockConfig};

/// Application context plus its output sinks
pub struct Device<D, A> {
    pub clock: ShotClock,
    pub display: D,
    pub audio: A,
}

impl<D: DisplayAdapter, A: AudioAdapter> Device<D, A> {
    pub fn new(clock: ShotClock, display: D, audio: A) -> Self {
        Self { clock, display, audio }
    }
}

/// Drain the press queue and dispatch each event
pub async fn input_task<M, D, A, L, const N: usize>(
    device: &Mutex<M, Device<D, A>>,
    lines: &L,
    mut presses: Consumer<'_, ButtonPress, N>,
    config: ShotClockConfig,
) where
    M: RawMutex,
    D: DisplayAdapter,
    A: AudioAdapter,
    L: ButtonLines,
{
    let mut chord = ChordDetector::new(&config);

    loop {
        if let Some((event, at)) = chord.expire(Instant::now()) {
            dispatch(device, event, at).await;
        }

        let Some(press) = presses.dequeue() else {
            Timer::after(config.poll_interval).await;
            continue;
        };
        for (event, at) in chord.push(press, lines) {
            dispatch(device, event, at).await;
        }
    }
}

async fn dispatch<M, D, A>(device: &Mutex<M, Device<D, A>>, event: InputEvent, at: Instant)
where
    M: RawMutex,
    D: DisplayAdapter,
    A: AudioAdapter,
{
    let followup = {
        let mut guard = device.lock().await;
        let dev = &mut *guard;
        dev.clock.handle(event, at, &mut dev.display)
    };

    // Presses queued meanwhile are stamped inside the pause and get dropped
    if let Followup::Pause(pause) = followup {
        Timer::after(pause).await;
        let mut guard = device.lock().await;
        let dev = &mut *guard;
        dev.clock.resume(&mut dev.display);
    }
}

/// Tick the shot clock, match clock and cadences
pub async fn countdown_task<M, D, A>(device: &Mutex<M, Device<D, A>>, config: ShotClockConfig)
where
    M: RawMutex,
    D: DisplayAdapter,
    A: AudioAdapter,
{
    let mut scheduler = CountdownScheduler::new(config);
    let mut ticker = Ticker::every(config.poll_interval);

    loop {
        {
            let mut guard = device.lock().await;
            let dev = &mut *guard;
            scheduler.poll(&mut dev.clock, Instant::now(), &mut dev.display, &mut dev.audio);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Scheduler poll");

        ticker.next().await;
    }
}
