//! Button input: debounced interrupt bridge and Make+Miss chord detection

use portable_atomic::{AtomicBool, AtomicU32, Ordering};
use heapless::spsc::Producer;
use heapless::Vec;

use crate::hal::{millis_between, ButtonLines, Instant};
use crate::types::{Button, ButtonPress, InputEvent, ShotClockConfig};

/// What happened to one edge
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Press queued for the dispatcher
    Accepted,
    /// Press inside the line's debounce window
    Debounced,
    /// Release edge, level recorded only
    Released,
    /// Queue full or not installed; the press is lost
    Dropped,
}

/// Atomic per-line state shared with interrupt handlers
pub struct ButtonBridge {
    pressed: [AtomicBool; 4],
    armed: [AtomicBool; 4],
    last_accepted: [AtomicU32; 4],
    debounce_ms: [u32; 4],
}

impl ButtonBridge {
    pub const fn new(primary_debounce_ms: u32, secondary_debounce_ms: u32) -> Self {
        Self {
            pressed: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            armed: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            last_accepted: [
                AtomicU32::new(0),
                AtomicU32::new(0),
                AtomicU32::new(0),
                AtomicU32::new(0),
            ],
            // Line order: Make, Up, Down, Miss
            debounce_ms: [
                primary_debounce_ms,
                secondary_debounce_ms,
                secondary_debounce_ms,
                primary_debounce_ms,
            ],
        }
    }

    pub const fn from_config(config: &ShotClockConfig) -> Self {
        Self::new(config.primary_debounce_ms, config.secondary_debounce_ms)
    }

    /// Record an edge (called from interrupt handler)
    ///
    /// # Safety
    /// This function is safe to call from interrupt context: it only touches
    /// atomics and the single producer end of the queue.
    pub fn on_edge<const N: usize>(
        &self,
        button: Button,
        pressed: bool,
        at: Instant,
        producer: Option<&mut Producer<'_, ButtonPress, N>>,
    ) -> EdgeOutcome {
        let line = button.index();
        self.pressed[line].store(pressed, Ordering::Relaxed);
        if !pressed {
            return EdgeOutcome::Released;
        }

        let now = at.as_millis() as u32;
        if self.armed[line].load(Ordering::Relaxed) {
            let last = self.last_accepted[line].load(Ordering::Relaxed);
            if now.wrapping_sub(last) <= self.debounce_ms[line] {
                return EdgeOutcome::Debounced;
            }
        }
        self.last_accepted[line].store(now, Ordering::Relaxed);
        self.armed[line].store(true, Ordering::Relaxed);

        match producer.map(|queue| queue.enqueue(ButtonPress { button, at }).is_ok()) {
            Some(true) => EdgeOutcome::Accepted,
            _ => EdgeOutcome::Dropped,
        }
    }
}

impl ButtonLines for ButtonBridge {
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()].load(Ordering::Relaxed)
    }
}

/// Events released by one call, with the timestamp to dispatch them at
pub type Resolved = Vec<(InputEvent, Instant), 2>;

/// Turns queued presses into logical events, folding Make+Miss into NewRack.
///
/// A Make or Miss is held until its partner arrives or the chord window
/// closes, so a chord split across two queue drains still yields one
/// `NewRack` and nothing else.
#[derive(Debug)]
pub struct ChordDetector {
    window_ms: u64,
    held: Option<ButtonPress>,
    suppress: Option<ButtonPress>,
}

impl ChordDetector {
    pub fn new(config: &ShotClockConfig) -> Self {
        Self {
            window_ms: config.chord_window.as_millis(),
            held: None,
            suppress: None,
        }
    }

    /// When the held press, if any, resolves as a single press
    pub fn deadline(&self) -> Option<Instant> {
        self.held
            .map(|press| Instant::from_millis(press.at.as_millis() + self.window_ms))
    }

    /// Feed one dequeued press
    pub fn push<L: ButtonLines>(&mut self, press: ButtonPress, lines: &L) -> Resolved {
        let mut out = Resolved::new();

        if let Some(trigger) = self.suppress.take() {
            if self.pairs_with(trigger, press) {
                #[cfg(feature = "defmt")]
                defmt::trace!("Chord partner {:?} swallowed", press.button);
                return out;
            }
        }

        if let Some(held) = self.held.take() {
            if self.pairs_with(held, press) {
                #[cfg(feature = "defmt")]
                defmt::debug!("Chord from queued presses");
                let _ = out.push((InputEvent::NewRack, held.at));
                return out;
            }
            let _ = out.push((held.button.into(), held.at));
        }

        match press.button.chord_partner() {
            Some(partner) if lines.is_pressed(partner) => {
                self.suppress = Some(press);
                let _ = out.push((InputEvent::NewRack, press.at));
            }
            Some(_) => self.held = Some(press),
            None => {
                let _ = out.push((press.button.into(), press.at));
            }
        }
        out
    }

    /// Release the held press once the chord window has closed
    pub fn expire(&mut self, now: Instant) -> Option<(InputEvent, Instant)> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.held
            .take()
            .map(|press| (press.button.into(), press.at))
    }

    fn pairs_with(&self, first: ButtonPress, second: ButtonPress) -> bool {
        let gap = if second.at >= first.at {
            millis_between(first.at, second.at)
        } else {
            millis_between(second.at, first.at)
        };
        first.button.chord_partner() == Some(second.button) && gap <= self.window_ms
    }
}
