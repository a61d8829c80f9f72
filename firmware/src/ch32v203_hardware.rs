//! CH32V203 Hardware Implementation
//!
//! Four active-low buttons on PA0..PA3 (EXTI0..EXTI3, both edges) and a
//! piezo buzzer on PA8. Edges are debounced in interrupt context by the shared
//! [`ButtonBridge`] and pushed into the press queue.

use core::cell::RefCell;
use core::convert::Infallible;

use critical_section::Mutex as CsMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use heapless::spsc::Producer;

use shotclock_core::hal::{AudioAdapter, HalError};
use shotclock_core::input::{ButtonBridge, EdgeOutcome};
use shotclock_core::types::{Button, ButtonPress};

use crate::PRESS_QUEUE_SIZE;

/// Debounced line levels shared by the EXTI handler and the input task
pub static BUTTONS: ButtonBridge = ButtonBridge::new(
    timing::PRIMARY_DEBOUNCE_MS,
    timing::SECONDARY_DEBOUNCE_MS,
);

/// Producer end of the press queue, installed once at boot
static PRESS_PRODUCER: CsMutex<RefCell<Option<Producer<'static, ButtonPress, PRESS_QUEUE_SIZE>>>> =
    CsMutex::new(RefCell::new(None));

/// Buzzer requests from the audio adapter
static BUZZER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Raw register access
mod reg {
    pub const RCC_APB2PCENR: usize = 0x4002_1018;
    pub const AFIO_EXTICR1: usize = 0x4001_0008;
    pub const GPIOA_CFGLR: usize = 0x4001_0800;
    pub const GPIOA_CFGHR: usize = 0x4001_0804;
    pub const GPIOA_INDR: usize = 0x4001_0808;
    pub const GPIOA_OUTDR: usize = 0x4001_080C;
    pub const GPIOA_BSHR: usize = 0x4001_0810;
    pub const GPIOA_BCR: usize = 0x4001_0814;
    pub const EXTI_INTENR: usize = 0x4001_0400;
    pub const EXTI_RTENR: usize = 0x4001_0408;
    pub const EXTI_FTENR: usize = 0x4001_040C;
    pub const EXTI_INTFR: usize = 0x4001_0414;
    pub const PFIC_IENR1: usize = 0xE000_E100;

    #[inline(always)]
    pub fn read(addr: usize) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    pub fn write(addr: usize, value: u32) {
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    #[inline(always)]
    pub fn modify(addr: usize, f: impl FnOnce(u32) -> u32) {
        write(addr, f(read(addr)));
    }
}

/// Button input pin on GPIOA (active-low with pull-up)
pub struct ButtonPin {
    line: u8,
}

impl ButtonPin {
    pub const fn new(line: u8) -> Self {
        Self { line }
    }

    /// Logical press state
    pub fn is_down(&self) -> bool {
        reg::read(reg::GPIOA_INDR) & (1 << self.line) == 0
    }
}

impl ErrorType for ButtonPin {
    type Error = Infallible;
}

impl InputPin for ButtonPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_down())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_down())
    }
}

/// Buzzer output pin (PA8, push-pull)
pub struct BuzzerPin;

impl ErrorType for BuzzerPin {
    type Error = Infallible;
}

impl OutputPin for BuzzerPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        reg::write(reg::GPIOA_BCR, 1 << pins::BUZZER_PIN);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        reg::write(reg::GPIOA_BSHR, 1 << pins::BUZZER_PIN);
        Ok(())
    }
}

/// Audio adapter that hands the cue to [`buzzer_task`](crate::buzzer_task)
#[derive(Debug, Default)]
pub struct BuzzerAudio;

impl AudioAdapter for BuzzerAudio {
    fn play_alert(&mut self) -> Result<(), HalError> {
        BUZZER.signal(());
        Ok(())
    }
}

/// Pulse the buzzer once per signalled cue
pub async fn run_buzzer() -> ! {
    let mut pin = BuzzerPin;
    loop {
        BUZZER.wait().await;
        let _ = pin.set_high();
        Timer::after(timing::BUZZER_PULSE).await;
        let _ = pin.set_low();
    }
}

/// Configure clocks, pins and EXTI lines
pub fn init_board() {
    // IOPA + AFIO clocks
    reg::modify(reg::RCC_APB2PCENR, |v| v | (1 << 2) | (1 << 0));

    // PA0..PA3: input with pull-up (CNF=10, MODE=00)
    reg::modify(reg::GPIOA_CFGLR, |v| {
        let mut v = v;
        for line in pins::BUTTON_PINS {
            let shift = (line as u32) * 4;
            v = (v & !(0xF << shift)) | (0b1000 << shift);
        }
        v
    });
    reg::modify(reg::GPIOA_OUTDR, |v| v | pins::BUTTON_MASK);

    // PA8: push-pull output, 2 MHz
    reg::modify(reg::GPIOA_CFGHR, |v| (v & !0xF) | 0b0010);
    reg::write(reg::GPIOA_BCR, 1 << pins::BUZZER_PIN);

    // EXTI0..3 routed to port A on both edges
    reg::modify(reg::AFIO_EXTICR1, |v| v & !0xFFFF);
    reg::modify(reg::EXTI_RTENR, |v| v | pins::BUTTON_MASK);
    reg::modify(reg::EXTI_FTENR, |v| v | pins::BUTTON_MASK);
    reg::modify(reg::EXTI_INTENR, |v| v | pins::BUTTON_MASK);

    // EXTI0..EXTI3 are IRQ 22..25
    reg::write(reg::PFIC_IENR1, 0b1111 << 22);

    #[cfg(feature = "defmt")]
    defmt::info!("🔌 CH32V203 board initialized");
}

/// Hand the producer end of the press queue to the interrupt path
pub fn install_press_producer(producer: Producer<'static, ButtonPress, PRESS_QUEUE_SIZE>) {
    critical_section::with(|cs| {
        PRESS_PRODUCER.borrow(cs).replace(Some(producer));
    });
}

/// Debounce and queue one edge on a button line
pub fn on_button_edge(button: Button) -> EdgeOutcome {
    let mut pin = ButtonPin::new(pins::BUTTON_PINS[button.index()]);
    let pressed = matches!(pin.is_low(), Ok(true));
    let at = Instant::now();
    let outcome = critical_section::with(|cs| {
        let mut slot = PRESS_PRODUCER.borrow(cs).borrow_mut();
        BUTTONS.on_edge(button, pressed, at, slot.as_mut())
    });

    #[cfg(feature = "defmt")]
    if outcome == EdgeOutcome::Dropped {
        defmt::warn!("⚠️ Press queue full, {:?} lost", button);
    }

    outcome
}

/// Shared EXTI0..EXTI3 handler body
///
/// Call from each EXTI vector; pending lines are cleared before dispatch.
pub fn handle_exti() {
    let pending = reg::read(reg::EXTI_INTFR) & pins::BUTTON_MASK;
    if pending == 0 {
        return;
    }
    reg::write(reg::EXTI_INTFR, pending);

    for button in Button::ALL {
        if pending & (1 << pins::BUTTON_PINS[button.index()]) != 0 {
            on_button_edge(button);
        }
    }
}

/// Timing constants for this board
pub mod timing {
    use super::Duration;

    /// Make and Miss debounce
    pub const PRIMARY_DEBOUNCE_MS: u32 = 200;

    /// Up and Down debounce
    pub const SECONDARY_DEBOUNCE_MS: u32 = 120;

    /// Length of one buzzer beep
    pub const BUZZER_PULSE: Duration = Duration::from_millis(80);
}

/// CH32V203 pin configuration constants
pub mod pins {
    /// Button lines in Make, Up, Down, Miss order
    pub const BUTTON_PINS: [u8; 4] = [0, 1, 2, 3]; // PA0..PA3

    pub const BUTTON_MASK: u32 = 0b1111;

    /// Buzzer output pin
    pub const BUZZER_PIN: u8 = 8; // PA8
}

