//! SysTick based embassy time driver for CH32V203
//!
//! SysTick fires at the embassy tick rate (1 kHz). Each interrupt advances
//! the tick count and fires the single alarm once it is due.

use core::cell::Cell;

use critical_section::Mutex as CsMutex;
use embassy_time_driver::{AlarmHandle, Driver};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

const STK_CTLR: usize = 0xE000_F000;
const STK_SR: usize = 0xE000_F004;
const STK_CMPLR: usize = 0xE000_F010;

// STE | STIE | STRE, clocked at HCLK/8
const STK_ENABLE: u32 = (1 << 0) | (1 << 1) | (1 << 3);

struct Alarm {
    timestamp: Cell<u64>,
    callback: Cell<Option<(fn(*mut ()), *mut ())>>,
}

// Only touched inside critical sections on a single core
unsafe impl Send for Alarm {}

/// Tick counter plus one alarm slot
pub struct SysTickDriver {
    ticks: AtomicU64,
    alarm_taken: AtomicBool,
    alarm: CsMutex<Alarm>,
}

impl SysTickDriver {
    const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            alarm_taken: AtomicBool::new(false),
            alarm: CsMutex::new(Alarm {
                timestamp: Cell::new(u64::MAX),
                callback: Cell::new(None),
            }),
        }
    }

    /// Advance one tick (called from the SysTick interrupt)
    fn tick(&self) {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let due = critical_section::with(|cs| {
            let alarm = self.alarm.borrow(cs);
            if alarm.timestamp.get() <= now {
                alarm.timestamp.set(u64::MAX);
                alarm.callback.get()
            } else {
                None
            }
        });

        if let Some((callback, ctx)) = due {
            callback(ctx);
        }
    }
}

impl Driver for SysTickDriver {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        if self.alarm_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(AlarmHandle::new(0))
        }
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, callback: fn(*mut ()), ctx: *mut ()) {
        critical_section::with(|cs| {
            self.alarm.borrow(cs).callback.set(Some((callback, ctx)));
        });
    }

    fn set_alarm(&self, _alarm: AlarmHandle, timestamp: u64) -> bool {
        critical_section::with(|cs| {
            let alarm = self.alarm.borrow(cs);
            if timestamp <= self.now() {
                alarm.timestamp.set(u64::MAX);
                false
            } else {
                alarm.timestamp.set(timestamp);
                true
            }
        })
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: SysTickDriver = SysTickDriver::new());

/// Start SysTick at 1 kHz from the given core clock
pub fn init(hclk_hz: u32) {
    let reload = hclk_hz / 8 / 1_000 - 1;
    unsafe {
        core::ptr::write_volatile(STK_CMPLR as *mut u32, reload);
        core::ptr::write_volatile(STK_SR as *mut u32, 0);
        core::ptr::write_volatile(STK_CTLR as *mut u32, STK_ENABLE);
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("SysTick reload {}", reload);
}

/// SysTick interrupt body
pub fn on_systick() {
    unsafe { core::ptr::write_volatile(STK_SR as *mut u32, 0) };
    DRIVER.tick();
}

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> u8 {
        let mut mstatus: usize;
        core::arch::asm!("csrrci {}, mstatus, 8", out(reg) mstatus);
        (mstatus & 8) as u8
    }

    unsafe fn release(was_active: u8) {
        if was_active != 0 {
            core::arch::asm!("csrsi mstatus, 8");
        }
    }
}
