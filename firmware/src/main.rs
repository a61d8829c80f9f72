#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use heapless::spsc::Queue;
use static_cell::StaticCell;

use shotclock_core::tasks::Device;
use shotclock_core::*;
use shotclock_firmware::*;

/// Core clock after reset (HSI)
const HCLK_HZ: u32 = 8_000_000;

// Static resources
static PRESS_QUEUE: StaticCell<Queue<ButtonPress, PRESS_QUEUE_SIZE>> = StaticCell::new();
static DEVICE: StaticCell<BoardDevice> = StaticCell::new();

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("🔧 Shot Clock Firmware v{} starting...", VERSION);

    time_driver::init(HCLK_HZ);
    init_board();
    #[cfg(feature = "defmt")]
    defmt::info!("✅ Hardware initialized");

    let config = ShotClockConfig {
        primary_debounce_ms: timing::PRIMARY_DEBOUNCE_MS,
        secondary_debounce_ms: timing::SECONDARY_DEBOUNCE_MS,
        ..ShotClockConfig::default()
    };
    #[cfg(feature = "defmt")]
    defmt::info!("⚙️ Poll {}ms, tick {}ms", config.poll_interval.as_millis(), config.tick.as_millis());

    // Press queue: producer to the EXTI path, consumer to the input task
    let queue = PRESS_QUEUE.init(Queue::new());
    let (producer, consumer) = queue.split();
    install_press_producer(producer);

    let mut clock = ShotClock::new(config, RulesConfig::builtin());
    let mut display = LogDisplay::new();
    clock.boot(&mut display);
    let device: &'static BoardDevice =
        DEVICE.init(Mutex::new(Device::new(clock, display, BuzzerAudio)));

    #[cfg(feature = "defmt")]
    defmt::info!("🚀 Spawning shot clock tasks...");

    spawner.must_spawn(input_task_wrapper(device, consumer, config));
    spawner.must_spawn(countdown_task_wrapper(device, config));
    spawner.must_spawn(buzzer_task());

    #[cfg(feature = "defmt")]
    defmt::info!("✨ Shot clock ready!");

    // Main supervision loop
    loop {
        Timer::after(Duration::from_secs(1)).await;
        #[cfg(feature = "defmt")]
        defmt::trace!("💓 Heartbeat");
    }
}

#[no_mangle]
extern "C" fn SysTick() {
    time_driver::on_systick();
}

#[no_mangle]
extern "C" fn EXTI0() {
    handle_exti();
}

#[no_mangle]
extern "C" fn EXTI1() {
    handle_exti();
}

#[no_mangle]
extern "C" fn EXTI2() {
    handle_exti();
}

#[no_mangle]
extern "C" fn EXTI3() {
    handle_exti();
}
