#![no_std]

//! Firmware library exposing board hardware, log-only sinks and task wrappers

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;
pub use heapless::spsc::Queue;
pub use static_cell::StaticCell;

pub use shotclock_core::*;

pub use crate::mock_hardware::*;
pub use crate::ch32v203_hardware::*;
pub use crate::tasks::*;

/// Press queue capacity (one slot is always kept free by the SPSC queue)
pub const PRESS_QUEUE_SIZE: usize = 16;

// Display sink that only logs, for bring-up without a panel
pub mod mock_hardware {
    use shotclock_core::hal::DisplayAdapter;
    use shotclock_core::{Match, MatchType, MenuItem, Player};

    /// Display that logs every intent
    #[derive(Debug, Default)]
    pub struct LogDisplay;

    impl LogDisplay {
        pub fn new() -> Self {
            #[cfg(feature = "defmt")]
            defmt::info!("🧪 Using log display (no panel)");
            Self
        }
    }

    impl DisplayAdapter for LogDisplay {
        fn enter_idle_mode(&mut self, game: &Match) {
            #[cfg(feature = "defmt")]
            defmt::info!("⏸️ Idle {}s, inning {}, rack {}", game.countdown, game.inning(), game.rack_counter);
            #[cfg(not(feature = "defmt"))]
            let _ = game;
        }

        fn enter_shot_clock(&mut self, game: &Match) {
            #[cfg(feature = "defmt")]
            defmt::info!("▶️ Shot clock {}s", game.countdown);
            #[cfg(not(feature = "defmt"))]
            let _ = game;
        }

        fn update_timer_display(&mut self, game: &Match) {
            #[cfg(feature = "defmt")]
            if game.match_countdown != game.prev_match_countdown {
                defmt::debug!("⏱️ {}s / match {}s", game.countdown, game.match_countdown);
            } else {
                defmt::debug!("⏱️ {}s", game.countdown);
            }
            #[cfg(not(feature = "defmt"))]
            let _ = game;
        }

        fn render_profile_selection(&mut self, index: usize, _clear_all: bool) {
            #[cfg(feature = "defmt")]
            defmt::info!("📋 Profile {}", shotclock_core::Profile::ALL[index % 5].name());
            #[cfg(not(feature = "defmt"))]
            let _ = index;
        }

        fn render_menu(&mut self, game: &Match) {
            #[cfg(feature = "defmt")]
            if let Some(item) = game.current_menu_item() {
                defmt::info!("📋 Menu: {}", item.label());
            }
            #[cfg(not(feature = "defmt"))]
            let _ = game;
        }

        fn render_menu_value(&mut self, item: MenuItem, value: u16) {
            #[cfg(feature = "defmt")]
            defmt::info!("✏️ {} = {}", item.label(), value);
            #[cfg(not(feature = "defmt"))]
            let _ = (item, value);
        }

        fn render_exit_confirmation(&mut self) {
            #[cfg(feature = "defmt")]
            defmt::info!("❓ Exit match?");
        }

        fn render_skill_level_selection(&mut self, player: Player, level: u16) {
            #[cfg(feature = "defmt")]
            defmt::info!("🎱 {:?} skill {}", player, level);
            #[cfg(not(feature = "defmt"))]
            let _ = (player, level);
        }

        fn render_game_type_selection(&mut self, match_type: MatchType) {
            #[cfg(feature = "defmt")]
            defmt::info!("🎱 Game: {}", match_type.name());
            #[cfg(not(feature = "defmt"))]
            let _ = match_type;
        }

        fn render_wnt_target_selection(&mut self, target: u16) {
            #[cfg(feature = "defmt")]
            defmt::info!("🎯 Race to {}", target);
            #[cfg(not(feature = "defmt"))]
            let _ = target;
        }

        fn render_victory(&mut self, winner: Player) {
            #[cfg(feature = "defmt")]
            defmt::info!("🏆 {:?} wins", winner);
            #[cfg(not(feature = "defmt"))]
            let _ = winner;
        }

        fn render_message(&mut self, text: &str) {
            #[cfg(feature = "defmt")]
            defmt::info!("💬 {}", text);
            #[cfg(not(feature = "defmt"))]
            let _ = text;
        }

        fn render_shootout_announcement(&mut self) {
            #[cfg(feature = "defmt")]
            defmt::info!("⚔️ Shootout!");
        }

        fn render_shootout_stopwatch(&mut self, elapsed_ms: u32) {
            #[cfg(feature = "defmt")]
            defmt::trace!("⏱️ {}ms", elapsed_ms);
            #[cfg(not(feature = "defmt"))]
            let _ = elapsed_ms;
        }

        fn flash_timer(&mut self, visible: bool) {
            #[cfg(feature = "defmt")]
            defmt::trace!("Flash {}", visible);
            #[cfg(not(feature = "defmt"))]
            let _ = visible;
        }

        fn blink_highlight(&mut self, visible: bool) {
            #[cfg(feature = "defmt")]
            defmt::trace!("Blink {}", visible);
            #[cfg(not(feature = "defmt"))]
            let _ = visible;
        }
    }
}

// Embassy tasks module
pub mod tasks {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::mutex::Mutex;
    use heapless::spsc::Consumer;
    use shotclock_core::tasks::Device;

    /// Device type shared by the firmware tasks
    pub type BoardDevice = Mutex<CriticalSectionRawMutex, Device<LogDisplay, BuzzerAudio>>;

    /// Input dispatch task wrapper
    #[embassy_executor::task]
    pub async fn input_task_wrapper(
        device: &'static BoardDevice,
        presses: Consumer<'static, ButtonPress, PRESS_QUEUE_SIZE>,
        config: ShotClockConfig,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("🧠 Input task started");
        shotclock_core::tasks::input_task(device, &BUTTONS, presses, config).await;
    }

    /// Countdown scheduler task wrapper
    #[embassy_executor::task]
    pub async fn countdown_task_wrapper(device: &'static BoardDevice, config: ShotClockConfig) {
        #[cfg(feature = "defmt")]
        defmt::info!("⏱️ Countdown task started");
        shotclock_core::tasks::countdown_task(device, config).await;
    }

    /// Buzzer pulse task
    #[embassy_executor::task]
    pub async fn buzzer_task() {
        #[cfg(feature = "defmt")]
        defmt::info!("🔔 Buzzer task started");
        crate::ch32v203_hardware::run_buzzer().await;
    }
}

// CH32V203 hardware module
pub mod ch32v203_hardware;

// Time driver for embassy
pub mod time_driver;
