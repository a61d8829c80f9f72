//! Test utilities for shot clock core functionality

#[cfg(feature = "test-utils")]
pub mod harness {
    //! Scripted device driven on a virtual millisecond clock

    use crate::config::RulesConfig;
    use crate::dispatch::{Followup, ShotClock};
    use crate::hal::mock::{MockAudio, RecordingDisplay};
    use crate::hal::Instant;
    use crate::scheduler::CountdownScheduler;
    use crate::state::State;
    use crate::types::{InputEvent, MatchType, Profile, ShotClockConfig};

    /// Shot clock, sinks and scheduler on one virtual timeline
    pub struct Harness {
        pub clock: ShotClock,
        pub display: RecordingDisplay,
        pub audio: MockAudio,
        pub scheduler: CountdownScheduler,
        now_ms: u64,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_config(crate::default_config(), RulesConfig::builtin())
        }

        pub fn with_config(config: ShotClockConfig, rules: RulesConfig) -> Self {
            let mut harness = Self {
                clock: ShotClock::new(config, rules),
                display: RecordingDisplay::new(),
                audio: MockAudio::new(),
                scheduler: CountdownScheduler::new(config),
                now_ms: 0,
            };
            harness.clock.boot(&mut harness.display);
            harness
        }

        pub fn now(&self) -> Instant {
            Instant::from_millis(self.now_ms)
        }

        pub fn state(&self) -> State {
            self.clock.state.current()
        }

        /// Handle one event now, sitting out any requested pause
        pub fn press(&mut self, event: InputEvent) -> &mut Self {
            let followup = self.clock.handle(event, self.now(), &mut self.display);
            if let Followup::Pause(pause) = followup {
                self.advance(pause.as_millis());
                self.clock.resume(&mut self.display);
            }
            self
        }

        pub fn press_all(&mut self, events: &[InputEvent]) -> &mut Self {
            for event in events {
                self.press(*event);
            }
            self
        }

        /// Move virtual time forward, polling the scheduler at its cadence
        pub fn advance(&mut self, ms: u64) -> &mut Self {
            let step = self.clock.config.poll_interval.as_millis().max(1);
            let end = self.now_ms + ms;
            while self.now_ms < end {
                self.now_ms = (self.now_ms + step).min(end);
                let now = self.now();
                self.scheduler
                    .poll(&mut self.clock, now, &mut self.display, &mut self.audio);
            }
            self
        }

        /// Select a profile from the list and take the default setup choices
        pub fn start(&mut self, profile: Profile) -> &mut Self {
            let steps = profile.index();
            for _ in 0..steps {
                self.press(InputEvent::Down);
            }
            self.press(InputEvent::Make);
            match profile {
                Profile::Apa => self.press_all(&[InputEvent::Make, InputEvent::Make, InputEvent::Make]),
                Profile::Wnt => self.press(InputEvent::Make),
                _ => self,
            }
        }

        /// APA match with the given skill levels and game type
        pub fn start_apa(&mut self, p1_skill: u16, p2_skill: u16, match_type: MatchType) -> &mut Self {
            self.press(InputEvent::Make);
            self.clock.game.temp_setting_value = p1_skill;
            self.press(InputEvent::Make);
            self.clock.game.temp_setting_value = p2_skill;
            self.press(InputEvent::Make);
            self.clock.game.temp_setting_value = match_type.as_setting();
            self.press(InputEvent::Make)
        }
    }

    impl Default for Harness {
        fn default() -> Self {
            Self::new()
        }
    }
}
