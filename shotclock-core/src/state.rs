//! Device states and the transition bookkeeping around them

/// Every mode the device can be in
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    ProfileSelection,
    ApaSkillLevelP1,
    ApaSkillLevelP2,
    ApaGameTypeSelection,
    WntTargetSelection,
    ShotClockIdle,
    CountdownInProgress,
    CountdownComplete,
    Menu,
    EditingValue,
    ExitMatchConfirmation,
    ConfirmRackEnd,
    Victory,
    ShootoutAnnouncement,
    ShootoutP1Wait,
    ShootoutP1Running,
    ShootoutP2Wait,
    ShootoutP2Running,
}

impl State {
    /// States whose buttons are interpreted by the active rules
    pub const fn is_gameplay(&self) -> bool {
        matches!(
            self,
            State::ShotClockIdle | State::CountdownInProgress | State::CountdownComplete
        )
    }

    /// Profile and setup wizard screens
    pub const fn is_setup(&self) -> bool {
        matches!(
            self,
            State::ProfileSelection
                | State::ApaSkillLevelP1
                | State::ApaSkillLevelP2
                | State::ApaGameTypeSelection
                | State::WntTargetSelection
        )
    }

    pub const fn is_shootout(&self) -> bool {
        matches!(
            self,
            State::ShootoutAnnouncement
                | State::ShootoutP1Wait
                | State::ShootoutP1Running
                | State::ShootoutP2Wait
                | State::ShootoutP2Running
        )
    }

    /// Screens with a highlight that blinks after inactivity
    pub const fn blinks(&self) -> bool {
        matches!(self, State::ProfileSelection | State::Menu | State::Victory)
    }
}

/// Current state plus the match-in-progress flag
#[derive(Debug)]
pub struct StateMachine {
    state: State,
    game_on: bool,
    transitions: u32,
}

impl StateMachine {
    pub const fn new() -> Self {
        Self {
            state: State::ProfileSelection,
            game_on: false,
            transitions: 0,
        }
    }

    pub fn current(&self) -> State {
        self.state
    }

    pub fn game_on(&self) -> bool {
        self.game_on
    }

    pub fn set_game_on(&mut self, on: bool) {
        self.game_on = on;
    }

    /// Count of transitions so far; changes whenever the state is re-entered
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn transition_to(&mut self, state: State) {
        #[cfg(feature = "defmt")]
        defmt::debug!("State: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.transitions = self.transitions.wrapping_add(1);
    }

    /// Back to profile selection with no match in progress
    pub fn reset(&mut self) {
        self.game_on = false;
        self.transition_to(State::ProfileSelection);
    }

    pub fn profile_selection(&self) -> bool {
        self.state == State::ProfileSelection
    }

    pub fn apa_skill_level_p1(&self) -> bool {
        self.state == State::ApaSkillLevelP1
    }

    pub fn apa_skill_level_p2(&self) -> bool {
        self.state == State::ApaSkillLevelP2
    }

    pub fn apa_game_type_selection(&self) -> bool {
        self.state == State::ApaGameTypeSelection
    }

    pub fn wnt_target_selection(&self) -> bool {
        self.state == State::WntTargetSelection
    }

    pub fn shot_clock_idle(&self) -> bool {
        self.state == State::ShotClockIdle
    }

    pub fn countdown_in_progress(&self) -> bool {
        self.state == State::CountdownInProgress
    }

    pub fn countdown_complete(&self) -> bool {
        self.state == State::CountdownComplete
    }

    pub fn menu(&self) -> bool {
        self.state == State::Menu
    }

    pub fn editing_value(&self) -> bool {
        self.state == State::EditingValue
    }

    pub fn exit_match_confirmation(&self) -> bool {
        self.state == State::ExitMatchConfirmation
    }

    pub fn confirm_rack_end(&self) -> bool {
        self.state == State::ConfirmRackEnd
    }

    pub fn victory(&self) -> bool {
        self.state == State::Victory
    }

    pub fn shootout_announcement(&self) -> bool {
        self.state == State::ShootoutAnnouncement
    }

    pub fn shootout_p1_wait(&self) -> bool {
        self.state == State::ShootoutP1Wait
    }

    pub fn shootout_p1_running(&self) -> bool {
        self.state == State::ShootoutP1Running
    }

    pub fn shootout_p2_wait(&self) -> bool {
        self.state == State::ShootoutP2Wait
    }

    pub fn shootout_p2_running(&self) -> bool {
        self.state == State::ShootoutP2Running
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
