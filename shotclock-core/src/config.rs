//! Race targets and timeout allowances loaded from the rules file
//!
//! The schema mirrors the JSON document shipped with the device:
//!
//! ```text
//! { "APA": { "9-Ball": { "targets": {"<sl>": n}, "timeouts": {"3": n, "4": n} },
//!            "8-Ball": { "race_grid": {"<sl1>": {"<sl2>": [p1, p2]}}, "timeouts": {...} } },
//!   "WNT": { "targets": [n, ...], "timeouts": n },
//!   "BCA": { "target": n, "timeouts": n },
//!   "Ultimate Pool": { "target": n, "timeouts": n } }
//! ```
//!
//! Every lookup has a fallback, so an empty or partial document still yields a
//! playable match.

use heapless::{LinearMap, Vec};
use serde::Deserialize;

use crate::types::{MatchType, Profile};
#[cfg(feature = "std")]
use crate::types::ConfigError;

/// Target used when a lookup has no entry
pub const FALLBACK_TARGET: u16 = 14;
/// Timeouts per rack used when a lookup has no entry
pub const FALLBACK_TIMEOUTS: u8 = 1;

const DEFAULT_WNT_TARGETS: [u16; 5] = [5, 7, 9, 11, 13];

/// Skill level -> value tables
pub type SkillTable<V> = LinearMap<u8, V, 9>;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "APA", default)]
    pub apa: ApaRules,
    #[serde(rename = "WNT", default)]
    pub wnt: WntRules,
    #[serde(rename = "BCA", default)]
    pub bca: FixedRaceRules,
    #[serde(rename = "Ultimate Pool", default)]
    pub ultimate_pool: FixedRaceRules,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApaRules {
    #[serde(rename = "9-Ball", default)]
    pub nine_ball: ApaNineBall,
    #[serde(rename = "8-Ball", default)]
    pub eight_ball: ApaEightBall,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApaNineBall {
    #[serde(default)]
    pub targets: SkillTable<u16>,
    #[serde(default)]
    pub timeouts: SkillTable<u8>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApaEightBall {
    #[serde(default)]
    pub race_grid: SkillTable<SkillTable<[u16; 2]>>,
    #[serde(default)]
    pub timeouts: SkillTable<u8>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WntRules {
    #[serde(default)]
    pub targets: Vec<u16, 16>,
    pub timeouts: Option<u8>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FixedRaceRules {
    pub target: Option<u16>,
    pub timeouts: Option<u8>,
}

/// Official APA 9-Ball points required per skill level
const APA_NINE_BALL_TARGETS: [(u8, u16); 9] = [
    (1, 14),
    (2, 19),
    (3, 25),
    (4, 31),
    (5, 38),
    (6, 46),
    (7, 55),
    (8, 65),
    (9, 75),
];

/// Official APA 8-Ball race chart, rows by shooter skill 2..=7
const APA_EIGHT_BALL_RACES: [[[u16; 2]; 6]; 6] = [
    [[2, 2], [2, 3], [2, 4], [2, 5], [2, 6], [2, 7]],
    [[3, 2], [2, 2], [2, 3], [2, 4], [2, 5], [2, 6]],
    [[4, 2], [3, 2], [3, 3], [3, 4], [3, 5], [2, 5]],
    [[5, 2], [4, 2], [4, 3], [4, 4], [4, 5], [3, 5]],
    [[6, 2], [5, 2], [5, 3], [5, 4], [5, 5], [4, 5]],
    [[7, 2], [6, 2], [5, 2], [5, 3], [5, 4], [5, 5]],
];

fn default_apa_timeouts() -> SkillTable<u8> {
    let mut table = SkillTable::new();
    let _ = table.insert(3, 2);
    let _ = table.insert(4, 1);
    table
}

impl RulesConfig {
    /// Tables for firmware that ships without a rules file
    pub fn builtin() -> Self {
        let mut config = Self::default();

        for (level, target) in APA_NINE_BALL_TARGETS {
            let _ = config.apa.nine_ball.targets.insert(level, target);
        }
        config.apa.nine_ball.timeouts = default_apa_timeouts();

        for (row, races) in APA_EIGHT_BALL_RACES.iter().enumerate() {
            let mut columns = SkillTable::new();
            for (column, race) in races.iter().enumerate() {
                let _ = columns.insert(column as u8 + 2, *race);
            }
            let _ = config.apa.eight_ball.race_grid.insert(row as u8 + 2, columns);
        }
        config.apa.eight_ball.timeouts = default_apa_timeouts();

        config.wnt.targets = Vec::from_slice(&DEFAULT_WNT_TARGETS).unwrap_or_default();
        config.wnt.timeouts = Some(1);
        config.bca = FixedRaceRules { target: Some(16), timeouts: Some(0) };
        config.ultimate_pool = FixedRaceRules { target: Some(5), timeouts: Some(1) };
        config
    }

    /// Parse a rules document
    #[cfg(feature = "std")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|_| ConfigError::Malformed)
    }

    /// APA 9-Ball points needed for a skill level
    pub fn apa_nine_ball_target(&self, skill_level: u8) -> u16 {
        match self.apa.nine_ball.targets.get(&skill_level) {
            Some(target) => *target,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No 9-Ball target for SL{}, using {}", skill_level, FALLBACK_TARGET);
                FALLBACK_TARGET
            }
        }
    }

    /// APA 8-Ball race for a pairing, as `[player one, player two]`
    pub fn apa_eight_ball_race(&self, p1_skill: u8, p2_skill: u8) -> [u16; 2] {
        let sl1 = p1_skill.clamp(2, 7);
        let sl2 = p2_skill.clamp(2, 7);
        match self
            .apa
            .eight_ball
            .race_grid
            .get(&sl1)
            .and_then(|row| row.get(&sl2))
        {
            Some(race) => *race,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No 8-Ball race for SL{} v SL{}", sl1, sl2);
                [FALLBACK_TARGET, FALLBACK_TARGET]
            }
        }
    }

    /// APA timeouts per rack: the "3" row covers SL3 and below, "4" the rest
    pub fn apa_timeouts(&self, match_type: MatchType, skill_level: u8) -> u8 {
        let table = match match_type {
            MatchType::NineBall => &self.apa.nine_ball.timeouts,
            MatchType::EightBall => &self.apa.eight_ball.timeouts,
        };
        let key = if skill_level <= 3 { 3 } else { 4 };
        table
            .get(&key)
            .copied()
            .or_else(|| default_apa_timeouts().get(&key).copied())
            .unwrap_or(FALLBACK_TIMEOUTS)
    }

    /// WNT race choices, in display order
    pub fn wnt_targets(&self) -> &[u16] {
        if self.wnt.targets.is_empty() {
            &DEFAULT_WNT_TARGETS
        } else {
            &self.wnt.targets
        }
    }

    pub fn wnt_timeouts(&self) -> u8 {
        self.wnt.timeouts.unwrap_or(FALLBACK_TIMEOUTS)
    }

    /// Target and timeouts for profiles with a single fixed race
    pub fn fixed_race(&self, profile: Profile) -> (u16, u8) {
        match profile {
            Profile::Bca => (
                self.bca.target.unwrap_or(16),
                self.bca.timeouts.unwrap_or(0),
            ),
            Profile::UltimatePool => (
                self.ultimate_pool.target.unwrap_or(5),
                self.ultimate_pool.timeouts.unwrap_or(1),
            ),
            _ => (FALLBACK_TARGET, FALLBACK_TIMEOUTS),
        }
    }
}
