//! Host configuration options consumed by the battle engines.
//!
//! Options come in three shapes: scalars, per-player arrays, and
//! per-experience-level arrays. A configuration is loaded once (from RON or
//! from `Name = value` text) and then only borrowed by battles; the engines
//! never mutate it.
//!
//! # Example RON
//!
//! ```ron
//! HostConfig(
//!     beam_hit_odds: 65,                 // one value for every player
//!     torp_hit_odds: [55, 55, 60, 55],   // missing players repeat the last value
//!     emod_beam_hit_odds: [0, 5, 10, 15, 20],
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, VcrError};

/// Number of player slots in per-player arrays.
pub const MAX_PLAYERS: usize = 12;

/// Number of experience levels, including level 0.
pub const NUM_LEVELS: usize = 5;

/// Serialized shape of an array option: one value, or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayRepr {
    /// One value for every slot.
    One(i32),
    /// Values by slot; short lists repeat their last value.
    Many(Vec<i32>),
}

/// Fixed-size integer array option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ArrayRepr", into = "ArrayRepr")]
pub struct OptionArray<const N: usize>([i32; N]);

/// Option with one value per player (players 1..=12).
pub type PlayerArray = OptionArray<MAX_PLAYERS>;

/// Option with one value per experience level (levels 0..=4).
pub type LevelArray = OptionArray<NUM_LEVELS>;

impl<const N: usize> OptionArray<N> {
    /// Same value for every slot.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self([value; N])
    }

    /// Build from a list, repeating the last value for missing slots.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_slice(values: &[i32]) -> Option<Self> {
        let last = *values.last()?;
        let mut out = [last; N];
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = *value;
        }
        Some(Self(out))
    }

    /// Raw access by zero-based index, clamped to the array.
    #[must_use]
    pub fn at(&self, index: usize) -> i32 {
        self.0[index.min(N - 1)]
    }
}

impl PlayerArray {
    /// Value for a player (1-based); out-of-range players are clamped.
    #[must_use]
    pub fn player(&self, player: u8) -> i32 {
        self.at(usize::from(player.max(1)) - 1)
    }
}

impl LevelArray {
    /// Value for an experience level; out-of-range levels are clamped.
    #[must_use]
    pub fn level(&self, level: i32) -> i32 {
        self.at(level.max(0) as usize)
    }
}

impl<const N: usize> TryFrom<ArrayRepr> for OptionArray<N> {
    type Error = String;

    fn try_from(repr: ArrayRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ArrayRepr::One(value) => Ok(Self::uniform(value)),
            ArrayRepr::Many(values) => {
                if values.len() > N {
                    return Err(format!("expected at most {N} values, got {}", values.len()));
                }
                Self::from_slice(&values).ok_or_else(|| "empty array option".to_string())
            }
        }
    }
}

impl<const N: usize> From<OptionArray<N>> for ArrayRepr {
    fn from(array: OptionArray<N>) -> Self {
        ArrayRepr::Many(array.0.to_vec())
    }
}

/// Rules options for both engines and for score computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Maximum beam range against units (m).
    pub beam_firing_range: i32,
    /// Maximum beam range against fighters (m).
    pub beam_hit_fighter_range: i32,
    /// Minimum beam charge (of 1000) to shoot at a fighter.
    pub beam_hit_fighter_charge: PlayerArray,
    /// Minimum beam charge (of 1000) to shoot at a unit.
    pub beam_hit_ship_charge: PlayerArray,
    /// Base beam hit odds (%).
    pub beam_hit_odds: PlayerArray,
    /// Beam hit odds bonus per 100 points of kill+damage power.
    pub beam_hit_bonus: PlayerArray,
    /// Base beam recharge per tick.
    pub beam_recharge_rate: PlayerArray,
    /// Random beam recharge bonus per tick.
    pub beam_recharge_bonus: PlayerArray,

    /// Maximum torpedo range (m).
    pub torp_firing_range: i32,
    /// Base torpedo hit odds (%).
    pub torp_hit_odds: PlayerArray,
    /// Torpedo hit odds bonus per 100 points of kill+damage power.
    pub torp_hit_bonus: PlayerArray,
    /// Base launcher recharge per tick.
    pub tube_recharge_rate: PlayerArray,
    /// Random launcher recharge bonus per tick.
    pub tube_recharge_bonus: PlayerArray,

    /// Explosive power of one fighter strike.
    pub fighter_beam_explosive: PlayerArray,
    /// Kill power of one fighter strike.
    pub fighter_beam_kill: PlayerArray,
    /// Distance from its target at which a fighter strikes (m).
    pub fighter_firing_range: i32,
    /// Fighter speed (m per tick).
    pub fighter_movement_speed: i32,
    /// Minimum ticks between launches from one unit.
    pub bay_launch_interval: PlayerArray,
    /// Base bay recharge per tick.
    pub bay_recharge_rate: PlayerArray,
    /// Random bay recharge bonus per tick.
    pub bay_recharge_bonus: PlayerArray,
    /// Maximum fighters airborne per unit.
    pub max_fighters_launched: PlayerArray,
    /// Strikes a fighter makes before returning.
    pub strikes_per_fighter: PlayerArray,

    /// Ship closing speed (m per tick).
    pub ship_movement_speed: i32,
    /// Distance at which ships stop closing (m).
    pub standoff_distance: i32,

    /// Shield damage per point of explosive power, times unit mass.
    pub shield_damage_scaling: PlayerArray,
    /// Shield damage per point of kill power, times unit mass.
    pub shield_kill_scaling: PlayerArray,
    /// Hull damage per point of explosive power, times unit mass.
    pub hull_damage_scaling: PlayerArray,
    /// Crew killed per point of kill power, times unit mass.
    pub crew_kill_scaling: PlayerArray,

    /// Whether engine-shield bonus is in effect.
    pub allow_engine_shield_bonus: bool,
    /// Shield points regenerated per tick by eligible units.
    pub engine_shield_bonus_rate: PlayerArray,

    /// Chance (%) that a crewless ship is boarded by this player rather
    /// than scuttled (one-on-one battles).
    pub capture_odds: PlayerArray,

    /// Number of experience levels in use (0 disables experience).
    pub num_experience_levels: i32,
    /// Beam recharge bonus by level.
    pub emod_beam_recharge_rate: LevelArray,
    /// Beam hit odds bonus by level.
    pub emod_beam_hit_odds: LevelArray,
    /// Launcher recharge bonus by level.
    pub emod_tube_recharge_rate: LevelArray,
    /// Torpedo hit odds bonus by level.
    pub emod_torp_hit_odds: LevelArray,
    /// Bay recharge bonus by level.
    pub emod_bay_recharge_rate: LevelArray,
    /// Crew kill scaling modifier by level (added to the target's scaling).
    pub emod_crew_kill_scaling: LevelArray,

    /// Tick budget for one-on-one battles.
    pub classic_max_ticks: i32,
    /// Tick budget for fleet battles.
    pub flak_max_ticks: i32,

    /// Build points per 10 kt of enemy damaged and destroyed.
    pub pal_aggressor_points_per_10kt: PlayerArray,
    /// Additional build points per 10 kt of enemy destroyed.
    pub pal_aggressor_kill_points_per_10kt: PlayerArray,
    /// Experience points for destroying a unit of own combat value.
    pub ep_combat_kill_scaling: PlayerArray,
    /// Experience points for damaging a unit of own combat value.
    pub ep_combat_damage_scaling: PlayerArray,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            beam_firing_range: 20000,
            beam_hit_fighter_range: 100_000,
            beam_hit_fighter_charge: PlayerArray::uniform(500),
            beam_hit_ship_charge: PlayerArray::uniform(600),
            beam_hit_odds: PlayerArray::uniform(70),
            beam_hit_bonus: PlayerArray::uniform(12),
            beam_recharge_rate: PlayerArray::uniform(8),
            beam_recharge_bonus: PlayerArray::uniform(4),

            torp_firing_range: 30000,
            torp_hit_odds: PlayerArray::uniform(55),
            torp_hit_bonus: PlayerArray::uniform(13),
            tube_recharge_rate: PlayerArray::uniform(30),
            tube_recharge_bonus: PlayerArray::uniform(7),

            fighter_beam_explosive: PlayerArray::uniform(2),
            fighter_beam_kill: PlayerArray::uniform(2),
            fighter_firing_range: 3000,
            fighter_movement_speed: 235,
            bay_launch_interval: PlayerArray::uniform(2),
            bay_recharge_rate: PlayerArray::uniform(52),
            bay_recharge_bonus: PlayerArray::uniform(2),
            max_fighters_launched: PlayerArray::uniform(30),
            strikes_per_fighter: PlayerArray::uniform(7),

            ship_movement_speed: 75,
            standoff_distance: 3000,

            shield_damage_scaling: PlayerArray::uniform(80),
            shield_kill_scaling: PlayerArray::uniform(0),
            hull_damage_scaling: PlayerArray::uniform(80),
            crew_kill_scaling: PlayerArray::uniform(80),

            allow_engine_shield_bonus: false,
            engine_shield_bonus_rate: PlayerArray::uniform(0),
            capture_odds: PlayerArray::uniform(100),

            num_experience_levels: 4,
            emod_beam_recharge_rate: LevelArray::uniform(0),
            emod_beam_hit_odds: LevelArray::uniform(0),
            emod_tube_recharge_rate: LevelArray::uniform(0),
            emod_torp_hit_odds: LevelArray::uniform(0),
            emod_bay_recharge_rate: LevelArray::uniform(0),
            emod_crew_kill_scaling: LevelArray::uniform(0),

            classic_max_ticks: 10_000,
            flak_max_ticks: 20_000,

            pal_aggressor_points_per_10kt: PlayerArray::uniform(2),
            pal_aggressor_kill_points_per_10kt: PlayerArray::uniform(10),
            ep_combat_kill_scaling: PlayerArray::uniform(800),
            ep_combat_damage_scaling: PlayerArray::uniform(200),
        }
    }
}

/// Mutable handle to one named option.
enum OptionSlot<'a> {
    Scalar(&'a mut i32),
    Flag(&'a mut bool),
    Player(&'a mut PlayerArray),
    Level(&'a mut LevelArray),
}

impl HostConfig {
    /// Parse a configuration from RON text. Omitted options keep defaults.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| VcrError::DataParseError {
            what: "host configuration",
            message: e.to_string(),
        })
    }

    /// Parse `Name = value` lines on top of the defaults.
    ///
    /// Blank lines, `#` comments and `%SECTION` headers are skipped.
    pub fn from_pconfig(text: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                return Err(VcrError::DataParseError {
                    what: "host configuration",
                    message: format!("expected 'Name = value', got '{line}'"),
                });
            };
            config.set_option(name.trim(), value.trim())?;
        }
        Ok(config)
    }

    /// Set one option by its PHost-style name (case and `_` insensitive).
    ///
    /// Array options take comma-separated values; a single value applies to
    /// every slot.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = || VcrError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let slot = self
            .option_slot(name)
            .ok_or_else(|| VcrError::UnknownOption(name.to_string()))?;
        match slot {
            OptionSlot::Scalar(target) => *target = value.parse().map_err(|_| invalid())?,
            OptionSlot::Flag(target) => {
                *target = match value.to_ascii_lowercase().as_str() {
                    "yes" | "true" | "1" => true,
                    "no" | "false" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            OptionSlot::Player(target) => *target = parse_array(value).ok_or_else(invalid)?,
            OptionSlot::Level(target) => *target = parse_array(value).ok_or_else(invalid)?,
        }
        Ok(())
    }

    fn option_slot(&mut self, name: &str) -> Option<OptionSlot<'_>> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let slot = match key.as_str() {
            "beamfiringrange" => OptionSlot::Scalar(&mut self.beam_firing_range),
            "beamhitfighterrange" => OptionSlot::Scalar(&mut self.beam_hit_fighter_range),
            "beamhitfightercharge" => OptionSlot::Player(&mut self.beam_hit_fighter_charge),
            "beamhitshipcharge" => OptionSlot::Player(&mut self.beam_hit_ship_charge),
            "beamhitodds" => OptionSlot::Player(&mut self.beam_hit_odds),
            "beamhitbonus" => OptionSlot::Player(&mut self.beam_hit_bonus),
            "beamrechargerate" => OptionSlot::Player(&mut self.beam_recharge_rate),
            "beamrechargebonus" => OptionSlot::Player(&mut self.beam_recharge_bonus),
            "torpfiringrange" => OptionSlot::Scalar(&mut self.torp_firing_range),
            "torphitodds" => OptionSlot::Player(&mut self.torp_hit_odds),
            "torphitbonus" => OptionSlot::Player(&mut self.torp_hit_bonus),
            "tuberechargerate" => OptionSlot::Player(&mut self.tube_recharge_rate),
            "tuberechargebonus" => OptionSlot::Player(&mut self.tube_recharge_bonus),
            "fighterbeamexplosive" => OptionSlot::Player(&mut self.fighter_beam_explosive),
            "fighterbeamkill" => OptionSlot::Player(&mut self.fighter_beam_kill),
            "fighterfiringrange" => OptionSlot::Scalar(&mut self.fighter_firing_range),
            "fightermovementspeed" => OptionSlot::Scalar(&mut self.fighter_movement_speed),
            "baylaunchinterval" => OptionSlot::Player(&mut self.bay_launch_interval),
            "bayrechargerate" => OptionSlot::Player(&mut self.bay_recharge_rate),
            "bayrechargebonus" => OptionSlot::Player(&mut self.bay_recharge_bonus),
            "maxfighterslaunched" => OptionSlot::Player(&mut self.max_fighters_launched),
            "strikesperfighter" => OptionSlot::Player(&mut self.strikes_per_fighter),
            "shipmovementspeed" => OptionSlot::Scalar(&mut self.ship_movement_speed),
            "standoffdistance" => OptionSlot::Scalar(&mut self.standoff_distance),
            "shielddamagescaling" => OptionSlot::Player(&mut self.shield_damage_scaling),
            "shieldkillscaling" => OptionSlot::Player(&mut self.shield_kill_scaling),
            "hulldamagescaling" => OptionSlot::Player(&mut self.hull_damage_scaling),
            "crewkillscaling" => OptionSlot::Player(&mut self.crew_kill_scaling),
            "allowengineshieldbonus" => OptionSlot::Flag(&mut self.allow_engine_shield_bonus),
            "engineshieldbonusrate" => OptionSlot::Player(&mut self.engine_shield_bonus_rate),
            "captureodds" => OptionSlot::Player(&mut self.capture_odds),
            "numexperiencelevels" => OptionSlot::Scalar(&mut self.num_experience_levels),
            "emodbeamrechargerate" => OptionSlot::Level(&mut self.emod_beam_recharge_rate),
            "emodbeamhitodds" => OptionSlot::Level(&mut self.emod_beam_hit_odds),
            "emodtuberechargerate" => OptionSlot::Level(&mut self.emod_tube_recharge_rate),
            "emodtorphitodds" => OptionSlot::Level(&mut self.emod_torp_hit_odds),
            "emodbayrechargerate" => OptionSlot::Level(&mut self.emod_bay_recharge_rate),
            "emodcrewkillscaling" => OptionSlot::Level(&mut self.emod_crew_kill_scaling),
            "classicmaxticks" => OptionSlot::Scalar(&mut self.classic_max_ticks),
            "flakmaxticks" => OptionSlot::Scalar(&mut self.flak_max_ticks),
            "palaggressorpointsper10kt" => {
                OptionSlot::Player(&mut self.pal_aggressor_points_per_10kt)
            }
            "palaggressorkillpointsper10kt" => {
                OptionSlot::Player(&mut self.pal_aggressor_kill_points_per_10kt)
            }
            "epcombatkillscaling" => OptionSlot::Player(&mut self.ep_combat_kill_scaling),
            "epcombatdamagescaling" => OptionSlot::Player(&mut self.ep_combat_damage_scaling),
            _ => return None,
        };
        Some(slot)
    }

    /// Effective experience level of a unit (0 when experience is off).
    #[must_use]
    pub fn effective_level(&self, level: i32) -> i32 {
        level.clamp(0, self.num_experience_levels.max(0))
    }
}

fn parse_array<const N: usize>(value: &str) -> Option<OptionArray<N>> {
    let values = value
        .split(',')
        .map(|v| v.trim().parse::<i32>().ok())
        .collect::<Option<Vec<_>>>()?;
    if values.len() > N {
        return None;
    }
    OptionArray::from_slice(&values)
}
