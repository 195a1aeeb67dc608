//! Per-variant rules tables for the classic engine.
//!
//! Each rules variant differs from the others in a handful of constants and
//! formulas. Those are collected here as immutable tables plus one small
//! tuning function per variant; the tick loop itself is variant-agnostic.
//!
//! Weapon odds, recharge rates, fighter cadence and scaling always come from
//! [`HostConfig`]. What the tables fix beyond that (torpedo multiplier,
//! engine-shield eligibility, rounding, score eligibility) are defaults that
//! have not been checked against recorded battles.

use crate::config::{HostConfig, LevelArray};
use crate::damage::{HitScaling, Rounding};
use crate::object::Object;
use crate::random::{RandomFamily, RandomSource};

/// Which units get the engine-shield bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EsbEligibility {
    /// Every ship.
    Ships,
    /// Ships that carry at least one weapon.
    ArmedShips,
    /// Nobody.
    Never,
}

impl EsbEligibility {
    /// Check whether `unit` qualifies.
    #[must_use]
    pub fn applies_to(self, unit: &Object) -> bool {
        match self {
            EsbEligibility::Ships => !unit.is_planet,
            EsbEligibility::ArmedShips => !unit.is_planet && unit.is_armed(),
            EsbEligibility::Never => false,
        }
    }
}

/// Charge gained per tick: `base + roll(0..jitter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recharge {
    /// Fixed part.
    pub base: i32,
    /// Exclusive upper bound of the random part; 0 draws no roll.
    pub jitter: i32,
}

impl Recharge {
    /// Roll one tick's worth of charge.
    pub fn roll(self, rng: &mut impl RandomSource) -> i32 {
        let extra = if self.jitter > 0 {
            i32::from(rng.next_below(self.jitter.min(i32::from(u16::MAX)) as u16))
        } else {
            0
        };
        (self.base + extra).max(0)
    }
}

/// Everything one side needs to fight, resolved for its owner and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTuning {
    /// Beam recharge per tick.
    pub beam_recharge: Recharge,
    /// Launcher recharge per tick.
    pub tube_recharge: Recharge,
    /// Bay recharge per tick.
    pub bay_recharge: Recharge,
    /// Base beam hit odds, percent.
    pub beam_hit_odds: i32,
    /// Beam hit bonus per 100 points of weapon power.
    pub beam_hit_bonus: i32,
    /// Base torpedo hit odds, percent.
    pub torp_hit_odds: i32,
    /// Torpedo hit bonus per 100 points of weapon power.
    pub torp_hit_bonus: i32,
    /// Charge a beam needs to fire at a ship.
    pub beam_ship_charge: i32,
    /// Charge a beam needs to fire at a fighter.
    pub beam_fighter_charge: i32,
    /// Ticks between two launches.
    pub launch_interval: i32,
    /// Strikes before a fighter returns.
    pub strikes_per_fighter: i32,
    /// Most fighters airborne at once.
    pub max_fighters_launched: i32,
    /// Explosive power of a fighter strike.
    pub fighter_explosive: i32,
    /// Kill power of a fighter strike.
    pub fighter_kill: i32,
    /// Scaling of hits this side inflicts.
    pub scaling: HitScaling,
    /// Shield points regenerated per tick.
    pub shield_regeneration: i32,
}

impl SideTuning {
    /// Hit odds of a beam with the given powers.
    #[must_use]
    pub fn beam_odds(&self, kill: i32, damage: i32) -> i32 {
        hit_odds(self.beam_hit_odds, self.beam_hit_bonus, kill, damage)
    }

    /// Hit odds of a torpedo with the given powers.
    #[must_use]
    pub fn torpedo_odds(&self, kill: i32, damage: i32) -> i32 {
        hit_odds(self.torp_hit_odds, self.torp_hit_bonus, kill, damage)
    }
}

fn hit_odds(base: i32, bonus: i32, kill: i32, damage: i32) -> i32 {
    (base + bonus * (kill + damage) / 100).clamp(0, 100)
}

/// Immutable rules of one classic variant.
#[derive(Debug)]
pub struct VariantRules {
    /// Generator family for every roll.
    pub random: RandomFamily,
    /// Torpedo power multiplier.
    pub torpedo_multiplier: i32,
    /// Who gets the engine-shield bonus.
    pub esb: EsbEligibility,
    /// Whether survivors earn scores.
    pub awards_scores: bool,
    tuning: fn(&HostConfig, &Object) -> SideTuning,
}

impl VariantRules {
    /// Resolve the tuning of one side.
    #[must_use]
    pub fn tune(&self, config: &HostConfig, unit: &Object) -> SideTuning {
        let mut tuning = (self.tuning)(config, unit);
        tuning.shield_regeneration = if config.allow_engine_shield_bonus && self.esb.applies_to(unit) {
            config.engine_shield_bonus_rate.player(unit.owner).max(0)
        } else {
            0
        };
        tuning
    }
}

/// Host: truncating arithmetic, doubled torpedo power.
pub static HOST: VariantRules = VariantRules {
    random: RandomFamily::QuickBasic,
    torpedo_multiplier: 2,
    esb: EsbEligibility::Ships,
    awards_scores: false,
    tuning: host_tuning,
};

/// PHost 2: configurable, truncating arithmetic.
pub static PHOST2: VariantRules = VariantRules {
    random: RandomFamily::Borland,
    torpedo_multiplier: 1,
    esb: EsbEligibility::ArmedShips,
    awards_scores: true,
    tuning: phost2_tuning,
};

/// PHost 3: rounding and shield kill scaling.
pub static PHOST3: VariantRules = VariantRules {
    random: RandomFamily::Borland,
    torpedo_multiplier: 1,
    esb: EsbEligibility::ArmedShips,
    awards_scores: true,
    tuning: phost3_tuning,
};

/// PHost 4: adds experience modifiers.
pub static PHOST4: VariantRules = VariantRules {
    random: RandomFamily::Borland,
    torpedo_multiplier: 1,
    esb: EsbEligibility::ArmedShips,
    awards_scores: true,
    tuning: phost4_tuning,
};

/// NuHost: Host rules with rounding and no engine-shield bonus.
pub static NUHOST: VariantRules = VariantRules {
    random: RandomFamily::Subtractive,
    torpedo_multiplier: 2,
    esb: EsbEligibility::Never,
    awards_scores: false,
    tuning: nuhost_tuning,
};

fn host_tuning(config: &HostConfig, unit: &Object) -> SideTuning {
    configured_tuning(config, unit, Rounding::Truncate, false, false)
}

fn nuhost_tuning(config: &HostConfig, unit: &Object) -> SideTuning {
    configured_tuning(config, unit, Rounding::Nearest, false, false)
}

fn phost2_tuning(config: &HostConfig, unit: &Object) -> SideTuning {
    configured_tuning(config, unit, Rounding::Truncate, false, false)
}

fn phost3_tuning(config: &HostConfig, unit: &Object) -> SideTuning {
    configured_tuning(config, unit, Rounding::Nearest, true, false)
}

fn phost4_tuning(config: &HostConfig, unit: &Object) -> SideTuning {
    configured_tuning(config, unit, Rounding::Nearest, true, true)
}

fn configured_tuning(
    config: &HostConfig,
    unit: &Object,
    rounding: Rounding,
    shield_kill: bool,
    experience: bool,
) -> SideTuning {
    let owner = unit.owner;
    let level = if experience {
        config.effective_level(unit.experience_level)
    } else {
        0
    };
    let emod = |array: &LevelArray| if experience { array.level(level) } else { 0 };

    SideTuning {
        beam_recharge: Recharge {
            base: config.beam_recharge_rate.player(owner) + emod(&config.emod_beam_recharge_rate),
            jitter: config.beam_recharge_bonus.player(owner) + 1,
        },
        tube_recharge: Recharge {
            base: config.tube_recharge_rate.player(owner) + emod(&config.emod_tube_recharge_rate),
            jitter: config.tube_recharge_bonus.player(owner) + 1,
        },
        bay_recharge: Recharge {
            base: config.bay_recharge_rate.player(owner) + emod(&config.emod_bay_recharge_rate),
            jitter: config.bay_recharge_bonus.player(owner) + 1,
        },
        beam_hit_odds: config.beam_hit_odds.player(owner) + emod(&config.emod_beam_hit_odds),
        beam_hit_bonus: config.beam_hit_bonus.player(owner),
        torp_hit_odds: config.torp_hit_odds.player(owner) + emod(&config.emod_torp_hit_odds),
        torp_hit_bonus: config.torp_hit_bonus.player(owner),
        beam_ship_charge: config.beam_hit_ship_charge.player(owner),
        beam_fighter_charge: config.beam_hit_fighter_charge.player(owner),
        launch_interval: config.bay_launch_interval.player(owner),
        strikes_per_fighter: config.strikes_per_fighter.player(owner),
        max_fighters_launched: config.max_fighters_launched.player(owner),
        fighter_explosive: config.fighter_beam_explosive.player(owner),
        fighter_kill: config.fighter_beam_kill.player(owner),
        scaling: HitScaling {
            shield_damage: config.shield_damage_scaling.player(owner),
            shield_kill: if shield_kill {
                config.shield_kill_scaling.player(owner)
            } else {
                0
            },
            hull_damage: config.hull_damage_scaling.player(owner),
            crew_kill: config.crew_kill_scaling.player(owner) + emod(&config.emod_crew_kill_scaling),
            rounding,
        },
        shield_regeneration: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::BorlandRandom;

    #[test]
    fn test_host_reads_configuration() {
        let mut config = HostConfig::default();
        config.set_option("BeamHitOdds", "10").unwrap();
        config.set_option("BeamRechargeRate", "3").unwrap();
        let unit = Object::ship(1, 1, "A").with_experience(3);
        let tuning = HOST.tune(&config, &unit);
        assert_eq!(tuning.beam_hit_odds, 10);
        assert_eq!(tuning.beam_recharge.base, 3);
        assert_eq!(tuning.scaling.rounding, Rounding::Truncate);
        assert_eq!(tuning.scaling.shield_kill, 0);

        let nuhost = NUHOST.tune(&config, &unit);
        assert_eq!(nuhost.beam_hit_odds, 10);
        assert_eq!(nuhost.scaling.rounding, Rounding::Nearest);
    }

    #[test]
    fn test_phost_reads_configuration() {
        let mut config = HostConfig::default();
        config.set_option("BeamHitOdds", "10,20,30").unwrap();
        let unit = Object::ship(1, 2, "A");
        assert_eq!(PHOST2.tune(&config, &unit).beam_hit_odds, 20);
        assert_eq!(PHOST2.tune(&config, &unit).scaling.rounding, Rounding::Truncate);
        assert_eq!(PHOST3.tune(&config, &unit).scaling.rounding, Rounding::Nearest);
    }

    #[test]
    fn test_experience_only_in_phost4() {
        let mut config = HostConfig::default();
        config.set_option("EModBeamHitOdds", "0,5,10,15,20").unwrap();
        let veteran = Object::ship(1, 1, "A").with_experience(2);
        let base = config.beam_hit_odds.player(1);
        assert_eq!(PHOST3.tune(&config, &veteran).beam_hit_odds, base);
        assert_eq!(PHOST4.tune(&config, &veteran).beam_hit_odds, base + 10);
    }

    #[test]
    fn test_esb_eligibility() {
        let mut config = HostConfig::default();
        config.allow_engine_shield_bonus = true;
        config.set_option("EngineShieldBonusRate", "5").unwrap();
        let unarmed = Object::ship(1, 1, "A");
        let planet = Object::planet(2, 1, "P");
        assert_eq!(HOST.tune(&config, &unarmed).shield_regeneration, 5);
        assert_eq!(HOST.tune(&config, &planet).shield_regeneration, 0);
        assert_eq!(PHOST4.tune(&config, &unarmed).shield_regeneration, 0);
        assert_eq!(NUHOST.tune(&config, &unarmed).shield_regeneration, 0);

        config.allow_engine_shield_bonus = false;
        assert_eq!(HOST.tune(&config, &unarmed).shield_regeneration, 0);
    }

    #[test]
    fn test_hit_odds_clamped() {
        assert_eq!(hit_odds(90, 50, 30, 20), 100);
        assert_eq!(hit_odds(-20, 0, 0, 0), 0);
        assert_eq!(hit_odds(70, 12, 50, 50), 82);
    }

    #[test]
    fn test_recharge_without_jitter_draws_nothing() {
        let mut rng = BorlandRandom::new(7);
        let mut reference = rng.clone();
        assert_eq!(Recharge { base: 5, jitter: 0 }.roll(&mut rng), 5);
        assert_eq!(rng.next_below(100), reference.next_below(100));
    }
}
