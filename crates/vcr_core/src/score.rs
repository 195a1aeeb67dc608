//! Build-point, experience and tonnage awards for surviving units.
//!
//! Credit for a destroyed enemy is not always attributable to a single
//! unit, so every figure is a closed range: the minimum counts only the
//! enemies a unit finished off itself, the maximum also counts destroyed
//! enemies it merely damaged.

use serde::{Deserialize, Serialize};

use crate::config::HostConfig;

/// Closed integer range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreRange {
    /// Lower bound.
    pub min: i32,
    /// Upper bound.
    pub max: i32,
}

impl ScoreRange {
    /// Range with both bounds equal.
    #[must_use]
    pub const fn exact(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Range from two bounds in any order.
    #[must_use]
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Check whether the range holds a single value.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.min == self.max
    }
}

/// Awards for one surviving unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    /// Build points, in thousandths.
    pub build_millipoints: ScoreRange,
    /// Experience points.
    pub experience: ScoreRange,
    /// Enemy tonnage destroyed.
    pub tons_destroyed: ScoreRange,
}

/// What a surviving unit accomplished in one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Achievement {
    /// Owner of the unit (selects per-player options).
    pub owner: u8,
    /// Pre-battle combat mass of the unit.
    pub own_mass: i32,
    /// Mass of enemies this unit destroyed or captured itself.
    pub tons_finished: i32,
    /// Mass of destroyed enemies this unit damaged but did not finish.
    pub tons_assisted: i32,
    /// Hull damage dealt, weighted by target mass (kt-percent / 100).
    pub tons_damaged: i32,
}

/// Compute the awards for an achievement.
#[must_use]
pub fn compute_score(achievement: &Achievement, config: &HostConfig) -> Score {
    let owner = achievement.owner;
    let finished = i64::from(achievement.tons_finished.max(0));
    let assisted = i64::from(achievement.tons_assisted.max(0));
    let damaged = i64::from(achievement.tons_damaged.max(0));

    // Points per 10 kt, in millipoints: tons * points * 1000 / 10.
    let kill_points = i64::from(config.pal_aggressor_kill_points_per_10kt.player(owner)) * 100;
    let damage_points = i64::from(config.pal_aggressor_points_per_10kt.player(owner)) * 100;
    let build = |killed: i64| saturate(killed * kill_points + damaged * damage_points);

    let kill_scaling = i64::from(config.ep_combat_kill_scaling.player(owner));
    let damage_scaling = i64::from(config.ep_combat_damage_scaling.player(owner));
    let own_value = i64::from(achievement.own_mass.max(1));
    let experience =
        |killed: i64| saturate((killed * kill_scaling + damaged * damage_scaling) / own_value);

    Score {
        build_millipoints: ScoreRange::new(build(finished), build(finished + assisted)),
        experience: ScoreRange::new(experience(finished), experience(finished + assisted)),
        tons_destroyed: ScoreRange::new(saturate(finished), saturate(finished + assisted)),
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_kill() {
        let config = HostConfig::default();
        let score = compute_score(
            &Achievement {
                owner: 3,
                own_mass: 400,
                tons_finished: 200,
                tons_assisted: 0,
                tons_damaged: 0,
            },
            &config,
        );
        // 200 kt at 10 points per 10 kt = 200 points.
        assert_eq!(score.build_millipoints, ScoreRange::exact(200_000));
        // 200 * 800 / 400
        assert_eq!(score.experience, ScoreRange::exact(400));
        assert_eq!(score.tons_destroyed, ScoreRange::exact(200));
    }

    #[test]
    fn test_assist_widens_range() {
        let config = HostConfig::default();
        let score = compute_score(
            &Achievement {
                owner: 1,
                own_mass: 100,
                tons_finished: 0,
                tons_assisted: 150,
                tons_damaged: 30,
            },
            &config,
        );
        assert_eq!(score.tons_destroyed, ScoreRange::new(0, 150));
        assert_eq!(score.build_millipoints.min, 30 * 200);
        assert_eq!(score.build_millipoints.max, 150 * 1000 + 30 * 200);
        assert!(!score.experience.is_exact());
    }

    #[test]
    fn test_zero_mass_does_not_divide_by_zero() {
        let score = compute_score(
            &Achievement {
                owner: 1,
                own_mass: 0,
                tons_finished: 10,
                ..Achievement::default()
            },
            &HostConfig::default(),
        );
        assert_eq!(score.experience, ScoreRange::exact(8000));
    }

    proptest! {
        #[test]
        fn prop_build_points_monotonic_in_tonnage(
            own_mass in 1i32..5000,
            tons in 0i32..20000,
            extra in 0i32..20000,
            assisted in 0i32..20000,
            damaged in 0i32..20000,
        ) {
            let config = HostConfig::default();
            let base = Achievement { owner: 2, own_mass, tons_finished: tons, tons_assisted: assisted, tons_damaged: damaged };
            let more = Achievement { tons_finished: tons + extra, ..base };
            let a = compute_score(&base, &config);
            let b = compute_score(&more, &config);
            prop_assert!(b.build_millipoints.min >= a.build_millipoints.min);
            prop_assert!(b.build_millipoints.max >= a.build_millipoints.max);
            prop_assert!(b.experience.min >= a.experience.min);
            prop_assert!(a.build_millipoints.min <= a.build_millipoints.max);
        }
    }
}
