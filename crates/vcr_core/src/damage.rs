//! Hit resolution shared by both engines.
//!
//! Shields absorb a hit first. What gets through damages the hull, and kill
//! power thins the crew once shields are down. All divisions scale by the
//! target's mass plus one.

use serde::{Deserialize, Serialize};

use crate::object::Object;

/// How a scaled quotient is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round toward zero.
    Truncate,
    /// Round half up.
    Nearest,
}

impl Rounding {
    /// `numerator / denominator` under this rounding (denominator > 0).
    #[must_use]
    pub fn divide(self, numerator: i64, denominator: i64) -> i64 {
        match self {
            Rounding::Truncate => numerator / denominator,
            Rounding::Nearest => (2 * numerator + denominator) / (2 * denominator),
        }
    }
}

/// Scaling factors applied when a unit is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitScaling {
    /// Shield damage per explosive point.
    pub shield_damage: i32,
    /// Shield damage per kill point.
    pub shield_kill: i32,
    /// Hull damage per explosive point.
    pub hull_damage: i32,
    /// Crew killed per kill point.
    pub crew_kill: i32,
    /// Rounding of every scaled value.
    pub rounding: Rounding,
}

impl HitScaling {
    fn scale(&self, power: i32, scaling: i32, mass: i32) -> i32 {
        let numerator = i64::from(power.max(0)) * i64::from(scaling.max(0));
        let denominator = i64::from(mass.max(0)) + 1;
        self.rounding.divide(numerator, denominator) as i32
    }
}

/// Apply one hit of `explosive` and `kill` power to `unit`.
///
/// Returns true if anything reached the hull or crew.
pub fn apply_hit(unit: &mut Object, explosive: i32, kill: i32, scaling: &HitScaling) -> bool {
    let mass = unit.mass;
    let mut explosive = explosive.max(0);
    let mut kill = kill.max(0);
    if explosive == 0 && kill == 0 {
        return false;
    }

    if unit.shield > 0 {
        let shield_damage = scaling.scale(explosive, scaling.shield_damage, mass)
            + scaling.scale(kill, scaling.shield_kill, mass)
            + 1;
        if shield_damage <= unit.shield {
            unit.shield -= shield_damage;
            return false;
        }

        // Only the part not absorbed by the shield continues.
        let rest = i64::from(shield_damage - unit.shield);
        let total = i64::from(shield_damage);
        explosive = (i64::from(explosive) * rest / total) as i32;
        kill = (i64::from(kill) * rest / total) as i32;
        unit.shield = 0;
    }

    if explosive > 0 {
        unit.damage += scaling.scale(explosive, scaling.hull_damage, mass) + 1;
    }
    if !unit.is_planet && kill > 0 {
        unit.crew = (unit.crew - scaling.scale(kill, scaling.crew_kill, mass)).max(0);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: HitScaling = HitScaling {
        shield_damage: 80,
        shield_kill: 0,
        hull_damage: 80,
        crew_kill: 80,
        rounding: Rounding::Truncate,
    };

    #[test]
    fn test_rounding() {
        assert_eq!(Rounding::Truncate.divide(29, 10), 2);
        assert_eq!(Rounding::Nearest.divide(29, 10), 3);
        assert_eq!(Rounding::Nearest.divide(25, 10), 3);
        assert_eq!(Rounding::Nearest.divide(24, 10), 2);
    }

    #[test]
    fn test_shield_absorbs() {
        let mut unit = Object::ship(1, 1, "A").with_hull_state(150, 2, 100);
        // 20 * 80 / 151 = 10, plus 1
        assert!(!apply_hit(&mut unit, 20, 30, &HOST));
        assert_eq!(unit.shield, 89);
        assert_eq!(unit.damage, 0);
        assert_eq!(unit.crew, 2);
    }

    #[test]
    fn test_breakthrough_hurts_hull_and_crew() {
        let mut unit = Object::ship(1, 1, "A").with_hull_state(150, 240, 0);
        assert!(apply_hit(&mut unit, 20, 30, &HOST));
        assert_eq!(unit.damage, 11);
        assert_eq!(unit.crew, 240 - 15);
    }

    #[test]
    fn test_partial_breakthrough() {
        let mut unit = Object::ship(1, 1, "A").with_hull_state(150, 100, 5);
        // Shield damage 11 against 5 remaining: 6/11 of the hit continues.
        assert!(apply_hit(&mut unit, 20, 30, &HOST));
        assert_eq!(unit.shield, 0);
        // explosive 20*6/11 = 10 → 10*80/151 = 5, plus 1
        assert_eq!(unit.damage, 6);
        // kill 30*6/11 = 16 → 16*80/151 = 8
        assert_eq!(unit.crew, 92);
    }

    #[test]
    fn test_planet_crew_untouched() {
        let mut planet = Object::planet(1, 1, "P").with_hull_state(200, 0, 0);
        apply_hit(&mut planet, 30, 30, &HOST);
        assert_eq!(planet.crew, 0);
        assert!(planet.damage > 0);
    }

    #[test]
    fn test_crew_floor_at_zero() {
        let mut unit = Object::ship(1, 1, "A").with_hull_state(10, 2, 0);
        apply_hit(&mut unit, 0, 50, &HOST);
        assert_eq!(unit.crew, 0);
        assert_eq!(unit.damage, 0);
    }
}
