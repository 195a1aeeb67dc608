//! Component catalog: weapon and hull definitions.
//!
//! Units reference weapons by 1-based type number. The catalog is loaded
//! once and borrowed read-only by every battle.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VcrError};

/// Kill and damage power of one beam or torpedo type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Display name.
    pub name: String,
    /// Crew-killing power.
    pub kill_power: i32,
    /// Explosive (shield/hull) power.
    pub damage_power: i32,
}

impl WeaponSpec {
    /// Create a weapon definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kill_power: i32, damage_power: i32) -> Self {
        Self {
            name: name.into(),
            kill_power,
            damage_power,
        }
    }
}

/// Hull limits used to sanity-check unit snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HullSpec {
    /// Display name.
    pub name: String,
    /// Empty hull mass in kt.
    pub mass: i32,
    /// Maximum crew.
    pub max_crew: i32,
    /// Beam mounts.
    pub max_beams: i32,
    /// Torpedo launcher mounts.
    pub max_launchers: i32,
    /// Fighter bays.
    pub num_bays: i32,
}

/// All weapon and hull definitions of a game.
///
/// # Example RON
///
/// ```ron
/// ComponentCatalog(
///     beams: [(name: "Laser", kill_power: 10, damage_power: 3)],
///     torpedoes: [(name: "Mark 1 Photon", kill_power: 4, damage_power: 5)],
///     hulls: [],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCatalog {
    /// Beam types; type `n` is at index `n - 1`.
    #[serde(default)]
    pub beams: Vec<WeaponSpec>,
    /// Torpedo types; type `n` is at index `n - 1`.
    #[serde(default)]
    pub torpedoes: Vec<WeaponSpec>,
    /// Hull types; hull `n` is at index `n - 1`.
    #[serde(default)]
    pub hulls: Vec<HullSpec>,
}

impl ComponentCatalog {
    /// Parse a catalog from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| VcrError::DataParseError {
            what: "component catalog",
            message: e.to_string(),
        })
    }

    /// Look up a beam type (1-based).
    #[must_use]
    pub fn beam(&self, beam_type: i32) -> Option<&WeaponSpec> {
        lookup(&self.beams, beam_type)
    }

    /// Look up a torpedo type (1-based).
    #[must_use]
    pub fn torpedo(&self, torpedo_type: i32) -> Option<&WeaponSpec> {
        lookup(&self.torpedoes, torpedo_type)
    }

    /// Look up a hull (1-based).
    #[must_use]
    pub fn hull(&self, hull: u16) -> Option<&HullSpec> {
        lookup(&self.hulls, i32::from(hull))
    }
}

fn lookup<T>(items: &[T], number: i32) -> Option<&T> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    items.get(index)
}
