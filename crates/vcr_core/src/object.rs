//! Combat unit snapshots.
//!
//! An [`Object`] is the combat-relevant view of one ship or planet. Battles
//! hold one "before" snapshot per participant as input and produce one
//! "after" snapshot per participant when the complete result is computed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentCatalog;
use crate::config::MAX_PLAYERS;
use crate::error::{Result, VcrError};

/// Damage at which a unit is destroyed.
pub const DAMAGE_LIMIT: i32 = 100;

/// Highest meaningful shield level.
pub const MAX_SHIELD: i32 = 100;

/// Most beams or torpedo launchers a unit can carry.
pub const MAX_WEAPONS: i32 = 20;

/// Most fighter bays a unit can carry.
pub const MAX_BAYS: i32 = 50;

/// Combat-relevant snapshot of one ship or planet.
///
/// Counts and levels are kept as signed integers so that a corrupt record
/// can be represented and reported as damaged instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Object {
    /// Ship or planet Id.
    pub id: u16,
    /// Owning player.
    pub owner: u8,
    /// Display name.
    pub name: String,
    /// True for planets (starbases fight as planets).
    pub is_planet: bool,
    /// Hull type, 0 when unknown or for planets.
    pub hull: u16,
    /// Combat mass in kt.
    pub mass: i32,
    /// Crew aboard.
    pub crew: i32,
    /// Shield level (0-100).
    pub shield: i32,
    /// Damage level; destroyed at [`DAMAGE_LIMIT`].
    pub damage: i32,
    /// Beam type, 1-based index into the beam catalog.
    pub beam_type: i32,
    /// Number of beam weapons.
    pub num_beams: i32,
    /// Torpedo type, 1-based index into the torpedo catalog.
    pub torpedo_type: i32,
    /// Number of torpedo launchers.
    pub num_launchers: i32,
    /// Torpedoes aboard.
    pub num_torpedoes: i32,
    /// Number of fighter bays.
    pub num_bays: i32,
    /// Fighters aboard.
    pub num_fighters: i32,
    /// Experience level (0 = none).
    pub experience_level: i32,
}

impl Object {
    /// Create an unarmed ship.
    #[must_use]
    pub fn ship(id: u16, owner: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an unarmed planet.
    #[must_use]
    pub fn planet(id: u16, owner: u8, name: impl Into<String>) -> Self {
        Self {
            is_planet: true,
            ..Self::ship(id, owner, name)
        }
    }

    /// Builder method to set mass, crew and shield.
    #[must_use]
    pub fn with_hull_state(mut self, mass: i32, crew: i32, shield: i32) -> Self {
        self.mass = mass;
        self.crew = crew;
        self.shield = shield;
        self
    }

    /// Builder method to set the damage level.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    /// Builder method to set beam weapons.
    #[must_use]
    pub fn with_beams(mut self, beam_type: i32, count: i32) -> Self {
        self.beam_type = beam_type;
        self.num_beams = count;
        self
    }

    /// Builder method to set torpedo armament.
    #[must_use]
    pub fn with_torpedoes(mut self, torpedo_type: i32, launchers: i32, torpedoes: i32) -> Self {
        self.torpedo_type = torpedo_type;
        self.num_launchers = launchers;
        self.num_torpedoes = torpedoes;
        self
    }

    /// Builder method to set fighter armament.
    #[must_use]
    pub fn with_fighters(mut self, bays: i32, fighters: i32) -> Self {
        self.num_bays = bays;
        self.num_fighters = fighters;
        self
    }

    /// Builder method to set the experience level.
    #[must_use]
    pub fn with_experience(mut self, level: i32) -> Self {
        self.experience_level = level;
        self
    }

    /// Check whether this unit carries any usable weapon.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        (self.num_beams > 0 && self.beam_type > 0)
            || (self.num_launchers > 0 && self.num_torpedoes > 0 && self.torpedo_type > 0)
            || (self.num_bays > 0 && self.num_fighters > 0)
    }

    /// Check whether the damage level marks this unit destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.damage >= DAMAGE_LIMIT
    }

    /// Check whether this unit has been captured (crewless ship).
    #[must_use]
    pub fn is_crewless_ship(&self) -> bool {
        !self.is_planet && self.crew <= 0
    }

    /// Check that every stat is in range and every weapon type exists.
    ///
    /// A unit failing this check makes its battle unplayable.
    #[must_use]
    pub fn is_well_formed(&self, catalog: &ComponentCatalog) -> bool {
        let beams_ok = (0..=MAX_WEAPONS).contains(&self.num_beams)
            && (self.num_beams == 0 || catalog.beam(self.beam_type).is_some());
        let torpedoes_ok = (0..=MAX_WEAPONS).contains(&self.num_launchers)
            && self.num_torpedoes >= 0
            && (self.num_launchers == 0 || catalog.torpedo(self.torpedo_type).is_some());
        let fighters_ok = (0..=MAX_BAYS).contains(&self.num_bays) && self.num_fighters >= 0;

        (1..=MAX_PLAYERS).contains(&usize::from(self.owner))
            && self.mass > 0
            && self.crew >= 0
            && (0..=MAX_SHIELD).contains(&self.shield)
            && (0..DAMAGE_LIMIT).contains(&self.damage)
            && self.experience_level >= 0
            && beams_ok
            && torpedoes_ok
            && fighters_ok
    }
}

/// Compute a stable digest over a set of snapshots.
///
/// Serializes with `bincode` so that two results compare equal exactly when
/// every field of every snapshot matches.
pub fn snapshot_digest(objects: &[Object]) -> Result<u64> {
    let bytes =
        bincode::serialize(objects).map_err(|e| VcrError::SerializationError(e.to_string()))?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Ok(hasher.finish())
}
