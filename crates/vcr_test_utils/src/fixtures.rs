//! Standard catalog and battle fixtures.
//!
//! The catalog mirrors the classic ten beam and ten torpedo types, so that
//! fixtures and scenario files can refer to weapons by their usual numbers.

use vcr_core::catalog::{ComponentCatalog, HullSpec, WeaponSpec};
use vcr_core::classic::{ClassicBattle, Variant};
use vcr_core::config::{HostConfig, PlayerArray};
use vcr_core::flak::{FlakBattle, GroupInfo};
use vcr_core::object::Object;

/// Beam type numbers in [`standard_catalog`].
pub mod beams {
    /// Laser.
    pub const LASER: i32 = 1;
    /// X-Ray Laser.
    pub const X_RAY_LASER: i32 = 2;
    /// Plasma Bolt.
    pub const PLASMA_BOLT: i32 = 3;
    /// Blaster.
    pub const BLASTER: i32 = 4;
    /// Disruptor.
    pub const DISRUPTOR: i32 = 6;
    /// Heavy Phaser.
    pub const HEAVY_PHASER: i32 = 10;
}

/// Torpedo type numbers in [`standard_catalog`].
pub mod torpedoes {
    /// Mark 1 Photon.
    pub const MARK_1: i32 = 1;
    /// Mark 4 Photon.
    pub const MARK_4: i32 = 6;
    /// Mark 7 Photon.
    pub const MARK_7: i32 = 9;
    /// Mark 8 Photon.
    pub const MARK_8: i32 = 10;
}

/// The classic ten beams, ten torpedoes and a few hulls.
pub fn standard_catalog() -> ComponentCatalog {
    let weapons = |list: &[(&str, i32, i32)]| {
        list.iter()
            .map(|&(name, kill, damage)| WeaponSpec::new(name, kill, damage))
            .collect()
    };
    ComponentCatalog {
        beams: weapons(&[
            ("Laser", 10, 3),
            ("X-Ray Laser", 15, 1),
            ("Plasma Bolt", 3, 10),
            ("Blaster", 10, 25),
            ("Positron Beam", 9, 29),
            ("Disruptor", 30, 20),
            ("Heavy Blaster", 20, 40),
            ("Phaser", 35, 30),
            ("Heavy Disruptor", 45, 35),
            ("Heavy Phaser", 35, 45),
        ]),
        torpedoes: weapons(&[
            ("Mark 1 Photon", 4, 5),
            ("Proton torp", 6, 8),
            ("Mark 2 Photon", 3, 10),
            ("Gamma Bomb", 15, 2),
            ("Mark 3 Photon", 9, 15),
            ("Mark 4 Photon", 13, 30),
            ("Mark 5 Photon", 17, 35),
            ("Mark 6 Photon", 23, 40),
            ("Mark 7 Photon", 25, 48),
            ("Mark 8 Photon", 35, 55),
        ]),
        hulls: vec![
            HullSpec {
                name: "Small Deep Space Freighter".to_string(),
                mass: 30,
                max_crew: 2,
                max_beams: 0,
                max_launchers: 0,
                num_bays: 0,
            },
            HullSpec {
                name: "Lizard Class Cruiser".to_string(),
                mass: 233,
                max_crew: 240,
                max_beams: 4,
                max_launchers: 0,
                num_bays: 0,
            },
            HullSpec {
                name: "Gorbie Class Battlecarrier".to_string(),
                mass: 980,
                max_crew: 2287,
                max_beams: 10,
                max_launchers: 0,
                num_bays: 10,
            },
        ],
    }
}

/// Default rules options.
pub fn standard_config() -> HostConfig {
    HostConfig::default()
}

/// Unarmed scout (150 kt, 2 crew, full shields) for player 3.
pub fn scout() -> Object {
    Object::ship(101, 3, "Scout").with_hull_state(150, 2, 100)
}

/// Cruiser (233 kt, 240 crew, full shields, four Heavy Phasers) for player 7.
pub fn cruiser() -> Object {
    Object::ship(202, 7, "Cruiser")
        .with_hull_state(233, 240, 100)
        .with_beams(beams::HEAVY_PHASER, 4)
}

/// A Host battle in which the scout is boarded by the cruiser.
pub fn scenario_a() -> ClassicBattle {
    ClassicBattle::new(scout(), cruiser(), 42, Variant::Host)
}

/// Rules options for the fleet fixture: torpedoes always hit.
pub fn fleet_config() -> HostConfig {
    let mut config = HostConfig::default();
    config.torp_hit_odds = PlayerArray::uniform(100);
    config
}

/// Warship for fleet tests.
pub fn fleet_warship(id: u16, owner: u8) -> Object {
    Object::ship(id, owner, format!("Warship {id}"))
        .with_hull_state(200, 300, 100)
        .with_beams(beams::BLASTER, 6)
}

/// Unarmed freighter for fleet tests.
pub fn fleet_freighter(id: u16, owner: u8) -> Object {
    Object::ship(id, owner, format!("Freighter {id}")).with_hull_state(120, 1200, 40)
}

fn torpedo_boat(id: u16, owner: u8, torpedo_type: i32, torpedoes: i32) -> Object {
    Object::ship(id, owner, format!("Torpedo boat {id}"))
        .with_hull_state(79, 100, 0)
        .with_torpedoes(torpedo_type, 1, torpedoes)
}

/// Eight units in four groups, played under [`fleet_config`].
///
/// Player 1 holds groups 0 (slots 0-1) and 1 (slots 2-3), player 2 holds
/// groups 2 (slots 4-6) and 3 (slot 7). Each group faces an enemy group
/// 2000 m away. Slot 1 carries the only long supply of torpedoes, so
/// player 1 wins after losing slot 2; slot 0 keeps 35 shield points.
pub fn scenario_b() -> FlakBattle {
    let objects = vec![
        Object::ship(1, 1, "Tender").with_hull_state(68, 50, 100),
        Object::ship(2, 1, "Destroyer")
            .with_hull_state(150, 180, 100)
            .with_torpedoes(torpedoes::MARK_8, 1, 8),
        Object::ship(3, 1, "Transport").with_hull_state(79, 100, 0),
        Object::ship(4, 1, "Tug").with_hull_state(60, 20, 100),
        torpedo_boat(5, 2, torpedoes::MARK_8, 1),
        torpedo_boat(6, 2, torpedoes::MARK_7, 1),
        Object::ship(7, 2, "Collier").with_hull_state(79, 100, 0),
        Object::ship(8, 2, "Raider")
            .with_hull_state(79, 200, 11)
            .with_torpedoes(torpedoes::MARK_8, 1, 1),
    ];
    let groups = vec![
        GroupInfo::new(0, 2, 1).with_position(0, 0).with_speed(90),
        GroupInfo::new(2, 2, 1).with_position(0, 20_000).with_speed(90),
        GroupInfo::new(4, 3, 2).with_position(2000, 20_000).with_speed(70),
        GroupInfo::new(7, 1, 2).with_position(2000, 0).with_speed(70),
    ];
    // Fixture is a valid partition by construction.
    FlakBattle::new(objects, groups, 31_337)
        .unwrap_or_else(|e| panic!("fleet fixture rejected: {e}"))
}
