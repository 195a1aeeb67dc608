//! Combat events and per-unit statistics.
//!
//! Engines report everything that happens during a tick to an
//! [`EventSink`]. The quick tier discards events, the complete tier feeds
//! them into a [`StatisticsCollector`], and a viewer can replay a battle
//! into a `Vec` to step through it tick by tick.

use serde::{Deserialize, Serialize};

use crate::object::Object;

/// Something a weapon was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// A unit, by slot.
    Unit(usize),
    /// An airborne fighter, by the slot of its carrier.
    Fighter(usize),
}

/// One thing that happened during a battle tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A beam discharged.
    BeamFired {
        /// Firing unit.
        from: usize,
        /// Beam index on the firing unit.
        beam: usize,
        /// What it was aimed at.
        target: Target,
        /// Whether it hit.
        hit: bool,
    },
    /// A torpedo was launched.
    TorpedoFired {
        /// Firing unit.
        from: usize,
        /// Target unit.
        to: usize,
        /// Whether it hit.
        hit: bool,
    },
    /// A fighter left its bay.
    FighterLaunched {
        /// Carrier.
        from: usize,
    },
    /// A fighter made an attack run.
    FighterStrike {
        /// Carrier of the striking fighter.
        from: usize,
        /// Target unit.
        to: usize,
        /// Whether it hit.
        hit: bool,
    },
    /// A fighter docked with its carrier again.
    FighterLanded {
        /// Carrier.
        at: usize,
    },
    /// A fighter was shot down or lost its carrier.
    FighterLost {
        /// Carrier.
        from: usize,
    },
    /// A unit took a hit.
    UnitHit {
        /// Unit hit.
        slot: usize,
        /// Shield after the hit.
        shield: i32,
        /// Damage after the hit.
        damage: i32,
        /// Crew after the hit.
        crew: i32,
    },
    /// A unit was destroyed.
    UnitDestroyed {
        /// Unit destroyed.
        slot: usize,
    },
    /// A unit lost its crew and changed hands.
    UnitCaptured {
        /// Unit captured.
        slot: usize,
        /// New owner.
        by: u8,
    },
}

/// Receiver of combat events.
pub trait EventSink {
    /// Record one event at the given tick.
    fn record(&mut self, tick: u32, event: CombatEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _tick: u32, _event: CombatEvent) {}
}

/// Event log for tick-by-tick playback.
impl EventSink for Vec<(u32, CombatEvent)> {
    fn record(&mut self, tick: u32, event: CombatEvent) {
        self.push((tick, event));
    }
}

/// Per-unit battle statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Statistic {
    /// Most fighters airborne at the same time.
    pub max_fighters_launched: i32,
    /// Fewest fighters aboard at any time.
    pub min_fighters_aboard: i32,
    /// Torpedo hits scored.
    pub num_torpedo_hits: i32,
    /// Number of battles merged into this record.
    pub num_fights: i32,
}

impl Statistic {
    /// Fresh statistic for a unit about to fight.
    #[must_use]
    pub fn for_unit(unit: &Object) -> Self {
        Self {
            max_fighters_launched: 0,
            min_fighters_aboard: unit.num_fighters,
            num_torpedo_hits: 0,
            num_fights: 1,
        }
    }

    /// Combine with the statistic of a later battle of the same unit.
    pub fn merge(&mut self, other: &Statistic) {
        self.max_fighters_launched = self.max_fighters_launched.max(other.max_fighters_launched);
        self.min_fighters_aboard = self.min_fighters_aboard.min(other.min_fighters_aboard);
        self.num_torpedo_hits += other.num_torpedo_hits;
        self.num_fights += other.num_fights;
    }
}

/// Builds [`Statistic`] records from the event stream.
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    stats: Vec<Statistic>,
    aboard: Vec<i32>,
    airborne: Vec<i32>,
}

impl StatisticsCollector {
    /// Start collecting for the given participants.
    #[must_use]
    pub fn new(units: &[Object]) -> Self {
        Self {
            stats: units.iter().map(Statistic::for_unit).collect(),
            aboard: units.iter().map(|u| u.num_fighters).collect(),
            airborne: vec![0; units.len()],
        }
    }

    /// Finished statistics by slot.
    #[must_use]
    pub fn finish(self) -> Vec<Statistic> {
        self.stats
    }
}

impl EventSink for StatisticsCollector {
    fn record(&mut self, _tick: u32, event: CombatEvent) {
        match event {
            CombatEvent::TorpedoFired {
                from, hit: true, ..
            } => {
                if let Some(stat) = self.stats.get_mut(from) {
                    stat.num_torpedo_hits += 1;
                }
            }
            CombatEvent::FighterLaunched { from } => {
                if let (Some(stat), Some(aboard), Some(airborne)) = (
                    self.stats.get_mut(from),
                    self.aboard.get_mut(from),
                    self.airborne.get_mut(from),
                ) {
                    *aboard -= 1;
                    *airborne += 1;
                    stat.min_fighters_aboard = stat.min_fighters_aboard.min(*aboard);
                    stat.max_fighters_launched = stat.max_fighters_launched.max(*airborne);
                }
            }
            CombatEvent::FighterLanded { at } => {
                if let (Some(aboard), Some(airborne)) =
                    (self.aboard.get_mut(at), self.airborne.get_mut(at))
                {
                    *aboard += 1;
                    *airborne -= 1;
                }
            }
            CombatEvent::FighterLost { from } => {
                if let Some(airborne) = self.airborne.get_mut(from) {
                    *airborne -= 1;
                }
            }
            _ => {}
        }
    }
}
