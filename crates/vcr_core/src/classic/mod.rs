//! One-on-one battles.
//!
//! A [`ClassicBattle`] pits a left unit against a right unit under one of
//! several historical rules variants. The variant is fixed at construction
//! and selects an immutable [`rules::VariantRules`] table; the tick loop is
//! shared by all of them.
//!
//! # Example
//!
//! ```
//! use vcr_core::prelude::*;
//!
//! let catalog = ComponentCatalog {
//!     beams: vec![WeaponSpec::new("Heavy Phaser", 35, 45)],
//!     ..ComponentCatalog::default()
//! };
//! let config = HostConfig::default();
//! let ctx = BattleContext::new(&config, &catalog);
//!
//! let left = Object::ship(1, 1, "Scout").with_hull_state(150, 2, 100);
//! let right = Object::ship(2, 2, "Cruiser")
//!     .with_hull_state(233, 240, 100)
//!     .with_beams(1, 4);
//! let battle = ClassicBattle::new(left, right, 42, Variant::Host);
//!
//! assert_eq!(battle.playability(&ctx), Playability::IsPlayable);
//! assert_eq!(battle.outcome(&ctx, 0), 2);
//! ```

mod algorithm;
pub mod rules;

use serde::{Deserialize, Serialize};

pub use self::algorithm::INITIAL_DISTANCE;
use self::rules::VariantRules;
use crate::battle::{report_playability, Battle, BattleContext};
use crate::cache::{BattleCache, CompleteOutcome, QuickOutcome};
use crate::events::{EventSink, NullSink, Statistic, StatisticsCollector};
use crate::object::{Object, DAMAGE_LIMIT};
use crate::score::{compute_score, Achievement, Score};
use crate::types::{AuxInfo, BattleResult, Playability, ResultLevel, Side};

/// Capability bit: death-ray weapons in the record.
pub const CAPABILITY_DEATH_RAY: i32 = 1;
/// Capability bit: experience levels in the record.
pub const CAPABILITY_EXPERIENCE: i32 = 2;
/// Capability bit: extended beam configuration in the record.
pub const CAPABILITY_BEAMS: i32 = 4;

const SUPPORTED_CAPABILITIES: i32 = CAPABILITY_DEATH_RAY | CAPABILITY_EXPERIENCE | CAPABILITY_BEAMS;

/// Rules variant a classic battle is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Recognized record of an unknown host; not played.
    Unknown,
    /// Host.
    Host,
    /// PHost 2.
    PHost2,
    /// PHost 3.
    PHost3,
    /// PHost 4.
    PHost4,
    /// PHost of unknown version; played with the newest PHost rules.
    UnknownPHost,
    /// NuHost.
    NuHost,
}

impl Variant {
    /// Every variant.
    pub const ALL: [Variant; 7] = [
        Variant::Unknown,
        Variant::Host,
        Variant::PHost2,
        Variant::PHost3,
        Variant::PHost4,
        Variant::UnknownPHost,
        Variant::NuHost,
    ];

    /// Check whether this is one of the PHost variants.
    #[must_use]
    pub const fn is_phost(self) -> bool {
        matches!(
            self,
            Variant::PHost2 | Variant::PHost3 | Variant::PHost4 | Variant::UnknownPHost
        )
    }

    /// Rules table, or `None` if battles of this variant are not played.
    #[must_use]
    pub fn rules(self) -> Option<&'static VariantRules> {
        match self {
            Variant::Unknown => None,
            Variant::Host => Some(&rules::HOST),
            Variant::PHost2 => Some(&rules::PHOST2),
            Variant::PHost3 => Some(&rules::PHOST3),
            Variant::PHost4 | Variant::UnknownPHost => Some(&rules::PHOST4),
            Variant::NuHost => Some(&rules::NUHOST),
        }
    }

    /// Display name of the combat algorithm.
    #[must_use]
    pub const fn algorithm_name(self) -> &'static str {
        match self {
            Variant::Unknown => "Unknown",
            Variant::Host => "Host",
            Variant::PHost2 => "PHost 2",
            Variant::PHost3 => "PHost 3",
            Variant::PHost4 => "PHost 4",
            Variant::UnknownPHost => "PHost",
            Variant::NuHost => "NuHost",
        }
    }
}

/// Complete result of a classic battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicResult {
    /// "After" snapshots, left then right.
    pub after: [Object; 2],
    /// Terminal flags.
    pub result: BattleResult,
    /// Statistics, left then right.
    pub statistics: Vec<Statistic>,
    /// Ticks played.
    pub ticks: u32,
}

impl CompleteOutcome for ClassicResult {
    fn quick_outcome(&self) -> QuickOutcome {
        outcome_of(&self.after, self.result)
    }
}

fn outcome_of(after: &[Object; 2], result: BattleResult) -> QuickOutcome {
    let outcomes = Side::ALL
        .iter()
        .map(|&side| {
            if result.contains(BattleResult::destroyed(side)) {
                -1
            } else if result.contains(BattleResult::captured(side)) {
                i32::from(after[side.index()].owner)
            } else {
                0
            }
        })
        .collect();
    QuickOutcome { outcomes, result }
}

/// A recorded one-on-one battle.
#[derive(Debug)]
pub struct ClassicBattle {
    before: [Object; 2],
    seed: u32,
    magic: i32,
    record_type: i32,
    capabilities: i32,
    variant: Variant,
    cache: BattleCache<ClassicResult>,
}

impl ClassicBattle {
    /// Create a battle between `left` and `right`.
    #[must_use]
    pub fn new(left: Object, right: Object, seed: u32, variant: Variant) -> Self {
        Self {
            before: [left, right],
            seed,
            magic: 0,
            record_type: 0,
            capabilities: 0,
            variant,
            cache: BattleCache::default(),
        }
    }

    /// Builder method to set the record signature and type word.
    #[must_use]
    pub fn with_signature(mut self, magic: i32, record_type: i32) -> Self {
        self.magic = magic;
        self.record_type = record_type;
        self
    }

    /// Builder method to set the capability flags.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: i32) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Rules variant.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Complete result, if computed.
    #[must_use]
    pub fn result(&self) -> Option<&ClassicResult> {
        self.cache.complete()
    }

    /// Play the battle again, streaming every event into `sink`.
    ///
    /// Does not touch the caches. Returns `None` for unplayable battles.
    pub fn replay(&self, ctx: &BattleContext<'_>, sink: &mut impl EventSink) -> Option<BattleResult> {
        let rules = self.playable_rules(ctx)?;
        Some(algorithm::play(ctx, rules, &self.before, self.seed, sink).result)
    }

    fn playable_rules(&self, ctx: &BattleContext<'_>) -> Option<&'static VariantRules> {
        if self.playability(ctx) == Playability::IsPlayable {
            self.variant.rules()
        } else {
            None
        }
    }

    fn classify(&self, ctx: &BattleContext<'_>) -> Playability {
        if self.variant.rules().is_none() || self.capabilities & !SUPPORTED_CAPABILITIES != 0 {
            Playability::IsNotSupported
        } else if self.before.iter().all(|unit| unit.is_well_formed(ctx.catalog)) {
            Playability::IsPlayable
        } else {
            Playability::IsDamaged
        }
    }
}

impl Battle for ClassicBattle {
    fn num_objects(&self) -> usize {
        self.before.len()
    }

    fn object(&self, slot: usize, after: bool) -> Option<&Object> {
        let before = self.before.get(slot)?;
        if after {
            if let Some(complete) = self.cache.complete() {
                return complete.after.get(slot);
            }
        }
        Some(before)
    }

    fn playability(&self, ctx: &BattleContext<'_>) -> Playability {
        self.cache
            .playability(|| report_playability("classic", self.classify(ctx)))
    }

    fn prepare_result(&self, ctx: &BattleContext<'_>, level: ResultLevel) {
        let Some(rules) = self.playable_rules(ctx) else {
            return;
        };
        self.cache.prepare(
            level,
            || {
                let fight = algorithm::play(ctx, rules, &self.before, self.seed, &mut NullSink);
                outcome_of(&fight.after, fight.result)
            },
            || {
                let mut collector = StatisticsCollector::new(&self.before);
                let fight = algorithm::play(ctx, rules, &self.before, self.seed, &mut collector);
                ClassicResult {
                    after: fight.after,
                    result: fight.result,
                    statistics: collector.finish(),
                    ticks: fight.ticks,
                }
            },
        );
    }

    fn battle_result(&self) -> Option<BattleResult> {
        self.cache.quick().map(|quick| quick.result)
    }

    fn outcome(&self, ctx: &BattleContext<'_>, slot: usize) -> i32 {
        if slot >= self.before.len() {
            return 0;
        }
        self.prepare_result(ctx, ResultLevel::QUICK_OUTCOME);
        self.cache
            .quick()
            .and_then(|quick| quick.outcomes.get(slot).copied())
            .unwrap_or(0)
    }

    fn auxiliary_information(&self, key: AuxInfo) -> Option<i32> {
        match key {
            AuxInfo::Seed => Some(self.seed as i32),
            AuxInfo::Magic => Some(self.magic),
            AuxInfo::Type => Some(self.record_type),
            AuxInfo::Flags => Some(self.capabilities),
            AuxInfo::Ambient => None,
        }
    }

    fn algorithm_name(&self) -> &'static str {
        self.variant.algorithm_name()
    }

    fn is_esb_active(&self, ctx: &BattleContext<'_>) -> bool {
        ctx.config.allow_engine_shield_bonus
            && self.variant.rules().is_some_and(|rules| {
                self.before.iter().any(|unit| {
                    rules.esb.applies_to(unit)
                        && ctx.config.engine_shield_bonus_rate.player(unit.owner) > 0
                })
            })
    }

    fn statistic(&self, slot: usize) -> Option<&Statistic> {
        self.cache.complete()?.statistics.get(slot)
    }

    fn compute_scores(&self, ctx: &BattleContext<'_>, slot: usize) -> Option<Score> {
        let side = Side::from_index(slot)?;
        if !self.variant.rules()?.awards_scores {
            return None;
        }
        self.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);
        let complete = self.cache.complete()?;
        let outcomes = complete.quick_outcome().outcomes;

        let enemy = side.flip().index();
        if outcomes[slot] != 0 || outcomes[enemy] == 0 {
            return None;
        }

        let unit = &self.before[slot];
        let victim = &self.before[enemy];
        let damage_dealt = (complete.after[enemy].damage.min(DAMAGE_LIMIT) - victim.damage).max(0);
        let achievement = Achievement {
            owner: unit.owner,
            own_mass: unit.mass,
            tons_finished: victim.mass,
            tons_assisted: 0,
            tons_damaged: damage_dealt * victim.mass / 100,
        };
        Some(compute_score(&achievement, ctx.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComponentCatalog, WeaponSpec};
    use crate::config::HostConfig;
    use crate::events::CombatEvent;
    use crate::random::RandomTable;
    use proptest::prelude::*;

    fn catalog() -> ComponentCatalog {
        ComponentCatalog {
            beams: vec![
                WeaponSpec::new("Laser", 10, 3),
                WeaponSpec::new("Heavy Phaser", 35, 45),
            ],
            torpedoes: vec![WeaponSpec::new("Mark 4 Photon", 20, 35)],
            hulls: Vec::new(),
        }
    }

    fn scout() -> Object {
        Object::ship(10, 3, "Scout").with_hull_state(150, 2, 100)
    }

    fn cruiser() -> Object {
        Object::ship(20, 7, "Cruiser")
            .with_hull_state(233, 240, 100)
            .with_beams(2, 4)
    }

    #[test]
    fn test_unarmed_scout_is_captured() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = ClassicBattle::new(scout(), cruiser(), 42, Variant::Host);

        assert_eq!(battle.outcome(&ctx, 0), 7);
        assert_eq!(battle.outcome(&ctx, 1), 0);
        assert_eq!(battle.battle_result(), Some(BattleResult::LEFT_CAPTURED));

        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        let after = battle.object(0, true).unwrap();
        assert_eq!(after.crew, 0);
        assert_eq!(after.owner, 7);
        assert!(!after.is_destroyed());
        assert_eq!(battle.object(1, true).unwrap().damage, 0);
    }

    #[test]
    fn test_failed_boarding_scuttles() {
        let mut config = HostConfig::default();
        config.set_option("CaptureOdds", "0").unwrap();
        let catalog = catalog();
        let ctx = BattleContext::new(&config, &catalog);
        let battle = ClassicBattle::new(scout(), cruiser(), 42, Variant::Host);

        assert_eq!(battle.outcome(&ctx, 0), -1);
        assert_eq!(battle.battle_result(), Some(BattleResult::LEFT_DESTROYED));
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        let after = battle.object(0, true).unwrap();
        assert_eq!(after.crew, 0);
        assert!(after.is_destroyed());
        assert_eq!(after.owner, 3);
    }

    #[test]
    fn test_random_table_drives_host_rolls() {
        let mut config = HostConfig::default();
        config.classic_max_ticks = 500;
        let catalog = catalog();
        let never = RandomTable::new(vec![99]).unwrap();
        let always = RandomTable::new(vec![0]).unwrap();

        let ctx = BattleContext::new(&config, &catalog).with_random_table(&never);
        let missed = ClassicBattle::new(scout(), cruiser(), 42, Variant::Host);
        missed.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(missed.battle_result(), Some(BattleResult::TIMEOUT));
        assert_eq!(missed.object(0, true), missed.object(0, false));

        let ctx = BattleContext::new(&config, &catalog).with_random_table(&always);
        let hit = ClassicBattle::new(scout(), cruiser(), 42, Variant::Host);
        assert_eq!(hit.outcome(&ctx, 0), 7);
        assert_eq!(hit.battle_result(), Some(BattleResult::LEFT_CAPTURED));
    }

    #[test]
    fn test_deterministic_across_instances() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let left = cruiser().with_torpedoes(1, 2, 10);
        let right = Object::ship(30, 4, "Battleship")
            .with_hull_state(300, 500, 100)
            .with_beams(1, 6)
            .with_fighters(4, 20);

        for variant in [Variant::Host, Variant::PHost3, Variant::PHost4, Variant::NuHost] {
            let a = ClassicBattle::new(left.clone(), right.clone(), 1234, variant);
            let b = ClassicBattle::new(left.clone(), right.clone(), 1234, variant);
            a.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
            b.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
            assert_eq!(a.result(), b.result(), "{variant:?}");
        }
    }

    #[test]
    fn test_quick_matches_complete() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let left = cruiser().with_torpedoes(1, 3, 20);
        let right = Object::ship(30, 4, "B").with_hull_state(200, 300, 100).with_beams(1, 8);

        let quick_first = ClassicBattle::new(left.clone(), right.clone(), 77, Variant::PHost4);
        quick_first.prepare_result(&ctx, ResultLevel::QUICK_OUTCOME);
        let quick = quick_first.battle_result();
        quick_first.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

        let complete_only = ClassicBattle::new(left, right, 77, Variant::PHost4);
        complete_only.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

        assert_eq!(quick, complete_only.battle_result());
        assert_eq!(quick_first.result(), complete_only.result());
    }

    #[test]
    fn test_unarmed_pair_is_stalemate() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = ClassicBattle::new(scout(), Object { id: 11, owner: 4, ..scout() }, 5, Variant::PHost2);
        assert_eq!(battle.outcome(&ctx, 0), 0);
        assert_eq!(battle.battle_result(), Some(BattleResult::STALEMATE));
    }

    #[test]
    fn test_timeout_respects_budget() {
        let mut config = HostConfig::default();
        config.classic_max_ticks = 10;
        let catalog = catalog();
        let ctx = BattleContext::new(&config, &catalog);
        let battle = ClassicBattle::new(cruiser(), Object { id: 21, owner: 2, ..cruiser() }, 9, Variant::Host);
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(battle.battle_result(), Some(BattleResult::TIMEOUT));
        assert_eq!(battle.result().unwrap().ticks, 10);
    }

    #[test]
    fn test_planet_is_never_captured() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let planet = Object::planet(50, 3, "Outpost").with_hull_state(100, 0, 0);
        let battle = ClassicBattle::new(planet, cruiser(), 3, Variant::PHost3);

        assert_eq!(battle.outcome(&ctx, 0), -1);
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        let after = battle.object(0, true).unwrap();
        assert!(after.is_destroyed());
        assert_eq!(after.owner, 3);
    }

    #[test]
    fn test_playability() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);

        let unknown = ClassicBattle::new(scout(), cruiser(), 1, Variant::Unknown);
        assert_eq!(unknown.playability(&ctx), Playability::IsNotSupported);
        assert_eq!(unknown.outcome(&ctx, 0), 0);
        assert!(unknown.battle_result().is_none());

        let flagged = ClassicBattle::new(scout(), cruiser(), 1, Variant::PHost4).with_capabilities(64);
        assert_eq!(flagged.playability(&ctx), Playability::IsNotSupported);

        let broken = ClassicBattle::new(scout().with_damage(150), cruiser(), 1, Variant::Host);
        assert_eq!(broken.playability(&ctx), Playability::IsDamaged);
        broken.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(broken.object(0, true), broken.object(0, false));
    }

    #[test]
    fn test_object_slots() {
        let battle = ClassicBattle::new(scout(), cruiser(), 1, Variant::Host);
        assert_eq!(battle.num_objects(), 2);
        assert!(battle.object(2, false).is_none());
        // Before computation, "after" falls back to "before".
        assert_eq!(battle.object(1, true).unwrap().name, "Cruiser");
    }

    #[test]
    fn test_auxiliary_information() {
        let battle = ClassicBattle::new(scout(), cruiser(), 42, Variant::PHost4)
            .with_signature(0x4D, 3)
            .with_capabilities(CAPABILITY_EXPERIENCE);
        assert_eq!(battle.auxiliary_information(AuxInfo::Seed), Some(42));
        assert_eq!(battle.auxiliary_information(AuxInfo::Magic), Some(0x4D));
        assert_eq!(battle.auxiliary_information(AuxInfo::Type), Some(3));
        assert_eq!(battle.auxiliary_information(AuxInfo::Flags), Some(2));
        assert_eq!(battle.auxiliary_information(AuxInfo::Ambient), None);
        assert_eq!(battle.algorithm_name(), "PHost 4");
    }

    #[test]
    fn test_scores_only_for_phost_winners() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);

        let host = ClassicBattle::new(scout(), cruiser(), 42, Variant::Host);
        assert!(host.compute_scores(&ctx, 1).is_none());

        let phost = ClassicBattle::new(scout(), cruiser(), 42, Variant::PHost4);
        assert_ne!(phost.outcome(&ctx, 0), 0);
        let score = phost.compute_scores(&ctx, 1).unwrap();
        assert_eq!(score.tons_destroyed.min, 150);
        assert!(score.build_millipoints.min > 0);
        assert!(phost.compute_scores(&ctx, 0).is_none());
        assert!(phost.compute_scores(&ctx, 2).is_none());
    }

    #[test]
    fn test_statistics_count_torpedo_hits() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let left = Object::ship(1, 1, "Torper")
            .with_hull_state(200, 300, 100)
            .with_torpedoes(1, 4, 40);
        let right = Object::ship(2, 2, "Target").with_hull_state(300, 500, 100);
        let battle = ClassicBattle::new(left, right, 8, Variant::PHost3);
        assert!(battle.statistic(0).is_none());

        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        let stat = battle.statistic(0).unwrap();
        assert_eq!(stat.num_fights, 1);
        assert!(stat.num_torpedo_hits > 0);
        assert!(battle.object(0, true).unwrap().num_torpedoes < 40);
    }

    #[test]
    fn test_replay_matches_cached_result() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let carrier = Object::ship(1, 1, "Carrier")
            .with_hull_state(250, 400, 100)
            .with_fighters(6, 30);
        let battle = ClassicBattle::new(carrier, cruiser(), 11, Variant::PHost4);

        let mut events: Vec<(u32, CombatEvent)> = Vec::new();
        let replayed = battle.replay(&ctx, &mut events);
        assert_eq!(replayed, {
            battle.prepare_result(&ctx, ResultLevel::QUICK_OUTCOME);
            battle.battle_result()
        });
        assert!(events
            .iter()
            .any(|(_, e)| matches!(e, CombatEvent::FighterLaunched { from: 0 })));
        assert!(events.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_esb_active() {
        let mut config = HostConfig::default();
        let catalog = catalog();
        config.allow_engine_shield_bonus = true;
        config.set_option("EngineShieldBonusRate", "20").unwrap();
        let ctx = BattleContext::new(&config, &catalog);

        assert!(ClassicBattle::new(scout(), cruiser(), 1, Variant::Host).is_esb_active(&ctx));
        assert!(ClassicBattle::new(scout(), cruiser(), 1, Variant::PHost4).is_esb_active(&ctx));
        assert!(!ClassicBattle::new(scout(), cruiser(), 1, Variant::NuHost).is_esb_active(&ctx));
        assert!(!ClassicBattle::new(scout(), scout(), 1, Variant::PHost4).is_esb_active(&ctx));
    }

    proptest! {
        #[test]
        fn prop_phost_classification(index in 0usize..Variant::ALL.len()) {
            let variant = Variant::ALL[index];
            let expected = matches!(
                variant,
                Variant::UnknownPHost | Variant::PHost2 | Variant::PHost3 | Variant::PHost4
            );
            prop_assert_eq!(variant.is_phost(), expected);
        }

        #[test]
        fn prop_outcomes_well_formed(seed in any::<u32>(), variant_index in 1usize..Variant::ALL.len()) {
            let (config, catalog) = (HostConfig::default(), catalog());
            let ctx = BattleContext::new(&config, &catalog);
            let left = Object::ship(1, 1, "A").with_hull_state(180, 90, 80).with_beams(1, 5).with_torpedoes(1, 2, 15);
            let right = Object::ship(2, 2, "B").with_hull_state(160, 70, 100).with_beams(2, 3);
            let battle = ClassicBattle::new(left, right, seed, Variant::ALL[variant_index]);
            battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

            for slot in 0..2 {
                let outcome = battle.outcome(&ctx, slot);
                let after = battle.object(slot, true).unwrap();
                prop_assert!(outcome >= -1);
                if outcome == -1 {
                    prop_assert!(after.is_destroyed());
                }
                if outcome > 0 {
                    prop_assert_eq!(i32::from(after.owner), outcome);
                }
            }
        }
    }
}
