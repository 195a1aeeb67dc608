//! Fleet battles.
//!
//! A [`FlakBattle`] involves any number of units, arranged in groups. A group
//! is a contiguous run of units that share an owner, a starting position and
//! a speed; groups partition the units exactly.

mod algorithm;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::battle::{report_playability, Battle, BattleContext};
use crate::cache::{BattleCache, CompleteOutcome, QuickOutcome};
use crate::error::{Result, VcrError};
use crate::events::{EventSink, NullSink, Statistic, StatisticsCollector};
use crate::object::Object;
use crate::score::{compute_score, Achievement, Score};
use crate::types::{AuxInfo, BattleResult, Playability, ResultLevel};

/// Start-of-battle description of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Slot of the first member.
    pub first_object: usize,
    /// Number of members.
    pub num_objects: usize,
    /// Starting X position, meters.
    #[serde(default)]
    pub x: i32,
    /// Starting Y position, meters.
    #[serde(default)]
    pub y: i32,
    /// Owner of every member.
    pub owner: u8,
    /// Meters moved per tick.
    #[serde(default)]
    pub speed: i32,
}

impl GroupInfo {
    /// Group of `num_objects` units starting at `first_object`, at the
    /// origin and standing still.
    #[must_use]
    pub const fn new(first_object: usize, num_objects: usize, owner: u8) -> Self {
        Self {
            first_object,
            num_objects,
            x: 0,
            y: 0,
            owner,
            speed: 0,
        }
    }

    /// Builder method to set the starting position.
    #[must_use]
    pub const fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder method to set the speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    /// Slots of the members.
    #[must_use]
    pub fn slots(&self) -> Range<usize> {
        self.first_object..self.first_object.saturating_add(self.num_objects)
    }
}

/// Check that `groups`, in order, cover `objects` exactly once each and
/// that every member belongs to its group's owner.
#[must_use]
pub fn is_partition(groups: &[GroupInfo], objects: &[Object]) -> bool {
    let mut next = 0;
    for group in groups {
        if group.first_object != next || group.num_objects == 0 || group.speed < 0 {
            return false;
        }
        let Some(members) = objects.get(group.slots()) else {
            return false;
        };
        if members.iter().any(|m| m.owner != group.owner) {
            return false;
        }
        next = group.slots().end;
    }
    next == objects.len()
}

/// Complete result of a fleet battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlakResult {
    /// "After" snapshots by slot.
    pub after: Vec<Object>,
    /// Outcome codes by slot.
    pub outcomes: Vec<i32>,
    /// `TIMEOUT`, `STALEMATE`, or empty when the fight was decided.
    pub result: BattleResult,
    /// Statistics by slot.
    pub statistics: Vec<Statistic>,
    /// What each unit accomplished.
    pub achievements: Vec<Achievement>,
    /// Ticks played.
    pub ticks: u32,
}

impl CompleteOutcome for FlakResult {
    fn quick_outcome(&self) -> QuickOutcome {
        QuickOutcome {
            outcomes: self.outcomes.clone(),
            result: self.result,
        }
    }
}

/// A recorded fleet battle.
#[derive(Debug)]
pub struct FlakBattle {
    objects: Vec<Object>,
    groups: Vec<GroupInfo>,
    seed: u32,
    ambient: i32,
    cache: BattleCache<FlakResult>,
}

impl FlakBattle {
    /// Create a fleet battle.
    ///
    /// # Errors
    ///
    /// [`VcrError::EmptyBattle`] without units, [`VcrError::NoGroups`]
    /// without groups. A grouping that does not partition the units is
    /// accepted and reported as damaged by [`Battle::playability`].
    pub fn new(objects: Vec<Object>, groups: Vec<GroupInfo>, seed: u32) -> Result<Self> {
        if objects.is_empty() {
            return Err(VcrError::EmptyBattle);
        }
        if groups.is_empty() {
            return Err(VcrError::NoGroups);
        }
        Ok(Self {
            objects,
            groups,
            seed,
            ambient: 0,
            cache: BattleCache::default(),
        })
    }

    /// Builder method to set the ambient flags.
    #[must_use]
    pub fn with_ambient(mut self, ambient: i32) -> Self {
        self.ambient = ambient;
        self
    }

    /// Number of groups.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Start-of-battle description of a group.
    #[must_use]
    pub fn group_info(&self, index: usize) -> Option<&GroupInfo> {
        self.groups.get(index)
    }

    /// Complete result, if computed.
    #[must_use]
    pub fn result(&self) -> Option<&FlakResult> {
        self.cache.complete()
    }

    /// Play the battle again, streaming every event into `sink`.
    ///
    /// Does not touch the caches. Returns `None` for unplayable battles.
    pub fn replay(&self, ctx: &BattleContext<'_>, sink: &mut impl EventSink) -> Option<BattleResult> {
        if self.playability(ctx) != Playability::IsPlayable {
            return None;
        }
        Some(algorithm::play(ctx, &self.objects, &self.groups, self.seed, sink).result)
    }

    fn classify(&self, ctx: &BattleContext<'_>) -> Playability {
        if is_partition(&self.groups, &self.objects)
            && self.objects.iter().all(|o| o.is_well_formed(ctx.catalog))
        {
            Playability::IsPlayable
        } else {
            Playability::IsDamaged
        }
    }
}

impl Battle for FlakBattle {
    fn num_objects(&self) -> usize {
        self.objects.len()
    }

    fn object(&self, slot: usize, after: bool) -> Option<&Object> {
        let before = self.objects.get(slot)?;
        if after {
            if let Some(complete) = self.cache.complete() {
                return complete.after.get(slot);
            }
        }
        Some(before)
    }

    fn playability(&self, ctx: &BattleContext<'_>) -> Playability {
        self.cache
            .playability(|| report_playability("fleet", self.classify(ctx)))
    }

    fn prepare_result(&self, ctx: &BattleContext<'_>, level: ResultLevel) {
        if self.playability(ctx) != Playability::IsPlayable {
            return;
        }
        self.cache.prepare(
            level,
            || {
                let fight = algorithm::play(ctx, &self.objects, &self.groups, self.seed, &mut NullSink);
                QuickOutcome {
                    outcomes: fight.outcomes,
                    result: fight.result,
                }
            },
            || {
                let mut collector = StatisticsCollector::new(&self.objects);
                let fight =
                    algorithm::play(ctx, &self.objects, &self.groups, self.seed, &mut collector);
                FlakResult {
                    after: fight.after,
                    outcomes: fight.outcomes,
                    result: fight.result,
                    statistics: collector.finish(),
                    achievements: fight.achievements,
                    ticks: fight.ticks,
                }
            },
        );
    }

    fn battle_result(&self) -> Option<BattleResult> {
        self.cache.quick().map(|quick| quick.result)
    }

    fn outcome(&self, ctx: &BattleContext<'_>, slot: usize) -> i32 {
        if slot >= self.objects.len() {
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
            AuxInfo::Ambient => Some(self.ambient),
            AuxInfo::Magic | AuxInfo::Type | AuxInfo::Flags => None,
        }
    }

    fn algorithm_name(&self) -> &'static str {
        "FLAK"
    }

    fn is_esb_active(&self, _ctx: &BattleContext<'_>) -> bool {
        false
    }

    fn statistic(&self, slot: usize) -> Option<&Statistic> {
        self.cache.complete()?.statistics.get(slot)
    }

    fn compute_scores(&self, ctx: &BattleContext<'_>, slot: usize) -> Option<Score> {
        if slot >= self.objects.len() {
            return None;
        }
        self.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);
        let complete = self.cache.complete()?;
        if complete.outcomes[slot] != 0 {
            return None;
        }
        Some(compute_score(&complete.achievements[slot], ctx.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComponentCatalog, WeaponSpec};
    use crate::config::HostConfig;

    fn catalog() -> ComponentCatalog {
        ComponentCatalog {
            beams: vec![
                WeaponSpec::new("Plasma Bolt", 3, 10),
                WeaponSpec::new("Heavy Phaser", 35, 45),
            ],
            torpedoes: vec![WeaponSpec::new("Mark 4 Photon", 20, 35)],
            hulls: Vec::new(),
        }
    }

    fn warship(id: u16, owner: u8) -> Object {
        Object::ship(id, owner, format!("Warship {id}"))
            .with_hull_state(200, 300, 100)
            .with_beams(2, 6)
            .with_torpedoes(1, 3, 20)
    }

    fn freighter(id: u16, owner: u8) -> Object {
        Object::ship(id, owner, format!("Freighter {id}")).with_hull_state(100, 1000, 0)
    }

    #[test]
    fn test_constructor_rejects_empty() {
        assert!(matches!(
            FlakBattle::new(Vec::new(), vec![GroupInfo::new(0, 0, 1)], 1),
            Err(VcrError::EmptyBattle)
        ));
        assert!(matches!(
            FlakBattle::new(vec![warship(1, 1)], Vec::new(), 1),
            Err(VcrError::NoGroups)
        ));
    }

    #[test]
    fn test_partition_check() {
        let objects = vec![warship(1, 1), warship(2, 1), freighter(3, 2)];
        assert!(is_partition(
            &[GroupInfo::new(0, 2, 1), GroupInfo::new(2, 1, 2)],
            &objects
        ));
        // Gap, overlap, overrun, owner mismatch, empty group.
        assert!(!is_partition(&[GroupInfo::new(0, 1, 1), GroupInfo::new(2, 1, 2)], &objects));
        assert!(!is_partition(&[GroupInfo::new(0, 2, 1), GroupInfo::new(1, 2, 2)], &objects));
        assert!(!is_partition(&[GroupInfo::new(0, 2, 1), GroupInfo::new(2, 2, 2)], &objects));
        assert!(!is_partition(&[GroupInfo::new(0, 3, 1)], &objects));
        assert!(!is_partition(
            &[GroupInfo::new(0, 2, 1), GroupInfo::new(2, 0, 2), GroupInfo::new(2, 1, 2)],
            &objects
        ));
    }

    #[test]
    fn test_bad_grouping_is_damaged() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = FlakBattle::new(
            vec![warship(1, 1), freighter(2, 2)],
            vec![GroupInfo::new(0, 2, 1)],
            7,
        )
        .unwrap();
        assert_eq!(battle.playability(&ctx), Playability::IsDamaged);
        assert_eq!(battle.outcome(&ctx, 1), 0);
        assert!(battle.compute_scores(&ctx, 0).is_none());
    }

    fn skirmish() -> FlakBattle {
        FlakBattle::new(
            vec![warship(1, 1), warship(2, 1), freighter(3, 2), freighter(4, 2)],
            vec![
                GroupInfo::new(0, 2, 1).with_position(0, 0).with_speed(100),
                GroupInfo::new(2, 2, 2).with_position(40_000, 0).with_speed(80),
            ],
            4242,
        )
        .unwrap()
        .with_ambient(3)
    }

    #[test]
    fn test_warships_beat_freighters() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = skirmish();
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

        for slot in 0..2 {
            assert_eq!(battle.outcome(&ctx, slot), 0);
            assert_eq!(battle.object(slot, true).unwrap().damage, 0);
        }
        for slot in 2..4 {
            let outcome = battle.outcome(&ctx, slot);
            let after = battle.object(slot, true).unwrap();
            assert!(outcome == -1 || outcome == 1, "slot {slot}: {outcome}");
            if outcome == -1 {
                assert!(after.is_destroyed());
            } else {
                assert_eq!(after.owner, 1);
            }
        }
        assert!(battle.battle_result().unwrap().is_empty());
    }

    #[test]
    fn test_group_info_is_start_state() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = skirmish();
        let before = *battle.group_info(1).unwrap();
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(battle.group_info(1), Some(&before));
        assert_eq!(before.x, 40_000);
        assert!(battle.group_info(2).is_none());
        assert_eq!(battle.num_groups(), 2);
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let a = skirmish();
        let b = skirmish();
        a.prepare_result(&ctx, ResultLevel::QUICK_OUTCOME);
        a.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        a.prepare_result(&ctx, ResultLevel::QUICK_OUTCOME);
        b.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(a.result(), b.result());
    }

    #[test]
    fn test_scores_for_survivors_only() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = skirmish();

        let total: i32 = (0..2)
            .filter_map(|slot| battle.compute_scores(&ctx, slot))
            .map(|score| score.tons_destroyed.max)
            .sum();
        assert!(total >= 100);
        for slot in 2..4 {
            assert!(battle.compute_scores(&ctx, slot).is_none());
        }
        assert!(battle.compute_scores(&ctx, 9).is_none());
    }

    #[test]
    fn test_crewless_unit_changes_hands() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let raider = Object::ship(1, 5, "Raider")
            .with_hull_state(300, 400, 100)
            .with_beams(2, 4);
        let victim = Object::ship(2, 6, "Victim").with_hull_state(400, 3, 0);
        let battle = FlakBattle::new(
            vec![raider, victim],
            vec![
                GroupInfo::new(0, 1, 5).with_position(0, 0).with_speed(100),
                GroupInfo::new(1, 1, 6).with_position(10_000, 0),
            ],
            99,
        )
        .unwrap();

        assert_eq!(battle.outcome(&ctx, 1), 5);
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        let after = battle.object(1, true).unwrap();
        assert_eq!(after.owner, 5);
        assert_eq!(after.crew, 0);
        let score = battle.compute_scores(&ctx, 0).unwrap();
        assert_eq!(score.tons_destroyed, crate::score::ScoreRange::exact(400));
    }

    #[test]
    fn test_auxiliary_information() {
        let battle = skirmish();
        assert_eq!(battle.auxiliary_information(AuxInfo::Seed), Some(4242));
        assert_eq!(battle.auxiliary_information(AuxInfo::Ambient), Some(3));
        assert_eq!(battle.auxiliary_information(AuxInfo::Magic), None);
        assert_eq!(battle.auxiliary_information(AuxInfo::Flags), None);
        assert_eq!(battle.algorithm_name(), "FLAK");
    }

    #[test]
    fn test_single_owner_ends_immediately() {
        let (config, catalog) = (HostConfig::default(), catalog());
        let ctx = BattleContext::new(&config, &catalog);
        let battle = FlakBattle::new(
            vec![warship(1, 1), warship(2, 1)],
            vec![GroupInfo::new(0, 2, 1)],
            1,
        )
        .unwrap();
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(battle.result().unwrap().ticks, 0);
        assert_eq!(battle.outcome(&ctx, 0), 0);
    }
}
