//! The fleet tick loop.
//!
//! Groups share a position on a plane and move as one. Every tick:
//!
//! 1. Each group with active members moves toward the nearest group holding
//!    an enemy, stopping at the standoff distance.
//! 2. Every unit still in the fight recharges, fires beams (at fighters
//!    first), fires torpedoes and launches fighters.
//! 3. Fighters fly, strike and return.
//! 4. Destroyed and crewless units leave the fight; credit for them is
//!    assigned.

use tracing::{debug, trace};

use super::GroupInfo;
use crate::battle::BattleContext;
use crate::catalog::WeaponSpec;
use crate::config::HostConfig;
use crate::damage::{apply_hit, HitScaling, Rounding};
use crate::events::{CombatEvent, EventSink, Target};
use crate::math::{Fixed, Vec2Fixed};
use crate::object::{Object, DAMAGE_LIMIT};
use crate::random::{BorlandRandom, RandomSource};
use crate::score::Achievement;
use crate::types::BattleResult;

const FULL_CHARGE: i32 = 1000;

/// Weapon figures of one unit, resolved for its owner and experience level.
#[derive(Debug, Clone, Copy)]
struct Tuning {
    beam_recharge: i32,
    tube_recharge: i32,
    bay_recharge: i32,
    beam_hit_odds: i32,
    torp_hit_odds: i32,
    beam_ship_charge: i32,
    beam_fighter_charge: i32,
    launch_interval: i32,
    strikes_per_fighter: i32,
    max_fighters_launched: usize,
    fighter_explosive: i32,
    fighter_kill: i32,
    scaling: HitScaling,
}

impl Tuning {
    fn new(config: &HostConfig, unit: &Object) -> Self {
        let owner = unit.owner;
        let level = config.effective_level(unit.experience_level);
        Self {
            beam_recharge: config.beam_recharge_rate.player(owner)
                + config.emod_beam_recharge_rate.level(level),
            tube_recharge: config.tube_recharge_rate.player(owner)
                + config.emod_tube_recharge_rate.level(level),
            bay_recharge: config.bay_recharge_rate.player(owner)
                + config.emod_bay_recharge_rate.level(level),
            beam_hit_odds: config.beam_hit_odds.player(owner) + config.emod_beam_hit_odds.level(level),
            torp_hit_odds: config.torp_hit_odds.player(owner) + config.emod_torp_hit_odds.level(level),
            beam_ship_charge: config.beam_hit_ship_charge.player(owner),
            beam_fighter_charge: config.beam_hit_fighter_charge.player(owner),
            launch_interval: config.bay_launch_interval.player(owner).max(0),
            strikes_per_fighter: config.strikes_per_fighter.player(owner).max(1),
            max_fighters_launched: usize::try_from(config.max_fighters_launched.player(owner))
                .unwrap_or(0),
            fighter_explosive: config.fighter_beam_explosive.player(owner),
            fighter_kill: config.fighter_beam_kill.player(owner),
            scaling: HitScaling {
                shield_damage: config.shield_damage_scaling.player(owner),
                shield_kill: config.shield_kill_scaling.player(owner),
                hull_damage: config.hull_damage_scaling.player(owner),
                crew_kill: config.crew_kill_scaling.player(owner)
                    + config.emod_crew_kill_scaling.level(level),
                rounding: Rounding::Nearest,
            },
        }
    }
}

#[derive(Debug)]
struct Unit<'a> {
    object: Object,
    group: usize,
    beam: Option<&'a WeaponSpec>,
    torpedo: Option<&'a WeaponSpec>,
    beam_charge: Vec<i32>,
    tube_charge: Vec<i32>,
    bay_charge: Vec<i32>,
    launch_countdown: i32,
    tuning: Tuning,
    retired: bool,
}

impl Unit<'_> {
    /// Still a valid target: not retired and not finished this tick.
    fn is_active(&self) -> bool {
        !self.retired && !self.object.is_destroyed() && !self.object.is_crewless_ship()
    }

    fn can_inflict_damage(&self) -> bool {
        let has_power =
            |w: Option<&WeaponSpec>| w.is_some_and(|w| w.kill_power > 0 || w.damage_power > 0);
        let fighter_power = self.tuning.fighter_explosive > 0 || self.tuning.fighter_kill > 0;
        (has_power(self.beam) && !self.beam_charge.is_empty())
            || (has_power(self.torpedo) && !self.tube_charge.is_empty() && self.object.num_torpedoes > 0)
            || (fighter_power && !self.bay_charge.is_empty() && self.object.num_fighters > 0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Fighter {
    carrier: usize,
    owner: u8,
    position: Vec2Fixed,
    target: usize,
    strikes_left: i32,
    returning: bool,
}

/// Who did what to whom, for awarding scores.
#[derive(Debug, Default, Clone)]
struct Ledger {
    contributors: Vec<usize>,
    last_hit: Option<usize>,
    finished_mass: i32,
    assisted_mass: i32,
    damage_dealt: i64,
}

/// Result of one simulated fleet battle.
#[derive(Debug, Clone)]
pub(crate) struct Fight {
    pub after: Vec<Object>,
    pub outcomes: Vec<i32>,
    pub result: BattleResult,
    pub achievements: Vec<Achievement>,
    pub ticks: u32,
}

struct Arena<'a, S> {
    config: &'a HostConfig,
    groups: &'a [GroupInfo],
    positions: Vec<Vec2Fixed>,
    units: Vec<Unit<'a>>,
    fighters: Vec<Fighter>,
    ledgers: Vec<Ledger>,
    outcomes: Vec<i32>,
    rng: BorlandRandom,
    sink: &'a mut S,
    tick: u32,
}

/// Play a fleet battle. `groups` must partition `objects`.
pub(crate) fn play<S: EventSink>(
    ctx: &BattleContext<'_>,
    objects: &[Object],
    groups: &[GroupInfo],
    seed: u32,
    sink: &mut S,
) -> Fight {
    let mut units: Vec<Unit<'_>> = objects
        .iter()
        .map(|object| {
            let count = |n: i32| usize::try_from(n).unwrap_or(0);
            Unit {
                object: object.clone(),
                group: 0,
                beam: ctx.catalog.beam(object.beam_type),
                torpedo: ctx.catalog.torpedo(object.torpedo_type),
                beam_charge: vec![0; count(object.num_beams)],
                tube_charge: vec![0; count(object.num_launchers)],
                bay_charge: vec![0; count(object.num_bays)],
                launch_countdown: 0,
                tuning: Tuning::new(ctx.config, object),
                retired: false,
            }
        })
        .collect();
    for (index, group) in groups.iter().enumerate() {
        for unit in units.iter_mut().skip(group.first_object).take(group.num_objects) {
            unit.group = index;
        }
    }

    let mut arena = Arena {
        config: ctx.config,
        groups,
        positions: groups.iter().map(|g| Vec2Fixed::from_meters(g.x, g.y)).collect(),
        units,
        fighters: Vec::new(),
        ledgers: vec![Ledger::default(); objects.len()],
        outcomes: vec![0; objects.len()],
        rng: BorlandRandom::new(seed),
        sink,
        tick: 0,
    };
    let max_ticks = u32::try_from(ctx.config.flak_max_ticks.max(1)).unwrap_or(1);

    let result = loop {
        if arena.owners_in_fight() <= 1 {
            break BattleResult::empty();
        }
        if !arena.can_fight() {
            break BattleResult::STALEMATE;
        }
        if arena.tick >= max_ticks {
            break BattleResult::TIMEOUT;
        }
        arena.tick += 1;
        arena.move_groups();
        for slot in 0..arena.units.len() {
            if !arena.units[slot].retired {
                arena.act(slot);
            }
        }
        arena.fly_fighters();
        arena.resolve();
    };

    arena.finish(result)
}

impl<'a, S: EventSink> Arena<'a, S> {
    fn record(&mut self, event: CombatEvent) {
        self.sink.record(self.tick, event);
    }

    fn position_of(&self, slot: usize) -> Vec2Fixed {
        self.positions[self.units[slot].group]
    }

    fn owners_in_fight(&self) -> usize {
        let mut owners: Vec<u8> = self
            .units
            .iter()
            .filter(|u| u.is_active())
            .map(|u| u.object.owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners.len()
    }

    fn can_fight(&self) -> bool {
        !self.fighters.is_empty()
            || self
                .units
                .iter()
                .any(|u| u.is_active() && u.can_inflict_damage())
    }

    /// Nearest active unit not owned by the owner of `slot`.
    fn nearest_enemy(&self, slot: usize) -> Option<usize> {
        let owner = self.units[slot].object.owner;
        let here = self.position_of(slot);
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_active() && u.object.owner != owner)
            .min_by_key(|(other, u)| (here.distance_squared(self.positions[u.group]), *other))
            .map(|(other, _)| other)
    }

    /// Nearest attacking fighter not owned by `owner`, within `range` of `here`.
    fn nearest_fighter(&self, owner: u8, here: Vec2Fixed, range: i32) -> Option<usize> {
        self.fighters
            .iter()
            .enumerate()
            .filter(|(_, f)| f.owner != owner && !f.returning && here.is_within(f.position, range))
            .min_by_key(|(index, f)| (here.distance_squared(f.position), *index))
            .map(|(index, _)| index)
    }

    fn move_groups(&mut self) {
        let groups = self.groups;
        let standoff = Fixed::from_num(self.config.standoff_distance.max(0));
        let start = self.positions.clone();

        for (index, group) in groups.iter().enumerate() {
            let members = &self.units[group.first_object..group.first_object + group.num_objects];
            if !members.iter().any(Unit::is_active) {
                continue;
            }
            let nearest = groups
                .iter()
                .enumerate()
                .filter(|(other, g)| {
                    *other != index
                        && self.units[g.first_object..g.first_object + g.num_objects]
                            .iter()
                            .any(|u| u.is_active() && u.object.owner != group.owner)
                })
                .min_by_key(|(other, _)| (start[index].distance_squared(start[*other]), *other))
                .map(|(other, _)| other);
            if let Some(other) = nearest {
                let step = Fixed::from_num(group.speed.max(0));
                self.positions[index] = start[index].move_towards(start[other], step, standoff);
            }
        }
    }

    fn act(&mut self, slot: usize) {
        let unit = &mut self.units[slot];
        let tuning = unit.tuning;
        for charge in &mut unit.beam_charge {
            *charge = (*charge + tuning.beam_recharge).clamp(0, FULL_CHARGE);
        }
        for charge in &mut unit.tube_charge {
            *charge = (*charge + tuning.tube_recharge).clamp(0, FULL_CHARGE);
        }
        for charge in &mut unit.bay_charge {
            *charge = (*charge + tuning.bay_recharge).clamp(0, FULL_CHARGE);
        }

        self.fire_beams(slot);
        self.fire_torpedoes(slot);
        self.launch_fighter(slot);
    }

    fn fire_beams(&mut self, slot: usize) {
        let Some(beam) = self.units[slot].beam else {
            return;
        };
        let tuning = self.units[slot].tuning;
        let owner = self.units[slot].object.owner;
        let here = self.position_of(slot);

        for index in 0..self.units[slot].beam_charge.len() {
            let charge = self.units[slot].beam_charge[index];

            if charge >= tuning.beam_fighter_charge {
                if let Some(fighter) = self.nearest_fighter(owner, here, self.config.beam_hit_fighter_range) {
                    self.units[slot].beam_charge[index] = 0;
                    let hit = self.rng.chance(tuning.beam_hit_odds);
                    let carrier = self.fighters[fighter].carrier;
                    self.record(CombatEvent::BeamFired {
                        from: slot,
                        beam: index,
                        target: Target::Fighter(carrier),
                        hit,
                    });
                    if hit {
                        self.fighters.remove(fighter);
                        self.record(CombatEvent::FighterLost { from: carrier });
                    }
                    continue;
                }
            }

            if charge < tuning.beam_ship_charge {
                continue;
            }
            let Some(target) = self.nearest_enemy(slot) else {
                return;
            };
            if !here.is_within(self.position_of(target), self.config.beam_firing_range) {
                return;
            }
            self.units[slot].beam_charge[index] = 0;
            let hit = self.rng.chance(tuning.beam_hit_odds);
            self.record(CombatEvent::BeamFired {
                from: slot,
                beam: index,
                target: Target::Unit(target),
                hit,
            });
            if hit {
                let explosive = beam.damage_power * charge / FULL_CHARGE;
                let kill = beam.kill_power * charge / FULL_CHARGE;
                self.hit(slot, target, explosive, kill, &tuning.scaling);
            }
        }
    }

    fn fire_torpedoes(&mut self, slot: usize) {
        let Some(torpedo) = self.units[slot].torpedo else {
            return;
        };
        let tuning = self.units[slot].tuning;

        for index in 0..self.units[slot].tube_charge.len() {
            if self.units[slot].object.num_torpedoes <= 0 {
                return;
            }
            if self.units[slot].tube_charge[index] < FULL_CHARGE {
                continue;
            }
            let Some(target) = self.nearest_enemy(slot) else {
                return;
            };
            if !self
                .position_of(slot)
                .is_within(self.position_of(target), self.config.torp_firing_range)
            {
                return;
            }
            self.units[slot].tube_charge[index] = 0;
            self.units[slot].object.num_torpedoes -= 1;
            let hit = self.rng.chance(tuning.torp_hit_odds);
            self.record(CombatEvent::TorpedoFired {
                from: slot,
                to: target,
                hit,
            });
            if hit {
                self.hit(slot, target, torpedo.damage_power, torpedo.kill_power, &tuning.scaling);
            }
        }
    }

    fn launch_fighter(&mut self, slot: usize) {
        let unit = &mut self.units[slot];
        if unit.launch_countdown > 0 {
            unit.launch_countdown -= 1;
            return;
        }
        if unit.object.num_fighters <= 0 {
            return;
        }
        let Some(bay) = unit.bay_charge.iter().position(|&c| c >= FULL_CHARGE) else {
            return;
        };
        let airborne = self.fighters.iter().filter(|f| f.carrier == slot).count();
        if airborne >= self.units[slot].tuning.max_fighters_launched {
            return;
        }
        let Some(target) = self.nearest_enemy(slot) else {
            return;
        };

        let position = self.position_of(slot);
        let unit = &mut self.units[slot];
        unit.bay_charge[bay] = 0;
        unit.object.num_fighters -= 1;
        unit.launch_countdown = unit.tuning.launch_interval;
        let fighter = Fighter {
            carrier: slot,
            owner: unit.object.owner,
            position,
            target,
            strikes_left: unit.tuning.strikes_per_fighter,
            returning: false,
        };
        self.fighters.push(fighter);
        self.record(CombatEvent::FighterLaunched { from: slot });
    }

    fn fly_fighters(&mut self) {
        let speed = self.config.fighter_movement_speed.max(1);
        let step = Fixed::from_num(speed);
        let range = self.config.fighter_firing_range;

        let mut index = 0;
        while index < self.fighters.len() {
            let fighter = self.fighters[index];
            if self.units[fighter.carrier].retired {
                self.fighters.remove(index);
                self.record(CombatEvent::FighterLost { from: fighter.carrier });
                continue;
            }

            if fighter.returning {
                let home = self.position_of(fighter.carrier);
                if fighter.position.is_within(home, speed) {
                    self.fighters.remove(index);
                    self.units[fighter.carrier].object.num_fighters += 1;
                    self.record(CombatEvent::FighterLanded { at: fighter.carrier });
                    continue;
                }
                self.fighters[index].position = fighter.position.move_towards(home, step, Fixed::ZERO);
                index += 1;
                continue;
            }

            let target = if self.units[fighter.target].is_active() {
                Some(fighter.target)
            } else {
                self.nearest_enemy(fighter.carrier)
            };
            let Some(target) = target else {
                self.fighters[index].returning = true;
                index += 1;
                continue;
            };
            self.fighters[index].target = target;

            let aim = self.position_of(target);
            if fighter.position.is_within(aim, range) {
                // Strikes in range always hit; only beams and torpedoes roll.
                let tuning = self.units[fighter.carrier].tuning;
                self.record(CombatEvent::FighterStrike {
                    from: fighter.carrier,
                    to: target,
                    hit: true,
                });
                self.hit(
                    fighter.carrier,
                    target,
                    tuning.fighter_explosive,
                    tuning.fighter_kill,
                    &tuning.scaling,
                );
                let strikes_left = fighter.strikes_left - 1;
                self.fighters[index].strikes_left = strikes_left;
                self.fighters[index].returning = strikes_left <= 0;
            } else {
                self.fighters[index].position = fighter.position.move_towards(aim, step, Fixed::ZERO);
            }
            index += 1;
        }
    }

    fn hit(&mut self, attacker: usize, target: usize, explosive: i32, kill: i32, scaling: &HitScaling) {
        let victim = &mut self.units[target].object;
        let damage_before = victim.damage;
        apply_hit(victim, explosive, kill, scaling);
        let dealt = (victim.damage.min(DAMAGE_LIMIT) - damage_before).max(0);
        let event = CombatEvent::UnitHit {
            slot: target,
            shield: victim.shield,
            damage: victim.damage,
            crew: victim.crew,
        };
        let mass = victim.mass;

        self.ledgers[attacker].damage_dealt += i64::from(dealt) * i64::from(mass);
        let ledger = &mut self.ledgers[target];
        if !ledger.contributors.contains(&attacker) {
            ledger.contributors.push(attacker);
        }
        ledger.last_hit = Some(attacker);
        self.record(event);
    }

    /// Retire finished units and hand out credit for them.
    fn resolve(&mut self) {
        for slot in 0..self.units.len() {
            let unit = &self.units[slot];
            if unit.retired {
                continue;
            }
            let destroyed = unit.object.is_destroyed();
            if !destroyed && !unit.object.is_crewless_ship() {
                continue;
            }

            let killer = self.ledgers[slot].last_hit;
            let outcome = if destroyed {
                -1
            } else {
                let Some(captor) = killer
                    .or_else(|| self.nearest_enemy(slot))
                    .map(|k| self.units[k].object.owner)
                else {
                    continue;
                };
                i32::from(captor)
            };

            let mass = self.units[slot].object.mass;
            if let Some(killer) = killer {
                self.ledgers[killer].finished_mass += mass;
                let assistants: Vec<usize> = self.ledgers[slot]
                    .contributors
                    .iter()
                    .copied()
                    .filter(|&c| c != killer)
                    .collect();
                for assistant in assistants {
                    self.ledgers[assistant].assisted_mass += mass;
                }
            }

            self.units[slot].retired = true;
            self.outcomes[slot] = outcome;
            if outcome < 0 {
                self.record(CombatEvent::UnitDestroyed { slot });
            } else {
                let captor = outcome as u8;
                self.units[slot].object.owner = captor;
                trace!(tick = self.tick, slot, captor, "Unit captured");
                self.record(CombatEvent::UnitCaptured { slot, by: captor });
            }
        }
    }

    fn finish(mut self, result: BattleResult) -> Fight {
        for fighter in std::mem::take(&mut self.fighters) {
            let carrier = &mut self.units[fighter.carrier];
            if !carrier.retired {
                carrier.object.num_fighters += 1;
            }
        }
        debug!(
            ticks = self.tick,
            units = self.units.len(),
            result = result.bits(),
            "Fleet battle finished"
        );

        let achievements = self
            .units
            .iter()
            .zip(&self.ledgers)
            .map(|(unit, ledger)| Achievement {
                owner: unit.object.owner,
                own_mass: unit.object.mass,
                tons_finished: ledger.finished_mass,
                tons_assisted: ledger.assisted_mass,
                tons_damaged: (ledger.damage_dealt / 100) as i32,
            })
            .collect();
        Fight {
            after: self.units.into_iter().map(|u| u.object).collect(),
            outcomes: self.outcomes,
            result,
            achievements,
            ticks: self.tick,
        }
    }
}
