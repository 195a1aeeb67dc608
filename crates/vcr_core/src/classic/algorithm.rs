//! The classic tick loop.
//!
//! Two units start [`INITIAL_DISTANCE`] apart on a line. Every tick, ships
//! close in, shields regenerate, both sides recharge and fire, fighters fly
//! and strike, and finally terminal states are resolved. Both sides act
//! within the same tick before anything is resolved, so two units can finish
//! each other simultaneously.

use tracing::{debug, trace};

use super::rules::{SideTuning, VariantRules};
use crate::battle::BattleContext;
use crate::catalog::WeaponSpec;
use crate::config::HostConfig;
use crate::damage::{apply_hit, HitScaling};
use crate::events::{CombatEvent, EventSink, Target};
use crate::object::{Object, DAMAGE_LIMIT, MAX_SHIELD};
use crate::random::{RandomGenerator, RandomSource};
use crate::types::{BattleResult, Side};

/// Distance between the two units when the battle starts.
pub const INITIAL_DISTANCE: i32 = 58_000;

/// Charge of a fully loaded weapon.
const FULL_CHARGE: i32 = 1000;

/// Where a fighter is in its sortie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FighterState {
    /// Slot not in use.
    Idle,
    /// Flying towards the enemy or striking.
    Attacking,
    /// Flying home.
    Returning,
}

#[derive(Debug, Clone, Copy)]
struct Fighter {
    state: FighterState,
    x: i32,
    strikes_left: i32,
}

/// Live state of one side.
#[derive(Debug)]
struct Combatant<'a> {
    slot: usize,
    unit: Object,
    x: i32,
    beam: Option<&'a WeaponSpec>,
    torpedo: Option<&'a WeaponSpec>,
    beam_charge: Vec<i32>,
    tube_charge: Vec<i32>,
    bay_charge: Vec<i32>,
    fighters: Vec<Fighter>,
    launch_countdown: i32,
    tuning: SideTuning,
}

impl<'a> Combatant<'a> {
    fn new(
        side: Side,
        unit: &Object,
        ctx: &BattleContext<'a>,
        rules: &VariantRules,
    ) -> Self {
        let count = |n: i32| usize::try_from(n).unwrap_or(0);
        Self {
            slot: side.index(),
            unit: unit.clone(),
            x: match side {
                Side::Left => 0,
                Side::Right => INITIAL_DISTANCE,
            },
            beam: ctx.catalog.beam(unit.beam_type),
            torpedo: ctx.catalog.torpedo(unit.torpedo_type),
            beam_charge: vec![0; count(unit.num_beams)],
            tube_charge: vec![0; count(unit.num_launchers)],
            bay_charge: vec![0; count(unit.num_bays)],
            fighters: Vec::new(),
            launch_countdown: 0,
            tuning: rules.tune(ctx.config, unit),
        }
    }

    /// Destroyed, or a ship without crew.
    fn is_finished(&self) -> bool {
        self.unit.is_destroyed() || self.unit.is_crewless_ship()
    }

    fn airborne(&self) -> usize {
        self.fighters
            .iter()
            .filter(|f| f.state != FighterState::Idle)
            .count()
    }

    fn can_inflict_damage(&self) -> bool {
        let has_power = |w: Option<&WeaponSpec>| w.is_some_and(|w| w.kill_power > 0 || w.damage_power > 0);
        let beams = has_power(self.beam) && !self.beam_charge.is_empty();
        let torpedoes =
            has_power(self.torpedo) && !self.tube_charge.is_empty() && self.unit.num_torpedoes > 0;
        let fighter_power = self.tuning.fighter_explosive > 0 || self.tuning.fighter_kill > 0;
        let fighters = fighter_power
            && ((!self.bay_charge.is_empty() && self.unit.num_fighters > 0) || self.airborne() > 0);
        beams || torpedoes || fighters
    }

    fn recharge(&mut self, rng: &mut RandomGenerator) {
        let SideTuning {
            beam_recharge,
            tube_recharge,
            bay_recharge,
            ..
        } = self.tuning;
        for charge in &mut self.beam_charge {
            *charge = (*charge + beam_recharge.roll(rng)).min(FULL_CHARGE);
        }
        for charge in &mut self.tube_charge {
            *charge = (*charge + tube_recharge.roll(rng)).min(FULL_CHARGE);
        }
        for charge in &mut self.bay_charge {
            *charge = (*charge + bay_recharge.roll(rng)).min(FULL_CHARGE);
        }
    }

    fn regenerate_shield(&mut self) {
        if self.tuning.shield_regeneration > 0 && !self.is_finished() {
            self.unit.shield = (self.unit.shield + self.tuning.shield_regeneration).min(MAX_SHIELD);
        }
    }

    /// Nearest attacking fighter within `range` of `x`.
    fn nearest_fighter(&self, x: i32, range: i32) -> Option<usize> {
        self.fighters
            .iter()
            .enumerate()
            .filter(|(_, f)| f.state == FighterState::Attacking && (f.x - x).abs() <= range)
            .min_by_key(|(_, f)| (f.x - x).abs())
            .map(|(index, _)| index)
    }

    fn take_hit<S: EventSink>(
        &mut self,
        explosive: i32,
        kill: i32,
        scaling: &HitScaling,
        env: &mut Env<'_, S>,
    ) {
        apply_hit(&mut self.unit, explosive, kill, scaling);
        env.record(CombatEvent::UnitHit {
            slot: self.slot,
            shield: self.unit.shield,
            damage: self.unit.damage,
            crew: self.unit.crew,
        });
    }
}

/// Everything a tick needs besides the two combatants.
struct Env<'e, S> {
    config: &'e HostConfig,
    rules: &'e VariantRules,
    rng: RandomGenerator,
    sink: &'e mut S,
    tick: u32,
}

impl<S: EventSink> Env<'_, S> {
    fn record(&mut self, event: CombatEvent) {
        self.sink.record(self.tick, event);
    }
}

/// Result of one simulated fight.
#[derive(Debug, Clone)]
pub(crate) struct Fight {
    pub after: [Object; 2],
    pub result: BattleResult,
    pub ticks: u32,
}

/// Play a battle from the two "before" snapshots.
pub(crate) fn play<S: EventSink>(
    ctx: &BattleContext<'_>,
    rules: &VariantRules,
    units: &[Object; 2],
    seed: u32,
    sink: &mut S,
) -> Fight {
    let mut sides = [
        Combatant::new(Side::Left, &units[0], ctx, rules),
        Combatant::new(Side::Right, &units[1], ctx, rules),
    ];
    let mut env = Env {
        config: ctx.config,
        rules,
        rng: RandomGenerator::for_battle(rules.random, seed, ctx.random_table),
        sink,
        tick: 0,
    };
    let max_ticks = u32::try_from(ctx.config.classic_max_ticks.max(1)).unwrap_or(1);

    let result = loop {
        env.tick += 1;
        close_in(&mut sides, env.config);
        for combatant in &mut sides {
            combatant.regenerate_shield();
        }
        for side in Side::ALL {
            let (attacker, defender) = pair(&mut sides, side);
            attacker.recharge(&mut env.rng);
            fire_beams(attacker, defender, &mut env);
            fire_torpedoes(attacker, defender, &mut env);
            launch_fighter(attacker, defender, &mut env);
        }
        for side in Side::ALL {
            let (attacker, defender) = pair(&mut sides, side);
            fly_fighters(attacker, defender, &mut env);
        }

        let result = resolve(&mut sides, &mut env);
        if !result.is_empty() {
            break result;
        }
        if !sides.iter().any(Combatant::can_inflict_damage) {
            break BattleResult::STALEMATE;
        }
        if env.tick >= max_ticks {
            break BattleResult::TIMEOUT;
        }
    };

    // Fighters still out return to surviving carriers.
    for combatant in &mut sides {
        if !combatant.unit.is_destroyed() {
            combatant.unit.num_fighters += combatant.airborne() as i32;
        }
    }

    debug!(ticks = env.tick, result = result.bits(), "Classic battle finished");
    let [left, right] = sides;
    Fight {
        after: [left.unit, right.unit],
        result,
        ticks: env.tick,
    }
}

fn pair<'s, 'a>(
    sides: &'s mut [Combatant<'a>; 2],
    side: Side,
) -> (&'s mut Combatant<'a>, &'s mut Combatant<'a>) {
    let [left, right] = sides;
    match side {
        Side::Left => (left, right),
        Side::Right => (right, left),
    }
}

/// Move ships towards each other, stopping at the standoff distance.
fn close_in(sides: &mut [Combatant<'_>; 2], config: &HostConfig) {
    let speed = config.ship_movement_speed.max(0);
    let standoff = config.standoff_distance.max(0);
    for side in Side::ALL {
        let room = (sides[1].x - sides[0].x - standoff).max(0);
        let combatant = &mut sides[side.index()];
        if combatant.unit.is_planet || room == 0 {
            continue;
        }
        let step = speed.min(room);
        match side {
            Side::Left => combatant.x += step,
            Side::Right => combatant.x -= step,
        }
    }
}

fn fire_beams<S: EventSink>(
    attacker: &mut Combatant<'_>,
    defender: &mut Combatant<'_>,
    env: &mut Env<'_, S>,
) {
    let Some(beam) = attacker.beam else {
        return;
    };
    let odds = attacker.tuning.beam_odds(beam.kill_power, beam.damage_power);
    let distance = (defender.x - attacker.x).abs();

    for index in 0..attacker.beam_charge.len() {
        let charge = attacker.beam_charge[index];

        if charge >= attacker.tuning.beam_fighter_charge {
            if let Some(fighter) = defender.nearest_fighter(attacker.x, env.config.beam_hit_fighter_range) {
                attacker.beam_charge[index] = 0;
                let hit = env.rng.chance(odds);
                env.record(CombatEvent::BeamFired {
                    from: attacker.slot,
                    beam: index,
                    target: Target::Fighter(defender.slot),
                    hit,
                });
                if hit {
                    defender.fighters[fighter].state = FighterState::Idle;
                    env.record(CombatEvent::FighterLost { from: defender.slot });
                }
                continue;
            }
        }

        if charge >= attacker.tuning.beam_ship_charge
            && distance <= env.config.beam_firing_range
            && !defender.is_finished()
        {
            attacker.beam_charge[index] = 0;
            let hit = env.rng.chance(odds);
            env.record(CombatEvent::BeamFired {
                from: attacker.slot,
                beam: index,
                target: Target::Unit(defender.slot),
                hit,
            });
            if hit {
                let explosive = beam.damage_power * charge / FULL_CHARGE;
                let kill = beam.kill_power * charge / FULL_CHARGE;
                defender.take_hit(explosive, kill, &attacker.tuning.scaling, env);
            }
        }
    }
}

fn fire_torpedoes<S: EventSink>(
    attacker: &mut Combatant<'_>,
    defender: &mut Combatant<'_>,
    env: &mut Env<'_, S>,
) {
    let Some(torpedo) = attacker.torpedo else {
        return;
    };
    if (defender.x - attacker.x).abs() > env.config.torp_firing_range {
        return;
    }
    let odds = attacker.tuning.torpedo_odds(torpedo.kill_power, torpedo.damage_power);
    let multiplier = env.rules.torpedo_multiplier;

    for index in 0..attacker.tube_charge.len() {
        if attacker.unit.num_torpedoes <= 0 || defender.is_finished() {
            break;
        }
        if attacker.tube_charge[index] < FULL_CHARGE {
            continue;
        }
        attacker.tube_charge[index] = 0;
        attacker.unit.num_torpedoes -= 1;
        let hit = env.rng.chance(odds);
        env.record(CombatEvent::TorpedoFired {
            from: attacker.slot,
            to: defender.slot,
            hit,
        });
        if hit {
            defender.take_hit(
                torpedo.damage_power * multiplier,
                torpedo.kill_power * multiplier,
                &attacker.tuning.scaling,
                env,
            );
        }
    }
}

fn launch_fighter<S: EventSink>(
    attacker: &mut Combatant<'_>,
    defender: &Combatant<'_>,
    env: &mut Env<'_, S>,
) {
    if attacker.launch_countdown > 0 {
        attacker.launch_countdown -= 1;
        return;
    }
    let max_airborne = usize::try_from(attacker.tuning.max_fighters_launched).unwrap_or(0);
    if attacker.unit.num_fighters <= 0 || defender.is_finished() || attacker.airborne() >= max_airborne {
        return;
    }
    let Some(bay) = attacker.bay_charge.iter().position(|&c| c >= FULL_CHARGE) else {
        return;
    };

    attacker.bay_charge[bay] = 0;
    attacker.unit.num_fighters -= 1;
    let fighter = Fighter {
        state: FighterState::Attacking,
        x: attacker.x,
        strikes_left: attacker.tuning.strikes_per_fighter.max(1),
    };
    match attacker.fighters.iter_mut().find(|f| f.state == FighterState::Idle) {
        Some(free) => *free = fighter,
        None => attacker.fighters.push(fighter),
    }
    attacker.launch_countdown = attacker.tuning.launch_interval.max(0);
    env.record(CombatEvent::FighterLaunched { from: attacker.slot });
}

fn fly_fighters<S: EventSink>(
    attacker: &mut Combatant<'_>,
    defender: &mut Combatant<'_>,
    env: &mut Env<'_, S>,
) {
    let speed = env.config.fighter_movement_speed.max(1);
    let range = env.config.fighter_firing_range;
    let home = attacker.x;
    let tuning = attacker.tuning;
    let mut landed = 0;

    for fighter in &mut attacker.fighters {
        match fighter.state {
            FighterState::Idle => {}
            FighterState::Attacking => {
                if defender.is_finished() {
                    fighter.state = FighterState::Returning;
                } else if (defender.x - fighter.x).abs() <= range {
                    env.record(CombatEvent::FighterStrike {
                        from: attacker.slot,
                        to: defender.slot,
                        hit: true,
                    });
                    defender.take_hit(tuning.fighter_explosive, tuning.fighter_kill, &tuning.scaling, env);
                    fighter.strikes_left -= 1;
                    if fighter.strikes_left <= 0 {
                        fighter.state = FighterState::Returning;
                    }
                } else {
                    fighter.x = step_towards(fighter.x, defender.x, speed);
                }
            }
            FighterState::Returning => {
                if (home - fighter.x).abs() <= speed {
                    fighter.state = FighterState::Idle;
                    landed += 1;
                    env.record(CombatEvent::FighterLanded { at: attacker.slot });
                } else {
                    fighter.x = step_towards(fighter.x, home, speed);
                }
            }
        }
    }
    attacker.unit.num_fighters += landed;
}

fn step_towards(from: i32, to: i32, step: i32) -> i32 {
    if from < to {
        (from + step).min(to)
    } else {
        (from - step).max(to)
    }
}

/// Turn finished units into terminal flags.
fn resolve<S: EventSink>(sides: &mut [Combatant<'_>; 2], env: &mut Env<'_, S>) -> BattleResult {
    let owners = [sides[0].unit.owner, sides[1].unit.owner];
    let mut result = BattleResult::empty();

    for side in Side::ALL {
        let combatant = &mut sides[side.index()];
        let slot = combatant.slot;
        if combatant.unit.is_destroyed() {
            result = result.union(BattleResult::destroyed(side));
            env.record(CombatEvent::UnitDestroyed { slot });
        } else if combatant.unit.is_crewless_ship() {
            let captor = owners[side.flip().index()];
            if env.rng.chance(env.config.capture_odds.player(captor)) {
                trace!(tick = env.tick, slot, captor, "Unit captured");
                combatant.unit.owner = captor;
                result = result.union(BattleResult::captured(side));
                env.record(CombatEvent::UnitCaptured { slot, by: captor });
            } else {
                // Boarding failed; the hulk is scuttled.
                combatant.unit.damage = combatant.unit.damage.max(DAMAGE_LIMIT);
                result = result.union(BattleResult::destroyed(side));
                env.record(CombatEvent::UnitDestroyed { slot });
            }
        }
    }
    result
}
