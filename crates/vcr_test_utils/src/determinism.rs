//! Determinism testing utilities.
//!
//! Provides a harness for verifying that battles produce identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! A recorded battle is only useful if every client recomputes the same
//! outcome the host reported. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   Positions use fixed-point arithmetic via [`vcr_core::math::Fixed`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Engines iterate units in slot order only.
//!
//! - **System randomness**: Every roll comes from the battle's seeded
//!   generator.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual rules (damage, recharge, hit odds)
//! 2. **Property tests**: Random units and seeds must still replay exactly
//! 3. **Integration tests**: Full scenarios are reproducible
//! 4. **Parallel tests**: Running N battles on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use tracing::debug;

use vcr_core::battle::{AnyBattle, Battle, BattleContext};
use vcr_core::events::CombatEvent;
use vcr_core::object::{snapshot_digest, Object};
use vcr_core::types::ResultLevel;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Digests from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique digests (should be 1 for a deterministic battle).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the battle was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different digests.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Unique digests: {} (expected 1)\n\
                 All digests: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Digest of a battle's complete result.
///
/// Covers every "after" snapshot, every outcome code and the result flags,
/// so two battles digest equally exactly when they ended the same way.
///
/// # Panics
///
/// Panics if the snapshots cannot be serialized.
pub fn battle_digest(battle: &impl Battle, ctx: &BattleContext<'_>) -> u64 {
    battle.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);

    let after: Vec<Object> = (0..battle.num_objects())
        .filter_map(|slot| battle.object(slot, true).cloned())
        .collect();
    let outcomes: Vec<i32> = (0..battle.num_objects())
        .map(|slot| battle.outcome(ctx, slot))
        .collect();
    let flags = battle.battle_result().map(|r| r.bits());

    let snapshots = snapshot_digest(&after).unwrap();
    compute_hash(&(snapshots, outcomes, flags))
}

/// Build a battle several times and verify every build ends the same way.
///
/// # Arguments
///
/// * `runs` - Number of fresh battles to play
/// * `ctx` - Rules and catalog every run is played against
/// * `setup` - Function to create the battle
///
/// # Example
///
/// ```ignore
/// use vcr_test_utils::determinism::verify_determinism;
/// use vcr_test_utils::fixtures;
///
/// let result = verify_determinism(5, &ctx, fixtures::scenario_a);
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<B, Setup>(
    runs: usize,
    ctx: &BattleContext<'_>,
    setup: Setup,
) -> DeterminismResult
where
    B: Battle,
    Setup: Fn() -> B,
{
    let hashes: Vec<u64> = (0..runs).map(|_| battle_digest(&setup(), ctx)).collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    debug!(runs, is_deterministic, "Determinism check finished");

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Verify that asking for the same result twice does not change it.
///
/// Prepares the quick tier, then the complete tier, then the complete tier
/// again on one battle, and compares against a fresh battle that went
/// straight to the complete tier.
pub fn verify_idempotence<B, Setup>(ctx: &BattleContext<'_>, setup: Setup) -> bool
where
    B: Battle,
    Setup: Fn() -> B,
{
    let stepped = setup();
    stepped.prepare_result(ctx, ResultLevel::QUICK_OUTCOME);
    let quick: Vec<i32> = (0..stepped.num_objects())
        .map(|slot| stepped.outcome(ctx, slot))
        .collect();
    let first = battle_digest(&stepped, ctx);
    let second = battle_digest(&stepped, ctx);

    let direct = setup();
    let fresh = battle_digest(&direct, ctx);
    let complete: Vec<i32> = (0..direct.num_objects())
        .map(|slot| direct.outcome(ctx, slot))
        .collect();

    first == second && first == fresh && quick == complete
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Result digest from each battle.
    pub hashes: Vec<u64>,
    /// Number of battles run.
    pub num_runs: usize,
}

impl ParallelRunResult {
    /// Check if all battles produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all battles matched.
    ///
    /// # Panics
    ///
    /// Panics if battles produced different digests.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Battles: {}\n\
                 Unique digests: {}\n\
                 All digests: {:?}",
                self.num_runs,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Play N copies of a battle on scoped threads and collect their digests.
///
/// Each thread builds its own battle; the rules and catalog are shared
/// read-only.
pub fn run_parallel_battles_scoped<B, F>(
    ctx: &BattleContext<'_>,
    setup_fn: F,
    num_runs: usize,
) -> ParallelRunResult
where
    B: Battle,
    F: Fn() -> B + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| s.spawn(|| battle_digest(&setup_fn(), ctx)))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    debug!(num_runs, "Parallel battles finished");

    ParallelRunResult { hashes, num_runs }
}

/// Replay two copies of a battle and find the first tick where their event
/// streams differ.
///
/// Useful for debugging non-determinism by finding exactly when battles
/// start to differ.
///
/// # Returns
///
/// `None` if the streams are identical, `Some(tick)` at the first tick
/// where an event differs or one stream ends early.
pub fn find_first_divergence<F>(ctx: &BattleContext<'_>, setup_fn: F) -> Option<u32>
where
    F: Fn() -> AnyBattle,
{
    let mut first: Vec<(u32, CombatEvent)> = Vec::new();
    let mut second: Vec<(u32, CombatEvent)> = Vec::new();
    setup_fn().replay(ctx, &mut first);
    setup_fn().replay(ctx, &mut second);

    for (a, b) in first.iter().zip(&second) {
        if a != b {
            debug!(first = ?a, second = ?b, "Event streams diverged");
            return Some(a.0.min(b.0));
        }
    }
    match first.len().cmp(&second.len()) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(second[first.len()].0),
        std::cmp::Ordering::Greater => Some(first[second.len()].0),
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible battle inputs for
/// property-based testing. Weapon types stay within
/// [`standard_catalog`](crate::fixtures::standard_catalog).
pub mod strategies {
    use proptest::prelude::*;
    use vcr_core::classic::Variant;
    use vcr_core::object::Object;

    /// Generate a battle seed.
    pub fn arb_seed() -> impl Strategy<Value = u32> {
        any::<u32>()
    }

    /// Generate a playable classic rules variant.
    pub fn arb_variant() -> impl Strategy<Value = Variant> {
        prop_oneof![
            Just(Variant::Host),
            Just(Variant::PHost2),
            Just(Variant::PHost3),
            Just(Variant::PHost4),
            Just(Variant::NuHost),
        ]
    }

    /// Generate a well-formed armed or unarmed ship.
    ///
    /// Ranges: mass 20-1000, crew 0-800, shield 0-100, damage 0-99.
    pub fn arb_ship(owner: u8) -> impl Strategy<Value = Object> {
        (
            (1u16..500, 20i32..1000, 0i32..800, 0i32..=100, 0i32..100),
            (0i32..=10, 1i32..=10, 0i32..=10, 1i32..=10, 0i32..60),
            (0i32..=10, 0i32..40, 0i32..=4),
        )
            .prop_map(
                move |(
                    (id, mass, crew, shield, damage),
                    (beams, beam_type, launchers, torp_type, torps),
                    (bays, fighters, experience),
                )| {
                    Object::ship(id, owner, format!("Ship {id}"))
                        .with_hull_state(mass, crew, shield)
                        .with_damage(damage)
                        .with_beams(beam_type, beams)
                        .with_torpedoes(torp_type, launchers, torps)
                        .with_fighters(bays, fighters)
                        .with_experience(experience)
                },
            )
    }

    /// Generate a well-formed planet.
    pub fn arb_planet(owner: u8) -> impl Strategy<Value = Object> {
        (1u16..500, 50i32..500, 0i32..=100, 0i32..=10, 1i32..=10, 0i32..30).prop_map(
            move |(id, mass, shield, beams, beam_type, fighters)| {
                Object::planet(id, owner, format!("Planet {id}"))
                    .with_hull_state(mass, 0, shield)
                    .with_beams(beam_type, beams)
                    .with_fighters(fighters.min(20), fighters)
            },
        )
    }

    /// Generate a ship or a planet.
    pub fn arb_unit(owner: u8) -> impl Strategy<Value = Object> {
        prop_oneof![4 => arb_ship(owner), 1 => arb_planet(owner)]
    }
}
