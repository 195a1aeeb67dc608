//! The battle contract shared by every caller.
//!
//! Viewers, scoring and scripting all talk to battles through [`Battle`].
//! There are exactly two implementations, [`ClassicBattle`] and
//! [`FlakBattle`]; [`AnyBattle`] carries either one.

use tracing::warn;

use crate::catalog::ComponentCatalog;
use crate::classic::ClassicBattle;
use crate::config::HostConfig;
use crate::events::{EventSink, Statistic};
use crate::flak::FlakBattle;
use crate::object::Object;
use crate::random::RandomTable;
use crate::score::Score;
use crate::summary::{self, NumberFormatter, PlayerNames, Translator, UnitOutcome};
use crate::types::{AuxInfo, BattleResult, Playability, ResultLevel};

/// Read-only inputs a battle is played against.
///
/// Borrowed for the duration of one call; battles never keep or mutate them.
#[derive(Debug, Clone, Copy)]
pub struct BattleContext<'a> {
    /// Rules options.
    pub config: &'a HostConfig,
    /// Weapon and hull definitions.
    pub catalog: &'a ComponentCatalog,
    /// Roll table for rules families whose generator reads one.
    pub random_table: Option<&'a RandomTable>,
}

impl<'a> BattleContext<'a> {
    /// Bundle the read-only inputs.
    #[must_use]
    pub const fn new(config: &'a HostConfig, catalog: &'a ComponentCatalog) -> Self {
        Self {
            config,
            catalog,
            random_table: None,
        }
    }

    /// Builder method to supply the roll table.
    ///
    /// Host and NuHost battles then draw every roll from `table` instead of
    /// their stand-in generators.
    #[must_use]
    pub const fn with_random_table(self, table: &'a RandomTable) -> Self {
        Self {
            random_table: Some(table),
            ..self
        }
    }
}

/// Uniform interface to a recorded battle.
///
/// All methods take `&self`: results are filled into computed-once caches
/// and never change afterwards. A battle is not `Sync`; use one thread at a
/// time per battle.
pub trait Battle {
    /// Number of participants (fixed, at least 1).
    fn num_objects(&self) -> usize;

    /// Snapshot of a participant.
    ///
    /// With `after`, returns the post-battle snapshot if the complete result
    /// is available and the "before" snapshot otherwise.
    fn object(&self, slot: usize, after: bool) -> Option<&Object>;

    /// Classify whether the battle can be played.
    fn playability(&self, ctx: &BattleContext<'_>) -> Playability;

    /// Compute result tiers; satisfied tiers are never recomputed.
    ///
    /// The quick tier plays the same tick loop as the complete tier. It only
    /// skips collecting statistics and keeping the "after" snapshots, so it
    /// costs nearly as much as the complete tier.
    fn prepare_result(&self, ctx: &BattleContext<'_>, level: ResultLevel);

    /// Result flags, if the quick outcome is available.
    fn battle_result(&self) -> Option<BattleResult>;

    /// Outcome code of a participant: `-1` destroyed, `0` survived (or
    /// unplayable, or no such slot), positive = captured by that player.
    fn outcome(&self, ctx: &BattleContext<'_>, slot: usize) -> i32;

    /// Auxiliary metadata, `None` where this engine does not define `key`.
    fn auxiliary_information(&self, key: AuxInfo) -> Option<i32>;

    /// Name of the combat algorithm.
    fn algorithm_name(&self) -> &'static str;

    /// Whether engine-shield bonus applies in this battle.
    fn is_esb_active(&self, ctx: &BattleContext<'_>) -> bool;

    /// Statistics of a participant, once the complete result is available.
    fn statistic(&self, slot: usize) -> Option<&Statistic>;

    /// Awards for a surviving participant; `None` means "no score".
    fn compute_scores(&self, ctx: &BattleContext<'_>, slot: usize) -> Option<Score>;

    /// One-sentence summary for `viewpoint`, with a score suffix if any of
    /// the viewpoint's surviving units earned build points.
    fn result_summary(
        &self,
        ctx: &BattleContext<'_>,
        viewpoint: u8,
        names: &dyn PlayerNames,
        tx: &dyn Translator,
        fmt: &dyn NumberFormatter,
    ) -> String {
        let units: Vec<UnitOutcome> = (0..self.num_objects())
            .filter_map(|slot| {
                self.object(slot, false).map(|obj| UnitOutcome {
                    owner: obj.owner,
                    outcome: self.outcome(ctx, slot),
                })
            })
            .collect();
        let kind = summary::classify(viewpoint, &units);

        let mut owners: Vec<u8> = units.iter().map(|u| u.owner).collect();
        owners.sort_unstable();
        owners.dedup();

        let score = units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.owner == viewpoint)
            .filter_map(|(slot, _)| self.compute_scores(ctx, slot))
            .map(|s| s.build_millipoints)
            .reduce(|a, b| crate::score::ScoreRange::new(a.min + b.min, a.max + b.max))
            .filter(|range| range.max > 0);

        summary::render(kind, &owners, score, names, tx, fmt)
    }
}

/// Either kind of battle.
#[derive(Debug)]
pub enum AnyBattle {
    /// One-on-one battle.
    Classic(ClassicBattle),
    /// Fleet battle.
    Flak(FlakBattle),
}

impl From<ClassicBattle> for AnyBattle {
    fn from(battle: ClassicBattle) -> Self {
        AnyBattle::Classic(battle)
    }
}

impl From<FlakBattle> for AnyBattle {
    fn from(battle: FlakBattle) -> Self {
        AnyBattle::Flak(battle)
    }
}

impl AnyBattle {
    fn inner(&self) -> &dyn Battle {
        match self {
            AnyBattle::Classic(b) => b,
            AnyBattle::Flak(b) => b,
        }
    }

    /// Play the battle again from the start, reporting every event to
    /// `sink`. Returns `None` if the battle is not playable.
    pub fn replay(&self, ctx: &BattleContext<'_>, sink: &mut impl EventSink) -> Option<BattleResult> {
        match self {
            AnyBattle::Classic(b) => b.replay(ctx, sink),
            AnyBattle::Flak(b) => b.replay(ctx, sink),
        }
    }
}

impl Battle for AnyBattle {
    fn num_objects(&self) -> usize {
        self.inner().num_objects()
    }

    fn object(&self, slot: usize, after: bool) -> Option<&Object> {
        self.inner().object(slot, after)
    }

    fn playability(&self, ctx: &BattleContext<'_>) -> Playability {
        self.inner().playability(ctx)
    }

    fn prepare_result(&self, ctx: &BattleContext<'_>, level: ResultLevel) {
        self.inner().prepare_result(ctx, level);
    }

    fn battle_result(&self) -> Option<BattleResult> {
        self.inner().battle_result()
    }

    fn outcome(&self, ctx: &BattleContext<'_>, slot: usize) -> i32 {
        self.inner().outcome(ctx, slot)
    }

    fn auxiliary_information(&self, key: AuxInfo) -> Option<i32> {
        self.inner().auxiliary_information(key)
    }

    fn algorithm_name(&self) -> &'static str {
        self.inner().algorithm_name()
    }

    fn is_esb_active(&self, ctx: &BattleContext<'_>) -> bool {
        self.inner().is_esb_active(ctx)
    }

    fn statistic(&self, slot: usize) -> Option<&Statistic> {
        self.inner().statistic(slot)
    }

    fn compute_scores(&self, ctx: &BattleContext<'_>, slot: usize) -> Option<Score> {
        self.inner().compute_scores(ctx, slot)
    }
}

/// Log and pass through a non-playable classification.
pub(crate) fn report_playability(kind: &'static str, playability: Playability) -> Playability {
    if playability != Playability::IsPlayable {
        warn!(kind, reason = playability.describe(), "Battle will not be played");
    }
    playability
}
