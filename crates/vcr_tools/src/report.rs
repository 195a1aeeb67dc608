//! Battle reports.
//!
//! Plays a scenario to the complete tier and collects everything a viewer
//! shows about it into one serializable record.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vcr_core::battle::Battle;
use vcr_core::events::{CombatEvent, Statistic};
use vcr_core::score::Score;
use vcr_core::summary::{GroupedNumbers, NoTranslation, NumberedPlayers};
use vcr_core::types::{Playability, ResultLevel};

use crate::scenario::{Scenario, ScenarioError};

/// Result of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Slot in the battle.
    pub slot: usize,
    /// Ship or planet Id.
    pub id: u16,
    /// Display name.
    pub name: String,
    /// Owner before the battle.
    pub owner_before: u8,
    /// Owner after the battle.
    pub owner_after: u8,
    /// Outcome code.
    pub outcome: i32,
    /// Damage after the battle.
    pub damage: i32,
    /// Shield after the battle.
    pub shield: i32,
    /// Crew after the battle.
    pub crew: i32,
    /// Awards, for surviving units that earned any.
    pub score: Option<Score>,
    /// Battle statistics.
    pub statistic: Option<Statistic>,
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Scenario name.
    pub scenario: String,
    /// Combat algorithm.
    pub algorithm: String,
    /// Playability classification.
    pub playability: Playability,
    /// Result flags, if the battle was played.
    pub result_flags: Option<u16>,
    /// Whether engine-shield bonus applied.
    pub esb_active: bool,
    /// Per-participant results.
    pub units: Vec<UnitReport>,
    /// One summary line per participating player.
    pub summaries: Vec<(u8, String)>,
    /// Tick-by-tick event log, when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<(u32, CombatEvent)>,
}

impl BattleReport {
    /// Check whether the battle was played.
    #[must_use]
    pub fn was_played(&self) -> bool {
        self.playability == Playability::IsPlayable
    }
}

/// Play a scenario and report the complete result.
///
/// With `with_events`, the battle is replayed once more into an event log.
pub fn play(scenario: &Scenario, with_events: bool) -> Result<BattleReport, ScenarioError> {
    let ctx = scenario.context();
    let battle = scenario.build()?;

    let playability = battle.playability(&ctx);
    if playability != Playability::IsPlayable {
        warn!(scenario = %scenario.name, reason = playability.describe(), "Scenario not played");
    }
    battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

    let units: Vec<UnitReport> = (0..battle.num_objects())
        .filter_map(|slot| {
            let before = battle.object(slot, false)?;
            let after = battle.object(slot, true)?;
            Some(UnitReport {
                slot,
                id: before.id,
                name: before.name.clone(),
                owner_before: before.owner,
                owner_after: after.owner,
                outcome: battle.outcome(&ctx, slot),
                damage: after.damage,
                shield: after.shield,
                crew: after.crew,
                score: battle.compute_scores(&ctx, slot),
                statistic: battle.statistic(slot).copied(),
            })
        })
        .collect();

    let mut players: Vec<u8> = units.iter().map(|u| u.owner_before).collect();
    players.sort_unstable();
    players.dedup();
    let summaries = players
        .into_iter()
        .map(|player| {
            let text =
                battle.result_summary(&ctx, player, &NumberedPlayers, &NoTranslation, &GroupedNumbers);
            (player, text)
        })
        .collect();

    let mut events = Vec::new();
    if with_events {
        battle.replay(&ctx, &mut events);
    }

    let report = BattleReport {
        scenario: scenario.name.clone(),
        algorithm: battle.algorithm_name().to_string(),
        playability,
        result_flags: battle.battle_result().map(|r| r.bits()),
        esb_active: battle.is_esb_active(&ctx),
        units,
        summaries,
        events,
    };
    debug!(
        scenario = %report.scenario,
        algorithm = %report.algorithm,
        flags = ?report.result_flags,
        "Scenario played"
    );
    Ok(report)
}
