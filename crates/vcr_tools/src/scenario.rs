//! Scenario loading.
//!
//! A scenario file is a RON document holding everything needed to replay one
//! battle: rules options, the component catalog and the decoded battle
//! record.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vcr_core::battle::{AnyBattle, BattleContext};
use vcr_core::catalog::ComponentCatalog;
use vcr_core::classic::{ClassicBattle, Variant};
use vcr_core::config::HostConfig;
use vcr_core::error::VcrError;
use vcr_core::flak::{FlakBattle, GroupInfo};
use vcr_core::object::Object;
use vcr_core::random::RandomTable;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Options or battle record rejected by the engine.
    #[error(transparent)]
    Engine(#[from] VcrError),
}

/// Decoded battle record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleRecord {
    /// One-on-one battle.
    Classic {
        /// Left participant.
        left: Object,
        /// Right participant.
        right: Object,
        /// Random seed.
        seed: u32,
        /// Rules variant.
        variant: Variant,
        /// Record signature.
        #[serde(default)]
        magic: i32,
        /// Record type word.
        #[serde(default)]
        record_type: i32,
        /// Capability flags.
        #[serde(default)]
        capabilities: i32,
    },
    /// Fleet battle.
    Fleet {
        /// Participants, grouped contiguously.
        objects: Vec<Object>,
        /// Group descriptions.
        groups: Vec<GroupInfo>,
        /// Random seed.
        seed: u32,
        /// Ambient flags.
        #[serde(default)]
        ambient: i32,
    },
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Rules options.
    #[serde(default)]
    pub config: HostConfig,
    /// Option overrides in `Name: "value"` form, applied on top of `config`.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Weapon and hull definitions.
    pub catalog: ComponentCatalog,
    /// Roll table for Host and NuHost battles.
    #[serde(default)]
    pub random_table: Option<RandomTable>,
    /// The battle to play.
    pub battle: BattleRecord,
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a scenario and apply its option overrides.
    pub fn from_ron(text: &str) -> Result<Self, ScenarioError> {
        let mut scenario: Scenario = ron::from_str(text)?;
        let overrides = std::mem::take(&mut scenario.options);
        for (name, value) in &overrides {
            scenario.config.set_option(name, value)?;
        }
        scenario.options = overrides;
        Ok(scenario)
    }

    /// Read-only inputs the battle is played against.
    pub fn context(&self) -> BattleContext<'_> {
        let ctx = BattleContext::new(&self.config, &self.catalog);
        match &self.random_table {
            Some(table) => ctx.with_random_table(table),
            None => ctx,
        }
    }

    /// Build a fresh battle from the record.
    pub fn build(&self) -> Result<AnyBattle, ScenarioError> {
        let battle = match &self.battle {
            BattleRecord::Classic {
                left,
                right,
                seed,
                variant,
                magic,
                record_type,
                capabilities,
            } => ClassicBattle::new(left.clone(), right.clone(), *seed, *variant)
                .with_signature(*magic, *record_type)
                .with_capabilities(*capabilities)
                .into(),
            BattleRecord::Fleet {
                objects,
                groups,
                seed,
                ambient,
            } => FlakBattle::new(objects.clone(), groups.clone(), *seed)?
                .with_ambient(*ambient)
                .into(),
        };
        Ok(battle)
    }
}
