//! # VCR Core
//!
//! Deterministic battle engine for recorded space combat.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math in the arena (uses fixed-point)
//!
//! The same battle record, rules options and component catalog always play
//! out the same way, so results can be recomputed on any machine and
//! compared with the outcome the host reported.
//!
//! ## Crate Structure
//!
//! - [`battle`] - The [`Battle`](battle::Battle) contract and [`AnyBattle`](battle::AnyBattle)
//! - [`classic`] - One-on-one battles under several rules variants
//! - [`flak`] - Fleet battles between groups of units
//! - [`cache`] - Computed-once result tiers
//! - [`score`] - Build points, experience and tonnage awards
//! - [`config`] / [`catalog`] - Read-only inputs battles are played against

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod cache;
pub mod catalog;
pub mod classic;
pub mod config;
pub mod damage;
pub mod error;
pub mod events;
pub mod flak;
pub mod math;
pub mod object;
pub mod random;
pub mod score;
pub mod summary;
pub mod types;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{AnyBattle, Battle, BattleContext};
    pub use crate::catalog::{ComponentCatalog, HullSpec, WeaponSpec};
    pub use crate::classic::{ClassicBattle, ClassicResult, Variant};
    pub use crate::config::HostConfig;
    pub use crate::error::{Result, VcrError};
    pub use crate::events::{CombatEvent, EventSink, Statistic};
    pub use crate::flak::{FlakBattle, FlakResult, GroupInfo};
    pub use crate::object::Object;
    pub use crate::score::{Score, ScoreRange};
    pub use crate::summary::{GroupedNumbers, NoTranslation, NumberedPlayers};
    pub use crate::types::{AuxInfo, BattleResult, Playability, ResultLevel, Side};
}
