//! Small value types shared by both battle engines.

use serde::{Deserialize, Serialize};

/// One side of a classic one-on-one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left unit (slot 0).
    Left,
    /// Right unit (slot 1).
    Right,
}

impl Side {
    /// Both sides in slot order.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// The opposing side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Slot index of this side.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Side for a slot index, if any.
    #[must_use]
    pub const fn from_index(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Side::Left),
            1 => Some(Side::Right),
            _ => None,
        }
    }
}

/// Terminal state of a classic battle.
///
/// Normally a single flag; two flags appear when both sides reach a terminal
/// state in the same tick.
///
/// # Example
///
/// ```
/// use vcr_core::types::BattleResult;
///
/// let result = BattleResult::LEFT_DESTROYED.union(BattleResult::RIGHT_CAPTURED);
/// assert!(result.contains(BattleResult::LEFT_DESTROYED));
/// assert!(!result.contains(BattleResult::TIMEOUT));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BattleResult(u16);

impl BattleResult {
    /// Left unit destroyed.
    pub const LEFT_DESTROYED: Self = Self(1 << 0);
    /// Right unit destroyed.
    pub const RIGHT_DESTROYED: Self = Self(1 << 1);
    /// Left unit captured.
    pub const LEFT_CAPTURED: Self = Self(1 << 2);
    /// Right unit captured.
    pub const RIGHT_CAPTURED: Self = Self(1 << 3);
    /// Tick budget exhausted.
    pub const TIMEOUT: Self = Self(1 << 4);
    /// Neither side can inflict damage.
    pub const STALEMATE: Self = Self(1 << 5);
    /// Battle could not be played.
    pub const INVALID: Self = Self(1 << 6);

    /// Empty set (battle still running).
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if all flags in `other` are set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any flags in `other` are set in `self`.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Union of flags.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// "Destroyed" flag for a side.
    #[must_use]
    pub const fn destroyed(side: Side) -> Self {
        match side {
            Side::Left => Self::LEFT_DESTROYED,
            Side::Right => Self::RIGHT_DESTROYED,
        }
    }

    /// "Captured" flag for a side.
    #[must_use]
    pub const fn captured(side: Side) -> Self {
        match side {
            Side::Left => Self::LEFT_CAPTURED,
            Side::Right => Self::RIGHT_CAPTURED,
        }
    }
}

/// Classification of whether a battle can be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Playability {
    /// Battle can be played.
    IsPlayable,
    /// Recognized but not played by design (unsupported rules or features).
    IsNotSupported,
    /// Structurally broken, possibly corrupt data.
    IsDamaged,
}

impl Playability {
    /// User-facing explanation.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Playability::IsPlayable => "playable",
            Playability::IsNotSupported => "not played by design",
            Playability::IsDamaged => "possibly corrupt data",
        }
    }
}

/// Keys for per-battle auxiliary metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxInfo {
    /// Random seed.
    Seed,
    /// Record signature.
    Magic,
    /// Record type word.
    Type,
    /// Capability flags.
    Flags,
    /// Fleet battle ambient flags.
    Ambient,
}

/// Requested result detail, accumulated by `prepare_result`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResultLevel(u8);

impl ResultLevel {
    /// Per-unit outcome codes only.
    pub const QUICK_OUTCOME: Self = Self(1 << 0);
    /// After snapshots and statistics.
    pub const COMPLETE_RESULT: Self = Self(1 << 1);

    /// Nothing requested.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if all levels in `other` are set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of levels.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}
