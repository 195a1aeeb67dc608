//! Deterministic random sources, one per engine family.
//!
//! Every historical rules family drew its combat rolls from its own
//! generator, and none of them is shared across families.
//!
//! - [`TableRandom`]: reads a caller-supplied [`RandomTable`] from a position
//!   derived from the seed. Host records are played this way when the table
//!   is available.
//! - [`BorlandRandom`]: 32-bit linear congruential generator, PHost family
//!   and the fleet engine.
//! - [`QuickBasicRandom`], [`SubtractiveRandom`]: stand-ins for Host and
//!   NuHost when no table is supplied. They are deterministic, but their
//!   sequences are not those of recorded battles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VcrError};

/// A deterministic source of combat rolls.
pub trait RandomSource {
    /// Return a value in `0..limit`; returns 0 when `limit` is 0.
    fn next_below(&mut self, limit: u16) -> u16;

    /// Roll a percentage check.
    ///
    /// Certain outcomes (`percent <= 0` or `percent >= 100`) do not consume
    /// a roll.
    fn chance(&mut self, percent: i32) -> bool {
        if percent <= 0 {
            false
        } else if percent >= 100 {
            true
        } else {
            i32::from(self.next_below(100)) < percent
        }
    }
}

/// 24-bit linear congruential generator.
///
/// Stand-in for the Host family; see the module docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickBasicRandom {
    state: u32,
}

impl QuickBasicRandom {
    const MULTIPLIER: u32 = 0x00FD_43FD;
    const INCREMENT: u32 = 0x00C3_9EC3;
    const MASK: u32 = 0x00FF_FFFF;

    /// Create a generator from a battle seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: seed & Self::MASK,
        }
    }
}

impl RandomSource for QuickBasicRandom {
    fn next_below(&mut self, limit: u16) -> u16 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MASK;
        ((u64::from(self.state) * u64::from(limit)) >> 24) as u16
    }
}

/// 32-bit linear congruential generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorlandRandom {
    seed: u32,
}

impl BorlandRandom {
    const MULTIPLIER: u32 = 0x0808_8405;

    /// Create a generator from a battle seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl RandomSource for BorlandRandom {
    fn next_below(&mut self, limit: u16) -> u16 {
        self.seed = self.seed.wrapping_mul(Self::MULTIPLIER).wrapping_add(1);
        (((self.seed >> 16) * u32::from(limit)) >> 16) as u16
    }
}

/// Knuth subtractive generator with a 55-entry lag table.
///
/// Stand-in for NuHost; see the module docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtractiveRandom {
    table: [i32; 56],
    next: usize,
    next_p: usize,
}

impl SubtractiveRandom {
    const MBIG: i32 = i32::MAX;
    const MSEED: i32 = 161_803_398;

    /// Create a generator from a battle seed.
    #[must_use]
    pub fn new(seed: i32) -> Self {
        let mut table = [0i32; 56];
        let subtraction = if seed == i32::MIN {
            i32::MAX
        } else {
            seed.abs()
        };
        let mut mj = Self::MSEED - subtraction;
        table[55] = mj;
        let mut mk = 1i32;
        for i in 1..55 {
            let ii = (21 * i) % 55;
            table[ii] = mk;
            mk = mj - mk;
            if mk < 0 {
                mk += Self::MBIG;
            }
            mj = table[ii];
        }
        for _ in 1..5 {
            for i in 1..56 {
                table[i] = table[i].wrapping_sub(table[1 + (i + 30) % 55]);
                if table[i] < 0 {
                    table[i] += Self::MBIG;
                }
            }
        }
        Self {
            table,
            next: 0,
            next_p: 21,
        }
    }

    fn internal_sample(&mut self) -> i32 {
        self.next += 1;
        if self.next >= 56 {
            self.next = 1;
        }
        self.next_p += 1;
        if self.next_p >= 56 {
            self.next_p = 1;
        }
        let mut value = self.table[self.next] - self.table[self.next_p];
        if value == Self::MBIG {
            value -= 1;
        }
        if value < 0 {
            value += Self::MBIG;
        }
        self.table[self.next] = value;
        value
    }
}

impl RandomSource for SubtractiveRandom {
    fn next_below(&mut self, limit: u16) -> u16 {
        // Double-precision scaling is part of this generator's definition;
        // IEEE arithmetic keeps it reproducible.
        let sample = f64::from(self.internal_sample()) * (1.0 / f64::from(Self::MBIG));
        (sample * f64::from(limit)) as u16
    }
}

/// Lookup table of roll values for [`TableRandom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u16>", into = "Vec<u16>")]
pub struct RandomTable(Arc<[u16]>);

impl RandomTable {
    /// Wrap a list of roll values.
    ///
    /// # Errors
    ///
    /// [`VcrError::EmptyRandomTable`] for an empty list.
    pub fn new(values: Vec<u16>) -> Result<Self> {
        if values.is_empty() {
            return Err(VcrError::EmptyRandomTable);
        }
        Ok(Self(values.into()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty tables are rejected on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u16>> for RandomTable {
    type Error = VcrError;

    fn try_from(values: Vec<u16>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<RandomTable> for Vec<u16> {
    fn from(table: RandomTable) -> Self {
        table.0.to_vec()
    }
}

/// Reads roll values from a [`RandomTable`].
///
/// The first roll reads entry `seed % len`; each roll advances one entry and
/// wraps at the end. An entry is reduced modulo the requested bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRandom {
    table: Arc<[u16]>,
    position: usize,
}

impl TableRandom {
    /// Create a generator from a battle seed.
    #[must_use]
    pub fn new(table: &RandomTable, seed: u32) -> Self {
        let table = Arc::clone(&table.0);
        let position = seed as usize % table.len();
        Self { table, position }
    }
}

impl RandomSource for TableRandom {
    fn next_below(&mut self, limit: u16) -> u16 {
        let value = self.table[self.position];
        self.position = (self.position + 1) % self.table.len();
        if limit == 0 {
            0
        } else {
            value % limit
        }
    }
}

/// Which generator a rules family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomFamily {
    /// [`QuickBasicRandom`], or [`TableRandom`] when a table is supplied.
    QuickBasic,
    /// [`BorlandRandom`].
    Borland,
    /// [`SubtractiveRandom`], or [`TableRandom`] when a table is supplied.
    Subtractive,
}

impl RandomFamily {
    /// Whether the built-in generator of this family stands in for an
    /// unavailable historical one.
    #[must_use]
    pub const fn is_stand_in(self) -> bool {
        matches!(self, RandomFamily::QuickBasic | RandomFamily::Subtractive)
    }
}

/// A generator of any family, dispatched without boxing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomGenerator {
    /// Host family.
    QuickBasic(QuickBasicRandom),
    /// PHost family and fleet engine.
    Borland(BorlandRandom),
    /// NuHost.
    Subtractive(SubtractiveRandom),
    /// Caller-supplied table.
    Table(TableRandom),
}

impl RandomGenerator {
    /// Seed a generator of the given family.
    #[must_use]
    pub fn new(family: RandomFamily, seed: u32) -> Self {
        match family {
            RandomFamily::QuickBasic => Self::QuickBasic(QuickBasicRandom::new(seed)),
            RandomFamily::Borland => Self::Borland(BorlandRandom::new(seed)),
            RandomFamily::Subtractive => {
                Self::Subtractive(SubtractiveRandom::new(seed as i32))
            }
        }
    }

    /// Seed a generator for a battle: `table` replaces the family's
    /// stand-in generator, and is ignored by the other families.
    #[must_use]
    pub fn for_battle(family: RandomFamily, seed: u32, table: Option<&RandomTable>) -> Self {
        match table {
            Some(table) if family.is_stand_in() => Self::Table(TableRandom::new(table, seed)),
            _ => Self::new(family, seed),
        }
    }
}

impl RandomSource for RandomGenerator {
    fn next_below(&mut self, limit: u16) -> u16 {
        match self {
            Self::QuickBasic(rng) => rng.next_below(limit),
            Self::Borland(rng) => rng.next_below(limit),
            Self::Subtractive(rng) => rng.next_below(limit),
            Self::Table(rng) => rng.next_below(limit),
        }
    }
}
