//! Fixed-point math utilities for the fleet arena.
//!
//! Group positions in the fleet engine are fixed-point so that every
//! platform computes identical distances and movement. Floating-point
//! operations can produce different results on different CPUs.

use fixed::types::{I32F32, I64F64};
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all arena math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Arena coordinates are meters and stay far below the integer range.
pub type Fixed = I32F32;

/// Wide fixed-point type for squared distances.
///
/// Squared distances between arena corners exceed the range of [`Fixed`].
pub type Wide = I64F64;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Create a vector from whole-meter coordinates.
    #[must_use]
    pub fn from_meters(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Wide {
        let dx = Wide::from_num(self.x - other.x);
        let dy = Wide::from_num(self.y - other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        Fixed::saturating_from_num(wide_sqrt(self.distance_squared(other)))
    }

    /// Check whether `other` lies within `range` meters of this point.
    #[must_use]
    pub fn is_within(self, other: Self, range: i32) -> bool {
        let range = Wide::from_num(range);
        self.distance_squared(other) <= range * range
    }

    /// Step toward `target` by at most `step`, never closing below `keep_away`.
    ///
    /// Returns the new position; stays put if already at or inside `keep_away`.
    #[must_use]
    pub fn move_towards(self, target: Self, step: Fixed, keep_away: Fixed) -> Self {
        let distance = self.distance(target);
        if distance <= keep_away || distance == Fixed::ZERO {
            return self;
        }

        let travel = step.min(distance - keep_away);
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        Self::new(
            self.x + dx * travel / distance,
            self.y + dy * travel / distance,
        )
    }
}

/// Computes the square root of a wide fixed-point number using binary search.
fn wide_sqrt(value: Wide) -> Wide {
    if value <= Wide::ZERO {
        return Wide::ZERO;
    }

    let mut low = Wide::ZERO;
    let mut high = if value > Wide::from_num(1) {
        value
    } else {
        Wide::from_num(1)
    };

    for _ in 0..96 {
        let mid = low + (high - low) / Wide::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
