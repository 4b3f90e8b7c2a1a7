//! Millisecond timestamps on the decoded timeline.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Sub},
};

/// Number of decimal places kept by every [`Millis`].
pub const MILLIS_PRECISION: i32 = 3;

/// Rounds `value` to [`MILLIS_PRECISION`] decimal places.
#[must_use]
pub fn round_millis(value: f64) -> f64 {
    let scale = 10f64.powi(MILLIS_PRECISION);
    let rounded = (value * scale).round() / scale;
    // Normalizes `-0.0` so that equal timestamps also hash and print equally.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// A finite number of milliseconds, always rounded to three decimal places.
///
/// Rounding on construction keeps grouping by time, issue timestamps and
/// content hashes reproducible regardless of the float path that produced the
/// value. Non-finite inputs collapse to zero.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
#[repr(transparent)]
pub struct Millis(f64);

impl Millis {
    /// Zero milliseconds.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new timestamp, rounding `value` to three decimal places.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(round_millis(value))
        } else {
            Self::ZERO
        }
    }

    /// Gets the internal value.
    #[inline]
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }

    /// Whether this is strictly greater than zero.
    #[inline]
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    /// Rounds down to whole milliseconds.
    #[must_use]
    pub fn floor(self) -> u64 {
        if self.0 <= 0.0 { 0 } else { self.0.floor() as u64 }
    }
}

impl PartialEq for Millis {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Millis {}

impl PartialOrd for Millis {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Millis {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Millis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for Millis {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Millis> for f64 {
    fn from(value: Millis) -> Self {
        value.as_f64()
    }
}

impl Add for Millis {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Millis {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0 - rhs.0)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
