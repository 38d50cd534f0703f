//! Capacity quantities.
//!
//! Capacities, requirement ceilings and column totals are all megawatts.
//! Wrapping them in [`Megawatts`] keeps them from being mixed with tariffs or
//! order indices, which are plain numbers on the same records.
//!
//! ```
//! use lotboard_core::units::Megawatts;
//!
//! let total: Megawatts = [Megawatts(40.0), Megawatts(50.0)].iter().sum();
//! assert_eq!(total, Megawatts(90.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Active power capacity in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl Megawatts {
    pub const ZERO: Megawatts = Megawatts(0.0);

    /// Create a new value
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw numeric value
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Add for Megawatts {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Megawatts {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Megawatts {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Megawatts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} MW", self.0)
    }
}

impl std::iter::Sum for Megawatts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|x| x.0).sum())
    }
}

impl<'a> std::iter::Sum<&'a Megawatts> for Megawatts {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        Self(iter.map(|x| x.0).sum())
    }
}
