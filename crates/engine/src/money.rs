use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Signed amount expressed in **millions of currency units**.
///
/// Use this type for every card amount and every aggregate total. The three
/// ledgers must agree under exact integer arithmetic, so no floating-point
/// value ever enters a sum.
///
/// The value is signed:
/// - positive = ordinary flow
/// - negative = decumulation (e.g. an inventory draw-down)
///
/// # Examples
///
/// ```rust
/// use engine::Millions;
///
/// let amount = Millions::new(40);
/// assert_eq!(amount.value(), 40);
/// assert_eq!(amount.to_string(), "40M€");
/// assert_eq!((-amount).to_string(), "-40M€");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Millions(i64);

impl Millions {
    pub const ZERO: Millions = Millions(0);

    /// Creates a new amount from integer millions.
    #[must_use]
    pub const fn new(millions: i64) -> Self {
        Self(millions)
    }

    /// Returns the raw value in millions.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Millions {
        Millions(self.0.abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Millions) -> Option<Millions> {
        self.0.checked_add(rhs.0).map(Millions)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Millions) -> Option<Millions> {
        self.0.checked_sub(rhs.0).map(Millions)
    }
}

impl fmt::Display for Millions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}M€", self.0)
    }
}

impl From<i64> for Millions {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Millions> for i64 {
    fn from(value: Millions) -> Self {
        value.0
    }
}

impl Add for Millions {
    type Output = Millions;

    fn add(self, rhs: Millions) -> Self::Output {
        Millions(self.0 + rhs.0)
    }
}

impl AddAssign for Millions {
    fn add_assign(&mut self, rhs: Millions) {
        self.0 += rhs.0;
    }
}

impl Sub for Millions {
    type Output = Millions;

    fn sub(self, rhs: Millions) -> Self::Output {
        Millions(self.0 - rhs.0)
    }
}

impl SubAssign for Millions {
    fn sub_assign(&mut self, rhs: Millions) {
        self.0 -= rhs.0;
    }
}

impl Neg for Millions {
    type Output = Millions;

    fn neg(self) -> Self::Output {
        Millions(-self.0)
    }
}

impl Sum for Millions {
    fn sum<I: Iterator<Item = Millions>>(iter: I) -> Self {
        Millions(iter.map(|m| m.0).sum())
    }
}

impl<'a> Sum<&'a Millions> for Millions {
    fn sum<I: Iterator<Item = &'a Millions>>(iter: I) -> Self {
        Millions(iter.map(|m| m.0).sum())
    }
}
