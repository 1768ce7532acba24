// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exact money arithmetic in euro cents.
//!
//! All order totals must reconcile to the cent, so amounts are stored
//! as integer cents rather than floating point. Multiplication by a
//! quantity and summation are exact; only VAT extraction rounds, and
//! it rounds half-away-from-zero to the nearest cent.

use serde::{Deserialize, Serialize};

/// A monetary amount in euro cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero euros.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies the amount by a quantity.
    ///
    /// Used for line totals (`unit_price × quantity`); exact, no rounding.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }

    /// Multiplies by `numerator / denominator`, rounding half-away-from-zero
    /// to the nearest cent.
    ///
    /// This is the single place where money arithmetic rounds; it backs
    /// VAT extraction from VAT-inclusive prices.
    #[must_use]
    pub const fn mul_ratio_rounded(&self, numerator: i64, denominator: i64) -> Self {
        let scaled = self.0 * numerator;
        let half = denominator / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / denominator
        } else {
            (scaled - half) / denominator
        };
        Self(rounded)
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}\u{20ac}{}.{:02}", abs / 100, abs % 100)
    }
}
