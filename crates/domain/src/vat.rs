// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! VAT rate classification.
//!
//! Product prices are VAT-inclusive. The VAT portion of a unit price
//! at rate `r` is `price * r / (100 + r)`, rounded to the cent.

use crate::error::DomainError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// VAT rate applied to a product and snapshotted onto order lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VatRate {
    /// VAT exempt (0%).
    Free,
    /// Zero-rated (0%), distinct from exempt for reporting.
    Zero,
    /// Reduced rate (9%).
    Low,
    /// Standard rate (21%).
    High,
}

impl VatRate {
    /// Returns the rate as a whole percentage.
    #[must_use]
    pub const fn percentage(&self) -> i64 {
        match self {
            Self::Free | Self::Zero => 0,
            Self::Low => 9,
            Self::High => 21,
        }
    }

    /// Returns the tag used for persistence and on the wire. Matches
    /// the serde representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Zero => "zero",
            Self::Low => "low",
            Self::High => "high",
        }
    }

    /// Extracts the VAT portion of a VAT-inclusive unit price.
    #[must_use]
    pub const fn unit_vat(&self, unit_price: Money) -> Money {
        let rate = self.percentage();
        if rate == 0 {
            Money::ZERO
        } else {
            unit_price.mul_ratio_rounded(rate, 100 + rate)
        }
    }
}

impl FromStr for VatRate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "zero" => Ok(Self::Zero),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidVatRate(s.to_string())),
        }
    }
}

impl std::fmt::Display for VatRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}%)", self.as_str(), self.percentage())
    }
}
