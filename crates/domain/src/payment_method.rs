// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment methods and their administration cost policy.

use crate::error::DomainError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How an order was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in cash at a point of sale.
    Cash,
    /// Paid by card at a point of sale.
    Card,
    /// Paid online via an iDEAL redirect.
    Ideal,
    /// Paid online via a SOFORT redirect.
    Sofort,
    /// Paid via another, manually recorded method.
    Other,
}

impl PaymentMethod {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Ideal => "ideal",
            Self::Sofort => "sofort",
            Self::Other => "other",
        }
    }

    /// Returns true for methods that go through the external payment
    /// provider redirect.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Ideal | Self::Sofort)
    }

    /// Returns the flat administration costs this method carries.
    ///
    /// Redirect methods pass the webshop's flat transaction cost on to
    /// the customer; point-of-sale methods carry none. The validator
    /// rejects orders whose stored costs disagree with this policy.
    #[must_use]
    pub const fn administration_costs(&self, redirect_costs: Money) -> Money {
        if self.is_redirect() {
            redirect_costs
        } else {
            Money::ZERO
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "ideal" => Ok(Self::Ideal),
            "sofort" => Ok(Self::Sofort),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
