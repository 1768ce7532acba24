// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order status tracking and transition logic.
//!
//! This module is the authoritative definition of legal order states
//! and transitions. Every status-changing operation must pass through
//! [`OrderStatus::validate_transition`]; an illegal transition is
//! rejected loudly, never silently ignored.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order lifecycle states.
///
/// The normal checkout path is `Anonymous → Assigned → Pending`,
/// after which the order resolves to `Paid`, `Cancelled` or `Error`
/// via the payment provider, or is parked as a `Reservation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Freshly created, no customer attached yet.
    Anonymous,
    /// A customer has been attached.
    Assigned,
    /// Sent to the payment provider, outcome not yet known.
    Pending,
    /// Customer opted to reserve instead of paying now; inventory held.
    Reservation,
    /// Payment confirmed; inventory permanently consumed.
    Paid,
    /// Payment attempt cancelled by the customer or provider.
    Cancelled,
    /// Reservation rejected by an administrator.
    Rejected,
    /// Paid order administratively refunded; inventory returned.
    Refunded,
    /// Swept by the time-based expiry of an unfinished order.
    Expired,
    /// Payment outcome could not be resolved; requires operator attention.
    Error,
}

/// All states, in declaration order. Used by closure tests and sweeps.
pub const ALL_STATUSES: [OrderStatus; 10] = [
    OrderStatus::Anonymous,
    OrderStatus::Assigned,
    OrderStatus::Pending,
    OrderStatus::Reservation,
    OrderStatus::Paid,
    OrderStatus::Cancelled,
    OrderStatus::Rejected,
    OrderStatus::Refunded,
    OrderStatus::Expired,
    OrderStatus::Error,
];

impl OrderStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Assigned => "assigned",
            Self::Pending => "pending",
            Self::Reservation => "reservation",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::Refunded => "refunded",
            Self::Expired => "expired",
            Self::Error => "error",
        }
    }

    /// Returns true if no further transition is permitted from this status.
    ///
    /// `Paid` is not terminal: an administrator may still refund it.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Rejected | Self::Refunded | Self::Expired | Self::Error
        )
    }

    /// Returns true if the order has claimed inventory without paying.
    ///
    /// Such orders count against every capacity check via the
    /// `reserved` counters.
    #[must_use]
    pub const fn holds_reservation(&self) -> bool {
        matches!(self, Self::Reservation)
    }

    /// Returns true if the time-based sweep may expire an order in this
    /// status.
    ///
    /// Paid orders never expire; their payment already completed.
    #[must_use]
    pub const fn is_expirable(&self) -> bool {
        matches!(
            self,
            Self::Anonymous | Self::Assigned | Self::Pending | Self::Reservation
        )
    }

    /// Validates that a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if the transition is not
    /// part of the order lifecycle.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Anonymous => matches!(target, Self::Assigned | Self::Expired),
            Self::Assigned => matches!(target, Self::Pending | Self::Expired),
            Self::Pending => matches!(
                target,
                Self::Paid | Self::Cancelled | Self::Error | Self::Reservation | Self::Expired
            ),
            Self::Reservation => {
                matches!(target, Self::Paid | Self::Rejected | Self::Expired)
            }
            Self::Paid => matches!(target, Self::Refunded),
            Self::Cancelled | Self::Rejected | Self::Refunded | Self::Expired | Self::Error => {
                false
            }
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::IllegalTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Self::Anonymous),
            "assigned" => Ok(Self::Assigned),
            "pending" => Ok(Self::Pending),
            "reservation" => Ok(Self::Reservation),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "rejected" => Ok(Self::Rejected),
            "refunded" => Ok(Self::Refunded),
            "expired" => Ok(Self::Expired),
            "error" => Ok(Self::Error),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
