// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition planning.
//!
//! A status transition is planned as pure data: which inventory ledger
//! operation to apply, whether to stamp `paid_at`, whether tickets must
//! be issued or revoked, and which notification and webhook fire. The
//! persistence layer executes the plan atomically with the status
//! write; notifications fire only after the write committed, so a sink
//! failure can never roll back a transition. An illegal transition
//! fails here, before any side effect exists to partially apply.

use crate::ports::WebhookTrigger;
use tickets_domain::{DomainError, Order, OrderStatus};

/// Inventory ledger operation a transition requires.
///
/// These are the only operations allowed to touch the `sold` and
/// `reserved` counters, and they execute inside the same transaction
/// as the status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    /// Claim capacity without consuming it: `reserved += quantity`.
    Reserve,
    /// Consume capacity: `sold += quantity`; when the order previously
    /// held a reservation, also `reserved -= quantity`.
    Confirm {
        /// Whether a prior reservation hold must be released.
        release_reservation: bool,
    },
    /// Release a reservation hold: `reserved -= quantity`.
    Release,
    /// Return consumed capacity on refund: `sold -= quantity`.
    Unconfirm,
}

/// Notification fired by a transition, after commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The order was paid; send confirmation with the issued tickets.
    OrderConfirmed,
    /// The payment outcome could not be resolved; alert operator and
    /// customer.
    PaymentError,
}

/// The complete side-effect set of one legal status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// The status the order moves from.
    pub from: OrderStatus,
    /// The status the order moves to.
    pub to: OrderStatus,
    /// Inventory ledger operation, if the transition touches capacity.
    pub ledger: Option<LedgerOp>,
    /// Whether `paid_at` must be stamped with the current instant.
    pub set_paid_at: bool,
    /// Whether tickets must be issued (skipped if already issued).
    pub issue_tickets: bool,
    /// Whether previously issued tickets must be revoked.
    pub revoke_tickets: bool,
    /// Notification to fire after commit.
    pub notification: Option<Notification>,
    /// Webhook trigger to publish after commit.
    pub webhook: WebhookTrigger,
}

/// Plans the transition of an order to a target status.
///
/// Pure: validates legality against the state machine and computes the
/// side-effect set without applying anything.
///
/// # Errors
///
/// Returns `DomainError::IllegalTransition` when the order lifecycle
/// does not permit moving from the order's status to `target`.
pub fn plan_transition(order: &Order, target: OrderStatus) -> Result<TransitionPlan, DomainError> {
    order.status.validate_transition(target)?;

    let from = order.status;
    let mut plan = TransitionPlan {
        from,
        to: target,
        ledger: None,
        set_paid_at: false,
        issue_tickets: false,
        revoke_tickets: false,
        notification: None,
        webhook: WebhookTrigger::OrderStatusChange,
    };

    match target {
        OrderStatus::Paid => {
            plan.ledger = Some(LedgerOp::Confirm {
                release_reservation: from.holds_reservation(),
            });
            plan.set_paid_at = true;
            plan.issue_tickets = true;
            plan.notification = Some(Notification::OrderConfirmed);
        }
        OrderStatus::Reservation => {
            plan.ledger = Some(LedgerOp::Reserve);
        }
        OrderStatus::Refunded => {
            plan.ledger = Some(LedgerOp::Unconfirm);
            plan.revoke_tickets = true;
        }
        OrderStatus::Cancelled | OrderStatus::Rejected | OrderStatus::Expired => {
            if from.holds_reservation() {
                plan.ledger = Some(LedgerOp::Release);
            }
        }
        OrderStatus::Error => {
            plan.notification = Some(Notification::PaymentError);
        }
        OrderStatus::Anonymous | OrderStatus::Assigned | OrderStatus::Pending => {}
    }

    Ok(plan)
}
