// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for transition planning.
//!
//! Each legal transition must map to exactly the side effects the
//! lifecycle requires, and illegal ones must fail before any side
//! effect exists.

use crate::ports::WebhookTrigger;
use crate::transition::{LedgerOp, Notification, plan_transition};
use tickets_domain::{DomainError, Order, OrderStatus, VatRate};

use super::helpers::{pending_order, test_line};

fn order_in(status: OrderStatus) -> Order {
    let mut order = pending_order(vec![test_line("ticket", 2, 1000, VatRate::High)]);
    order.status = status;
    order
}

#[test]
fn test_pending_to_paid_confirms_without_releasing_reservation() {
    let order = order_in(OrderStatus::Pending);
    let plan = plan_transition(&order, OrderStatus::Paid).unwrap();

    assert_eq!(
        plan.ledger,
        Some(LedgerOp::Confirm {
            release_reservation: false,
        })
    );
    assert!(plan.set_paid_at);
    assert!(plan.issue_tickets);
    assert!(!plan.revoke_tickets);
    assert_eq!(plan.notification, Some(Notification::OrderConfirmed));
}

#[test]
fn test_reservation_to_paid_releases_the_hold() {
    let order = order_in(OrderStatus::Reservation);
    let plan = plan_transition(&order, OrderStatus::Paid).unwrap();

    assert_eq!(
        plan.ledger,
        Some(LedgerOp::Confirm {
            release_reservation: true,
        })
    );
    assert!(plan.set_paid_at);
    assert!(plan.issue_tickets);
}

#[test]
fn test_pending_to_reservation_places_a_hold() {
    let order = order_in(OrderStatus::Pending);
    let plan = plan_transition(&order, OrderStatus::Reservation).unwrap();

    assert_eq!(plan.ledger, Some(LedgerOp::Reserve));
    assert!(!plan.set_paid_at);
    assert!(!plan.issue_tickets);
    assert_eq!(plan.notification, None);
}

#[test]
fn test_reservation_to_rejected_releases_the_hold() {
    let order = order_in(OrderStatus::Reservation);
    let plan = plan_transition(&order, OrderStatus::Rejected).unwrap();
    assert_eq!(plan.ledger, Some(LedgerOp::Release));
}

#[test]
fn test_reservation_to_expired_releases_the_hold() {
    let order = order_in(OrderStatus::Reservation);
    let plan = plan_transition(&order, OrderStatus::Expired).unwrap();
    assert_eq!(plan.ledger, Some(LedgerOp::Release));
}

#[test]
fn test_pending_to_cancelled_touches_no_counters() {
    let order = order_in(OrderStatus::Pending);
    let plan = plan_transition(&order, OrderStatus::Cancelled).unwrap();
    assert_eq!(plan.ledger, None);
    assert!(!plan.revoke_tickets);
}

#[test]
fn test_paid_to_refunded_returns_capacity_and_revokes_tickets() {
    let order = order_in(OrderStatus::Paid);
    let plan = plan_transition(&order, OrderStatus::Refunded).unwrap();

    assert_eq!(plan.ledger, Some(LedgerOp::Unconfirm));
    assert!(plan.revoke_tickets);
    assert!(!plan.issue_tickets);
}

#[test]
fn test_pending_to_error_only_notifies() {
    let order = order_in(OrderStatus::Pending);
    let plan = plan_transition(&order, OrderStatus::Error).unwrap();

    assert_eq!(plan.ledger, None);
    assert_eq!(plan.notification, Some(Notification::PaymentError));
}

#[test]
fn test_anonymous_to_assigned_has_no_side_effects() {
    let order = order_in(OrderStatus::Anonymous);
    let plan = plan_transition(&order, OrderStatus::Assigned).unwrap();

    assert_eq!(plan.ledger, None);
    assert!(!plan.set_paid_at);
    assert!(!plan.issue_tickets);
    assert!(!plan.revoke_tickets);
    assert_eq!(plan.notification, None);
}

#[test]
fn test_every_plan_publishes_a_status_change_webhook() {
    let order = order_in(OrderStatus::Pending);
    for target in [
        OrderStatus::Paid,
        OrderStatus::Cancelled,
        OrderStatus::Reservation,
        OrderStatus::Error,
        OrderStatus::Expired,
    ] {
        let plan = plan_transition(&order, target).unwrap();
        assert_eq!(plan.webhook, WebhookTrigger::OrderStatusChange);
    }
}

#[test]
fn test_webhook_trigger_tags_are_stable() {
    // Subscribers key on these tags; renaming one is a breaking change.
    assert_eq!(WebhookTrigger::OrderStatusChange.as_str(), "order_status_change");
    assert_eq!(WebhookTrigger::EventCreateUpdate.as_str(), "event_create_update");
    assert_eq!(
        WebhookTrigger::ProductCreateUpdate.as_str(),
        "product_create_update"
    );
}

#[test]
fn test_illegal_transition_is_rejected() {
    let order = order_in(OrderStatus::Paid);
    let err = plan_transition(&order, OrderStatus::Pending).unwrap_err();
    assert_eq!(
        err,
        DomainError::IllegalTransition {
            from: OrderStatus::Paid,
            to: OrderStatus::Pending,
        }
    );
}

#[test]
fn test_terminal_statuses_plan_nothing() {
    for terminal in [
        OrderStatus::Cancelled,
        OrderStatus::Rejected,
        OrderStatus::Refunded,
        OrderStatus::Expired,
        OrderStatus::Error,
    ] {
        let order = order_in(terminal);
        assert!(plan_transition(&order, OrderStatus::Paid).is_err());
    }
}
