// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation placement, admin decisions, and capacity holds.

use std::sync::atomic::Ordering;

use tickets_core::ProviderPaymentStatus;

use crate::error::ApiError;
use crate::handlers::{
    approve_reservation, assign_customer, create_order, reconcile_payment, refund_order,
    reject_reservation, request_reservation, start_payment,
};
use crate::request_response::{
    AssignCustomerRequest, ReconcilePaymentRequest, RefundOrderRequest,
    ReservationDecisionRequest, StartPaymentRequest,
};
use crate::tests::helpers::{
    InstantSleeper, RecordingSink, RecordingWebhooks, StubProvider, checkout_request, effects,
    not_cancelled, seeded_shop, test_clock, test_policy,
};
use tickets_persistence::Persistence;

/// Places a reservation for the last "scarce" unit as alice.
fn scarce_reservation(
    persistence: &mut Persistence,
    provider: &StubProvider,
    sink: &RecordingSink,
    webhooks: &RecordingWebhooks,
) -> String {
    let clock = test_clock();
    let policy = test_policy();
    let effects = effects(sink, webhooks);

    let created = create_order(persistence, &clock, &policy, checkout_request("scarce", 1)).unwrap();
    let reference = created.order.reference;
    assign_customer(
        persistence,
        &effects,
        AssignCustomerRequest {
            reference: reference.clone(),
            customer: "alice".to_string(),
        },
    )
    .unwrap();
    start_payment(
        persistence,
        provider,
        &clock,
        &policy,
        &effects,
        StartPaymentRequest {
            reference: reference.clone(),
            method: "ideal".to_string(),
        },
    )
    .unwrap();

    let reserved = request_reservation(
        persistence,
        &clock,
        &effects,
        crate::request_response::RequestReservationRequest {
            reference: reference.clone(),
        },
    )
    .unwrap();
    assert_eq!(reserved.order.status, "reservation");
    reference
}

#[test]
fn test_a_reservation_holds_the_capacity() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Pending);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();

    scarce_reservation(&mut persistence, &provider, &sink, &webhooks);

    let err = create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("scarce", 1),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::LimitExceeded { remaining: 0, .. }
    ));
}

#[test]
fn test_approving_a_reservation_notifies_without_changing_status() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Pending);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();

    let reference = scarce_reservation(&mut persistence, &provider, &sink, &webhooks);
    let effects = effects(&sink, &webhooks);

    let approved = approve_reservation(
        &mut persistence,
        &effects,
        ReservationDecisionRequest {
            reference: reference.clone(),
        },
    )
    .unwrap();
    assert_eq!(approved.order.status, "reservation");
    assert_eq!(sink.approvals.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rejecting_a_reservation_frees_the_unit() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Pending);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();

    let reference = scarce_reservation(&mut persistence, &provider, &sink, &webhooks);
    let effects = effects(&sink, &webhooks);

    let rejected = reject_reservation(
        &mut persistence,
        &test_clock(),
        &effects,
        ReservationDecisionRequest { reference },
    )
    .unwrap();
    assert_eq!(rejected.order.status, "rejected");

    // The unit is sellable again.
    create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("scarce", 1),
    )
    .unwrap();
}

#[test]
fn test_approving_a_pending_order_is_an_illegal_transition() {
    let mut persistence = seeded_shop();
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();
    let effects = effects(&sink, &webhooks);

    let created = create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("ticket", 1),
    )
    .unwrap();

    let err = approve_reservation(
        &mut persistence,
        &effects,
        ReservationDecisionRequest {
            reference: created.order.reference,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::IllegalTransition { from, to, .. }
            if from == "anonymous" && to == "reservation"
    ));
    assert_eq!(sink.approvals.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_paying_an_approved_reservation_issues_tickets() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Paid);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();

    let reference = scarce_reservation(&mut persistence, &provider, &sink, &webhooks);
    let effects = effects(&sink, &webhooks);

    approve_reservation(
        &mut persistence,
        &effects,
        ReservationDecisionRequest {
            reference: reference.clone(),
        },
    )
    .unwrap();

    let response = reconcile_payment(
        &mut persistence,
        &provider,
        &InstantSleeper,
        &test_clock(),
        &effects,
        &mut not_cancelled(),
        ReconcilePaymentRequest {
            reference: reference.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(response.order.status, "paid");
    assert_eq!(sink.confirmed.load(Ordering::SeqCst), 1);

    // The hold converted into a sale: still no capacity for others.
    let err = create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("scarce", 1),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::LimitExceeded { remaining: 0, .. }));
}

#[tokio::test]
async fn test_refunding_a_paid_reservation_revokes_and_frees() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Paid);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();

    let reference = scarce_reservation(&mut persistence, &provider, &sink, &webhooks);
    let effects = effects(&sink, &webhooks);

    reconcile_payment(
        &mut persistence,
        &provider,
        &InstantSleeper,
        &test_clock(),
        &effects,
        &mut not_cancelled(),
        ReconcilePaymentRequest {
            reference: reference.clone(),
        },
    )
    .await
    .unwrap();

    let refunded = refund_order(
        &mut persistence,
        &test_clock(),
        &effects,
        RefundOrderRequest {
            reference: reference.clone(),
        },
    )
    .unwrap();
    assert_eq!(refunded.order.status, "refunded");
    assert_eq!(refunded.revoked_tickets, 1);

    // Capacity is back.
    create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("scarce", 1),
    )
    .unwrap();
}
