// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The stale-order expiry sweep.

use tickets_core::{FixedClock, ProviderPaymentStatus};
use time::Duration;

use crate::error::ApiError;
use crate::handlers::{
    STALE_ORDER_MAX_AGE, assign_customer, create_order, expire_stale_orders,
    request_reservation, start_payment,
};
use crate::request_response::{
    AssignCustomerRequest, RequestReservationRequest, StartPaymentRequest,
};
use crate::tests::helpers::{
    RecordingSink, RecordingWebhooks, StubProvider, checkout_request, effects, seeded_shop,
    test_clock, test_now, test_policy,
};

fn later_clock() -> FixedClock {
    FixedClock(test_now() + STALE_ORDER_MAX_AGE + Duration::hours(1))
}

#[test]
fn test_fresh_orders_are_not_swept() {
    let mut persistence = seeded_shop();
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();
    let effects = effects(&sink, &webhooks);

    create_order(
        &mut persistence,
        &test_clock(),
        &test_policy(),
        checkout_request("ticket", 1),
    )
    .unwrap();

    let response = expire_stale_orders(&mut persistence, &test_clock(), &effects).unwrap();
    assert!(response.expired.is_empty());
}

#[test]
fn test_stale_anonymous_orders_are_expired() {
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

    let response = expire_stale_orders(&mut persistence, &later_clock(), &effects).unwrap();
    assert_eq!(response.expired, vec![created.order.reference.clone()]);

    // Expired is terminal; a second sweep finds nothing.
    let response = expire_stale_orders(&mut persistence, &later_clock(), &effects).unwrap();
    assert!(response.expired.is_empty());
}

#[test]
fn test_paid_orders_are_never_swept() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Paid);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();
    let effects = effects(&sink, &webhooks);
    let clock = test_clock();
    let policy = test_policy();

    let created = create_order(
        &mut persistence,
        &clock,
        &policy,
        checkout_request("ticket", 1),
    )
    .unwrap();
    let reference = created.order.reference;
    assign_customer(
        &mut persistence,
        &effects,
        AssignCustomerRequest {
            reference: reference.clone(),
            customer: "alice".to_string(),
        },
    )
    .unwrap();
    start_payment(
        &mut persistence,
        &provider,
        &clock,
        &policy,
        &effects,
        StartPaymentRequest {
            reference,
            method: "cash".to_string(),
        },
    )
    .unwrap();

    let response = expire_stale_orders(&mut persistence, &later_clock(), &effects).unwrap();
    assert!(response.expired.is_empty());
}

#[test]
fn test_sweeping_a_stale_reservation_releases_its_hold() {
    let mut persistence = seeded_shop();
    let provider = StubProvider::answering(ProviderPaymentStatus::Pending);
    let sink = RecordingSink::default();
    let webhooks = RecordingWebhooks::default();
    let effects = effects(&sink, &webhooks);
    let clock = test_clock();
    let policy = test_policy();

    let created = create_order(
        &mut persistence,
        &clock,
        &policy,
        checkout_request("scarce", 1),
    )
    .unwrap();
    let reference = created.order.reference;
    assign_customer(
        &mut persistence,
        &effects,
        AssignCustomerRequest {
            reference: reference.clone(),
            customer: "alice".to_string(),
        },
    )
    .unwrap();
    start_payment(
        &mut persistence,
        &provider,
        &clock,
        &policy,
        &effects,
        StartPaymentRequest {
            reference: reference.clone(),
            method: "ideal".to_string(),
        },
    )
    .unwrap();
    request_reservation(
        &mut persistence,
        &clock,
        &effects,
        RequestReservationRequest {
            reference: reference.clone(),
        },
    )
    .unwrap();

    // The hold blocks competitors until the sweep runs.
    let err = create_order(
        &mut persistence,
        &clock,
        &policy,
        checkout_request("scarce", 1),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::LimitExceeded { remaining: 0, .. }));

    let response = expire_stale_orders(&mut persistence, &later_clock(), &effects).unwrap();
    assert_eq!(response.expired, vec![reference]);

    create_order(
        &mut persistence,
        &clock,
        &policy,
        checkout_request("scarce", 1),
    )
    .unwrap();
}
