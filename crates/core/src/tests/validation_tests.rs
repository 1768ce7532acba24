// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the order validation profiles.

use crate::limits::CapacitySnapshot;
use crate::validate::{
    assert_valid_for_creation, assert_valid_for_customer, assert_valid_for_payment,
};
use crate::CoreError;
use tickets_domain::{DomainError, Money, OrderStatus, ProductKey, VatRate};

use super::helpers::{
    REDIRECT_COSTS_CENTS, anonymous_order, capacity, pending_order, test_line, test_policy,
    usage,
};

#[test]
fn test_creation_accepts_consistent_order() {
    let order = anonymous_order(vec![test_line("ticket", 2, 1210, VatRate::High)]);
    assert!(assert_valid_for_creation(&order, &test_policy()).is_ok());
}

#[test]
fn test_creation_rejects_negative_amount() {
    let mut order = anonymous_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    order.amount = Money::from_cents(-1);
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert!(matches!(err, DomainError::NegativeAmount(_)));
}

#[test]
fn test_creation_rejects_empty_order() {
    let order = anonymous_order(vec![]);
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert_eq!(err, DomainError::EmptyOrder);
}

#[test]
fn test_creation_rejects_zero_quantity_line() {
    let order = anonymous_order(vec![
        test_line("ticket", 1, 1000, VatRate::High),
        test_line("drink", 0, 100, VatRate::Low),
    ]);
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert_eq!(
        err,
        DomainError::ZeroQuantity {
            product: ProductKey::new("drink"),
        }
    );
}

#[test]
fn test_creation_rejects_blank_created_by() {
    let mut order = anonymous_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    order.created_by = "   ".to_string();
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert_eq!(err, DomainError::MissingCreatedBy);
}

#[test]
fn test_creation_rejects_tampered_amount() {
    let mut order = anonymous_order(vec![test_line("ticket", 2, 1000, VatRate::High)]);
    order.amount = Money::from_cents(1);
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert_eq!(
        err,
        DomainError::AmountMismatch {
            expected: Money::from_cents(2000),
            actual: Money::from_cents(1),
        }
    );
}

#[test]
fn test_creation_rejects_missing_administration_costs_for_redirect_method() {
    let mut order = pending_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    order.administration_costs = Money::ZERO;
    order.update_totals();
    let err = assert_valid_for_creation(&order, &test_policy()).unwrap_err();
    assert_eq!(
        err,
        DomainError::AdministrationCostsMismatch {
            expected: Money::from_cents(REDIRECT_COSTS_CENTS),
            actual: Money::ZERO,
        }
    );
}

#[test]
fn test_payment_accepts_valid_pending_order() {
    let order = pending_order(vec![test_line("ticket", 2, 1000, VatRate::High)]);
    let mut snapshot = CapacitySnapshot::new();
    snapshot.insert(capacity("ticket", Some(10), 3, 2));
    let usage = [usage("ticket", Some(5), 1, 0)];

    assert!(assert_valid_for_payment(&order, &test_policy(), &snapshot, &usage).is_ok());
}

#[test]
fn test_payment_rejects_order_without_owner() {
    let mut order = pending_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    order.owner = None;
    let err = assert_valid_for_payment(
        &order,
        &test_policy(),
        &CapacitySnapshot::new(),
        &[],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::MissingOwner)
    ));
}

#[test]
fn test_payment_rejects_non_pending_status() {
    let mut order = pending_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    order.status = OrderStatus::Assigned;
    let err = assert_valid_for_payment(
        &order,
        &test_policy(),
        &CapacitySnapshot::new(),
        &[],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::WrongStatus {
            required: OrderStatus::Pending,
            actual: OrderStatus::Assigned,
        })
    ));
}

#[test]
fn test_payment_rejects_when_product_capacity_exhausted() {
    let order = pending_order(vec![test_line("ticket", 2, 1000, VatRate::High)]);
    let mut snapshot = CapacitySnapshot::new();
    snapshot.insert(capacity("ticket", Some(10), 7, 2));

    let err =
        assert_valid_for_payment(&order, &test_policy(), &snapshot, &[]).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::ProductLimitExceeded { remaining: 1, .. })
    ));
}

#[test]
fn test_payment_rejects_when_customer_cap_reached() {
    let order = pending_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    let mut snapshot = CapacitySnapshot::new();
    snapshot.insert(capacity("ticket", Some(100), 0, 0));
    let usage = [usage("ticket", Some(1), 0, 1)];

    let err =
        assert_valid_for_payment(&order, &test_policy(), &snapshot, &usage).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::CustomerLimitExceeded { remaining: 0, .. })
    ));
}

#[test]
fn test_payment_treats_product_absent_from_snapshot_as_uncapped() {
    let order = pending_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    assert!(
        assert_valid_for_payment(&order, &test_policy(), &CapacitySnapshot::new(), &[])
            .is_ok()
    );
}

#[test]
fn test_customer_profile_rejects_over_cap_line() {
    let order = anonymous_order(vec![test_line("ticket", 2, 1000, VatRate::High)]);
    let usage = [usage("ticket", Some(2), 1, 0)];
    let err = assert_valid_for_customer(&order, &usage).unwrap_err();
    assert_eq!(
        err,
        DomainError::CustomerLimitExceeded {
            product: ProductKey::new("ticket"),
            remaining: 1,
        }
    );
}

#[test]
fn test_customer_profile_aggregates_repeated_lines_of_one_product() {
    // Two separate lines of the same product are one claim of 2.
    let order = anonymous_order(vec![
        test_line("ticket", 1, 1000, VatRate::High),
        test_line("ticket", 1, 1000, VatRate::High),
    ]);
    let usage = [usage("ticket", Some(1), 0, 0)];
    let err = assert_valid_for_customer(&order, &usage).unwrap_err();
    assert_eq!(
        err,
        DomainError::CustomerLimitExceeded {
            product: ProductKey::new("ticket"),
            remaining: 1,
        }
    );
}

#[test]
fn test_customer_profile_passes_within_cap() {
    let order = anonymous_order(vec![test_line("ticket", 1, 1000, VatRate::High)]);
    let usage = [usage("ticket", Some(2), 1, 0)];
    assert!(assert_valid_for_customer(&order, &usage).is_ok());
}
