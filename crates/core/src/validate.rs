// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order validation profiles.
//!
//! Three profiles cover the lifecycle: structural checks at creation,
//! structural plus limit checks before payment, and the customer-limit
//! check alone when a customer is attached to an anonymous order.
//! Every failure names the specific violated rule so the caller can
//! present an actionable message.

use crate::error::CoreError;
use crate::limits::{
    CapacitySnapshot, CustomerProductUsage, check_customer_limit, check_event_limit,
    check_product_limit,
};
use tickets_domain::{DomainError, Money, Order, OrderStatus, ProductKey};

/// The webshop's flat administration cost policy.
///
/// Redirect payment methods carry `redirect_costs`; point-of-sale
/// methods carry nothing, and so does an order without a method yet.
#[derive(Debug, Clone, Copy)]
pub struct AdministrationCostsPolicy {
    /// Flat costs added to orders paid through a provider redirect.
    pub redirect_costs: Money,
}

impl AdministrationCostsPolicy {
    /// Returns the administration costs the policy requires for the
    /// order's payment method.
    #[must_use]
    pub fn expected_for(&self, order: &Order) -> Money {
        order
            .payment_method
            .map_or(Money::ZERO, |method| {
                method.administration_costs(self.redirect_costs)
            })
    }
}

/// Validates an order for creation: structural checks and amount
/// reconciliation.
///
/// # Errors
///
/// Returns a `DomainError` naming the violated field: negative amount,
/// empty line list, zero-quantity line, missing `created_by`, amount
/// that does not match the recomputed total, or administration costs
/// that disagree with the payment method policy.
pub fn assert_valid_for_creation(
    order: &Order,
    policy: &AdministrationCostsPolicy,
) -> Result<(), DomainError> {
    if order.amount.is_negative() {
        return Err(DomainError::NegativeAmount(order.amount));
    }

    if order.lines.is_empty() {
        return Err(DomainError::EmptyOrder);
    }

    for line in &order.lines {
        if line.quantity == 0 {
            return Err(DomainError::ZeroQuantity {
                product: line.product.clone(),
            });
        }
    }

    if order.created_by.trim().is_empty() {
        return Err(DomainError::MissingCreatedBy);
    }

    let expected_costs = policy.expected_for(order);
    if order.administration_costs != expected_costs {
        return Err(DomainError::AdministrationCostsMismatch {
            expected: expected_costs,
            actual: order.administration_costs,
        });
    }

    let totals = order.computed_totals();
    if order.amount != totals.amount {
        return Err(DomainError::AmountMismatch {
            expected: totals.amount,
            actual: order.amount,
        });
    }

    Ok(())
}

/// Validates an order for payment: creation checks, owner present,
/// `pending` status, and all capacity limits re-checked per line.
///
/// `usage` carries the owning customer's existing usage per product;
/// products absent from it are treated as uncapped for the customer.
///
/// # Errors
///
/// Returns the first violated rule: a structural `DomainViolation`, a
/// wrong-status error, or a product/event/customer limit error carrying
/// the remaining allowance.
pub fn assert_valid_for_payment(
    order: &Order,
    policy: &AdministrationCostsPolicy,
    snapshot: &CapacitySnapshot,
    usage: &[CustomerProductUsage],
) -> Result<(), CoreError> {
    if order.owner.is_none() {
        return Err(DomainError::MissingOwner.into());
    }

    if order.status != OrderStatus::Pending {
        return Err(DomainError::WrongStatus {
            required: OrderStatus::Pending,
            actual: order.status,
        }
        .into());
    }

    assert_valid_for_creation(order, policy)?;

    for line in &order.lines {
        if let Some(capacity) = snapshot.get(&line.product) {
            check_product_limit(capacity, line.quantity)?;
            check_event_limit(capacity, line.quantity)?;
        }
        if let Some(product_usage) = usage_for(usage, &line.product) {
            // Repeated lines of one product count as a single claim.
            let requested = order.quantity_of_any(std::slice::from_ref(&line.product));
            check_customer_limit(product_usage, requested)?;
        }
    }

    Ok(())
}

/// Validates an order against one specific customer's personal caps.
///
/// Run at customer-assignment time: an order created anonymously may be
/// claimed by a customer whose caps are only now relevant.
///
/// # Errors
///
/// Returns `DomainError::CustomerLimitExceeded` with the remaining
/// allowance for the first over-cap line.
pub fn assert_valid_for_customer(
    order: &Order,
    usage: &[CustomerProductUsage],
) -> Result<(), DomainError> {
    for line in &order.lines {
        if let Some(product_usage) = usage_for(usage, &line.product) {
            let requested = order.quantity_of_any(std::slice::from_ref(&line.product));
            check_customer_limit(product_usage, requested)?;
        }
    }
    Ok(())
}

fn usage_for<'a>(
    usage: &'a [CustomerProductUsage],
    product: &ProductKey,
) -> Option<&'a CustomerProductUsage> {
    usage.iter().find(|u| &u.product == product)
}
