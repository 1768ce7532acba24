// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared builders for the engine test suite.

use crate::limits::{CustomerProductUsage, ProductCapacity};
use crate::validate::AdministrationCostsPolicy;
use tickets_domain::{
    CustomerKey, Money, Order, OrderLine, OrderReference, OrderStatus, PaymentMethod, ProductKey,
    VatRate,
};
use time::OffsetDateTime;

/// Flat redirect costs used throughout the suite: €0.35.
pub const REDIRECT_COSTS_CENTS: i64 = 35;

pub fn test_policy() -> AdministrationCostsPolicy {
    AdministrationCostsPolicy {
        redirect_costs: Money::from_cents(REDIRECT_COSTS_CENTS),
    }
}

pub fn test_line(key: &str, quantity: u32, unit_cents: i64, rate: VatRate) -> OrderLine {
    OrderLine::new(
        ProductKey::new(key),
        quantity,
        Money::from_cents(unit_cents),
        rate,
    )
}

/// A freshly created anonymous order with consistent totals.
pub fn anonymous_order(lines: Vec<OrderLine>) -> Order {
    Order::new(
        OrderReference::new("order-test"),
        lines,
        "webshop",
        OffsetDateTime::UNIX_EPOCH,
    )
}

/// A pending order owned by `customer-test`, paying by iDEAL with the
/// policy's administration costs applied.
pub fn pending_order(lines: Vec<OrderLine>) -> Order {
    let mut order = anonymous_order(lines);
    order.owner = Some(CustomerKey::new("customer-test"));
    order.status = OrderStatus::Pending;
    order.payment_method = Some(PaymentMethod::Ideal);
    order.administration_costs = Money::from_cents(REDIRECT_COSTS_CENTS);
    order.update_totals();
    order
}

pub fn capacity(key: &str, max_sold: Option<u32>, sold: u32, reserved: u32) -> ProductCapacity {
    ProductCapacity {
        product: ProductKey::new(key),
        max_sold,
        sold,
        reserved,
        event: None,
    }
}

pub fn usage(
    key: &str,
    max_sold_per_customer: Option<u32>,
    issued: u32,
    reserved_by_customer: u32,
) -> CustomerProductUsage {
    CustomerProductUsage {
        product: ProductKey::new(key),
        max_sold_per_customer,
        issued,
        reserved_by_customer,
    }
}
