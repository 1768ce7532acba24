// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::Persistence;
use tickets_domain::{
    Customer, CustomerKey, Event, EventKey, Money, Order, OrderLine, OrderReference, OrderStatus,
    PaymentMethod, Product, ProductKey, VatRate,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const REDIRECT_COSTS: Money = Money::from_cents(35);

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-05-01 12:00 UTC)
}

pub fn test_event(key: &str, max_sold: Option<u32>) -> Event {
    Event {
        id: None,
        key: EventKey::new(key),
        title: format!("Event {key}"),
        max_sold,
        sold: 0,
        reserved: 0,
    }
}

pub fn test_product(key: &str, max_sold: Option<u32>, max_per_customer: Option<u32>) -> Product {
    Product {
        id: None,
        key: ProductKey::new(key),
        title: format!("Product {key}"),
        cost: Money::from_cents(1210),
        vat_rate: VatRate::High,
        sell_start: datetime!(2026-01-01 0:00 UTC),
        sell_end: datetime!(2027-01-01 0:00 UTC),
        max_sold,
        max_sold_per_customer: max_per_customer,
        sold: 0,
        reserved: 0,
        related: Vec::new(),
        event: None,
    }
}

pub fn test_customer(key: &str) -> Customer {
    Customer {
        id: None,
        key: CustomerKey::new(key),
        name: format!("Customer {key}"),
        email: format!("{key}@example.org"),
    }
}

/// A shop with one uncapped product, one capped product, and one
/// customer.
pub fn seeded_shop() -> Persistence {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .create_product(&test_product("ticket", None, None))
        .expect("create product");
    persistence
        .create_product(&test_product("scarce", Some(1), None))
        .expect("create product");
    persistence
        .create_customer(&test_customer("alice"))
        .expect("create customer");
    persistence
        .create_customer(&test_customer("bob"))
        .expect("create customer");
    persistence
}

/// Creates an anonymous order for `quantity` units of a product.
pub fn place_order(
    persistence: &mut Persistence,
    reference: &str,
    product: &str,
    quantity: u32,
) -> Order {
    let line = OrderLine::new(
        ProductKey::new(product),
        quantity,
        Money::from_cents(1210),
        VatRate::High,
    );
    let order = Order::new(
        OrderReference::new(reference),
        vec![line],
        "webshop",
        test_now(),
    );
    persistence.create_order(&order).expect("create order")
}

/// Drives a fresh order to `pending`, owned by the given customer and
/// paying by iDEAL.
pub fn place_pending_order(
    persistence: &mut Persistence,
    reference: &str,
    product: &str,
    quantity: u32,
    customer: &str,
) -> Order {
    place_order(persistence, reference, product, quantity);
    let reference = OrderReference::new(reference);
    persistence
        .assign_customer(&reference, &CustomerKey::new(customer))
        .expect("assign customer");
    persistence
        .update_payment_method(&reference, PaymentMethod::Ideal, REDIRECT_COSTS)
        .expect("set payment method");
    let (order, _) = persistence
        .transition_order(&reference, OrderStatus::Pending, test_now())
        .expect("move to pending");
    order
}
