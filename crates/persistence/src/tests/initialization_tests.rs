// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for database initialization and catalog round-trips.

use super::{seeded_shop, test_customer, test_event, test_product};
use crate::Persistence;
use tickets_domain::{CustomerKey, EventKey, ProductKey};

#[test]
fn test_in_memory_database_initializes_with_foreign_keys() {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .verify_foreign_key_enforcement()
        .expect("foreign keys enabled");
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = seeded_shop();
    let mut second = Persistence::new_in_memory().expect("in-memory database");

    assert!(first.get_product(&ProductKey::new("ticket")).is_ok());
    assert!(second.get_product(&ProductKey::new("ticket")).is_err());
}

#[test]
fn test_product_round_trips_with_event_and_related_links() {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .create_event(&test_event("gala", Some(100)))
        .expect("create event");

    let mut product = test_product("gala-ticket", Some(50), Some(2));
    product.event = Some(EventKey::new("gala"));
    product.related = vec![ProductKey::new("gala-early-bird")];
    persistence.create_product(&product).expect("create product");

    let stored = persistence
        .get_product(&ProductKey::new("gala-ticket"))
        .expect("fetch product");
    assert_eq!(stored.event, Some(EventKey::new("gala")));
    assert_eq!(stored.related, vec![ProductKey::new("gala-early-bird")]);
    assert_eq!(stored.max_sold, Some(50));
    assert_eq!(stored.max_sold_per_customer, Some(2));
    assert_eq!(stored.cost, product.cost);
    assert_eq!(stored.sell_start, product.sell_start);
    assert!(stored.id.is_some());
}

#[test]
fn test_customer_round_trips() {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .create_customer(&test_customer("alice"))
        .expect("create customer");

    let stored = persistence
        .get_customer(&CustomerKey::new("alice"))
        .expect("fetch customer");
    assert_eq!(stored.email, "alice@example.org");
    assert!(stored.id.is_some());
}

#[test]
fn test_unknown_product_is_reported_by_key() {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    let err = persistence
        .get_product(&ProductKey::new("ghost"))
        .unwrap_err();
    assert_eq!(
        err,
        crate::PersistenceError::ProductNotFound("ghost".to_string())
    );
}
