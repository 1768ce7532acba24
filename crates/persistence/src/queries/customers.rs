// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer lookups and per-customer usage accounting.
//!
//! The usage read aggregates, per entitlement pool, the tickets
//! already issued to the customer and the quantities held by the
//! customer's own open reservation orders. Callers run it inside the
//! same transaction as the decision it feeds, so the two aggregates
//! cannot drift apart between reads.

use crate::data_models::{CustomerRow, count_from_db};
use crate::diesel_schema::{customers, order_lines, orders, tickets};
use crate::error::PersistenceError;
use crate::queries::catalog;
use diesel::dsl::sum;
use diesel::prelude::*;
use tickets_core::CustomerProductUsage;
use tickets_domain::{Customer, CustomerKey, OrderStatus, ProductKey};

/// Fetches a customer by key.
///
/// # Errors
///
/// Returns `CustomerNotFound` if no customer carries the key.
pub fn get_customer(
    conn: &mut SqliteConnection,
    key: &CustomerKey,
) -> Result<Customer, PersistenceError> {
    let row: CustomerRow = customers::table
        .filter(customers::customer_key.eq(key.value()))
        .first::<CustomerRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::CustomerNotFound(key.value().to_string()))?;
    Ok(row.into_domain())
}

/// Resolves a customer key to its row ID.
pub(crate) fn lookup_customer_id(
    conn: &mut SqliteConnection,
    key: &CustomerKey,
) -> Result<i64, PersistenceError> {
    customers::table
        .filter(customers::customer_key.eq(key.value()))
        .select(customers::customer_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::CustomerNotFound(key.value().to_string()))
}

/// Reads the customer's usage of one product's entitlement pool:
/// issued (unrevoked) tickets plus quantities on the customer's own
/// open reservation orders, aggregated over the product and its
/// related products.
///
/// # Errors
///
/// Returns `ProductNotFound` for an unknown key.
pub fn usage_for_product(
    conn: &mut SqliteConnection,
    customer: &CustomerKey,
    product: &ProductKey,
) -> Result<CustomerProductUsage, PersistenceError> {
    let stored = catalog::get_product(conn, product)?;
    let pool: Vec<String> = stored
        .entitlement_pool()
        .iter()
        .map(|key| key.value().to_string())
        .collect();

    let customer_id = lookup_customer_id(conn, customer)?;

    let issued: i64 = tickets::table
        .filter(tickets::customer_id.eq(customer_id))
        .filter(tickets::product_key.eq_any(&pool))
        .filter(tickets::revoked.eq(0))
        .count()
        .get_result::<i64>(conn)?;

    let reserved: Option<i64> = order_lines::table
        .inner_join(orders::table)
        .filter(orders::customer_id.eq(customer_id))
        .filter(orders::status.eq(OrderStatus::Reservation.as_str()))
        .filter(order_lines::product_key.eq_any(&pool))
        .select(sum(order_lines::quantity))
        .first::<Option<i64>>(conn)?;

    Ok(CustomerProductUsage {
        product: product.clone(),
        max_sold_per_customer: stored.max_sold_per_customer,
        issued: i64_count(issued, product)?,
        reserved_by_customer: i64_count(reserved.unwrap_or(0), product)?,
    })
}

/// Reads the customer's usage for every given product.
///
/// # Errors
///
/// Returns `ProductNotFound` for an unknown key.
pub fn usage_for_products(
    conn: &mut SqliteConnection,
    customer: &CustomerKey,
    products: &[ProductKey],
) -> Result<Vec<CustomerProductUsage>, PersistenceError> {
    products
        .iter()
        .map(|product| usage_for_product(conn, customer, product))
        .collect()
}

fn i64_count(value: i64, product: &ProductKey) -> Result<u32, PersistenceError> {
    i32::try_from(value)
        .ok()
        .and_then(|v| count_from_db(v).ok())
        .ok_or_else(|| PersistenceError::CounterOutOfRange {
            product: product.value().to_string(),
        })
}
