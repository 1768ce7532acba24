// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations: events, products, customers.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    NewCustomer, NewEvent, NewProduct, NewProductRelated, count_to_db, format_timestamp,
};
use crate::diesel_schema::{customers, events, product_related, products};
use crate::error::PersistenceError;
use diesel::prelude::*;
use tickets_domain::{Customer, Event, Product};

/// Inserts an event and returns its row ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_event(conn: &mut SqliteConnection, event: &Event) -> Result<i64, PersistenceError> {
    let record = NewEvent {
        event_key: event.key.value(),
        title: &event.title,
        max_sold: event.max_sold.map(count_to_db).transpose()?,
        sold: count_to_db(event.sold)?,
        reserved: count_to_db(event.reserved)?,
    };
    diesel::insert_into(events::table)
        .values(&record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts a product with its related links and returns its row ID.
///
/// # Errors
///
/// Returns `EventNotFound` if the product names an unknown event.
pub fn create_product(
    conn: &mut SqliteConnection,
    product: &Product,
) -> Result<i64, PersistenceError> {
    let event_id = product
        .event
        .as_ref()
        .map(|key| {
            events::table
                .filter(events::event_key.eq(key.value()))
                .select(events::event_id)
                .first::<i64>(conn)
                .optional()?
                .ok_or_else(|| PersistenceError::EventNotFound(key.value().to_string()))
        })
        .transpose()?;

    let record = NewProduct {
        product_key: product.key.value(),
        event_id,
        title: &product.title,
        cost: product.cost.cents(),
        vat_rate: product.vat_rate.as_str(),
        sell_start: format_timestamp(product.sell_start)?,
        sell_end: format_timestamp(product.sell_end)?,
        max_sold: product.max_sold.map(count_to_db).transpose()?,
        max_sold_per_customer: product.max_sold_per_customer.map(count_to_db).transpose()?,
        sold: count_to_db(product.sold)?,
        reserved: count_to_db(product.reserved)?,
    };
    diesel::insert_into(products::table)
        .values(&record)
        .execute(conn)?;
    let product_id = get_last_insert_rowid(conn)?;

    for related in &product.related {
        let link = NewProductRelated {
            product_id,
            related_product_key: related.value(),
        };
        diesel::insert_into(product_related::table)
            .values(&link)
            .execute(conn)?;
    }

    Ok(product_id)
}

/// Inserts a customer and returns its row ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_customer(
    conn: &mut SqliteConnection,
    customer: &Customer,
) -> Result<i64, PersistenceError> {
    let record = NewCustomer {
        customer_key: customer.key.value(),
        name: &customer.name,
        email: &customer.email,
    };
    diesel::insert_into(customers::table)
        .values(&record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
