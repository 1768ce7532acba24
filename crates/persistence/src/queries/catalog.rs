// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog lookups: events and products.

use crate::data_models::{EventRow, ProductRow};
use crate::diesel_schema::{events, product_related, products};
use crate::error::PersistenceError;
use diesel::prelude::*;
use tickets_domain::{Event, EventKey, Product, ProductKey};

/// Fetches an event by key.
///
/// # Errors
///
/// Returns `EventNotFound` if no event carries the key.
pub fn get_event(conn: &mut SqliteConnection, key: &EventKey) -> Result<Event, PersistenceError> {
    let row: EventRow = events::table
        .filter(events::event_key.eq(key.value()))
        .first::<EventRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::EventNotFound(key.value().to_string()))?;
    row.into_domain()
}

/// Fetches a product row by key, without its related links.
pub(crate) fn get_product_row(
    conn: &mut SqliteConnection,
    key: &ProductKey,
) -> Result<ProductRow, PersistenceError> {
    products::table
        .filter(products::product_key.eq(key.value()))
        .first::<ProductRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::ProductNotFound(key.value().to_string()))
}

/// Fetches the related product keys linked to a product row.
pub(crate) fn related_keys(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Vec<ProductKey>, PersistenceError> {
    let keys: Vec<String> = product_related::table
        .filter(product_related::product_id.eq(product_id))
        .select(product_related::related_product_key)
        .load::<String>(conn)?;
    Ok(keys.iter().map(|k| ProductKey::new(k)).collect())
}

/// Fetches the key of an event by row ID.
pub(crate) fn event_key_for_id(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<EventKey, PersistenceError> {
    let key: String = events::table
        .filter(events::event_id.eq(event_id))
        .select(events::event_key)
        .first::<String>(conn)?;
    Ok(EventKey::new(&key))
}

/// Fetches a product by key, including its related links and owning
/// event.
///
/// # Errors
///
/// Returns `ProductNotFound` if no product carries the key.
pub fn get_product(
    conn: &mut SqliteConnection,
    key: &ProductKey,
) -> Result<Product, PersistenceError> {
    let row = get_product_row(conn, key)?;
    let related = related_keys(conn, row.product_id)?;
    let event = row
        .event_id
        .map(|id| event_key_for_id(conn, id))
        .transpose()?;
    row.into_domain(related, event)
}

/// Lists every product in the catalog.
///
/// # Errors
///
/// Returns an error if a stored row cannot be mapped back.
pub fn list_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .order(products::product_key.asc())
        .load::<ProductRow>(conn)?;
    let mut result = Vec::with_capacity(rows.len());
    for row in rows {
        let related = related_keys(conn, row.product_id)?;
        let event = row
            .event_id
            .map(|id| event_key_for_id(conn, id))
            .transpose()?;
        result.push(row.into_domain(related, event)?);
    }
    Ok(result)
}
