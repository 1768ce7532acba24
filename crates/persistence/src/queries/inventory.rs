// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity snapshot reads for the limit checks.

use crate::data_models::count_from_db;
use crate::diesel_schema::events;
use crate::error::PersistenceError;
use crate::queries::catalog;
use diesel::prelude::*;
use tickets_core::{CapacitySnapshot, EventCapacity, ProductCapacity};
use tickets_domain::{EventKey, ProductKey};

/// Reads the capacity counters for one product, including its owning
/// event's aggregate counters.
///
/// # Errors
///
/// Returns `ProductNotFound` for an unknown key.
pub fn product_capacity(
    conn: &mut SqliteConnection,
    key: &ProductKey,
) -> Result<ProductCapacity, PersistenceError> {
    let row = catalog::get_product_row(conn, key)?;
    let event = row.event_id.map(|id| event_capacity(conn, id)).transpose()?;
    Ok(ProductCapacity {
        product: key.clone(),
        max_sold: row.max_sold.map(count_from_db).transpose()?,
        sold: count_from_db(row.sold)?,
        reserved: count_from_db(row.reserved)?,
        event,
    })
}

fn event_capacity(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<EventCapacity, PersistenceError> {
    let (key, max_sold, sold, reserved): (String, Option<i32>, i32, i32) = events::table
        .filter(events::event_id.eq(event_id))
        .select((
            events::event_key,
            events::max_sold,
            events::sold,
            events::reserved,
        ))
        .first(conn)?;
    Ok(EventCapacity {
        event: EventKey::new(&key),
        max_sold: max_sold.map(count_from_db).transpose()?,
        sold: count_from_db(sold)?,
        reserved: count_from_db(reserved)?,
    })
}

/// Reads a capacity snapshot covering the given products.
///
/// # Errors
///
/// Returns `ProductNotFound` for an unknown key.
pub fn capacity_snapshot(
    conn: &mut SqliteConnection,
    keys: &[ProductKey],
) -> Result<CapacitySnapshot, PersistenceError> {
    let mut snapshot = CapacitySnapshot::new();
    for key in keys {
        snapshot.insert(product_capacity(conn, key)?);
    }
    Ok(snapshot)
}
