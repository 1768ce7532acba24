// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order and ticket lookups.

use crate::data_models::{OrderLineRow, OrderRow, TicketRow, format_timestamp};
use crate::diesel_schema::{customers, order_lines, orders, tickets};
use crate::error::PersistenceError;
use diesel::prelude::*;
use tickets_domain::{
    ALL_STATUSES, CustomerKey, Order, OrderLine, OrderReference, OrderStatus, Ticket,
};
use time::OffsetDateTime;

/// Fetches an order row by public reference.
pub(crate) fn get_order_row(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
) -> Result<OrderRow, PersistenceError> {
    orders::table
        .filter(orders::public_reference.eq(reference.value()))
        .first::<OrderRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::OrderNotFound(reference.value().to_string()))
}

/// Maps an order row plus its lines and owner onto the domain order.
pub(crate) fn hydrate_order(
    conn: &mut SqliteConnection,
    row: OrderRow,
) -> Result<Order, PersistenceError> {
    let owner = row
        .customer_id
        .map(|id| customer_key_for_id(conn, id))
        .transpose()?;

    let line_rows: Vec<OrderLineRow> = order_lines::table
        .filter(order_lines::order_id.eq(row.order_id))
        .order(order_lines::order_line_id.asc())
        .load::<OrderLineRow>(conn)?;
    let lines: Vec<OrderLine> = line_rows
        .into_iter()
        .map(OrderLineRow::into_domain)
        .collect::<Result<_, _>>()?;

    row.into_domain(owner, lines)
}

fn customer_key_for_id(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<CustomerKey, PersistenceError> {
    let key: String = customers::table
        .filter(customers::customer_id.eq(customer_id))
        .select(customers::customer_key)
        .first::<String>(conn)?;
    Ok(CustomerKey::new(&key))
}

/// Fetches an order by public reference, with its lines and owner.
///
/// # Errors
///
/// Returns `OrderNotFound` for an unknown reference.
pub fn get_order(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
) -> Result<Order, PersistenceError> {
    let row = get_order_row(conn, reference)?;
    hydrate_order(conn, row)
}

/// Lists the orders currently in a given status, oldest first.
///
/// # Errors
///
/// Returns an error if a stored row cannot be mapped back.
pub fn orders_with_status(
    conn: &mut SqliteConnection,
    status: OrderStatus,
) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = orders::table
        .filter(orders::status.eq(status.as_str()))
        .order(orders::order_id.asc())
        .load::<OrderRow>(conn)?;
    rows.into_iter()
        .map(|row| hydrate_order(conn, row))
        .collect()
}

/// Lists the references of orders that are still expirable and were
/// created before the cutoff.
///
/// Timestamps are stored as UTC RFC 3339 text, so lexicographic
/// comparison matches chronological order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn expirable_references_before(
    conn: &mut SqliteConnection,
    cutoff: OffsetDateTime,
) -> Result<Vec<OrderReference>, PersistenceError> {
    let expirable: Vec<&str> = ALL_STATUSES
        .iter()
        .filter(|status| status.is_expirable())
        .map(|status| status.as_str())
        .collect();
    let cutoff_text = format_timestamp(cutoff)?;

    let references: Vec<String> = orders::table
        .filter(orders::status.eq_any(expirable))
        .filter(orders::created_at.lt(cutoff_text))
        .order(orders::order_id.asc())
        .select(orders::public_reference)
        .load::<String>(conn)?;
    Ok(references.iter().map(|r| OrderReference::new(r)).collect())
}

/// Fetches the tickets issued for an order.
///
/// # Errors
///
/// Returns `OrderNotFound` for an unknown reference.
pub fn tickets_for_order(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
) -> Result<Vec<Ticket>, PersistenceError> {
    let row = get_order_row(conn, reference)?;
    let owner = match row.customer_id {
        Some(id) => customer_key_for_id(conn, id)?,
        None => return Ok(Vec::new()),
    };

    let ticket_rows: Vec<TicketRow> = tickets::table
        .filter(tickets::order_id.eq(row.order_id))
        .order(tickets::ticket_id.asc())
        .load::<TicketRow>(conn)?;
    Ok(ticket_rows
        .into_iter()
        .map(|t| t.into_domain(reference.clone(), owner.clone()))
        .collect())
}
