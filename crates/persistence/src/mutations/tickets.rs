// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket issuance and revocation.
//!
//! Issuance runs inside the paid transition's transaction and is
//! guarded by the order's `tickets_issued` flag, so a crash between
//! commit and notification can never issue a second batch on retry.

use crate::data_models::NewTicket;
use crate::diesel_schema::{orders, tickets};
use crate::error::PersistenceError;
use diesel::prelude::*;
use tickets_domain::{OrderLine, ProductKey};

const CODE_ATTEMPTS: u32 = 32;

/// Issues one ticket per unit on every line of an order and marks the
/// order as issued.
///
/// # Errors
///
/// Returns `TicketCodeExhausted` if a free scan code cannot be found.
pub fn issue_tickets(
    conn: &mut SqliteConnection,
    order_id: i64,
    customer_id: i64,
    lines: &[OrderLine],
) -> Result<u32, PersistenceError> {
    let mut issued = 0u32;
    for line in lines {
        for _ in 0..line.quantity {
            let unique_code = free_unique_code(conn, &line.product)?;
            let ticket_key = format!("ticket_{}", rand::random::<u64>());
            let record = NewTicket {
                ticket_key: &ticket_key,
                order_id,
                product_key: line.product.value(),
                customer_id,
                unique_code: &unique_code,
                revoked: 0,
            };
            diesel::insert_into(tickets::table)
                .values(&record)
                .execute(conn)?;
            issued += 1;
        }
    }

    diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
        .set(orders::tickets_issued.eq(1))
        .execute(conn)?;

    Ok(issued)
}

/// Marks every ticket of an order as revoked.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn revoke_tickets(conn: &mut SqliteConnection, order_id: i64) -> Result<(), PersistenceError> {
    diesel::update(tickets::table.filter(tickets::order_id.eq(order_id)))
        .set(tickets::revoked.eq(1))
        .execute(conn)?;
    Ok(())
}

/// Picks a six-digit scan code that is not yet used for the product.
fn free_unique_code(
    conn: &mut SqliteConnection,
    product: &ProductKey,
) -> Result<String, PersistenceError> {
    for _ in 0..CODE_ATTEMPTS {
        let candidate = format!("{:06}", rand::random::<u32>() % 1_000_000);
        let taken: i64 = tickets::table
            .filter(tickets::product_key.eq(product.value()))
            .filter(tickets::unique_code.eq(&candidate))
            .count()
            .get_result::<i64>(conn)?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    Err(PersistenceError::TicketCodeExhausted {
        product: product.value().to_string(),
    })
}
