// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The inventory ledger.
//!
//! The only code that writes the `sold` and `reserved` counters, on
//! products and on their owning events. Operations that claim
//! capacity (`Reserve`, and `Confirm` without a prior hold) re-check
//! the caps against the counters read in the same transaction, so two
//! orders validated against the same advisory snapshot can never both
//! consume the last unit. Operations that return capacity fail on
//! underflow instead of wrapping.

use crate::data_models::count_to_db;
use crate::diesel_schema::{events, products};
use crate::error::PersistenceError;
use crate::queries::inventory::product_capacity;
use diesel::prelude::*;
use tickets_core::{LedgerOp, check_event_limit, check_product_limit};
use tickets_domain::ProductKey;

/// Applies one ledger operation for `quantity` units of a product,
/// updating the product counters and the owning event's aggregates.
///
/// # Errors
///
/// Returns a `DomainViolation` carrying the remaining allowance when a
/// claim would exceed a cap, and `CounterOutOfRange` when a release
/// would drive a counter negative.
pub fn apply_ledger_op(
    conn: &mut SqliteConnection,
    op: LedgerOp,
    product: &ProductKey,
    quantity: u32,
) -> Result<(), PersistenceError> {
    let capacity = product_capacity(conn, product)?;

    let claims_capacity = matches!(
        op,
        LedgerOp::Reserve
            | LedgerOp::Confirm {
                release_reservation: false,
            }
    );
    if claims_capacity {
        check_product_limit(&capacity, quantity)?;
        check_event_limit(&capacity, quantity)?;
    }

    let (sold, reserved) = shifted_counters(op, capacity.sold, capacity.reserved, quantity)
        .ok_or_else(|| PersistenceError::CounterOutOfRange {
            product: product.value().to_string(),
        })?;

    diesel::update(products::table.filter(products::product_key.eq(product.value())))
        .set((
            products::sold.eq(count_to_db(sold)?),
            products::reserved.eq(count_to_db(reserved)?),
        ))
        .execute(conn)?;

    if let Some(event) = capacity.event {
        let (event_sold, event_reserved) =
            shifted_counters(op, event.sold, event.reserved, quantity).ok_or_else(|| {
                PersistenceError::CounterOutOfRange {
                    product: product.value().to_string(),
                }
            })?;
        diesel::update(events::table.filter(events::event_key.eq(event.event.value())))
            .set((
                events::sold.eq(count_to_db(event_sold)?),
                events::reserved.eq(count_to_db(event_reserved)?),
            ))
            .execute(conn)?;
    }

    Ok(())
}

/// Computes the counter values after an operation, or `None` on
/// underflow or overflow.
fn shifted_counters(op: LedgerOp, sold: u32, reserved: u32, quantity: u32) -> Option<(u32, u32)> {
    match op {
        LedgerOp::Reserve => Some((sold, reserved.checked_add(quantity)?)),
        LedgerOp::Confirm {
            release_reservation,
        } => {
            let reserved = if release_reservation {
                reserved.checked_sub(quantity)?
            } else {
                reserved
            };
            Some((sold.checked_add(quantity)?, reserved))
        }
        LedgerOp::Release => Some((sold, reserved.checked_sub(quantity)?)),
        LedgerOp::Unconfirm => Some((sold.checked_sub(quantity)?, reserved)),
    }
}
