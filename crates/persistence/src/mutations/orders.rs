// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order mutations.
//!
//! `transition_order` is the single entry point that moves an order
//! between statuses. It plans the transition, re-checks capacity while
//! claiming it, writes the status, and issues or revokes tickets, all
//! against the same connection. Callers wrap it in an immediate
//! transaction so the whole plan commits or rolls back as one unit.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewOrder, NewOrderLine, count_to_db, format_timestamp};
use crate::diesel_schema::{order_lines, orders};
use crate::error::PersistenceError;
use crate::mutations::{inventory, tickets};
use crate::queries;
use diesel::prelude::*;
use tickets_core::{
    LedgerOp, TransitionPlan, assert_valid_for_customer, check_customer_limit, plan_transition,
};
use tickets_domain::{
    CustomerKey, DomainError, Money, Order, OrderReference, OrderStatus, PaymentMethod,
};
use time::OffsetDateTime;

/// Inserts an order with its lines and returns the stored order.
///
/// # Errors
///
/// Returns `CustomerNotFound` when the order names an unknown owner,
/// and a database error when a line names an unknown product.
pub fn create_order(conn: &mut SqliteConnection, order: &Order) -> Result<Order, PersistenceError> {
    let customer_id = order
        .owner
        .as_ref()
        .map(|key| queries::customers::lookup_customer_id(conn, key))
        .transpose()?;

    let record = NewOrder {
        public_reference: order.public_reference.value(),
        status: order.status.as_str(),
        customer_id,
        amount: order.amount.cents(),
        vat_total: order.vat_total.cents(),
        administration_costs: order.administration_costs.cents(),
        payment_method: order.payment_method.as_ref().map(PaymentMethod::as_str),
        created_by: &order.created_by,
        created_at: format_timestamp(order.created_at)?,
        tickets_issued: 0,
    };
    diesel::insert_into(orders::table)
        .values(&record)
        .execute(conn)?;
    let order_id = get_last_insert_rowid(conn)?;

    for line in &order.lines {
        let line_record = NewOrderLine {
            order_id,
            product_key: line.product.value(),
            quantity: count_to_db(line.quantity)?,
            unit_price: line.unit_price.cents(),
            vat_rate: line.vat_rate.as_str(),
        };
        diesel::insert_into(order_lines::table)
            .values(&line_record)
            .execute(conn)?;
    }

    queries::orders::get_order(conn, &order.public_reference)
}

/// Attaches a customer to an anonymous order and moves it to
/// `assigned`, checking the customer's personal caps against a usage
/// read in the same transaction.
///
/// # Errors
///
/// Returns a `DomainViolation` when the order is not anonymous or a
/// personal cap would be exceeded.
pub fn assign_customer(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
    customer: &CustomerKey,
) -> Result<Order, PersistenceError> {
    let order = queries::orders::get_order(conn, reference)?;
    plan_transition(&order, OrderStatus::Assigned)?;

    let products: Vec<_> = order.lines.iter().map(|line| line.product.clone()).collect();
    let usage = queries::customers::usage_for_products(conn, customer, &products)?;
    assert_valid_for_customer(&order, &usage)?;

    let customer_id = queries::customers::lookup_customer_id(conn, customer)?;
    diesel::update(orders::table.filter(orders::public_reference.eq(reference.value())))
        .set((
            orders::customer_id.eq(Some(customer_id)),
            orders::status.eq(OrderStatus::Assigned.as_str()),
        ))
        .execute(conn)?;

    queries::orders::get_order(conn, reference)
}

/// Stores the payment method on an order and restates its totals
/// under the method's administration costs.
///
/// # Errors
///
/// Returns a `DomainViolation` when the order is already terminal or
/// paid.
pub fn update_payment_method(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
    method: PaymentMethod,
    redirect_costs: Money,
) -> Result<Order, PersistenceError> {
    let mut order = queries::orders::get_order(conn, reference)?;
    if order.status.is_terminal() || order.status == OrderStatus::Paid {
        return Err(DomainError::WrongStatus {
            required: OrderStatus::Pending,
            actual: order.status,
        }
        .into());
    }

    order.payment_method = Some(method);
    order.administration_costs = method.administration_costs(redirect_costs);
    order.update_totals();

    diesel::update(orders::table.filter(orders::public_reference.eq(reference.value())))
        .set((
            orders::payment_method.eq(Some(method.as_str())),
            orders::administration_costs.eq(order.administration_costs.cents()),
            orders::amount.eq(order.amount.cents()),
            orders::vat_total.eq(order.vat_total.cents()),
        ))
        .execute(conn)?;

    queries::orders::get_order(conn, reference)
}

/// Stores the provider-side payment reference on an order.
///
/// # Errors
///
/// Returns `OrderNotFound` for an unknown reference.
pub fn set_provider_reference(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
    provider_reference: &str,
) -> Result<(), PersistenceError> {
    let updated =
        diesel::update(orders::table.filter(orders::public_reference.eq(reference.value())))
            .set(orders::provider_reference.eq(Some(provider_reference)))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::OrderNotFound(
            reference.value().to_string(),
        ));
    }
    Ok(())
}

/// Moves an order to a target status, executing the full transition
/// plan: ledger operation with capacity re-check, status and
/// `paid_at` writes, and idempotent ticket issuance or revocation.
///
/// Returns the updated order together with the executed plan so the
/// caller can fire the post-commit notification and webhook.
///
/// # Errors
///
/// Returns a `DomainViolation` when the transition is illegal or a
/// capacity re-check fails; the transaction rolls back.
pub fn transition_order(
    conn: &mut SqliteConnection,
    reference: &OrderReference,
    target: OrderStatus,
    now: OffsetDateTime,
) -> Result<(Order, TransitionPlan), PersistenceError> {
    let order = queries::orders::get_order(conn, reference)?;
    let plan = plan_transition(&order, target)?;

    if let Some(op) = plan.ledger {
        // Fresh claims re-verify the owner's personal caps against a
        // usage read in this transaction; an order converting its own
        // hold into a sale is already counted and must not be checked
        // against itself.
        let claims_capacity = matches!(
            op,
            LedgerOp::Reserve
                | LedgerOp::Confirm {
                    release_reservation: false,
                }
        );
        if claims_capacity && let Some(owner) = &order.owner {
            let products: Vec<_> = order
                .lines
                .iter()
                .map(|line| line.product.clone())
                .collect();
            let usage = queries::customers::usage_for_products(conn, owner, &products)?;
            for line in &order.lines {
                if let Some(product_usage) =
                    usage.iter().find(|entry| entry.product == line.product)
                {
                    let requested = order.quantity_of_any(std::slice::from_ref(&line.product));
                    check_customer_limit(product_usage, requested)?;
                }
            }
        }

        for line in &order.lines {
            inventory::apply_ledger_op(conn, op, &line.product, line.quantity)?;
        }
    }

    diesel::update(orders::table.filter(orders::public_reference.eq(reference.value())))
        .set(orders::status.eq(target.as_str()))
        .execute(conn)?;

    if plan.set_paid_at {
        diesel::update(orders::table.filter(orders::public_reference.eq(reference.value())))
            .set(orders::paid_at.eq(Some(format_timestamp(now)?)))
            .execute(conn)?;
    }

    let order_id = order
        .id
        .ok_or_else(|| PersistenceError::CorruptRecord("order without row id".to_string()))?;

    if plan.issue_tickets && !order.tickets_issued {
        let row = queries::orders::get_order_row(conn, reference)?;
        let customer_id = row
            .customer_id
            .ok_or(PersistenceError::DomainViolation(DomainError::MissingOwner))?;
        tickets::issue_tickets(conn, order_id, customer_id, &order.lines)?;
    }

    if plan.revoke_tickets {
        tickets::revoke_tickets(conn, order_id)?;
    }

    let updated = queries::orders::get_order(conn, reference)?;
    Ok((updated, plan))
}
