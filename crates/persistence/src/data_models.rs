// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and conversions between database rows and domain types.
//!
//! Timestamps persist as RFC 3339 text. Quantities and counters
//! persist as `INTEGER`; conversions are checked so a corrupt or
//! hand-edited database surfaces as `CorruptRecord` instead of a
//! panic or silent wrap.

use crate::diesel_schema::{customers, events, order_lines, orders, product_related, products, tickets};
use crate::error::PersistenceError;
use diesel::prelude::*;
use std::str::FromStr;
use tickets_domain::{
    Customer, CustomerKey, Event, EventKey, Money, Order, OrderLine, OrderReference, OrderStatus,
    PaymentMethod, Product, ProductKey, Ticket, TicketKey, VatRate,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::CorruptRecord(format!("unformattable timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRecord(format!("invalid timestamp '{value}': {e}")))
}

/// Converts a domain count into its stored form.
///
/// # Errors
///
/// Returns an error if the count exceeds the storable range.
pub fn count_to_db(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::CorruptRecord(format!("count {value} out of range")))
}

/// Converts a stored count back into its domain form.
///
/// # Errors
///
/// Returns an error if the stored value is negative.
pub fn count_from_db(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::CorruptRecord(format!("negative stored count {value}")))
}

#[derive(Debug, Queryable)]
pub struct EventRow {
    pub event_id: i64,
    pub event_key: String,
    pub title: String,
    pub max_sold: Option<i32>,
    pub sold: i32,
    pub reserved: i32,
}

impl EventRow {
    /// Maps the row onto the domain event.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored counter is out of range.
    pub fn into_domain(self) -> Result<Event, PersistenceError> {
        Ok(Event {
            id: Some(self.event_id),
            key: EventKey::new(&self.event_key),
            title: self.title,
            max_sold: self.max_sold.map(count_from_db).transpose()?,
            sold: count_from_db(self.sold)?,
            reserved: count_from_db(self.reserved)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub event_key: &'a str,
    pub title: &'a str,
    pub max_sold: Option<i32>,
    pub sold: i32,
    pub reserved: i32,
}

#[derive(Debug, Queryable)]
pub struct ProductRow {
    pub product_id: i64,
    pub product_key: String,
    pub event_id: Option<i64>,
    pub title: String,
    pub cost: i64,
    pub vat_rate: String,
    pub sell_start: String,
    pub sell_end: String,
    pub max_sold: Option<i32>,
    pub max_sold_per_customer: Option<i32>,
    pub sold: i32,
    pub reserved: i32,
}

impl ProductRow {
    /// Maps the row onto the domain product.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be mapped back.
    pub fn into_domain(
        self,
        related: Vec<ProductKey>,
        event: Option<EventKey>,
    ) -> Result<Product, PersistenceError> {
        let vat_rate = VatRate::from_str(&self.vat_rate)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(Product {
            id: Some(self.product_id),
            key: ProductKey::new(&self.product_key),
            title: self.title,
            cost: Money::from_cents(self.cost),
            vat_rate,
            sell_start: parse_timestamp(&self.sell_start)?,
            sell_end: parse_timestamp(&self.sell_end)?,
            max_sold: self.max_sold.map(count_from_db).transpose()?,
            max_sold_per_customer: self.max_sold_per_customer.map(count_from_db).transpose()?,
            sold: count_from_db(self.sold)?,
            reserved: count_from_db(self.reserved)?,
            related,
            event,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct<'a> {
    pub product_key: &'a str,
    pub event_id: Option<i64>,
    pub title: &'a str,
    pub cost: i64,
    pub vat_rate: &'a str,
    pub sell_start: String,
    pub sell_end: String,
    pub max_sold: Option<i32>,
    pub max_sold_per_customer: Option<i32>,
    pub sold: i32,
    pub reserved: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_related)]
pub struct NewProductRelated<'a> {
    pub product_id: i64,
    pub related_product_key: &'a str,
}

#[derive(Debug, Queryable)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub customer_key: String,
    pub name: String,
    pub email: String,
}

impl CustomerRow {
    pub fn into_domain(self) -> Customer {
        Customer {
            id: Some(self.customer_id),
            key: CustomerKey::new(&self.customer_key),
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomer<'a> {
    pub customer_key: &'a str,
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Queryable)]
pub struct OrderRow {
    pub order_id: i64,
    pub public_reference: String,
    pub status: String,
    pub customer_id: Option<i64>,
    pub amount: i64,
    pub vat_total: i64,
    pub administration_costs: i64,
    pub payment_method: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub paid_at: Option<String>,
    pub provider_reference: Option<String>,
    pub tickets_issued: i32,
}

impl OrderRow {
    /// Maps the row plus its lines onto the domain order.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be mapped back.
    pub fn into_domain(
        self,
        owner: Option<CustomerKey>,
        lines: Vec<OrderLine>,
    ) -> Result<Order, PersistenceError> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        let payment_method = self
            .payment_method
            .as_deref()
            .map(PaymentMethod::from_str)
            .transpose()
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(Order {
            id: Some(self.order_id),
            public_reference: OrderReference::new(&self.public_reference),
            status,
            owner,
            lines,
            amount: Money::from_cents(self.amount),
            vat_total: Money::from_cents(self.vat_total),
            administration_costs: Money::from_cents(self.administration_costs),
            payment_method,
            created_by: self.created_by,
            created_at: parse_timestamp(&self.created_at)?,
            paid_at: self.paid_at.as_deref().map(parse_timestamp).transpose()?,
            provider_reference: self.provider_reference,
            tickets_issued: self.tickets_issued != 0,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder<'a> {
    pub public_reference: &'a str,
    pub status: &'a str,
    pub customer_id: Option<i64>,
    pub amount: i64,
    pub vat_total: i64,
    pub administration_costs: i64,
    pub payment_method: Option<&'a str>,
    pub created_by: &'a str,
    pub created_at: String,
    pub tickets_issued: i32,
}

#[derive(Debug, Queryable)]
pub struct OrderLineRow {
    pub order_line_id: i64,
    pub order_id: i64,
    pub product_key: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub vat_rate: String,
}

impl OrderLineRow {
    /// Maps the row onto a domain order line.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be mapped back.
    pub fn into_domain(self) -> Result<OrderLine, PersistenceError> {
        let vat_rate = VatRate::from_str(&self.vat_rate)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(OrderLine {
            product: ProductKey::new(&self.product_key),
            quantity: count_from_db(self.quantity)?,
            unit_price: Money::from_cents(self.unit_price),
            vat_rate,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLine<'a> {
    pub order_id: i64,
    pub product_key: &'a str,
    pub quantity: i32,
    pub unit_price: i64,
    pub vat_rate: &'a str,
}

#[derive(Debug, Queryable)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub ticket_key: String,
    pub order_id: i64,
    pub product_key: String,
    pub customer_id: i64,
    pub unique_code: String,
    pub revoked: i32,
}

impl TicketRow {
    pub fn into_domain(self, order: OrderReference, owner: CustomerKey) -> Ticket {
        Ticket {
            id: Some(self.ticket_id),
            key: TicketKey::new(&self.ticket_key),
            order,
            product: ProductKey::new(&self.product_key),
            owner,
            unique_code: self.unique_code,
            revoked: self.revoked != 0,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket<'a> {
    pub ticket_key: &'a str,
    pub order_id: i64,
    pub product_key: &'a str,
    pub customer_id: i64,
    pub unique_code: &'a str,
    pub revoked: i32,
}
