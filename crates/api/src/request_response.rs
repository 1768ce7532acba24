// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Money is carried as integer euro cents; timestamps as RFC 3339
//! strings. The `Info` types are flattened views of the domain
//! aggregates, safe to serialize straight onto the wire.

use serde::{Deserialize, Serialize};
use tickets_domain::{Order, Product, Ticket};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn timestamp_string(timestamp: OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).unwrap_or_default()
}

/// One product selection on a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    /// The product key.
    pub product: String,
    /// How many units to order.
    pub quantity: u32,
}

/// Request to create a new order from a product selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// The selected products and quantities.
    pub lines: Vec<OrderLineRequest>,
    /// Tag identifying the creating surface, e.g. "webshop".
    pub created_by: String,
}

/// One order line as stored on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineInfo {
    /// The product key.
    pub product: String,
    /// How many units are ordered.
    pub quantity: u32,
    /// Unit price at order time, in euro cents.
    pub unit_price_cents: i64,
    /// VAT rate applied to the line.
    pub vat_rate: String,
}

/// A flattened view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfo {
    /// The order's public reference.
    pub reference: String,
    /// The order's lifecycle status.
    pub status: String,
    /// The owning customer, once assigned.
    pub customer: Option<String>,
    /// The order lines.
    pub lines: Vec<OrderLineInfo>,
    /// Total amount including VAT and administration costs, in cents.
    pub amount_cents: i64,
    /// Total VAT contained in the amount, in cents.
    pub vat_total_cents: i64,
    /// Administration costs for the payment method, in cents.
    pub administration_costs_cents: i64,
    /// The chosen payment method, once set.
    pub payment_method: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Payment timestamp, RFC 3339, once paid.
    pub paid_at: Option<String>,
}

impl From<&Order> for OrderInfo {
    fn from(order: &Order) -> Self {
        Self {
            reference: order.public_reference.value().to_string(),
            status: order.status.as_str().to_string(),
            customer: order.owner.as_ref().map(|key| key.value().to_string()),
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineInfo {
                    product: line.product.value().to_string(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    vat_rate: line.vat_rate.as_str().to_string(),
                })
                .collect(),
            amount_cents: order.amount.cents(),
            vat_total_cents: order.vat_total.cents(),
            administration_costs_cents: order.administration_costs.cents(),
            payment_method: order
                .payment_method
                .as_ref()
                .map(|method| method.as_str().to_string()),
            created_at: timestamp_string(order.created_at),
            paid_at: order.paid_at.map(timestamp_string),
        }
    }
}

/// Response to creating a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// The created order.
    pub order: OrderInfo,
    /// A success message.
    pub message: String,
}

/// Request to attach a customer to an anonymous order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignCustomerRequest {
    /// The order's public reference.
    pub reference: String,
    /// The customer key to attach.
    pub customer: String,
}

/// Response to attaching a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignCustomerResponse {
    /// The updated order.
    pub order: OrderInfo,
    /// A success message.
    pub message: String,
}

/// Request to start payment on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPaymentRequest {
    /// The order's public reference.
    pub reference: String,
    /// The payment method tag, e.g. "ideal" or "cash".
    pub method: String,
}

/// Response to starting payment.
///
/// For redirect methods the order stays `pending` and `redirect_url`
/// carries the provider checkout page; point-of-sale methods settle
/// immediately and the order comes back `paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPaymentResponse {
    /// The updated order.
    pub order: OrderInfo,
    /// Provider checkout URL for redirect methods.
    pub redirect_url: Option<String>,
    /// A success message.
    pub message: String,
}

/// Request to reconcile a pending payment against the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePaymentRequest {
    /// The order's public reference.
    pub reference: String,
}

/// Response to reconciling a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePaymentResponse {
    /// The order after reconciliation.
    pub order: OrderInfo,
    /// A message describing the reconciliation outcome.
    pub message: String,
}

/// Request to park a pending order as a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReservationRequest {
    /// The order's public reference.
    pub reference: String,
}

/// Response to requesting a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReservationResponse {
    /// The updated order.
    pub order: OrderInfo,
    /// A success message.
    pub message: String,
}

/// Request for an admin decision on a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDecisionRequest {
    /// The order's public reference.
    pub reference: String,
}

/// Response to an admin reservation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDecisionResponse {
    /// The order after the decision.
    pub order: OrderInfo,
    /// A message describing the decision.
    pub message: String,
}

/// Request to cancel a pending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    /// The order's public reference.
    pub reference: String,
}

/// Response to cancelling an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    /// The cancelled order.
    pub order: OrderInfo,
    /// A success message.
    pub message: String,
}

/// Request to refund a paid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundOrderRequest {
    /// The order's public reference.
    pub reference: String,
}

/// Response to refunding an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundOrderResponse {
    /// The refunded order.
    pub order: OrderInfo,
    /// How many tickets were revoked.
    pub revoked_tickets: u32,
    /// A success message.
    pub message: String,
}

/// Response to the stale-order expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepExpiredResponse {
    /// The references of the orders that were expired.
    pub expired: Vec<String>,
    /// A summary message.
    pub message: String,
}

/// Response to fetching a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOrderResponse {
    /// The order.
    pub order: OrderInfo,
}

/// A flattened view of an issued ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInfo {
    /// The ticket's public key.
    pub key: String,
    /// The product the ticket admits.
    pub product: String,
    /// The owning customer.
    pub owner: String,
    /// The unique scan code.
    pub unique_code: String,
    /// Whether the ticket has been revoked.
    pub revoked: bool,
}

impl From<&Ticket> for TicketInfo {
    fn from(ticket: &Ticket) -> Self {
        Self {
            key: ticket.key.value().to_string(),
            product: ticket.product.value().to_string(),
            owner: ticket.owner.value().to_string(),
            unique_code: ticket.unique_code.clone(),
            revoked: ticket.revoked,
        }
    }
}

/// Response to listing an order's tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    /// The tickets issued for the order.
    pub tickets: Vec<TicketInfo>,
}

/// A flattened view of a product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// The product key.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Unit price including VAT, in euro cents.
    pub cost_cents: i64,
    /// VAT rate tag.
    pub vat_rate: String,
    /// Start of the sell window, RFC 3339.
    pub sell_start: String,
    /// End of the sell window, RFC 3339.
    pub sell_end: String,
    /// Sales cap; `None` means uncapped.
    pub max_sold: Option<u32>,
    /// Per-customer cap; `None` means uncapped.
    pub max_sold_per_customer: Option<u32>,
    /// How many units can still be sold or reserved; `None` means
    /// uncapped.
    pub remaining: Option<u32>,
    /// The owning event, if any.
    pub event: Option<String>,
}

impl From<&Product> for ProductInfo {
    fn from(product: &Product) -> Self {
        Self {
            key: product.key.value().to_string(),
            title: product.title.clone(),
            cost_cents: product.cost.cents(),
            vat_rate: product.vat_rate.as_str().to_string(),
            sell_start: timestamp_string(product.sell_start),
            sell_end: timestamp_string(product.sell_end),
            max_sold: product.max_sold,
            max_sold_per_customer: product.max_sold_per_customer,
            remaining: product.remaining(),
            event: product.event.as_ref().map(|key| key.value().to_string()),
        }
    }
}

/// Response to listing the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProductsResponse {
    /// The products in the catalog.
    pub products: Vec<ProductInfo>,
}
