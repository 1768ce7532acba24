// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the ticket shop.
//!
//! Handler functions bridge transport to the order engine: they parse
//! and validate request payloads, drive persistence and the outbound
//! ports, and translate domain, core, and persistence errors into the
//! API error contract. No HTTP types appear here; the server crate
//! owns routing and status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    STALE_ORDER_MAX_AGE, SideEffects, approve_reservation, assign_customer, cancel_order,
    create_order, expire_stale_orders, get_order, list_products, list_tickets, reconcile_payment,
    refund_order, reject_reservation, request_reservation, start_payment,
};
pub use request_response::{
    AssignCustomerRequest, AssignCustomerResponse, CancelOrderRequest, CancelOrderResponse,
    CreateOrderRequest, CreateOrderResponse, GetOrderResponse, ListProductsResponse,
    ListTicketsResponse, OrderInfo, OrderLineInfo, OrderLineRequest, ProductInfo,
    ReconcilePaymentRequest, ReconcilePaymentResponse, RefundOrderRequest, RefundOrderResponse,
    ReservationDecisionRequest, ReservationDecisionResponse, RequestReservationRequest,
    RequestReservationResponse, StartPaymentRequest, StartPaymentResponse, SweepExpiredResponse,
    TicketInfo,
};
