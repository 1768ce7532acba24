// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the ticket shop.
//!
//! This crate holds the pure domain model: orders and their line items,
//! the order status state machine, products and events with their
//! inventory counters, and exact cent-based money arithmetic. Nothing
//! in this crate performs I/O; all capacity and time inputs are passed
//! in explicitly so rules are deterministically testable.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod customer;
mod error;
mod event;
mod keys;
mod money;
mod order;
mod order_status;
mod payment_method;
mod product;
mod ticket;
mod vat;

pub use customer::Customer;
pub use error::DomainError;
pub use event::Event;
pub use keys::{CustomerKey, EventKey, OrderReference, ProductKey, TicketKey};
pub use money::Money;
pub use order::{Order, OrderLine, OrderTotals, compute_totals};
pub use order_status::{ALL_STATUSES, OrderStatus};
pub use payment_method::PaymentMethod;
pub use product::Product;
pub use ticket::Ticket;
pub use vat::VatRate;
