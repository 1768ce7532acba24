// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order lifecycle and validation engine.
//!
//! This crate orchestrates the order state machine: structural
//! validation, capacity limit accounting, transition planning with
//! side effects expressed as data, and the bounded payment
//! reconciliation loop. It performs no I/O itself; capacity snapshots
//! come in from the persistence layer and transition plans go back out
//! to be executed atomically with the status write.

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

mod clock;
mod error;
mod limits;
mod ports;
mod reconcile;
mod transition;
mod validate;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CoreError;
pub use limits::{
    CapacitySnapshot, CustomerProductUsage, EventCapacity, ProductCapacity, check_customer_limit,
    check_event_limit, check_product_limit,
};
pub use ports::{
    NotificationSink, PaymentProvider, PaymentSession, ProviderPaymentStatus, WebhookPublisher,
    WebhookTrigger,
};
pub use reconcile::{
    MAX_STATUS_FETCH_ATTEMPTS, ReconcileOutcome, Reconciler, STATUS_FETCH_RETRY_DELAY, Sleeper,
    TokioSleeper,
};
pub use transition::{LedgerOp, Notification, TransitionPlan, plan_transition};
pub use validate::{
    AdministrationCostsPolicy, assert_valid_for_creation, assert_valid_for_customer,
    assert_valid_for_payment,
};
