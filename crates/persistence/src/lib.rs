// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the ticket shop.
//!
//! This crate stores the catalog, orders, tickets, and the inventory
//! ledger in `SQLite` via Diesel. Status transitions execute inside
//! an immediate transaction: the ledger update with its capacity
//! re-check, the status write, and ticket issuance commit together or
//! not at all, so the counters can never drift from the order states
//! they account for.
//!
//! In-memory databases are used for development and tests; file-based
//! databases run in WAL mode. Foreign key enforcement is verified at
//! startup.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tickets_core::{CapacitySnapshot, CustomerProductUsage, TransitionPlan};
use tickets_domain::{
    Customer, CustomerKey, Event, EventKey, Money, Order, OrderReference, OrderStatus,
    PaymentMethod, Product, ProductKey, Ticket,
};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// All public methods open their own transaction where one is needed;
/// callers never manage transactions themselves.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Inserts an event and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_event(&mut self, event: &Event) -> Result<i64, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::catalog::create_event(conn, event))
    }

    /// Inserts a product with its related links and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if the product names an unknown event.
    pub fn create_product(&mut self, product: &Product) -> Result<i64, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::catalog::create_product(conn, product))
    }

    /// Inserts a customer and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_customer(&mut self, customer: &Customer) -> Result<i64, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::catalog::create_customer(conn, customer))
    }

    /// Fetches an event by key.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` for an unknown key.
    pub fn get_event(&mut self, key: &EventKey) -> Result<Event, PersistenceError> {
        queries::catalog::get_event(&mut self.conn, key)
    }

    /// Fetches a product by key, with its related links and event.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` for an unknown key.
    pub fn get_product(&mut self, key: &ProductKey) -> Result<Product, PersistenceError> {
        queries::catalog::get_product(&mut self.conn, key)
    }

    /// Lists every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored row cannot be mapped back.
    pub fn list_products(&mut self) -> Result<Vec<Product>, PersistenceError> {
        queries::catalog::list_products(&mut self.conn)
    }

    /// Fetches a customer by key.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` for an unknown key.
    pub fn get_customer(&mut self, key: &CustomerKey) -> Result<Customer, PersistenceError> {
        queries::customers::get_customer(&mut self.conn, key)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Inserts an order with its lines and returns the stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if a line names an unknown product or the
    /// owner is unknown.
    pub fn create_order(&mut self, order: &Order) -> Result<Order, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::orders::create_order(conn, order))
    }

    /// Fetches an order by public reference.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` for an unknown reference.
    pub fn get_order(&mut self, reference: &OrderReference) -> Result<Order, PersistenceError> {
        queries::orders::get_order(&mut self.conn, reference)
    }

    /// Attaches a customer to an anonymous order and moves it to
    /// `assigned`, checking personal caps against a usage read in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns a `DomainViolation` when the order is not anonymous or
    /// a personal cap would be exceeded.
    pub fn assign_customer(
        &mut self,
        reference: &OrderReference,
        customer: &CustomerKey,
    ) -> Result<Order, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::orders::assign_customer(conn, reference, customer)
        })
    }

    /// Stores the payment method on an order and restates its totals
    /// under the method's administration costs.
    ///
    /// # Errors
    ///
    /// Returns a `DomainViolation` when the order is terminal or paid.
    pub fn update_payment_method(
        &mut self,
        reference: &OrderReference,
        method: PaymentMethod,
        redirect_costs: Money,
    ) -> Result<Order, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::orders::update_payment_method(conn, reference, method, redirect_costs)
        })
    }

    /// Stores the provider-side payment reference on an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` for an unknown reference.
    pub fn set_provider_reference(
        &mut self,
        reference: &OrderReference,
        provider_reference: &str,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::orders::set_provider_reference(conn, reference, provider_reference)
        })
    }

    /// Moves an order to a target status, executing the transition
    /// plan atomically: ledger update with capacity re-check, status
    /// and `paid_at` writes, and idempotent ticket issuance or
    /// revocation.
    ///
    /// Returns the updated order and the executed plan so the caller
    /// can fire the post-commit notification and webhook.
    ///
    /// # Errors
    ///
    /// Returns a `DomainViolation` when the transition is illegal or a
    /// capacity re-check fails; nothing is persisted in that case.
    pub fn transition_order(
        &mut self,
        reference: &OrderReference,
        target: OrderStatus,
        now: OffsetDateTime,
    ) -> Result<(Order, TransitionPlan), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::orders::transition_order(conn, reference, target, now)
        })
    }

    /// Lists the orders currently in a given status, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored row cannot be mapped back.
    pub fn orders_with_status(
        &mut self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::orders_with_status(&mut self.conn, status)
    }

    /// Lists the references of orders that are still expirable and
    /// were created before the cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn expirable_references_before(
        &mut self,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<OrderReference>, PersistenceError> {
        queries::orders::expirable_references_before(&mut self.conn, cutoff)
    }

    /// Fetches the tickets issued for an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` for an unknown reference.
    pub fn tickets_for_order(
        &mut self,
        reference: &OrderReference,
    ) -> Result<Vec<Ticket>, PersistenceError> {
        queries::orders::tickets_for_order(&mut self.conn, reference)
    }

    // ========================================================================
    // Capacity & usage reads
    // ========================================================================

    /// Reads a capacity snapshot covering the given products.
    ///
    /// The snapshot is advisory; claims re-check the caps inside
    /// their own transaction.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` for an unknown key.
    pub fn capacity_snapshot(
        &mut self,
        keys: &[ProductKey],
    ) -> Result<CapacitySnapshot, PersistenceError> {
        self.conn
            .transaction(|conn| queries::inventory::capacity_snapshot(conn, keys))
    }

    /// Reads a customer's usage of each given product's entitlement
    /// pool in one transaction, so issued tickets and open
    /// reservations cannot drift apart between reads.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `CustomerNotFound` for unknown keys.
    pub fn customer_usage(
        &mut self,
        customer: &CustomerKey,
        products: &[ProductKey],
    ) -> Result<Vec<CustomerProductUsage>, PersistenceError> {
        self.conn
            .transaction(|conn| queries::customers::usage_for_products(conn, customer, products))
    }
}
