// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Limit accounting.
//!
//! Determines whether confirming a candidate order line would exceed
//! per-product, per-event, or per-customer caps, accounting for
//! already-sold and currently-reserved quantities. The checks are pure
//! functions over a capacity snapshot; they are advisory at validation
//! time and must be re-run inside the confirmation transaction, because
//! capacity can be consumed by concurrent orders in between.

use std::collections::BTreeMap;
use tickets_domain::{DomainError, EventKey, ProductKey};

/// Capacity counters for one product, read atomically from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCapacity {
    /// The product these counters belong to.
    pub product: ProductKey,
    /// Per-product cap; `None` means uncapped.
    pub max_sold: Option<u32>,
    /// Units permanently consumed by paid orders.
    pub sold: u32,
    /// Units held by open reservations.
    pub reserved: u32,
    /// Counters of the owning event, if the product belongs to one.
    pub event: Option<EventCapacity>,
}

/// Capacity counters for one event, aggregated over its products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCapacity {
    /// The event these counters belong to.
    pub event: EventKey,
    /// Aggregate cap; `None` means uncapped.
    pub max_sold: Option<u32>,
    /// Units sold across the event's products.
    pub sold: u32,
    /// Units reserved across the event's products.
    pub reserved: u32,
}

/// The requesting customer's existing usage of one product's
/// entitlement pool: issued tickets plus quantities held by the
/// customer's own open reservation orders, aggregated over related
/// products and read in a single atomic query.
///
/// Reservations held by other customers never appear here; they count
/// only through the shared `reserved` counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProductUsage {
    /// The product (head of its entitlement pool).
    pub product: ProductKey,
    /// Per-customer cap; `None` means uncapped.
    pub max_sold_per_customer: Option<u32>,
    /// Tickets already issued to this customer for the pool.
    pub issued: u32,
    /// Quantities claimed by this customer's open reservations for the pool.
    pub reserved_by_customer: u32,
}

/// A capacity snapshot covering every product of a candidate order.
#[derive(Debug, Clone, Default)]
pub struct CapacitySnapshot {
    products: BTreeMap<ProductKey, ProductCapacity>,
}

impl CapacitySnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product's counters to the snapshot.
    pub fn insert(&mut self, capacity: ProductCapacity) {
        self.products.insert(capacity.product.clone(), capacity);
    }

    /// Looks up the counters for a product.
    #[must_use]
    pub fn get(&self, product: &ProductKey) -> Option<&ProductCapacity> {
        self.products.get(product)
    }
}

/// Checks that the requested quantity fits under the product cap.
///
/// Fails when `sold + reserved + requested > max_sold`; uncapped
/// products always pass.
///
/// # Errors
///
/// Returns `DomainError::ProductLimitExceeded` carrying the remaining
/// allowance.
pub fn check_product_limit(
    capacity: &ProductCapacity,
    requested: u32,
) -> Result<(), DomainError> {
    let Some(cap) = capacity.max_sold else {
        return Ok(());
    };
    let taken = capacity.sold + capacity.reserved;
    if taken + requested > cap {
        return Err(DomainError::ProductLimitExceeded {
            product: capacity.product.clone(),
            remaining: cap.saturating_sub(taken),
        });
    }
    Ok(())
}

/// Checks that the requested quantity fits under the event cap.
///
/// Products without an owning event skip this check.
///
/// # Errors
///
/// Returns `DomainError::EventLimitExceeded` carrying the remaining
/// allowance.
pub fn check_event_limit(capacity: &ProductCapacity, requested: u32) -> Result<(), DomainError> {
    let Some(event) = &capacity.event else {
        return Ok(());
    };
    let Some(cap) = event.max_sold else {
        return Ok(());
    };
    let taken = event.sold + event.reserved;
    if taken + requested > cap {
        return Err(DomainError::EventLimitExceeded {
            event: event.event.clone(),
            remaining: cap.saturating_sub(taken),
        });
    }
    Ok(())
}

/// Checks that the requested quantity fits under the customer's
/// personal cap for the product's entitlement pool.
///
/// Only the requesting customer's own issued tickets and open
/// reservations count; related products aggregate into one pool so a
/// cap cannot be bypassed by buying under a linked product.
///
/// # Errors
///
/// Returns `DomainError::CustomerLimitExceeded` carrying the remaining
/// allowance.
pub fn check_customer_limit(
    usage: &CustomerProductUsage,
    requested: u32,
) -> Result<(), DomainError> {
    let Some(cap) = usage.max_sold_per_customer else {
        return Ok(());
    };
    let taken = usage.issued + usage.reserved_by_customer;
    if taken + requested > cap {
        return Err(DomainError::CustomerLimitExceeded {
            product: usage.product.clone(),
            remaining: cap.saturating_sub(taken),
        });
    }
    Ok(())
}
