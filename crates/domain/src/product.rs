// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sellable products and their inventory counters.

use crate::keys::{EventKey, ProductKey};
use crate::money::Money;
use crate::vat::VatRate;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A sellable item.
///
/// The `sold` and `reserved` counters are owned by the inventory
/// ledger in the persistence layer; domain code only reads them.
/// `reserved` counts orders that claimed inventory without paying yet
/// and must be included in every capacity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Database identity; `None` until persisted.
    pub id: Option<i64>,
    /// Opaque public key.
    pub key: ProductKey,
    /// Display title.
    pub title: String,
    /// VAT-inclusive unit price.
    pub cost: Money,
    /// VAT rate classification.
    pub vat_rate: VatRate,
    /// Start of the sell window.
    pub sell_start: OffsetDateTime,
    /// End of the sell window.
    pub sell_end: OffsetDateTime,
    /// Per-product cap; `None` means uncapped.
    pub max_sold: Option<u32>,
    /// Per-customer cap; `None` means uncapped.
    pub max_sold_per_customer: Option<u32>,
    /// Units permanently consumed by paid orders.
    pub sold: u32,
    /// Units held by open reservations.
    pub reserved: u32,
    /// Related products sharing the same per-customer entitlement
    /// (bundle/parent-child links), so a cap cannot be bypassed by
    /// buying under a linked product.
    pub related: Vec<ProductKey>,
    /// The event this product belongs to, if any.
    pub event: Option<EventKey>,
}

impl Product {
    /// Returns how many units can still be sold or reserved, or `None`
    /// if the product is uncapped.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.max_sold
            .map(|cap| cap.saturating_sub(self.sold + self.reserved))
    }

    /// Returns true if the given instant falls inside the product's
    /// sell window. Capacity is a separate concern: a sold-out product
    /// is still "for sale" and must be rejected by the limit checks,
    /// which report the remaining allowance.
    #[must_use]
    pub fn is_sellable_at(&self, now: OffsetDateTime) -> bool {
        now >= self.sell_start && now < self.sell_end
    }

    /// Returns this product's key together with its related keys, the
    /// pool the per-customer check aggregates over.
    #[must_use]
    pub fn entitlement_pool(&self) -> Vec<ProductKey> {
        let mut pool = Vec::with_capacity(self.related.len() + 1);
        pool.push(self.key.clone());
        pool.extend(self.related.iter().cloned());
        pool
    }
}
