// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The order aggregate and its amount computation.
//!
//! An order owns its line items. Each line carries a price and VAT
//! rate snapshot taken at order-creation time, so later product price
//! changes never retroactively alter existing orders. The invariant
//! `amount == Σ(line.unit_price × line.quantity) + administration_costs`
//! must hold before any transition that represents payment intent.

use crate::keys::{CustomerKey, OrderReference, ProductKey};
use crate::money::Money;
use crate::order_status::OrderStatus;
use crate::payment_method::PaymentMethod;
use crate::vat::VatRate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A (product, quantity, price snapshot) tuple belonging to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product this line sells.
    pub product: ProductKey,
    /// How many units of the product.
    pub quantity: u32,
    /// Unit price copied from the product at order-creation time.
    pub unit_price: Money,
    /// VAT rate copied from the product at order-creation time.
    pub vat_rate: VatRate,
}

impl OrderLine {
    /// Creates a line, snapshotting price and VAT rate.
    #[must_use]
    pub const fn new(
        product: ProductKey,
        quantity: u32,
        unit_price: Money,
        vat_rate: VatRate,
    ) -> Self {
        Self {
            product,
            quantity,
            unit_price,
            vat_rate,
        }
    }

    /// Returns `unit_price × quantity`.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Returns the VAT portion of this line.
    #[must_use]
    pub const fn line_vat(&self) -> Money {
        self.vat_rate.unit_vat(self.unit_price).times(self.quantity)
    }
}

/// The monetary totals of an order, recomputed from its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    /// Grand total including administration costs.
    pub amount: Money,
    /// Total VAT contained in the amount.
    pub vat_total: Money,
    /// VAT broken down per rate, for reporting.
    pub vat_per_rate: BTreeMap<VatRate, Money>,
}

/// Computes an order's totals from its lines and flat administration
/// costs.
///
/// Pure and deterministic: the validator recomputes totals through this
/// function and compares them against the stored amount to detect
/// tampering or stale client state.
#[must_use]
pub fn compute_totals(lines: &[OrderLine], administration_costs: Money) -> OrderTotals {
    let amount: Money =
        lines.iter().map(OrderLine::line_total).sum::<Money>() + administration_costs;

    let mut vat_per_rate: BTreeMap<VatRate, Money> = BTreeMap::new();
    for line in lines {
        let entry = vat_per_rate.entry(line.vat_rate).or_insert(Money::ZERO);
        *entry += line.line_vat();
    }
    let vat_total: Money = vat_per_rate.values().copied().sum();

    OrderTotals {
        amount,
        vat_total,
        vat_per_rate,
    }
}

/// A customer's (or anonymous) request for one or more products,
/// tracked through the payment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Database identity; `None` until persisted.
    pub id: Option<i64>,
    /// Opaque public reference, safe to share externally.
    pub public_reference: OrderReference,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Owning customer; `None` until the assignment transition.
    pub owner: Option<CustomerKey>,
    /// The ordered line items.
    pub lines: Vec<OrderLine>,
    /// Stored grand total, validated against [`compute_totals`].
    pub amount: Money,
    /// Stored VAT total.
    pub vat_total: Money,
    /// Flat administration costs included in the amount.
    pub administration_costs: Money,
    /// How the order was or will be paid.
    pub payment_method: Option<PaymentMethod>,
    /// Origination channel tag (webshop, sales app, admin, ...).
    pub created_by: String,
    /// When the order was created.
    pub created_at: OffsetDateTime,
    /// When the order was paid; set on the transition into `Paid`.
    pub paid_at: Option<OffsetDateTime>,
    /// Reference issued by the external payment provider.
    pub provider_reference: Option<String>,
    /// Whether tickets have been issued for this order.
    ///
    /// Guards idempotent ticket issuance across crash-and-retry.
    pub tickets_issued: bool,
}

impl Order {
    /// Creates a new anonymous order from its lines, computing and
    /// storing the totals.
    #[must_use]
    pub fn new(
        public_reference: OrderReference,
        lines: Vec<OrderLine>,
        created_by: &str,
        created_at: OffsetDateTime,
    ) -> Self {
        let totals = compute_totals(&lines, Money::ZERO);
        Self {
            id: None,
            public_reference,
            status: OrderStatus::Anonymous,
            owner: None,
            lines,
            amount: totals.amount,
            vat_total: totals.vat_total,
            administration_costs: Money::ZERO,
            payment_method: None,
            created_by: created_by.to_string(),
            created_at,
            paid_at: None,
            provider_reference: None,
            tickets_issued: false,
        }
    }

    /// Recomputes and stores the totals after the administration costs
    /// or payment method changed.
    pub fn update_totals(&mut self) {
        let totals = compute_totals(&self.lines, self.administration_costs);
        self.amount = totals.amount;
        self.vat_total = totals.vat_total;
    }

    /// Returns the recomputed totals without mutating the order.
    #[must_use]
    pub fn computed_totals(&self) -> OrderTotals {
        compute_totals(&self.lines, self.administration_costs)
    }

    /// Returns the total quantity of a product across all lines,
    /// counting any of the given related keys as the same entitlement.
    #[must_use]
    pub fn quantity_of_any(&self, products: &[ProductKey]) -> u32 {
        self.lines
            .iter()
            .filter(|line| products.contains(&line.product))
            .map(|line| line.quantity)
            .sum()
    }
}
