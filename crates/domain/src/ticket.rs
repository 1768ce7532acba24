// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::keys::{CustomerKey, OrderReference, ProductKey, TicketKey};
use serde::{Deserialize, Serialize};

/// A ticket issued for one unit of a product on a paid order.
///
/// Tickets are issued exactly once per order on the transition into
/// `Paid`; issuance is idempotent under crash-and-retry, and issued
/// tickets count toward the owner's per-customer limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Database identity; `None` until persisted.
    pub id: Option<i64>,
    /// Opaque public key.
    pub key: TicketKey,
    /// The order this ticket was issued for.
    pub order: OrderReference,
    /// The product this ticket admits.
    pub product: ProductKey,
    /// The customer who owns the ticket.
    pub owner: CustomerKey,
    /// Unique scan code, unique per product.
    pub unique_code: String,
    /// Whether the ticket has been administratively revoked (refund).
    pub revoked: bool,
}
