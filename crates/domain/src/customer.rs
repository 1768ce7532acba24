// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::keys::CustomerKey;
use serde::{Deserialize, Serialize};

/// A customer identity, used for per-customer limit accounting.
///
/// Orders start anonymous; a customer is attached by the assignment
/// transition, at which point the customer's personal caps apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Database identity; `None` until persisted.
    pub id: Option<i64>,
    /// Opaque public key.
    pub key: CustomerKey,
    /// Display name.
    pub name: String,
    /// Contact address used for order notifications.
    pub email: String,
}
