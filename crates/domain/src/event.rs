// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::keys::EventKey;
use serde::{Deserialize, Serialize};

/// An event grouping products under one aggregate capacity cap.
///
/// The event's `sold`/`reserved` counters aggregate over all of its
/// products and are checked in addition to each per-product cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Database identity; `None` until persisted.
    pub id: Option<i64>,
    /// Opaque public key.
    pub key: EventKey,
    /// Display title.
    pub title: String,
    /// Aggregate cap across the event's products; `None` means uncapped.
    pub max_sold: Option<u32>,
    /// Units permanently consumed across the event's products.
    pub sold: u32,
    /// Units held by open reservations across the event's products.
    pub reserved: u32,
}

impl Event {
    /// Returns how many tickets can still be sold or reserved for this
    /// event, or `None` if uncapped.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.max_sold
            .map(|cap| cap.saturating_sub(self.sold + self.reserved))
    }
}
