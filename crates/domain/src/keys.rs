// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opaque, externally shareable keys for domain entities.
//!
//! Keys are the only identifiers exposed outside the persistence
//! layer; numeric row IDs never leave it.

use serde::{Deserialize, Serialize};

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new key from its string value.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self(value.to_string())
            }

            /// Returns the key value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

key_type! {
    /// Key identifying a sellable product.
    ProductKey
}

key_type! {
    /// Key identifying an event grouping products.
    EventKey
}

key_type! {
    /// Key identifying a customer.
    CustomerKey
}

key_type! {
    /// Public reference of an order, safe to share in URLs and mails.
    OrderReference
}

key_type! {
    /// Key identifying an issued ticket.
    TicketKey
}
