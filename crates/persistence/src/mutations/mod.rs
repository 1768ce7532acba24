// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side operations.
//!
//! All state-changing operations live here. The inventory ledger in
//! `inventory` is the only code allowed to touch the `sold` and
//! `reserved` counters, and `orders::transition_order` is the only
//! entry point that executes a transition plan; both run inside the
//! caller's transaction so a failure anywhere rolls back everything.

pub mod catalog;
pub mod inventory;
pub mod orders;
pub mod tickets;
