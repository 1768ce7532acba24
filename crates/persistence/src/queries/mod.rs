// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side operations.
//!
//! All functions use Diesel DSL against the `SQLite` connection. The
//! capacity and customer-usage reads here feed the validation
//! profiles in the engine crate; mutations re-run them inside their
//! transaction before consuming capacity.

pub mod catalog;
pub mod customers;
pub mod inventory;
pub mod orders;
