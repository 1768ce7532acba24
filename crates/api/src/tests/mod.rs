// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the API layer: end-to-end order flows against an
//! in-memory database with recording fakes on the outbound ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;
mod reservation_tests;
mod sweep_tests;
