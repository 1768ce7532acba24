// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tickets_domain::DomainError;

/// Errors that can occur while driving the order lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The payment provider could not be reached or answered garbage.
    ProviderUnavailable {
        /// A description of the provider failure.
        reason: String,
    },
    /// The reconciliation loop exhausted its attempt budget without the
    /// provider reporting a terminal payment status.
    ///
    /// This is the documented fallback path, not a caller error: the
    /// order must be forced to `error` and the failure notification
    /// fired exactly once.
    ReconciliationExhausted {
        /// How many fetch attempts were made.
        attempts: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::ProviderUnavailable { reason } => {
                write!(f, "Payment provider unavailable: {reason}")
            }
            Self::ReconciliationExhausted { attempts } => {
                write!(
                    f,
                    "Payment status still unresolved after {attempts} fetch attempts"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
