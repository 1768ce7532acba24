// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tickets_core::CoreError;
use tickets_domain::DomainError;
use tickets_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract: each variant maps to one transport outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource (e.g. "order", "product").
        resource_type: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A sales limit would be exceeded.
    LimitExceeded {
        /// The exhausted scope: a product, event, or per-customer cap.
        scope: String,
        /// How many units the scope can still absorb.
        remaining: u32,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The order is not in a status from which the requested
    /// transition is permitted.
    IllegalTransition {
        /// The order's current status.
        from: String,
        /// The requested status.
        to: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The payment provider failed or the payment could not be
    /// resolved.
    PaymentFailure {
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A human-readable description of the error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound { message, .. }
            | Self::LimitExceeded { message, .. }
            | Self::IllegalTransition { message, .. } => write!(f, "{message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::PaymentFailure { message } => write!(f, "Payment failure: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into the API error contract.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message = err.to_string();
    match err {
        DomainError::NegativeAmount(_) | DomainError::AmountMismatch { .. } => {
            ApiError::InvalidInput {
                field: "amount".to_string(),
                message,
            }
        }
        DomainError::AdministrationCostsMismatch { .. } => ApiError::InvalidInput {
            field: "administration_costs".to_string(),
            message,
        },
        DomainError::EmptyOrder => ApiError::InvalidInput {
            field: "lines".to_string(),
            message,
        },
        DomainError::MissingCreatedBy => ApiError::InvalidInput {
            field: "created_by".to_string(),
            message,
        },
        DomainError::MissingOwner => ApiError::InvalidInput {
            field: "customer".to_string(),
            message,
        },
        DomainError::ZeroQuantity { .. } => ApiError::InvalidInput {
            field: "quantity".to_string(),
            message,
        },
        DomainError::ProductNotSellable { .. } => ApiError::InvalidInput {
            field: "product".to_string(),
            message,
        },
        DomainError::WrongStatus { required, actual } => ApiError::IllegalTransition {
            from: actual.as_str().to_string(),
            to: required.as_str().to_string(),
            message,
        },
        DomainError::IllegalTransition { from, to } => ApiError::IllegalTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            message,
        },
        DomainError::ProductLimitExceeded { product, remaining } => ApiError::LimitExceeded {
            scope: format!("product '{product}'"),
            remaining,
            message,
        },
        DomainError::EventLimitExceeded { event, remaining } => ApiError::LimitExceeded {
            scope: format!("event '{event}'"),
            remaining,
            message,
        },
        DomainError::CustomerLimitExceeded { product, remaining } => ApiError::LimitExceeded {
            scope: format!("customer allowance for '{product}'"),
            remaining,
            message,
        },
        DomainError::InvalidOrderStatus(_) => ApiError::InvalidInput {
            field: "status".to_string(),
            message,
        },
        DomainError::InvalidVatRate(_) => ApiError::InvalidInput {
            field: "vat_rate".to_string(),
            message,
        },
        DomainError::InvalidPaymentMethod(_) => ApiError::InvalidInput {
            field: "payment_method".to_string(),
            message,
        },
    }
}

/// Translates a core error into the API error contract.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ProviderUnavailable { .. } | CoreError::ReconciliationExhausted { .. } => {
            ApiError::PaymentFailure {
                message: err.to_string(),
            }
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        let message = err.to_string();
        match err {
            PersistenceError::OrderNotFound(_) => Self::ResourceNotFound {
                resource_type: "order".to_string(),
                message,
            },
            PersistenceError::ProductNotFound(_) => Self::ResourceNotFound {
                resource_type: "product".to_string(),
                message,
            },
            PersistenceError::EventNotFound(_) => Self::ResourceNotFound {
                resource_type: "event".to_string(),
                message,
            },
            PersistenceError::CustomerNotFound(_) => Self::ResourceNotFound {
                resource_type: "customer".to_string(),
                message,
            },
            PersistenceError::NotFound(_) => Self::ResourceNotFound {
                resource_type: "record".to_string(),
                message,
            },
            PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
            _ => Self::Internal { message },
        }
    }
}
