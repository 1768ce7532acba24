// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tickets_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested order was not found.
    OrderNotFound(String),
    /// The requested product was not found.
    ProductNotFound(String),
    /// The requested event was not found.
    EventNotFound(String),
    /// The requested customer was not found.
    CustomerNotFound(String),
    /// A stored value could not be mapped back to its domain type.
    CorruptRecord(String),
    /// A domain rule rejected the operation; the transaction rolled
    /// back.
    DomainViolation(DomainError),
    /// An inventory counter would leave its valid range.
    CounterOutOfRange { product: String },
    /// Ran out of attempts to generate a unique ticket code.
    TicketCodeExhausted { product: String },
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::OrderNotFound(reference) => write!(f, "Order not found: {reference}"),
            Self::ProductNotFound(key) => write!(f, "Product not found: {key}"),
            Self::EventNotFound(key) => write!(f, "Event not found: {key}"),
            Self::CustomerNotFound(key) => write!(f, "Customer not found: {key}"),
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::CounterOutOfRange { product } => {
                write!(f, "Inventory counter out of range for product '{product}'")
            }
            Self::TicketCodeExhausted { product } => {
                write!(
                    f,
                    "Could not generate a unique ticket code for product '{product}'"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
