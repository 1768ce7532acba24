// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::keys::{EventKey, ProductKey};
use crate::money::Money;
use crate::order_status::OrderStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The order amount is negative.
    NegativeAmount(Money),
    /// The stored order amount does not match the recomputed total.
    AmountMismatch {
        /// The total recomputed from the order lines.
        expected: Money,
        /// The amount stored on the order.
        actual: Money,
    },
    /// The stored administration costs do not match the payment method policy.
    AdministrationCostsMismatch {
        /// The costs required by the payment method policy.
        expected: Money,
        /// The costs stored on the order.
        actual: Money,
    },
    /// The order has no line items.
    EmptyOrder,
    /// The order has no `created_by` tag.
    MissingCreatedBy,
    /// The order has no owning customer where one is required.
    MissingOwner,
    /// A line quantity is zero.
    ZeroQuantity {
        /// The product on the offending line.
        product: ProductKey,
    },
    /// The order is in the wrong status for the requested operation.
    WrongStatus {
        /// The status the operation requires.
        required: OrderStatus,
        /// The status the order is actually in.
        actual: OrderStatus,
    },
    /// The requested quantity would exceed the product cap.
    ProductLimitExceeded {
        /// The capped product.
        product: ProductKey,
        /// How many more units can still be sold or reserved.
        remaining: u32,
    },
    /// The requested quantity would exceed the event cap.
    EventLimitExceeded {
        /// The capped event.
        event: EventKey,
        /// How many more units can still be sold or reserved.
        remaining: u32,
    },
    /// The requested quantity would exceed the customer's personal cap.
    CustomerLimitExceeded {
        /// The capped product (aggregated with its related products).
        product: ProductKey,
        /// How many more units this customer may still obtain.
        remaining: u32,
    },
    /// The product is outside its sell window or sold out.
    ProductNotSellable {
        /// The product that cannot be sold.
        product: ProductKey,
    },
    /// A status transition not permitted by the order lifecycle.
    IllegalTransition {
        /// The current status.
        from: OrderStatus,
        /// The requested status.
        to: OrderStatus,
    },
    /// Failed to parse an order status from its string representation.
    InvalidOrderStatus(String),
    /// Failed to parse a VAT rate from its string representation.
    InvalidVatRate(String),
    /// Failed to parse a payment method from its string representation.
    InvalidPaymentMethod(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Order amount can not be negative (got {amount})")
            }
            Self::AmountMismatch { expected, actual } => {
                write!(
                    f,
                    "Order amount does not match its products: expected {expected}, stored {actual}"
                )
            }
            Self::AdministrationCostsMismatch { expected, actual } => {
                write!(
                    f,
                    "Administration costs do not match the payment method: expected {expected}, stored {actual}"
                )
            }
            Self::EmptyOrder => write!(f, "Order should contain products"),
            Self::MissingCreatedBy => write!(f, "Order created by can not be empty"),
            Self::MissingOwner => write!(f, "Order should have an owning customer"),
            Self::ZeroQuantity { product } => {
                write!(f, "Order line for product '{product}' has zero quantity")
            }
            Self::WrongStatus { required, actual } => {
                write!(
                    f,
                    "Order must be {} for this operation, but is {}",
                    required.as_str(),
                    actual.as_str()
                )
            }
            Self::ProductLimitExceeded { product, remaining } => {
                write!(f, "Only {remaining} items left of product '{product}'")
            }
            Self::EventLimitExceeded { event, remaining } => {
                write!(f, "Only {remaining} tickets left for event '{event}'")
            }
            Self::CustomerLimitExceeded { product, remaining } => {
                write!(
                    f,
                    "Customer can buy only {remaining} more of product '{product}' before reaching the limit"
                )
            }
            Self::ProductNotSellable { product } => {
                write!(f, "Product '{product}' is not for sale")
            }
            Self::IllegalTransition { from, to } => {
                write!(
                    f,
                    "Cannot update order status from {} to {}",
                    from.as_str(),
                    to.as_str()
                )
            }
            Self::InvalidOrderStatus(s) => write!(f, "Invalid order status: {s}"),
            Self::InvalidVatRate(s) => write!(f, "Invalid VAT rate: {s}"),
            Self::InvalidPaymentMethod(s) => write!(f, "Invalid payment method: {s}"),
        }
    }
}

impl std::error::Error for DomainError {}
