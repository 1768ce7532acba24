// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound ports.
//!
//! The engine talks to the payment provider, the mailer, and webhook
//! subscribers through these traits. Production adapters live in the
//! server crate; tests substitute fakes.

use crate::error::CoreError;
use tickets_domain::{Money, Order};

/// Payment status as reported by the external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPaymentStatus {
    /// The provider confirmed payment.
    Paid,
    /// The payment is still in flight at the provider.
    Pending,
    /// The customer cancelled at the provider.
    Cancelled,
    /// The payment session expired at the provider.
    Expired,
    /// The provider returned an unrecognized or transient answer.
    Unknown,
}

impl ProviderPaymentStatus {
    /// Whether a status fetch returning this value should be retried.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Pending | Self::Unknown)
    }
}

/// A redirect session opened at the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    /// Provider-side reference for later status fetches.
    pub provider_reference: String,
    /// URL the customer is redirected to for payment.
    pub redirect_url: String,
}

/// External payment provider.
pub trait PaymentProvider {
    /// Opens a payment session for the given order and amount.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProviderUnavailable` when the provider
    /// cannot be reached or rejects the request.
    fn create_session(&self, order: &Order, amount: Money) -> Result<PaymentSession, CoreError>;

    /// Fetches the current payment status for a provider reference.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProviderUnavailable` when the provider
    /// cannot be reached.
    fn fetch_status(&self, provider_reference: &str) -> Result<ProviderPaymentStatus, CoreError>;
}

impl<P: PaymentProvider + ?Sized> PaymentProvider for &P {
    fn create_session(&self, order: &Order, amount: Money) -> Result<PaymentSession, CoreError> {
        (**self).create_session(order, amount)
    }

    fn fetch_status(&self, provider_reference: &str) -> Result<ProviderPaymentStatus, CoreError> {
        (**self).fetch_status(provider_reference)
    }
}

/// Outbound customer and operator notifications.
pub trait NotificationSink {
    /// The order was paid; confirmation with tickets goes out.
    fn order_confirmed(&self, order: &Order);

    /// The payment outcome could not be resolved; alert customer and
    /// operator.
    fn payment_error(&self, order: &Order);

    /// A reservation was approved and awaits payment.
    fn reservation_approved(&self, order: &Order);
}

/// Event published to webhook subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTrigger {
    /// An order changed status.
    OrderStatusChange,
    /// An event was created or updated.
    EventCreateUpdate,
    /// A product was created or updated.
    ProductCreateUpdate,
}

impl WebhookTrigger {
    /// Stable tag used on the wire and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderStatusChange => "order_status_change",
            Self::EventCreateUpdate => "event_create_update",
            Self::ProductCreateUpdate => "product_create_update",
        }
    }
}

/// Webhook publisher.
pub trait WebhookPublisher {
    /// Publishes a trigger for a subject: an order's public reference
    /// or a catalog key.
    fn publish(&self, trigger: WebhookTrigger, subject: &str);
}
