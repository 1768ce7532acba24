// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Production adapters for the outbound ports.
//!
//! Mail and webhook transport are out of scope for this binary; the
//! sinks log what would go out. The payment provider is an in-process
//! stub whose settled answer is chosen on the command line, which is
//! enough to drive every lifecycle path end to end.

use std::sync::atomic::{AtomicU64, Ordering};
use tickets_core::{
    CoreError, NotificationSink, PaymentProvider, PaymentSession, ProviderPaymentStatus,
    WebhookPublisher, WebhookTrigger,
};
use tickets_domain::{Money, Order};
use tracing::info;

/// Notification sink that logs instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn order_confirmed(&self, order: &Order) {
        info!(
            reference = %order.public_reference,
            amount = %order.amount,
            "notification: order confirmed"
        );
    }

    fn payment_error(&self, order: &Order) {
        info!(
            reference = %order.public_reference,
            "notification: payment error, manual intervention required"
        );
    }

    fn reservation_approved(&self, order: &Order) {
        info!(
            reference = %order.public_reference,
            "notification: reservation approved, awaiting payment"
        );
    }
}

/// Webhook publisher that logs instead of delivering.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWebhooks;

impl WebhookPublisher for TracingWebhooks {
    fn publish(&self, trigger: WebhookTrigger, subject: &str) {
        info!(trigger = trigger.as_str(), subject, "webhook published");
    }
}

/// In-process payment provider stub.
///
/// Sessions always open; every status fetch answers with the
/// configured outcome.
#[derive(Debug)]
pub struct StubPaymentProvider {
    outcome: ProviderPaymentStatus,
    sessions: AtomicU64,
}

impl StubPaymentProvider {
    #[must_use]
    pub const fn new(outcome: ProviderPaymentStatus) -> Self {
        Self {
            outcome,
            sessions: AtomicU64::new(0),
        }
    }

    /// Parses a provider outcome tag from the command line.
    ///
    /// # Errors
    ///
    /// Returns the offending tag when it is not a known outcome.
    pub fn parse_outcome(tag: &str) -> Result<ProviderPaymentStatus, String> {
        match tag {
            "paid" => Ok(ProviderPaymentStatus::Paid),
            "pending" => Ok(ProviderPaymentStatus::Pending),
            "cancelled" => Ok(ProviderPaymentStatus::Cancelled),
            "expired" => Ok(ProviderPaymentStatus::Expired),
            "unknown" => Ok(ProviderPaymentStatus::Unknown),
            other => Err(format!("unknown provider outcome '{other}'")),
        }
    }
}

impl PaymentProvider for StubPaymentProvider {
    fn create_session(&self, order: &Order, amount: Money) -> Result<PaymentSession, CoreError> {
        let session = self.sessions.fetch_add(1, Ordering::SeqCst);
        info!(
            reference = %order.public_reference,
            amount = %amount,
            session,
            "stub provider: session opened"
        );
        Ok(PaymentSession {
            provider_reference: format!("tr_stub_{session}"),
            redirect_url: format!("http://localhost/stub-pay/{session}"),
        })
    }

    fn fetch_status(&self, provider_reference: &str) -> Result<ProviderPaymentStatus, CoreError> {
        info!(
            provider_reference,
            outcome = ?self.outcome,
            "stub provider: status fetched"
        );
        Ok(self.outcome)
    }
}
