// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment status reconciliation.
//!
//! When the customer returns from the payment provider, the provider
//! may not have settled the payment yet. The reconciler polls the
//! provider a bounded number of times with a fixed delay between
//! attempts and reports how the loop ended. It never changes order
//! state itself; the caller maps the outcome onto a transition.
//!
//! Sleeping goes through the [`Sleeper`] trait so tests run the loop
//! without wall-clock delays. Cancellation is checked between
//! attempts via a watch channel; an in-flight provider call is never
//! interrupted.

use crate::error::CoreError;
use crate::ports::{PaymentProvider, ProviderPaymentStatus};
use std::time::Duration;
use tokio::sync::watch;

/// Maximum number of status fetches per reconciliation run.
pub const MAX_STATUS_FETCH_ATTEMPTS: u32 = 5;

/// Delay between consecutive status fetches.
pub const STATUS_FETCH_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Sleep capability used between fetch attempts.
pub trait Sleeper {
    /// Suspends the current task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a reconciliation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The provider reported a settled status.
    Resolved(ProviderPaymentStatus),
    /// Every attempt returned a retryable status; the order must be
    /// flagged for manual intervention.
    Exhausted,
    /// The run was cancelled between attempts, for example during
    /// shutdown. The order is left untouched.
    Cancelled,
}

/// Bounded payment status polling loop.
#[derive(Debug)]
pub struct Reconciler<P, S> {
    provider: P,
    sleeper: S,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<P, S> Reconciler<P, S>
where
    P: PaymentProvider,
    S: Sleeper,
{
    /// Creates a reconciler with the production schedule.
    pub const fn new(provider: P, sleeper: S) -> Self {
        Self::with_schedule(
            provider,
            sleeper,
            MAX_STATUS_FETCH_ATTEMPTS,
            STATUS_FETCH_RETRY_DELAY,
        )
    }

    /// Creates a reconciler with an explicit attempt count and delay.
    pub const fn with_schedule(
        provider: P,
        sleeper: S,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            provider,
            sleeper,
            max_attempts,
            retry_delay,
        }
    }

    /// Polls the provider until it reports a settled status, the
    /// attempt budget runs out, or cancellation is signalled.
    ///
    /// Provider errors count as attempts: a provider that is down for
    /// the whole schedule yields [`ReconcileOutcome::Exhausted`]
    /// rather than an error, so the order still lands in manual
    /// intervention instead of limbo.
    pub async fn reconcile(
        &self,
        provider_reference: &str,
        cancel: &mut watch::Receiver<bool>,
    ) -> ReconcileOutcome {
        for attempt in 1..=self.max_attempts {
            if *cancel.borrow() {
                tracing::debug!(provider_reference, attempt, "reconciliation cancelled");
                return ReconcileOutcome::Cancelled;
            }

            match self.provider.fetch_status(provider_reference) {
                Ok(status) if !status.is_retryable() => {
                    tracing::debug!(provider_reference, attempt, ?status, "payment settled");
                    return ReconcileOutcome::Resolved(status);
                }
                Ok(status) => {
                    tracing::debug!(provider_reference, attempt, ?status, "payment not settled");
                }
                Err(CoreError::ProviderUnavailable { reason }) => {
                    tracing::warn!(provider_reference, attempt, %reason, "status fetch failed");
                }
                Err(error) => {
                    tracing::warn!(provider_reference, attempt, %error, "status fetch failed");
                }
            }

            if attempt < self.max_attempts {
                self.sleeper.sleep(self.retry_delay).await;
            }
        }

        tracing::warn!(
            provider_reference,
            attempts = self.max_attempts,
            "reconciliation exhausted"
        );
        ReconcileOutcome::Exhausted
    }
}
