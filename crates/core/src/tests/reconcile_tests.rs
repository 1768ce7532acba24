// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the bounded reconciliation loop.
//!
//! The loop must always terminate: a provider that never settles
//! yields `Exhausted` after exactly the configured attempt count, and
//! cancellation between attempts leaves the run without touching the
//! order. Sleeping goes through a counting fake so the suite runs
//! without wall-clock delays.

use crate::error::CoreError;
use crate::ports::{PaymentProvider, PaymentSession, ProviderPaymentStatus};
use crate::reconcile::{
    MAX_STATUS_FETCH_ATTEMPTS, ReconcileOutcome, Reconciler, Sleeper,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tickets_domain::{Money, Order};
use tokio::sync::watch;

/// Provider that replays a scripted response sequence; once the script
/// runs out it keeps answering `Unknown`.
struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderPaymentStatus, CoreError>>>,
    fetches: AtomicU32,
    cancel_after_first_fetch: Option<watch::Sender<bool>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<ProviderPaymentStatus, CoreError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fetches: AtomicU32::new(0),
            cancel_after_first_fetch: None,
        }
    }

    fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PaymentProvider for ScriptedProvider {
    fn create_session(&self, _order: &Order, _amount: Money) -> Result<PaymentSession, CoreError> {
        Err(CoreError::ProviderUnavailable {
            reason: "not under test".to_string(),
        })
    }

    fn fetch_status(&self, _provider_reference: &str) -> Result<ProviderPaymentStatus, CoreError> {
        let count = self.fetches.fetch_add(1, Ordering::SeqCst);
        if count == 0 {
            if let Some(sender) = &self.cancel_after_first_fetch {
                let _ = sender.send(true);
            }
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ProviderPaymentStatus::Unknown))
    }
}

/// Sleeper that returns immediately and counts its invocations.
#[derive(Default)]
struct CountingSleeper {
    sleeps: AtomicU32,
}

impl Sleeper for CountingSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_cancelled() -> watch::Receiver<bool> {
    let (sender, receiver) = watch::channel(false);
    // Keep the channel alive for the whole run.
    std::mem::forget(sender);
    receiver
}

#[tokio::test]
async fn test_settled_status_resolves_on_first_attempt() {
    let provider = ScriptedProvider::new(vec![Ok(ProviderPaymentStatus::Paid)]);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let outcome = reconciler.reconcile("wdtn-1", &mut not_cancelled()).await;

    assert_eq!(outcome, ReconcileOutcome::Resolved(ProviderPaymentStatus::Paid));
    assert_eq!(provider.fetch_count(), 1);
    assert_eq!(sleeper.sleeps.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pending_retries_then_resolves() {
    let provider = ScriptedProvider::new(vec![
        Ok(ProviderPaymentStatus::Pending),
        Ok(ProviderPaymentStatus::Pending),
        Ok(ProviderPaymentStatus::Cancelled),
    ]);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let outcome = reconciler.reconcile("wdtn-2", &mut not_cancelled()).await;

    assert_eq!(
        outcome,
        ReconcileOutcome::Resolved(ProviderPaymentStatus::Cancelled)
    );
    assert_eq!(provider.fetch_count(), 3);
    assert_eq!(sleeper.sleeps.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_never_settling_provider_exhausts_after_exactly_five_attempts() {
    let provider = ScriptedProvider::new(vec![]);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let outcome = reconciler.reconcile("wdtn-3", &mut not_cancelled()).await;

    assert_eq!(outcome, ReconcileOutcome::Exhausted);
    assert_eq!(provider.fetch_count(), MAX_STATUS_FETCH_ATTEMPTS);
    // No sleep after the final attempt.
    assert_eq!(
        sleeper.sleeps.load(Ordering::SeqCst),
        MAX_STATUS_FETCH_ATTEMPTS - 1
    );
}

#[tokio::test]
async fn test_provider_errors_count_as_attempts() {
    let provider = ScriptedProvider::new(vec![
        Err(CoreError::ProviderUnavailable {
            reason: "connection refused".to_string(),
        }),
        Err(CoreError::ProviderUnavailable {
            reason: "connection refused".to_string(),
        }),
        Ok(ProviderPaymentStatus::Expired),
    ]);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let outcome = reconciler.reconcile("wdtn-4", &mut not_cancelled()).await;

    assert_eq!(
        outcome,
        ReconcileOutcome::Resolved(ProviderPaymentStatus::Expired)
    );
    assert_eq!(provider.fetch_count(), 3);
}

#[tokio::test]
async fn test_cancelled_before_first_attempt_never_calls_the_provider() {
    let provider = ScriptedProvider::new(vec![]);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let (sender, mut receiver) = watch::channel(true);
    let outcome = reconciler.reconcile("wdtn-5", &mut receiver).await;
    drop(sender);

    assert_eq!(outcome, ReconcileOutcome::Cancelled);
    assert_eq!(provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_cancellation_takes_effect_between_attempts() {
    let (sender, mut receiver) = watch::channel(false);
    let mut provider = ScriptedProvider::new(vec![Ok(ProviderPaymentStatus::Pending)]);
    provider.cancel_after_first_fetch = Some(sender);
    let sleeper = CountingSleeper::default();
    let reconciler = Reconciler::new(&provider, &sleeper);

    let outcome = reconciler.reconcile("wdtn-6", &mut receiver).await;

    assert_eq!(outcome, ReconcileOutcome::Cancelled);
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_custom_schedule_bounds_the_attempt_count() {
    let provider = ScriptedProvider::new(vec![]);
    let sleeper = CountingSleeper::default();
    let reconciler =
        Reconciler::with_schedule(&provider, &sleeper, 2, Duration::from_millis(1));

    let outcome = reconciler.reconcile("wdtn-7", &mut not_cancelled()).await;

    assert_eq!(outcome, ReconcileOutcome::Exhausted);
    assert_eq!(provider.fetch_count(), 2);
}
