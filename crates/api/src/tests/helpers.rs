// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures: a seeded in-memory shop and recording fakes for
//! the outbound ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration as StdDuration;

use tickets_core::{
    AdministrationCostsPolicy, CoreError, FixedClock, NotificationSink, PaymentProvider,
    PaymentSession, ProviderPaymentStatus, Sleeper, WebhookPublisher, WebhookTrigger,
};
use tickets_domain::{
    Customer, CustomerKey, Event, EventKey, Money, Order, Product, ProductKey,
    VatRate,
};
use tickets_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::watch;

use crate::handlers::SideEffects;
use crate::request_response::{CreateOrderRequest, OrderLineRequest};

pub const REDIRECT_COSTS: Money = Money::from_cents(35);

pub fn test_policy() -> AdministrationCostsPolicy {
    AdministrationCostsPolicy {
        redirect_costs: REDIRECT_COSTS,
    }
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-05-01 12:00 UTC)
}

pub fn test_clock() -> FixedClock {
    FixedClock(test_now())
}

fn test_product(key: &str, max_sold: Option<u32>) -> Product {
    Product {
        id: None,
        key: ProductKey::new(key),
        title: format!("Product {key}"),
        cost: Money::from_cents(1210),
        vat_rate: VatRate::High,
        sell_start: datetime!(2026-01-01 0:00 UTC),
        sell_end: datetime!(2027-01-01 0:00 UTC),
        max_sold,
        max_sold_per_customer: None,
        sold: 0,
        reserved: 0,
        related: Vec::new(),
        event: None,
    }
}

/// Seeds a shop with an uncapped "ticket" product, a one-unit
/// "scarce" product, and customers "alice" and "bob".
pub fn seeded_shop() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();

    persistence
        .create_event(&Event {
            id: None,
            key: EventKey::new("gala"),
            title: "Gala".to_string(),
            max_sold: None,
            sold: 0,
            reserved: 0,
        })
        .unwrap();

    persistence.create_product(&test_product("ticket", None)).unwrap();
    persistence
        .create_product(&test_product("scarce", Some(1)))
        .unwrap();

    for key in ["alice", "bob"] {
        persistence
            .create_customer(&Customer {
                id: None,
                key: CustomerKey::new(key),
                name: key.to_string(),
                email: format!("{key}@example.org"),
            })
            .unwrap();
    }

    persistence
}

pub fn checkout_request(product: &str, quantity: u32) -> CreateOrderRequest {
    CreateOrderRequest {
        lines: vec![OrderLineRequest {
            product: product.to_string(),
            quantity,
        }],
        created_by: "webshop".to_string(),
    }
}

/// Notification sink that counts what it was asked to send.
#[derive(Default)]
pub struct RecordingSink {
    pub confirmed: AtomicU32,
    pub payment_errors: AtomicU32,
    pub approvals: AtomicU32,
}

impl NotificationSink for RecordingSink {
    fn order_confirmed(&self, _order: &Order) {
        self.confirmed.fetch_add(1, Ordering::SeqCst);
    }

    fn payment_error(&self, _order: &Order) {
        self.payment_errors.fetch_add(1, Ordering::SeqCst);
    }

    fn reservation_approved(&self, _order: &Order) {
        self.approvals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Webhook publisher that records every published trigger.
#[derive(Default)]
pub struct RecordingWebhooks {
    pub published: Mutex<Vec<(String, String)>>,
}

impl WebhookPublisher for RecordingWebhooks {
    fn publish(&self, trigger: WebhookTrigger, subject: &str) {
        self.published
            .lock()
            .unwrap()
            .push((trigger.as_str().to_string(), subject.to_string()));
    }
}

pub fn effects<'a>(
    sink: &'a RecordingSink,
    webhooks: &'a RecordingWebhooks,
) -> SideEffects<'a> {
    SideEffects {
        notifications: sink,
        webhooks,
    }
}

/// Provider fake: sessions always succeed; status fetches pop a
/// scripted answer, falling back to the default once the script runs
/// dry.
pub struct StubProvider {
    pub script: Mutex<VecDeque<Result<ProviderPaymentStatus, CoreError>>>,
    pub default_status: ProviderPaymentStatus,
    pub fetches: AtomicU32,
}

impl StubProvider {
    pub fn answering(status: ProviderPaymentStatus) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_status: status,
            fetches: AtomicU32::new(0),
        }
    }

    pub fn scripted(
        script: impl IntoIterator<Item = Result<ProviderPaymentStatus, CoreError>>,
        default_status: ProviderPaymentStatus,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            default_status,
            fetches: AtomicU32::new(0),
        }
    }
}

impl PaymentProvider for StubProvider {
    fn create_session(&self, order: &Order, _amount: Money) -> Result<PaymentSession, CoreError> {
        Ok(PaymentSession {
            provider_reference: format!("tr_{}", order.public_reference),
            redirect_url: "https://pay.example/checkout".to_string(),
        })
    }

    fn fetch_status(&self, _provider_reference: &str) -> Result<ProviderPaymentStatus, CoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default_status))
    }
}

/// Sleeper that returns immediately so retry loops run instantly.
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: StdDuration) -> impl std::future::Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// A cancellation channel that never fires.
pub fn not_cancelled() -> watch::Receiver<bool> {
    let (sender, receiver) = watch::channel(false);
    std::mem::forget(sender);
    receiver
}
