// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the order lifecycle.
//!
//! Each handler takes the persistence layer plus the ports it drives,
//! performs the advisory validation for its step, executes the status
//! transition (persistence re-checks capacity inside the transaction),
//! and dispatches the plan's post-commit side effects.

use std::str::FromStr;
use tickets_core::{
    AdministrationCostsPolicy, Clock, Notification, NotificationSink, PaymentProvider,
    ProviderPaymentStatus, ReconcileOutcome, Reconciler, Sleeper, TransitionPlan,
    WebhookPublisher, WebhookTrigger, assert_valid_for_creation, assert_valid_for_payment,
    check_event_limit, check_product_limit,
};
use tickets_domain::{
    CustomerKey, DomainError, Order, OrderLine, OrderReference, OrderStatus, PaymentMethod,
    ProductKey,
};
use time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignCustomerRequest, AssignCustomerResponse, CancelOrderRequest, CancelOrderResponse,
    CreateOrderRequest, CreateOrderResponse, GetOrderResponse, ListProductsResponse,
    ListTicketsResponse, OrderInfo, ProductInfo, ReconcilePaymentRequest,
    ReconcilePaymentResponse, RefundOrderRequest, RefundOrderResponse,
    RequestReservationRequest, RequestReservationResponse, ReservationDecisionRequest,
    ReservationDecisionResponse, StartPaymentRequest, StartPaymentResponse, SweepExpiredResponse,
    TicketInfo,
};
use tickets_persistence::Persistence;

/// Orders still expirable after this age are swept to `expired`.
pub const STALE_ORDER_MAX_AGE: Duration = Duration::days(3);

/// The outbound sinks a transition's side effects are dispatched to.
///
/// Dispatch happens after the transaction committed; a crashed
/// notification never rolls back a paid order.
pub struct SideEffects<'a> {
    /// Customer and operator notifications.
    pub notifications: &'a (dyn NotificationSink + Sync),
    /// Webhook subscribers.
    pub webhooks: &'a (dyn WebhookPublisher + Sync),
}

impl SideEffects<'_> {
    /// Dispatches the side effects of an executed transition plan.
    pub fn dispatch(&self, order: &Order, plan: &TransitionPlan) {
        match plan.notification {
            Some(Notification::OrderConfirmed) => self.notifications.order_confirmed(order),
            Some(Notification::PaymentError) => self.notifications.payment_error(order),
            None => {}
        }
        self.webhooks
            .publish(plan.webhook, order.public_reference.value());
    }
}

fn line_products(order: &Order) -> Vec<ProductKey> {
    order.lines.iter().map(|line| line.product.clone()).collect()
}

/// Creates a new anonymous order from a product selection.
///
/// Prices and VAT rates are snapshotted from the catalog at creation;
/// later price changes never touch existing orders. The capacity check
/// here is advisory; the binding check runs when the order claims
/// capacity at payment or reservation time.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown product, `InvalidInput`
/// for a product outside its sell window or a structurally invalid
/// selection, and `LimitExceeded` when the selection cannot fit the
/// remaining capacity.
pub fn create_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    policy: &AdministrationCostsPolicy,
    request: CreateOrderRequest,
) -> Result<CreateOrderResponse, ApiError> {
    let CreateOrderRequest {
        lines: selection,
        created_by,
    } = request;
    let now = clock.now();

    let mut lines = Vec::with_capacity(selection.len());
    for line in selection {
        let key = ProductKey::new(&line.product);
        let product = persistence.get_product(&key)?;
        if !product.is_sellable_at(now) {
            return Err(translate_domain_error(DomainError::ProductNotSellable {
                product: key,
            }));
        }
        lines.push(OrderLine::new(
            product.key.clone(),
            line.quantity,
            product.cost,
            product.vat_rate,
        ));
    }

    let reference = OrderReference::new(&format!("order_{}", rand::random::<u64>()));
    let order = Order::new(reference, lines, &created_by, now);

    assert_valid_for_creation(&order, policy).map_err(translate_domain_error)?;

    let snapshot = persistence.capacity_snapshot(&line_products(&order))?;
    for line in &order.lines {
        if let Some(capacity) = snapshot.get(&line.product) {
            check_product_limit(capacity, line.quantity).map_err(translate_domain_error)?;
            check_event_limit(capacity, line.quantity).map_err(translate_domain_error)?;
        }
    }

    let stored = persistence.create_order(&order)?;
    info!(reference = %stored.public_reference, "order created");

    Ok(CreateOrderResponse {
        order: OrderInfo::from(&stored),
        message: "Order created".to_string(),
    })
}

/// Attaches a customer to an anonymous order.
///
/// The customer's personal caps are checked against the order's lines
/// before the order moves to `assigned`.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown order or customer,
/// `IllegalTransition` when the order already left `anonymous`, and
/// `LimitExceeded` when the lines do not fit the customer's caps.
pub fn assign_customer(
    persistence: &mut Persistence,
    effects: &SideEffects<'_>,
    request: AssignCustomerRequest,
) -> Result<AssignCustomerResponse, ApiError> {
    let AssignCustomerRequest {
        reference,
        customer,
    } = request;
    let reference = OrderReference::new(&reference);
    let customer = CustomerKey::new(&customer);

    // Fail with a not-found before the transition machinery runs.
    persistence.get_customer(&customer)?;

    let order = persistence.assign_customer(&reference, &customer)?;
    effects.webhooks.publish(
        WebhookTrigger::OrderStatusChange,
        order.public_reference.value(),
    );
    info!(reference = %order.public_reference, customer = %customer, "customer assigned");

    Ok(AssignCustomerResponse {
        order: OrderInfo::from(&order),
        message: "Customer assigned".to_string(),
    })
}

/// Starts payment on an order: sets the method, restates the totals
/// under the method's administration costs, and runs the full payment
/// validation.
///
/// An `assigned` order is moved to `pending` first. Redirect methods
/// open a provider session and hand back the checkout URL with the
/// order still `pending`; point-of-sale methods settle immediately and
/// the order comes back `paid` with its tickets issued.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown method tag, `IllegalTransition`
/// when the order cannot reach `pending`, `LimitExceeded` when a cap
/// is exhausted, and `PaymentFailure` when the provider rejects the
/// session.
pub fn start_payment(
    persistence: &mut Persistence,
    provider: &dyn PaymentProvider,
    clock: &dyn Clock,
    policy: &AdministrationCostsPolicy,
    effects: &SideEffects<'_>,
    request: StartPaymentRequest,
) -> Result<StartPaymentResponse, ApiError> {
    let StartPaymentRequest { reference, method } = request;
    let reference = OrderReference::new(&reference);
    let method = PaymentMethod::from_str(&method).map_err(translate_domain_error)?;

    let order = persistence.get_order(&reference)?;
    if order.status == OrderStatus::Assigned {
        let (order, plan) =
            persistence.transition_order(&reference, OrderStatus::Pending, clock.now())?;
        effects.dispatch(&order, &plan);
    }

    let order = persistence.update_payment_method(&reference, method, policy.redirect_costs)?;

    let products = line_products(&order);
    let snapshot = persistence.capacity_snapshot(&products)?;
    let mut usage = Vec::new();
    if let Some(owner) = &order.owner {
        usage = persistence.customer_usage(owner, &products)?;
    }
    assert_valid_for_payment(&order, policy, &snapshot, &usage).map_err(translate_core_error)?;

    if method.is_redirect() {
        let session = provider
            .create_session(&order, order.amount)
            .map_err(translate_core_error)?;
        persistence.set_provider_reference(&reference, &session.provider_reference)?;
        info!(
            reference = %order.public_reference,
            provider_reference = %session.provider_reference,
            "payment session opened"
        );

        let order = persistence.get_order(&reference)?;
        return Ok(StartPaymentResponse {
            order: OrderInfo::from(&order),
            redirect_url: Some(session.redirect_url),
            message: "Payment session opened".to_string(),
        });
    }

    // Point-of-sale payment settles on the spot.
    let (order, plan) = persistence.transition_order(&reference, OrderStatus::Paid, clock.now())?;
    effects.dispatch(&order, &plan);
    info!(reference = %order.public_reference, "order paid at point of sale");

    Ok(StartPaymentResponse {
        order: OrderInfo::from(&order),
        redirect_url: None,
        message: "Order paid".to_string(),
    })
}

/// Reconciles a pending payment against the provider.
///
/// Runs the bounded status-fetch loop and moves the order to the
/// settled status. An exhausted loop forces the order to `error` and
/// fires the payment-error notification; cancellation leaves the
/// order untouched for the next reconciliation pass.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown order,
/// `IllegalTransition` when the order is not awaiting settlement, and
/// `InvalidInput` when the order has no payment session to reconcile.
pub async fn reconcile_payment<P: PaymentProvider + Sync, S: Sleeper + Sync>(
    persistence: &mut Persistence,
    provider: &P,
    sleeper: &S,
    clock: &(dyn Clock + Sync),
    effects: &SideEffects<'_>,
    cancel: &mut watch::Receiver<bool>,
    request: ReconcilePaymentRequest,
) -> Result<ReconcilePaymentResponse, ApiError> {
    let ReconcilePaymentRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let order = persistence.get_order(&reference)?;

    let Some(provider_reference) = order.provider_reference.clone() else {
        return Err(ApiError::InvalidInput {
            field: "reference".to_string(),
            message: format!(
                "Order '{}' has no payment session to reconcile",
                order.public_reference
            ),
        });
    };

    // Only an open payment settles here; a stale return for an already
    // settled order is rejected before any provider traffic. Approved
    // reservations settle through the same loop.
    if !matches!(
        order.status,
        OrderStatus::Pending | OrderStatus::Reservation
    ) {
        return Err(translate_domain_error(DomainError::WrongStatus {
            required: OrderStatus::Pending,
            actual: order.status,
        }));
    }

    let reconciler = Reconciler::new(provider, sleeper);
    let outcome = reconciler.reconcile(&provider_reference, cancel).await;

    let (target, message) = match outcome {
        ReconcileOutcome::Resolved(status) => match status {
            ProviderPaymentStatus::Paid => (OrderStatus::Paid, "Payment confirmed"),
            ProviderPaymentStatus::Cancelled => {
                (OrderStatus::Cancelled, "Payment cancelled by customer")
            }
            ProviderPaymentStatus::Expired => (OrderStatus::Expired, "Payment session expired"),
            // The loop only resolves settled statuses.
            ProviderPaymentStatus::Pending | ProviderPaymentStatus::Unknown => {
                (OrderStatus::Error, "Payment status unresolved")
            }
        },
        ReconcileOutcome::Exhausted => (OrderStatus::Error, "Payment status unresolved"),
        ReconcileOutcome::Cancelled => {
            return Ok(ReconcilePaymentResponse {
                order: OrderInfo::from(&order),
                message: "Reconciliation cancelled; order unchanged".to_string(),
            });
        }
    };

    let (order, plan) = persistence.transition_order(&reference, target, clock.now())?;
    effects.dispatch(&order, &plan);
    info!(reference = %order.public_reference, status = order.status.as_str(), "payment reconciled");

    Ok(ReconcilePaymentResponse {
        order: OrderInfo::from(&order),
        message: message.to_string(),
    })
}

/// Parks a pending order as a reservation, holding its capacity until
/// an admin decides on it.
///
/// # Errors
///
/// Returns `IllegalTransition` when the order is not `pending` and
/// `LimitExceeded` when the hold no longer fits the capacity.
pub fn request_reservation(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    effects: &SideEffects<'_>,
    request: RequestReservationRequest,
) -> Result<RequestReservationResponse, ApiError> {
    let RequestReservationRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let (order, plan) =
        persistence.transition_order(&reference, OrderStatus::Reservation, clock.now())?;
    effects.dispatch(&order, &plan);
    info!(reference = %order.public_reference, "reservation placed");

    Ok(RequestReservationResponse {
        order: OrderInfo::from(&order),
        message: "Reservation placed".to_string(),
    })
}

/// Approves a reservation: the customer is notified to complete
/// payment. The order stays `reservation` and keeps its hold until
/// the payment settles.
///
/// # Errors
///
/// Returns `IllegalTransition` when the order is not a reservation.
pub fn approve_reservation(
    persistence: &mut Persistence,
    effects: &SideEffects<'_>,
    request: ReservationDecisionRequest,
) -> Result<ReservationDecisionResponse, ApiError> {
    let ReservationDecisionRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let order = persistence.get_order(&reference)?;

    if order.status != OrderStatus::Reservation {
        return Err(translate_domain_error(DomainError::WrongStatus {
            required: OrderStatus::Reservation,
            actual: order.status,
        }));
    }

    effects.notifications.reservation_approved(&order);
    info!(reference = %order.public_reference, "reservation approved");

    Ok(ReservationDecisionResponse {
        order: OrderInfo::from(&order),
        message: "Reservation approved; awaiting payment".to_string(),
    })
}

/// Rejects a reservation, releasing its capacity hold.
///
/// # Errors
///
/// Returns `IllegalTransition` when the order is not a reservation.
pub fn reject_reservation(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    effects: &SideEffects<'_>,
    request: ReservationDecisionRequest,
) -> Result<ReservationDecisionResponse, ApiError> {
    let ReservationDecisionRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let (order, plan) =
        persistence.transition_order(&reference, OrderStatus::Rejected, clock.now())?;
    effects.dispatch(&order, &plan);
    info!(reference = %order.public_reference, "reservation rejected");

    Ok(ReservationDecisionResponse {
        order: OrderInfo::from(&order),
        message: "Reservation rejected".to_string(),
    })
}

/// Cancels a pending order.
///
/// # Errors
///
/// Returns `IllegalTransition` when the order cannot be cancelled from
/// its current status.
pub fn cancel_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    effects: &SideEffects<'_>,
    request: CancelOrderRequest,
) -> Result<CancelOrderResponse, ApiError> {
    let CancelOrderRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let (order, plan) =
        persistence.transition_order(&reference, OrderStatus::Cancelled, clock.now())?;
    effects.dispatch(&order, &plan);
    info!(reference = %order.public_reference, "order cancelled");

    Ok(CancelOrderResponse {
        order: OrderInfo::from(&order),
        message: "Order cancelled".to_string(),
    })
}

/// Refunds a paid order: releases the sold capacity and revokes the
/// issued tickets.
///
/// # Errors
///
/// Returns `IllegalTransition` when the order is not `paid`.
pub fn refund_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    effects: &SideEffects<'_>,
    request: RefundOrderRequest,
) -> Result<RefundOrderResponse, ApiError> {
    let RefundOrderRequest { reference } = request;
    let reference = OrderReference::new(&reference);
    let (order, plan) =
        persistence.transition_order(&reference, OrderStatus::Refunded, clock.now())?;
    effects.dispatch(&order, &plan);

    let revoked_tickets = persistence
        .tickets_for_order(&reference)?
        .iter()
        .filter(|ticket| ticket.revoked)
        .count();
    let revoked_tickets = u32::try_from(revoked_tickets).unwrap_or(u32::MAX);
    info!(reference = %order.public_reference, revoked_tickets, "order refunded");

    Ok(RefundOrderResponse {
        order: OrderInfo::from(&order),
        revoked_tickets,
        message: "Order refunded; tickets revoked".to_string(),
    })
}

/// Expires orders that are still expirable past the stale-order age.
///
/// Orders that settle between the sweep query and their transition are
/// skipped; the next sweep never sees them again.
///
/// # Errors
///
/// Returns `Internal` when the sweep query itself fails.
pub fn expire_stale_orders(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    effects: &SideEffects<'_>,
) -> Result<SweepExpiredResponse, ApiError> {
    let cutoff = clock.now() - STALE_ORDER_MAX_AGE;
    let references = persistence.expirable_references_before(cutoff)?;

    let mut expired = Vec::with_capacity(references.len());
    for reference in &references {
        match persistence.transition_order(reference, OrderStatus::Expired, clock.now()) {
            Ok((order, plan)) => {
                effects.dispatch(&order, &plan);
                expired.push(order.public_reference.value().to_string());
            }
            Err(err) => {
                warn!(reference = %reference, error = %err, "skipping order in expiry sweep");
            }
        }
    }

    info!(count = expired.len(), "expiry sweep completed");
    let message = format!("Expired {} stale orders", expired.len());
    Ok(SweepExpiredResponse { expired, message })
}

/// Fetches a single order.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown reference.
pub fn get_order(
    persistence: &mut Persistence,
    reference: &str,
) -> Result<GetOrderResponse, ApiError> {
    let order = persistence.get_order(&OrderReference::new(reference))?;
    Ok(GetOrderResponse {
        order: OrderInfo::from(&order),
    })
}

/// Lists the tickets issued for an order.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown reference.
pub fn list_tickets(
    persistence: &mut Persistence,
    reference: &str,
) -> Result<ListTicketsResponse, ApiError> {
    let tickets = persistence.tickets_for_order(&OrderReference::new(reference))?;
    Ok(ListTicketsResponse {
        tickets: tickets.iter().map(TicketInfo::from).collect(),
    })
}

/// Lists the product catalog with live remaining capacity.
///
/// # Errors
///
/// Returns `Internal` when the catalog query fails.
pub fn list_products(persistence: &mut Persistence) -> Result<ListProductsResponse, ApiError> {
    let products = persistence.list_products()?;
    Ok(ListProductsResponse {
        products: products.iter().map(ProductInfo::from).collect(),
    })
}
