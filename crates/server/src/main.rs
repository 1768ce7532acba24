// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tickets_api::{
    ApiError, AssignCustomerRequest, AssignCustomerResponse, CancelOrderRequest,
    CancelOrderResponse, CreateOrderRequest, CreateOrderResponse, GetOrderResponse,
    ListProductsResponse, ListTicketsResponse, ReconcilePaymentRequest, ReconcilePaymentResponse,
    RefundOrderRequest, RefundOrderResponse, RequestReservationRequest,
    RequestReservationResponse, ReservationDecisionRequest, ReservationDecisionResponse,
    SideEffects, StartPaymentRequest, StartPaymentResponse, SweepExpiredResponse,
};
use tickets_core::{
    AdministrationCostsPolicy, SystemClock, TokioSleeper, WebhookPublisher, WebhookTrigger,
};
use tickets_domain::{Customer, CustomerKey, Event, EventKey, Money, Product, ProductKey, VatRate};
use tickets_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::{Mutex, watch};
use tracing::{error, info};

mod adapters;

use adapters::{StubPaymentProvider, TracingNotifier, TracingWebhooks};

/// Ticket Shop Server - HTTP server for the ticket sales system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Settled outcome the stub payment provider reports: paid,
    /// pending, cancelled, expired, or unknown
    #[arg(long, default_value = "paid")]
    provider_outcome: String,

    /// Administration costs in euro cents for redirect payment methods
    #[arg(long, default_value_t = 35)]
    redirect_costs_cents: i64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a Mutex.
    persistence: Arc<Mutex<Persistence>>,
    /// The payment provider.
    provider: Arc<StubPaymentProvider>,
    /// Outbound notification sink.
    notifier: TracingNotifier,
    /// Outbound webhook publisher.
    webhooks: TracingWebhooks,
    /// Administration cost policy for payment methods.
    policy: AdministrationCostsPolicy,
    /// Broadcasts `true` when the server is shutting down, cancelling
    /// in-flight payment reconciliations between attempts.
    shutdown: watch::Receiver<bool>,
}

/// Admin request for creating an event.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateEventApiRequest {
    /// The event's public key.
    key: String,
    /// Display title.
    title: String,
    /// Aggregate cap across the event's products.
    max_sold: Option<u32>,
}

/// Admin request for creating a product.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateProductApiRequest {
    /// The product's public key.
    key: String,
    /// Display title.
    title: String,
    /// Unit price including VAT, in euro cents.
    cost_cents: i64,
    /// VAT rate tag: "free", "zero", "low", or "high".
    vat_rate: String,
    /// Start of the sell window, RFC 3339.
    sell_start: String,
    /// End of the sell window, RFC 3339.
    sell_end: String,
    /// Sales cap; omit for uncapped.
    max_sold: Option<u32>,
    /// Per-customer cap; omit for uncapped.
    max_sold_per_customer: Option<u32>,
    /// Related product keys sharing the per-customer allowance.
    #[serde(default)]
    related: Vec<String>,
    /// The owning event's key, if any.
    event: Option<String>,
}

/// Admin request for creating a customer.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateCustomerApiRequest {
    /// The customer's public key.
    key: String,
    /// Display name.
    name: String,
    /// Contact address.
    email: String,
}

/// Generic response for admin write operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// A descriptive message.
    message: String,
}

/// Error response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::LimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::IllegalTransition { .. } => StatusCode::CONFLICT,
            ApiError::PaymentFailure { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

fn bad_request(field: &str, message: String) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid input for '{field}': {message}"),
    }
}

fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, HttpError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| bad_request(field, e.to_string()))
}

/// Handler for POST `/admin/events`.
async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateEventApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(key = %req.key, "Handling create_event request");

    let event = Event {
        id: None,
        key: EventKey::new(&req.key),
        title: req.title,
        max_sold: req.max_sold,
        sold: 0,
        reserved: 0,
    };

    let mut persistence = app_state.persistence.lock().await;
    persistence.create_event(&event)?;
    drop(persistence);
    app_state
        .webhooks
        .publish(WebhookTrigger::EventCreateUpdate, &req.key);

    Ok(Json(WriteResponse {
        success: true,
        message: format!("Created event '{}'", req.key),
    }))
}

/// Handler for POST `/admin/products`.
async fn handle_create_product(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateProductApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(key = %req.key, "Handling create_product request");

    let vat_rate =
        VatRate::from_str(&req.vat_rate).map_err(|e| bad_request("vat_rate", e.to_string()))?;
    let sell_start = parse_timestamp("sell_start", &req.sell_start)?;
    let sell_end = parse_timestamp("sell_end", &req.sell_end)?;

    let product = Product {
        id: None,
        key: ProductKey::new(&req.key),
        title: req.title,
        cost: Money::from_cents(req.cost_cents),
        vat_rate,
        sell_start,
        sell_end,
        max_sold: req.max_sold,
        max_sold_per_customer: req.max_sold_per_customer,
        sold: 0,
        reserved: 0,
        related: req.related.iter().map(|key| ProductKey::new(key)).collect(),
        event: req.event.as_deref().map(EventKey::new),
    };

    let mut persistence = app_state.persistence.lock().await;
    persistence.create_product(&product)?;
    drop(persistence);
    app_state
        .webhooks
        .publish(WebhookTrigger::ProductCreateUpdate, &req.key);

    Ok(Json(WriteResponse {
        success: true,
        message: format!("Created product '{}'", req.key),
    }))
}

/// Handler for POST `/admin/customers`.
async fn handle_create_customer(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCustomerApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(key = %req.key, "Handling create_customer request");

    let customer = Customer {
        id: None,
        key: CustomerKey::new(&req.key),
        name: req.name,
        email: req.email,
    };

    let mut persistence = app_state.persistence.lock().await;
    persistence.create_customer(&customer)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: format!("Created customer '{}'", req.key),
    }))
}

/// Handler for POST `/orders`: checkout.
async fn handle_create_order(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, HttpError> {
    info!(lines = req.lines.len(), "Handling create_order request");

    let mut persistence = app_state.persistence.lock().await;
    let response =
        tickets_api::create_order(&mut persistence, &SystemClock, &app_state.policy, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assign_customer`.
async fn handle_assign_customer(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignCustomerRequest>,
) -> Result<Json<AssignCustomerResponse>, HttpError> {
    info!(reference = %req.reference, customer = %req.customer, "Handling assign_customer request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::assign_customer(&mut persistence, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/start_payment`.
async fn handle_start_payment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<StartPaymentRequest>,
) -> Result<Json<StartPaymentResponse>, HttpError> {
    info!(reference = %req.reference, method = %req.method, "Handling start_payment request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::start_payment(
        &mut persistence,
        &*app_state.provider,
        &SystemClock,
        &app_state.policy,
        &effects,
        req,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/payment_return`: the customer came back from the
/// provider; reconcile the payment status.
async fn handle_payment_return(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReconcilePaymentRequest>,
) -> Result<Json<ReconcilePaymentResponse>, HttpError> {
    info!(reference = %req.reference, "Handling payment_return request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut cancel = app_state.shutdown.clone();
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::reconcile_payment(
        &mut persistence,
        &*app_state.provider,
        &TokioSleeper,
        &SystemClock,
        &effects,
        &mut cancel,
        req,
    )
    .await?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reserve`.
async fn handle_request_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RequestReservationRequest>,
) -> Result<Json<RequestReservationResponse>, HttpError> {
    info!(reference = %req.reference, "Handling reserve request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::request_reservation(&mut persistence, &SystemClock, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reservations/approve`.
async fn handle_approve_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReservationDecisionRequest>,
) -> Result<Json<ReservationDecisionResponse>, HttpError> {
    info!(reference = %req.reference, "Handling approve_reservation request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::approve_reservation(&mut persistence, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reservations/reject`.
async fn handle_reject_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReservationDecisionRequest>,
) -> Result<Json<ReservationDecisionResponse>, HttpError> {
    info!(reference = %req.reference, "Handling reject_reservation request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::reject_reservation(&mut persistence, &SystemClock, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cancel`.
async fn handle_cancel_order(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CancelOrderRequest>,
) -> Result<Json<CancelOrderResponse>, HttpError> {
    info!(reference = %req.reference, "Handling cancel request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::cancel_order(&mut persistence, &SystemClock, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/refund`.
async fn handle_refund_order(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RefundOrderRequest>,
) -> Result<Json<RefundOrderResponse>, HttpError> {
    info!(reference = %req.reference, "Handling refund request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::refund_order(&mut persistence, &SystemClock, &effects, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/sweep`: expire stale orders.
async fn handle_sweep(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<SweepExpiredResponse>, HttpError> {
    info!("Handling sweep request");

    let effects = SideEffects {
        notifications: &app_state.notifier,
        webhooks: &app_state.webhooks,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::expire_stale_orders(&mut persistence, &SystemClock, &effects)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/orders/{reference}`.
async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<GetOrderResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::get_order(&mut persistence, &reference)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/orders/{reference}/tickets`.
async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ListTicketsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::list_tickets(&mut persistence, &reference)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/products`.
async fn handle_list_products(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListProductsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = tickets_api::list_products(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/admin/events", post(handle_create_event))
        .route("/admin/products", post(handle_create_product))
        .route("/admin/customers", post(handle_create_customer))
        .route("/orders", post(handle_create_order))
        .route("/orders/{reference}", get(handle_get_order))
        .route("/orders/{reference}/tickets", get(handle_list_tickets))
        .route("/products", get(handle_list_products))
        .route("/assign_customer", post(handle_assign_customer))
        .route("/start_payment", post(handle_start_payment))
        .route("/payment_return", post(handle_payment_return))
        .route("/reserve", post(handle_request_reservation))
        .route("/reservations/approve", post(handle_approve_reservation))
        .route("/reservations/reject", post(handle_reject_reservation))
        .route("/cancel", post(handle_cancel_order))
        .route("/refund", post(handle_refund_order))
        .route("/sweep", post(handle_sweep))
        .with_state(app_state)
}

/// Waits for ctrl-c, then broadcasts the shutdown flag so in-flight
/// reconciliations stop between attempts.
async fn shutdown_signal(sender: watch::Sender<bool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received; cancelling reconciliations");
    let _ = sender.send(true);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Ticket Shop Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let outcome = StubPaymentProvider::parse_outcome(&args.provider_outcome)?;
    let (shutdown_sender, shutdown_receiver) = watch::channel(false);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        provider: Arc::new(StubPaymentProvider::new(outcome)),
        notifier: TracingNotifier,
        webhooks: TracingWebhooks,
        policy: AdministrationCostsPolicy {
            redirect_costs: Money::from_cents(args.redirect_costs_cents),
        },
        shutdown: shutdown_receiver,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_sender))
        .await?;

    Ok(())
}
