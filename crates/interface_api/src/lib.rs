//! HTTP API Layer
//!
//! This crate provides the REST API for the federation platform using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: request handlers per domain, orchestrating the
//!   repositories and the payment gateway
//! - **Middleware**: JWT authentication, audit logging
//! - **DTOs**: request/response data transfer objects
//! - **Error Handling**: consistent error responses
//!
//! The webhook endpoint is deliberately outside the JWT-protected tree:
//! it authenticates with the gateway's HMAC signature instead.

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_registration::{FeeSchedule, RegistrationService};
use domain_transfer::TransferWindows;
use gateway_pesepay::PesepayClient;
use infra_db::{
    BillingRepository, PartyRepository, RegistrationRepository, SyncQueueRepository,
    TransferRepository,
};

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{health, invoices, payments, registrations, transfers};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub gateway: PesepayClient,
    pub party: PartyRepository,
    pub billing: BillingRepository,
    pub transfers: TransferRepository,
    pub registrations: RegistrationRepository,
    pub sync_queue: SyncQueueRepository,
    pub windows: TransferWindows,
    pub registration_service: RegistrationService,
}

impl AppState {
    /// Builds the state from a pool and configuration
    pub fn new(pool: PgPool, config: ApiConfig, gateway: PesepayClient) -> Self {
        let windows = TransferWindows::standard();
        let registration_service =
            RegistrationService::new(FeeSchedule::default(), config.season.clone());

        Self {
            config,
            gateway,
            party: PartyRepository::new(pool.clone()),
            billing: BillingRepository::new(pool.clone()),
            transfers: TransferRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            sync_queue: SyncQueueRepository::new(pool),
            windows,
            registration_service,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `config` - API configuration
/// * `gateway` - PesePay client
pub fn create_router(pool: PgPool, config: ApiConfig, gateway: PesepayClient) -> Router {
    let state = AppState::new(pool, config, gateway);

    // Public routes: health checks and the signature-authenticated webhook
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/payments/webhook/pesepay", post(payments::webhook));

    // Transfer routes
    let transfer_routes = Router::new()
        .route("/", post(transfers::initiate))
        .route("/:id", get(transfers::show))
        .route("/:id/approve-club", post(transfers::approve_by_club))
        .route("/:id/approve-zifa", post(transfers::approve_by_zifa))
        .route("/:id/reject", post(transfers::reject))
        .route("/:id/cancel", post(transfers::cancel));

    // Invoice and payment routes
    let invoice_routes = Router::new()
        .route("/:id", get(invoices::show))
        .route("/:id/cancel", post(invoices::cancel))
        .route("/:id/payments", post(payments::initiate))
        .route("/mark-overdue", post(invoices::mark_overdue));

    let payment_routes = Router::new()
        .route("/:id/status", get(payments::status))
        .route("/:id/refund", post(payments::refund));

    // Registration routes
    let registration_routes = Router::new()
        .route("/players", post(registrations::register_player))
        .route("/affiliations", post(registrations::create_affiliation));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/transfers", transfer_routes)
        .nest("/invoices", invoice_routes)
        .nest("/payments", payment_routes)
        .nest("/registrations", registration_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
