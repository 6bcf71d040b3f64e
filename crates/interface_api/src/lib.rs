//! HTTP API Layer
//!
//! This crate provides the REST API for the field operations core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent `{error, message}` JSON responses
//!
//! Handlers only talk to the domain services held in [`AppState`]; which
//! adapters back them is decided by whoever builds the [`Backends`].
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, Backends};
//!
//! let state = AppState::new(config, backends)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use domain_billing::{DocumentStore, InvoicePort, InvoiceRenderer, InvoiceService};
use domain_catalog::{CatalogPort, UserPort};
use domain_fieldlog::{DriverLogService, LogPort, LogPriceEngine, TimerService};
use domain_rental::{OrderPort, OrderPriceEngine, OrderService};

use crate::config::ApiConfig;
use crate::handlers::{catalog, health, invoices, logs, orders, users};
use crate::middleware::{audit_middleware, auth_middleware};

/// The adapters behind every port the API uses
#[derive(Clone)]
pub struct Backends {
    pub catalog: Arc<dyn CatalogPort>,
    pub users: Arc<dyn UserPort>,
    pub orders: Arc<dyn OrderPort>,
    pub logs: Arc<dyn LogPort>,
    pub invoices: Arc<dyn InvoicePort>,
    pub renderer: Arc<dyn InvoiceRenderer>,
    pub documents: Arc<dyn DocumentStore>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub catalog: Arc<dyn CatalogPort>,
    pub orders: Arc<OrderService>,
    pub logs: Arc<DriverLogService>,
    pub invoices: Arc<InvoiceService>,
    pub backends: Backends,
}

impl AppState {
    /// Wires the domain services onto `backends`
    ///
    /// Fails when the configured currency or timezone is unknown.
    pub fn new(config: ApiConfig, backends: Backends) -> Result<Self, ::config::ConfigError> {
        let currency = config.currency()?;
        let timezone = config.timezone()?;

        let orders = OrderService::new(
            backends.orders.clone(),
            backends.catalog.clone(),
            OrderPriceEngine::new(currency),
        )
        .with_timezone(timezone);

        let logs = DriverLogService::new(
            backends.logs.clone(),
            backends.catalog.clone(),
            Arc::new(TimerService::new()),
            LogPriceEngine::new(currency),
        )
        .with_timezone(timezone);

        let invoices = InvoiceService::new(
            backends.invoices.clone(),
            backends.renderer.clone(),
            backends.documents.clone(),
            currency,
        );

        Ok(Self {
            config: Arc::new(config),
            catalog: backends.catalog.clone(),
            orders: Arc::new(orders),
            logs: Arc::new(logs),
            invoices: Arc::new(invoices),
            backends,
        })
    }
}

/// Restricts browser access to the single configured origin
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(origin, "Ignoring unparseable CORS origin; cross-origin requests will be refused");
            layer
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let catalog_routes = Router::new()
        .route("/equipment", get(catalog::list_equipment).post(catalog::create_equipment))
        .route(
            "/equipment/:id",
            get(catalog::get_equipment)
                .put(catalog::update_equipment)
                .delete(catalog::delete_equipment),
        )
        .route("/jobs", get(catalog::list_jobs).post(catalog::create_job))
        .route(
            "/jobs/:id",
            get(catalog::get_job).put(catalog::update_job).delete(catalog::delete_job),
        )
        .route("/actions", get(catalog::list_actions).post(catalog::create_action))
        .route(
            "/actions/:id",
            get(catalog::get_action)
                .put(catalog::update_action)
                .delete(catalog::delete_action),
        )
        .route("/contacts", get(catalog::list_contacts).post(catalog::create_contact))
        .route(
            "/contacts/:id",
            get(catalog::get_contact)
                .put(catalog::update_contact)
                .delete(catalog::delete_contact),
        );

    let order_routes = Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/quote", post(orders::quote_order))
        .route("/jobs", get(orders::orderable_jobs))
        .route(
            "/:id",
            get(orders::get_order).put(orders::update_order).delete(orders::delete_order),
        )
        .route("/:id/status", put(orders::update_status));

    let log_routes = Router::new()
        .route("/", get(logs::list_logs).post(logs::create_log))
        .route("/quote", post(logs::quote_log))
        .route("/:id", get(logs::get_log).put(logs::update_log));

    let timer_routes = Router::new()
        .route("/", get(logs::timer_status))
        .route("/start", post(logs::start_timer))
        .route("/stop", post(logs::stop_timer));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        );

    let invoice_routes = Router::new()
        .route("/", get(invoices::list_invoices).post(invoices::generate_invoice))
        .route("/:number", get(invoices::download_invoice));

    // Protected API routes
    let api_routes = Router::new()
        .merge(catalog_routes)
        .nest("/users", user_routes)
        .nest("/orders", order_routes)
        .nest("/logs", log_routes)
        .nest("/timer", timer_routes)
        .nest("/invoices", invoice_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let cors = cors_layer(&state.config.allowed_origin);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
