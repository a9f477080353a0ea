//! # pungo-server
//!
//! Axum HTTP server wiring the Pungo backend together: store adapters,
//! payment gateway, and the JSON endpoints behind the web client.

pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    community, create_checkout, create_expense, dashboard, health_check, list_expenses,
    onboarding, stripe_webhook,
};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        // Onboarding & planner
        .route("/api/onboarding", post(onboarding))
        .route("/api/expenses", post(create_expense).get(list_expenses))
        // Views
        .route("/api/dashboard", get(dashboard))
        .route("/api/community", get(community))
        // Payments
        .route("/api/checkout", post(create_checkout))
        .route("/api/webhooks", post(stripe_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
