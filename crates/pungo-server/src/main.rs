//! Pungo HTTP Server
//!
//! Axum-based server providing the finance backend's REST API: onboarding,
//! expense planning, dashboard and community aggregation, and the Stripe
//! checkout/webhook pair that keeps subscription tiers in sync.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pungo_core::store::DataStore;
use pungo_payments::{PriceTable, StripeClient};
use pungo_server::state::{AppState, PaymentGateway};
use pungo_store::{MemoryStore, SupabaseStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize the data store
    let store: Arc<dyn DataStore> = match SupabaseStore::from_env() {
        Ok(store) => {
            if store.health_check().await {
                tracing::info!("✓ Connected to Supabase");
            } else {
                tracing::warn!("⚠ Supabase configured but not reachable");
            }
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("⚠ Supabase not configured ({e}) - using in-memory store");
            tracing::warn!("  Set SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY in .env");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize payments
    let payments = match StripeClient::from_env() {
        Ok(stripe) => {
            tracing::info!("✓ Stripe configured");
            Some(PaymentGateway {
                stripe: Arc::new(stripe),
                prices: PriceTable::from_env(),
            })
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured ({e}) - payments disabled");
            tracing::warn!("  Set STRIPE_SECRET_KEY, STRIPE_WEBHOOK_SECRET and SITE_URL in .env");
            None
        }
    };

    let state = AppState { store, payments };
    let app = pungo_server::router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 pungo-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /api/onboarding  - Profile details + life phase");
    tracing::info!("  POST /api/expenses    - Record expense");
    tracing::info!("  GET  /api/expenses    - Expenses of the active phase");
    tracing::info!("  GET  /api/dashboard   - Spend vs. budget");
    tracing::info!("  GET  /api/community   - City benchmarks");
    tracing::info!("  POST /api/checkout    - Create Stripe checkout");
    tracing::info!("  POST /api/webhooks    - Stripe webhook reconciler");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
