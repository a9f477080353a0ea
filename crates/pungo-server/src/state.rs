//! Application State

use std::sync::Arc;

use pungo_core::store::DataStore;
use pungo_payments::{PriceTable, StripeClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Data store (Supabase in production, in-memory for development)
    pub store: Arc<dyn DataStore>,

    /// Payment gateway (None if Stripe is not configured)
    pub payments: Option<PaymentGateway>,
}

/// Stripe client plus the configured price table
#[derive(Clone)]
pub struct PaymentGateway {
    pub stripe: Arc<StripeClient>,
    pub prices: PriceTable,
}
