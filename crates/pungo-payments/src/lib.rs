//! # pungo-payments
//!
//! Stripe integration for the Pungo backend: hosted checkout sessions and
//! the webhook reconciler that keeps profile subscription tiers in sync.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │   Browser   │────▶│  Stripe Hosted  │────▶│  /success   │
//! │  (pricing)  │     │  Checkout Page  │     │    page     │
//! └─────────────┘     └────────┬────────┘     └─────────────┘
//!                              │ async, at-least-once
//!                              ▼
//!                      ┌───────────────┐     ┌─────────────┐
//!                      │ /api/webhooks │────▶│  Profile    │
//!                      │  (reconciler) │     │  tier write │
//!                      └───────────────┘     └─────────────┘
//! ```
//!
//! The success page never depends on the webhook having fired: the tier
//! shows up on the next profile read after reconciliation. Webhook bodies
//! are authenticated with an HMAC signature before anything is written,
//! and every write is idempotent so replays are harmless.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pungo_payments::{CheckoutRequest, PriceTable, Reconciler, StripeClient};
//!
//! let stripe = StripeClient::new("sk_test_xxx", "whsec_xxx", "https://pungo.app");
//! let session = stripe.create_checkout_session(CheckoutRequest {
//!     price_id: "price_pro_monthly".into(),
//!     user_id,
//!     email: Some("user@example.com".into()),
//! }).await?;
//! // Redirect user to: session.url
//! ```

mod checkout;
mod error;
mod event;
mod reconcile;
pub mod signature;
mod tier;

pub use checkout::{CheckoutRequest, CheckoutSession, StripeClient};
pub use error::{PaymentError, Result};
pub use event::{parse as parse_event, WebhookEvent};
pub use reconcile::Reconciler;
pub use tier::PriceTable;
