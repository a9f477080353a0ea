//! Stripe Checkout Integration
//!
//! Creates hosted checkout sessions for the subscription tiers. The user is
//! redirected to Stripe's payment page and back to the site afterwards; tier
//! reconciliation happens asynchronously through the webhook.

use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionPaymentMethodTypes,
    CreateCheckoutSessionSubscriptionData,
};
use uuid::Uuid;

use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    webhook_secret: String,
    site_url: String,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str, webhook_secret: &str, site_url: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| PaymentError::Config("STRIPE_WEBHOOK_SECRET not set".into()))?;
        let site_url = std::env::var("SITE_URL")
            .map_err(|_| PaymentError::Config("SITE_URL not set".into()))?;

        Ok(Self::new(&secret_key, &webhook_secret, &site_url))
    }

    /// Get the webhook secret
    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    /// Create a subscription-mode checkout session for a configured price.
    ///
    /// Returns a URL to redirect the user to Stripe's hosted checkout page.
    /// The user id goes into both the session metadata (read back on
    /// `checkout.session.completed`) and the subscription metadata (read
    /// back on `customer.subscription.deleted`, which otherwise carries no
    /// user reference).
    pub async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession> {
        let success_url = format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.site_url
        );
        let cancel_url = format!("{}/pricing", self.site_url);

        let mut metadata = std::collections::HashMap::new();
        metadata.insert("userId".to_string(), request.user_id.to_string());
        metadata.insert("priceId".to_string(), request.price_id.clone());

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.success_url = Some(&success_url);
        params.cancel_url = Some(&cancel_url);
        params.customer_email = request.email.as_deref();

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(request.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        params.subscription_data = Some(CreateCheckoutSessionSubscriptionData {
            metadata: Some(metadata.clone()),
            ..Default::default()
        });
        params.metadata = Some(metadata);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }

    /// Get the underlying Stripe client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Configured Stripe price id
    pub price_id: String,

    /// Buying user
    pub user_id: Uuid,

    /// Optional email to prefill on the payment page
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,

    /// URL to redirect the user to
    pub url: String,
}
