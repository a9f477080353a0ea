//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pungo_core::model::{Category, Expense, ExpenseKind, Interval, LifePhase, PhaseKind, Tier};
use pungo_insights::{BudgetSummary, CategoryBenchmark};
use pungo_payments::{CheckoutRequest, Reconciler};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store_connected: bool,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `POST /api/checkout`; field names are part of the wire contract
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub user_id: Uuid,
    pub kind: PhaseKind,
    pub city: String,
    pub monthly_budget: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub phase_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NewExpenseRequest {
    pub user_id: Uuid,
    pub category: Category,
    pub amount: Decimal,
    pub kind: ExpenseKind,
    pub interval: Interval,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub username: Option<String>,
    pub city: Option<String>,
    pub subscription_tier: Tier,
    pub summary: BudgetSummary,
}

#[derive(Debug, Serialize)]
pub struct CommunityResponse {
    pub city: Option<String>,
    pub benchmarks: Vec<CategoryBenchmark>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn persistence_error(e: pungo_core::PungoError) -> HandlerError {
    tracing::error!(error = %e, "Store request failed");
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        e.user_message().to_string(),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.store.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store_connected,
        stripe_configured: state.payments.is_some(),
    })
}

/// Create a Stripe checkout session
///
/// Validation runs before anything else so a bad request never reaches the
/// payment provider.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>, HandlerError> {
    let price_id = payload
        .price_id
        .filter(|p| !p.is_empty())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing required parameters"))?;
    let user_id = payload
        .user_id
        .as_deref()
        .and_then(|u| Uuid::parse_str(u).ok())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing required parameters"))?;

    let gateway = state
        .payments
        .as_ref()
        .ok_or_else(|| reject(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured"))?;

    let session = gateway
        .stripe
        .create_checkout_session(CheckoutRequest {
            price_id,
            user_id,
            email: payload.email,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Checkout session creation failed");
            // Provider message passes through
            reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(CheckoutResponse { url: session.url }))
}

/// Stripe webhook endpoint
///
/// Signature failures are the only non-200 path once the body arrives:
/// malformed-but-authentic payloads and store write failures are logged and
/// acknowledged so the provider does not redeliver a logically-handled
/// event.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, HandlerError> {
    let gateway = state
        .payments
        .as_ref()
        .ok_or_else(|| reject(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured"))?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing Stripe signature"))?;

    pungo_payments::signature::verify(gateway.stripe.webhook_secret(), signature, &body).map_err(
        |e| {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            reject(StatusCode::BAD_REQUEST, "Invalid signature")
        },
    )?;

    match pungo_payments::parse_event(&body) {
        Ok(event) => {
            let reconciler = Reconciler::new(state.store.clone(), gateway.prices.clone());
            reconciler.process(event).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Authenticated webhook body did not parse");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// Finish onboarding: profile details plus a fresh active life phase
pub async fn onboarding(
    State(state): State<AppState>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>, HandlerError> {
    if payload.city.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "City must not be empty"));
    }
    if payload.monthly_budget < Decimal::ZERO {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Budget must not be negative",
        ));
    }

    state
        .store
        .update_profile_details(payload.user_id, payload.city.trim(), payload.monthly_budget)
        .await
        .map_err(persistence_error)?;

    let phase = LifePhase::new(payload.user_id, payload.kind, payload.city.trim());
    state
        .store
        .insert_life_phase(&phase)
        .await
        .map_err(persistence_error)?;
    state
        .store
        .set_active_phase(payload.user_id, phase.id)
        .await
        .map_err(persistence_error)?;

    tracing::info!(user_id = %payload.user_id, phase_id = %phase.id, "Onboarding completed");

    Ok(Json(OnboardingResponse { phase_id: phase.id }))
}

/// Record an expense against the caller's active phase
///
/// The phase is resolved server-side so an expense can never land in a
/// phase the user does not own.
pub async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<NewExpenseRequest>,
) -> Result<Json<Expense>, HandlerError> {
    if payload.amount < Decimal::ZERO {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Amount must not be negative",
        ));
    }

    let phase = state
        .store
        .active_phase(payload.user_id)
        .await
        .map_err(persistence_error)?
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No active life phase"))?;

    let expense = Expense::new(
        payload.user_id,
        phase.id,
        payload.category,
        payload.amount,
        payload.kind,
        payload.interval,
        payload.description,
    );
    state
        .store
        .insert_expense(&expense)
        .await
        .map_err(persistence_error)?;

    Ok(Json(expense))
}

/// Expenses of the caller's active phase, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Expense>>, HandlerError> {
    let Some(phase) = state
        .store
        .active_phase(query.user_id)
        .await
        .map_err(persistence_error)?
    else {
        return Ok(Json(Vec::new()));
    };

    let expenses = state
        .store
        .expenses_for_phase(query.user_id, phase.id)
        .await
        .map_err(persistence_error)?;
    Ok(Json(expenses))
}

/// Dashboard: profile fields plus spend-vs-budget over the active phase
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<DashboardResponse>, HandlerError> {
    let profile = state
        .store
        .profile(query.user_id)
        .await
        .map_err(persistence_error)?
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Profile not found"))?;

    let expenses = match state
        .store
        .active_phase(query.user_id)
        .await
        .map_err(persistence_error)?
    {
        Some(phase) => state
            .store
            .expenses_for_phase(query.user_id, phase.id)
            .await
            .map_err(persistence_error)?,
        None => Vec::new(),
    };

    let summary = pungo_insights::budget_summary(profile.monthly_budget, &expenses);

    Ok(Json(DashboardResponse {
        username: profile.username,
        city: profile.city,
        subscription_tier: profile.subscription_tier,
        summary,
    }))
}

/// Community benchmarks against other users in the caller's city
pub async fn community(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CommunityResponse>, HandlerError> {
    let profile = state
        .store
        .profile(query.user_id)
        .await
        .map_err(persistence_error)?
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Profile not found"))?;

    let mine = state
        .store
        .expenses_for_user(query.user_id)
        .await
        .map_err(persistence_error)?;

    let others = match profile.city.as_deref() {
        Some(city) => state
            .store
            .community_expenses(city, query.user_id)
            .await
            .map_err(persistence_error)?,
        // Without a city there is no community to compare against
        None => Vec::new(),
    };

    let benchmarks =
        pungo_insights::community_benchmarks(&mine, &others, profile.subscription_tier);

    Ok(Json(CommunityResponse {
        city: profile.city,
        benchmarks,
    }))
}
