//! Storage Abstraction
//!
//! Port over the hosted relational backend. All tables are owned by the
//! external database service; this trait covers exactly the reads and
//! single-row writes the backend performs.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Expense, LifePhase, Profile, Tier};

/// Data store trait (Strategy pattern)
///
/// Implemented by the PostgREST-backed store for production and by an
/// in-memory store for development and tests.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch a profile by user id
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Set city and monthly budget on a profile (onboarding)
    async fn update_profile_details(
        &self,
        user_id: Uuid,
        city: &str,
        monthly_budget: Decimal,
    ) -> Result<()>;

    /// Set the subscription tier (webhook reconciler)
    ///
    /// Deterministic single-row write: replaying the same event produces the
    /// same tier, which keeps the reconciler safe under at-least-once
    /// delivery. Matching no row is a no-op, not an error.
    async fn set_subscription_tier(&self, user_id: Uuid, tier: Tier) -> Result<()>;

    /// Point the profile at its active life phase
    async fn set_active_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<()>;

    /// Append a life phase
    async fn insert_life_phase(&self, phase: &LifePhase) -> Result<()>;

    /// Resolve the user's active life phase
    ///
    /// The profile's `active_phase_id` pointer wins; rows that predate the
    /// pointer fall back to the most-recently-created phase.
    async fn active_phase(&self, user_id: Uuid) -> Result<Option<LifePhase>>;

    /// Append an expense
    async fn insert_expense(&self, expense: &Expense) -> Result<()>;

    /// Expenses of one phase, newest first
    async fn expenses_for_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<Vec<Expense>>;

    /// All expenses of a user across phases
    async fn expenses_for_user(&self, user_id: Uuid) -> Result<Vec<Expense>>;

    /// Expenses of other users in the given city (community benchmarks)
    async fn community_expenses(&self, city: &str, exclude_user: Uuid) -> Result<Vec<Expense>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> bool;
}
