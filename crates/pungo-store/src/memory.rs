//! In-Memory Store
//!
//! For development and tests. Stands in for the hosted backend, including
//! the signup trigger that creates profile rows: updating a missing profile
//! creates it.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use pungo_core::error::Result;
use pungo_core::model::{Expense, LifePhase, Profile, Tier};
use pungo_core::store::DataStore;

/// In-memory data store backed by `tokio::sync::RwLock` tables
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    phases: RwLock<Vec<LifePhase>>,
    expenses: RwLock<Vec<Expense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile row, the way the hosted signup trigger would
    pub async fn seed_profile(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn update_profile_details(
        &self,
        user_id: Uuid,
        city: &str,
        monthly_budget: Decimal,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id)
            .or_insert_with(|| Profile::new(user_id));
        profile.city = Some(city.to_string());
        profile.monthly_budget = Some(monthly_budget);
        Ok(())
    }

    async fn set_subscription_tier(&self, user_id: Uuid, tier: Tier) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        if let Some(profile) = profiles.get_mut(&user_id) {
            profile.subscription_tier = tier;
        } else {
            tracing::warn!(%user_id, "Tier update matched no profile row");
        }
        Ok(())
    }

    async fn set_active_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        if let Some(profile) = profiles.get_mut(&user_id) {
            profile.active_phase_id = Some(phase_id);
        } else {
            tracing::warn!(%user_id, "Active-phase update matched no profile row");
        }
        Ok(())
    }

    async fn insert_life_phase(&self, phase: &LifePhase) -> Result<()> {
        self.phases.write().await.push(phase.clone());
        Ok(())
    }

    async fn active_phase(&self, user_id: Uuid) -> Result<Option<LifePhase>> {
        let pointer = self
            .profiles
            .read()
            .await
            .get(&user_id)
            .and_then(|p| p.active_phase_id);

        let phases = self.phases.read().await;

        if let Some(phase_id) = pointer {
            if let Some(phase) = phases.iter().find(|p| p.id == phase_id) {
                return Ok(Some(phase.clone()));
            }
        }

        // Rows predating the pointer: most-recently-created wins
        Ok(phases
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        self.expenses.write().await.push(expense.clone());
        Ok(())
    }

    async fn expenses_for_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<Vec<Expense>> {
        let mut rows: Vec<Expense> = self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && e.phase_id == phase_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn expenses_for_user(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn community_expenses(&self, city: &str, exclude_user: Uuid) -> Result<Vec<Expense>> {
        let profiles = self.profiles.read().await;
        let neighbours: Vec<Uuid> = profiles
            .values()
            .filter(|p| p.id != exclude_user && p.city.as_deref() == Some(city))
            .map(|p| p.id)
            .collect();

        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| neighbours.contains(&e.user_id))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
