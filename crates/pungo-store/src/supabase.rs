//! Supabase Store
//!
//! `DataStore` adapter over the hosted backend's PostgREST API. Uses the
//! service-role key, so it must only ever run server-side.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use pungo_core::error::{PungoError, Result};
use pungo_core::model::{Expense, LifePhase, Profile, Tier};
use pungo_core::store::DataStore;

/// PostgREST-backed data store
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct IdRow {
    id: Uuid,
}

impl SupabaseStore {
    /// Create a new store against a Supabase project
    pub fn new(base_url: &str, service_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(service_key)
            .map_err(|_| PungoError::Config("Service key contains invalid characters".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_| PungoError::Config("Service key contains invalid characters".into()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PungoError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| PungoError::Config("SUPABASE_URL not set".into()))?;
        let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| PungoError::Config("SUPABASE_SERVICE_ROLE_KEY not set".into()))?;
        Self::new(&url, &key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await
            .map_err(|e| PungoError::Persistence(e.to_string()))?;

        Self::check_status(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| PungoError::Persistence(format!("Decoding {table} rows: {e}")))
    }

    async fn insert(&self, table: &str, body: &Value) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await
            .map_err(|e| PungoError::Persistence(e.to_string()))?;

        Self::check_status(table, response).await.map(|_| ())
    }

    /// PATCH with `return=representation` so callers can see how many rows
    /// actually matched the filter.
    async fn update(&self, table: &str, query: &[(&str, String)], body: &Value) -> Result<usize> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(query)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|e| PungoError::Persistence(e.to_string()))?;

        let rows: Vec<Value> = Self::check_status(table, response)
            .await?
            .json()
            .await
            .map_err(|e| PungoError::Persistence(format!("Decoding {table} rows: {e}")))?;
        Ok(rows.len())
    }

    async fn check_status(table: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PungoError::Persistence(format!(
            "PostgREST {table} request failed with {status}: {body}"
        )))
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let mut rows: Vec<Profile> = self
            .select(
                "profiles",
                &[
                    ("id", format!("eq.{user_id}")),
                    ("select", "*".into()),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.pop())
    }

    async fn update_profile_details(
        &self,
        user_id: Uuid,
        city: &str,
        monthly_budget: Decimal,
    ) -> Result<()> {
        let matched = self
            .update(
                "profiles",
                &[("id", format!("eq.{user_id}"))],
                &json!({ "city": city, "monthly_budget": monthly_budget }),
            )
            .await?;
        if matched == 0 {
            // Row creation is owned by the hosted signup trigger
            tracing::warn!(%user_id, "Onboarding update matched no profile row");
        }
        Ok(())
    }

    async fn set_subscription_tier(&self, user_id: Uuid, tier: Tier) -> Result<()> {
        let matched = self
            .update(
                "profiles",
                &[("id", format!("eq.{user_id}"))],
                &json!({ "subscription_tier": tier }),
            )
            .await?;
        if matched == 0 {
            tracing::warn!(%user_id, %tier, "Tier update matched no profile row");
        }
        Ok(())
    }

    async fn set_active_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<()> {
        self.update(
            "profiles",
            &[("id", format!("eq.{user_id}"))],
            &json!({ "active_phase_id": phase_id }),
        )
        .await
        .map(|_| ())
    }

    async fn insert_life_phase(&self, phase: &LifePhase) -> Result<()> {
        let body = serde_json::to_value(phase)
            .map_err(|e| PungoError::Persistence(e.to_string()))?;
        self.insert("life_phases", &body).await
    }

    async fn active_phase(&self, user_id: Uuid) -> Result<Option<LifePhase>> {
        if let Some(profile) = self.profile(user_id).await? {
            if let Some(phase_id) = profile.active_phase_id {
                let mut rows: Vec<LifePhase> = self
                    .select(
                        "life_phases",
                        &[
                            ("id", format!("eq.{phase_id}")),
                            ("select", "*".into()),
                            ("limit", "1".into()),
                        ],
                    )
                    .await?;
                if let Some(phase) = rows.pop() {
                    return Ok(Some(phase));
                }
            }
        }

        // Rows predating the pointer: most-recently-created wins
        let mut rows: Vec<LifePhase> = self
            .select(
                "life_phases",
                &[
                    ("user_id", format!("eq.{user_id}")),
                    ("select", "*".into()),
                    ("order", "created_at.desc".into()),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.pop())
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        let body = serde_json::to_value(expense)
            .map_err(|e| PungoError::Persistence(e.to_string()))?;
        self.insert("expenses", &body).await
    }

    async fn expenses_for_phase(&self, user_id: Uuid, phase_id: Uuid) -> Result<Vec<Expense>> {
        self.select(
            "expenses",
            &[
                ("user_id", format!("eq.{user_id}")),
                ("phase_id", format!("eq.{phase_id}")),
                ("select", "*".into()),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn expenses_for_user(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        self.select(
            "expenses",
            &[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".into()),
            ],
        )
        .await
    }

    async fn community_expenses(&self, city: &str, exclude_user: Uuid) -> Result<Vec<Expense>> {
        let neighbours: Vec<IdRow> = self
            .select(
                "profiles",
                &[
                    ("city", format!("eq.{city}")),
                    ("id", format!("neq.{exclude_user}")),
                    ("select", "id".into()),
                ],
            )
            .await?;

        if neighbours.is_empty() {
            return Ok(Vec::new());
        }

        let ids = neighbours
            .iter()
            .map(|row| row.id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        self.select(
            "expenses",
            &[
                ("user_id", format!("in.({ids})")),
                ("select", "*".into()),
            ],
        )
        .await
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/rest/v1/", self.base_url);
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
