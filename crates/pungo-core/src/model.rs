//! Domain Models
//!
//! Core data types for the Pungo finance backend.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier gating feature access
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Premium => "premium",
        }
    }

    /// Whether community benchmarks beyond the first category are visible
    pub fn unlocks_benchmarks(&self) -> bool {
        !matches!(self, Tier::Free)
    }
}

impl std::str::FromStr for Tier {
    type Err = std::convert::Infallible;

    /// Anything unrecognized degrades to Free
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "pro" => Tier::Pro,
            "premium" => Tier::Premium,
            _ => Tier::Free,
        })
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user profile
///
/// One row per user, created by the hosted identity service at signup.
/// Onboarding fills in `city`, `monthly_budget` and the active-phase pointer;
/// the webhook reconciler owns `subscription_tier`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    /// User identity key (matches the hosted auth user id)
    pub id: Uuid,

    /// Display name
    pub username: Option<String>,

    /// Home city, used for community benchmarks
    pub city: Option<String>,

    /// Monthly budget in EUR
    pub monthly_budget: Option<Decimal>,

    /// Subscription tier
    #[serde(default)]
    pub subscription_tier: Tier,

    /// Pointer to the currently active life phase
    pub active_phase_id: Option<Uuid>,
}

impl Profile {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            city: None,
            monthly_budget: None,
            subscription_tier: Tier::Free,
            active_phase_id: None,
        }
    }
}

/// Life-phase kind selected at onboarding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Studium,
    Auslandsjahr,
    Elternzeit,
    Umzug,
    Gapyear,
}

impl PhaseKind {
    /// Human-readable name stored on the phase row
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKind::Studium => "Studium",
            PhaseKind::Auslandsjahr => "Auslandsjahr",
            PhaseKind::Elternzeit => "Elternzeit",
            PhaseKind::Umzug => "Umzug",
            PhaseKind::Gapyear => "Gap Year",
        }
    }
}

/// A user-defined period (e.g. "studies abroad") that scopes a set of expenses
///
/// Append-only; the profile's `active_phase_id` points at the current one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LifePhase {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Display name, derived from the kind at onboarding
    pub name: String,

    /// Phase kind (column name is `type` in the hosted schema)
    #[serde(rename = "type")]
    pub kind: PhaseKind,

    /// City this phase takes place in
    pub city: String,

    pub created_at: DateTime<Utc>,
}

impl LifePhase {
    pub fn new(user_id: Uuid, kind: PhaseKind, city: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: kind.display_name().to_string(),
            kind,
            city: city.into(),
            created_at: Utc::now(),
        }
    }
}

/// Expense category
///
/// Unknown strings degrade to the `Sonstiges` catch-all bucket instead of
/// failing deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Miete,
    Essen,
    Transport,
    Freizeit,
    Versich,
    #[serde(other)]
    Sonstiges,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Miete => "miete",
            Category::Essen => "essen",
            Category::Transport => "transport",
            Category::Freizeit => "freizeit",
            Category::Versich => "versich",
            Category::Sonstiges => "sonstiges",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    /// Unknown categories fall back to the catch-all
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "miete" => Category::Miete,
            "essen" => Category::Essen,
            "transport" => Category::Transport,
            "freizeit" => Category::Freizeit,
            "versich" => Category::Versich,
            _ => Category::Sonstiges,
        })
    }
}

/// Fixed vs. variable expense
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Fix,
    Variabel,
}

/// Recurrence of an expense
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Monatlich,
    Einmalig,
}

/// A recorded expense, linked to a user and a life phase
///
/// Insert-only: never updated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Life phase this expense belongs to; must be owned by `user_id`
    pub phase_id: Uuid,

    pub category: Category,

    /// Amount in EUR, >= 0
    pub amount: Decimal,

    /// Fixed or variable (column name is `type` in the hosted schema)
    #[serde(rename = "type")]
    pub kind: ExpenseKind,

    pub interval: Interval,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        phase_id: Uuid,
        category: Category,
        amount: Decimal,
        kind: ExpenseKind,
        interval: Interval,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            phase_id,
            category,
            amount,
            kind,
            interval,
            description,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tier_parse() {
        assert_eq!("pro".parse(), Ok(Tier::Pro));
        assert_eq!("PREMIUM".parse(), Ok(Tier::Premium));
        assert_eq!("free".parse(), Ok(Tier::Free));
        assert_eq!("enterprise".parse(), Ok(Tier::Free));
    }

    #[test]
    fn test_category_fallback() {
        assert_eq!("miete".parse(), Ok(Category::Miete));
        assert_eq!("abo".parse(), Ok(Category::Sonstiges));

        // serde deserialization degrades the same way
        let cat: Category = serde_json::from_str("\"haustier\"").unwrap();
        assert_eq!(cat, Category::Sonstiges);
    }

    #[test]
    fn test_phase_column_rename() {
        let phase = LifePhase::new(Uuid::new_v4(), PhaseKind::Gapyear, "Berlin");
        assert_eq!(phase.name, "Gap Year");

        let json = serde_json::to_value(&phase).unwrap();
        assert_eq!(json["type"], "gapyear");
    }

    #[test]
    fn test_expense_serialization() {
        let expense = Expense::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Category::Miete,
            dec!(850.00),
            ExpenseKind::Fix,
            Interval::Monatlich,
            Some("WG-Zimmer".into()),
        );

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["type"], "fix");
        assert_eq!(json["interval"], "monatlich");
        assert_eq!(json["category"], "miete");
    }
}
