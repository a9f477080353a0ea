//! # pungo-core
//!
//! Domain models and the storage port for the Pungo personal-finance
//! backend.
//!
//! Users onboard into a *life phase* (e.g. a year abroad), record expenses
//! against it, and unlock features through a *subscription tier*. All state
//! lives in a hosted relational backend; [`DataStore`] is the seam the rest
//! of the workspace programs against.
//!
//! Monetary values are [`rust_decimal::Decimal`] throughout.

pub mod error;
pub mod model;
pub mod store;

pub use error::{PungoError, Result};
pub use model::{Category, Expense, ExpenseKind, Interval, LifePhase, PhaseKind, Profile, Tier};
pub use store::DataStore;
