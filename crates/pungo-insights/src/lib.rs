//! # pungo-insights
//!
//! Pure aggregation behind the dashboard and community views: budget
//! utilisation over the active phase and spend benchmarks against the
//! city community. No I/O here; the server feeds in rows from the store.

mod benchmark;
mod budget;

pub use benchmark::{community_benchmarks, CategoryBenchmark, BENCHMARK_CATEGORIES};
pub use budget::{budget_summary, BudgetSummary, DonutBucket};
