//! Community Benchmarks
//!
//! Compares a user's spend per category against the average of other users
//! in the same city. Free-tier callers only see the first category in full;
//! the rest come back locked with amounts omitted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use pungo_core::model::{Category, Expense, Tier};

/// The categories the community view benchmarks, in display order
pub const BENCHMARK_CATEGORIES: [Category; 4] = [
    Category::Miete,
    Category::Essen,
    Category::Transport,
    Category::Freizeit,
];

/// One category's comparison against the city community
#[derive(Clone, Debug, Serialize)]
pub struct CategoryBenchmark {
    pub category: Category,

    /// Whether the caller's tier hides this entry
    pub locked: bool,

    /// Caller's total across all their expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_total: Option<Decimal>,

    /// Community average per expense row, 0 when the community is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_avg: Option<Decimal>,

    /// Percentage difference vs. the average, 0 when the average is 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_percent: Option<Decimal>,
}

/// Benchmark the caller's expenses against their city community.
pub fn community_benchmarks(
    mine: &[Expense],
    others: &[Expense],
    tier: Tier,
) -> Vec<CategoryBenchmark> {
    BENCHMARK_CATEGORIES
        .iter()
        .enumerate()
        .map(|(idx, &category)| {
            // The first category stays visible as a teaser for free users
            let locked = idx > 0 && !tier.unlocks_benchmarks();
            if locked {
                return CategoryBenchmark {
                    category,
                    locked,
                    my_total: None,
                    community_avg: None,
                    diff_percent: None,
                };
            }

            let my_total: Decimal = mine
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.amount)
                .sum();

            let community: Vec<Decimal> = others
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.amount)
                .collect();
            let community_avg = if community.is_empty() {
                Decimal::ZERO
            } else {
                community.iter().sum::<Decimal>() / Decimal::from(community.len())
            };

            let diff_percent = if community_avg > Decimal::ZERO {
                (((my_total - community_avg) / community_avg) * dec!(100)).round_dp(1)
            } else {
                Decimal::ZERO
            };

            CategoryBenchmark {
                category,
                locked,
                my_total: Some(my_total),
                community_avg: Some(community_avg),
                diff_percent: Some(diff_percent),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pungo_core::model::{ExpenseKind, Interval};
    use uuid::Uuid;

    fn expense(category: Category, amount: Decimal) -> Expense {
        Expense::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            category,
            amount,
            ExpenseKind::Variabel,
            Interval::Monatlich,
            None,
        )
    }

    #[test]
    fn test_average_is_per_expense_row() {
        let mine = vec![expense(Category::Miete, dec!(900))];
        let others = vec![
            expense(Category::Miete, dec!(700)),
            expense(Category::Miete, dec!(900)),
            expense(Category::Essen, dec!(300)),
        ];

        let benchmarks = community_benchmarks(&mine, &others, Tier::Pro);
        let miete = &benchmarks[0];
        assert_eq!(miete.community_avg, Some(dec!(800)));
        assert_eq!(miete.my_total, Some(dec!(900)));
        assert_eq!(miete.diff_percent, Some(dec!(12.5)));
    }

    #[test]
    fn test_empty_community_yields_zero() {
        let mine = vec![expense(Category::Essen, dec!(200))];
        let benchmarks = community_benchmarks(&mine, &[], Tier::Premium);

        let essen = benchmarks
            .iter()
            .find(|b| b.category == Category::Essen)
            .unwrap();
        assert_eq!(essen.community_avg, Some(Decimal::ZERO));
        assert_eq!(essen.diff_percent, Some(Decimal::ZERO));
    }

    #[test]
    fn test_free_tier_locks_all_but_first() {
        let benchmarks = community_benchmarks(&[], &[], Tier::Free);
        assert_eq!(benchmarks.len(), 4);
        assert!(!benchmarks[0].locked);
        assert!(benchmarks[0].my_total.is_some());
        for locked in &benchmarks[1..] {
            assert!(locked.locked);
            assert!(locked.my_total.is_none());
            assert!(locked.community_avg.is_none());
        }
    }

    #[test]
    fn test_paid_tiers_see_everything() {
        for tier in [Tier::Pro, Tier::Premium] {
            let benchmarks = community_benchmarks(&[], &[], tier);
            assert!(benchmarks.iter().all(|b| !b.locked));
        }
    }

    #[test]
    fn test_locked_entries_omit_amounts_in_json() {
        let benchmarks = community_benchmarks(&[], &[], Tier::Free);
        let json = serde_json::to_value(&benchmarks[1]).unwrap();
        assert_eq!(json["locked"], true);
        assert!(json.get("my_total").is_none());
        assert!(json.get("community_avg").is_none());
    }
}
