//! Budget Summary
//!
//! Spend-vs-budget aggregation over the active phase's expenses, as shown
//! on the dashboard.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use pungo_core::model::{Category, Expense};

/// Dashboard spend-vs-budget figures
#[derive(Clone, Debug, Serialize)]
pub struct BudgetSummary {
    /// Sum over the active phase's expenses
    pub total_spent: Decimal,

    /// The profile's monthly budget (0 when not set)
    pub budget: Decimal,

    /// budget - total_spent, negative when overspent
    pub remaining: Decimal,

    /// Budget utilisation, clamped to 100
    pub progress_percent: Decimal,

    /// Donut buckets, zero-amount buckets dropped
    pub buckets: Vec<DonutBucket>,
}

/// One donut-chart slice
#[derive(Clone, Debug, Serialize)]
pub struct DonutBucket {
    pub label: &'static str,
    pub amount: Decimal,
}

/// Aggregate expenses against the monthly budget.
///
/// Freizeit, Versicherung and unknown categories lump into the Sonstiges
/// bucket. A zero budget divides by 1 instead of erroring.
pub fn budget_summary(budget: Option<Decimal>, expenses: &[Expense]) -> BudgetSummary {
    let budget = budget.unwrap_or(Decimal::ZERO);
    let total_spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    let remaining = budget - total_spent;

    // Substitute a divisor of 1 only when no budget is set
    let divisor = if budget.is_zero() { Decimal::ONE } else { budget };
    let progress_percent = ((total_spent / divisor) * dec!(100)).min(dec!(100));

    let bucket_total = |categories: &[Category]| -> Decimal {
        expenses
            .iter()
            .filter(|e| categories.contains(&e.category))
            .map(|e| e.amount)
            .sum()
    };

    let buckets = [
        ("Miete", bucket_total(&[Category::Miete])),
        ("Essen", bucket_total(&[Category::Essen])),
        ("Transport", bucket_total(&[Category::Transport])),
        (
            "Sonstiges",
            bucket_total(&[Category::Freizeit, Category::Versich, Category::Sonstiges]),
        ),
    ]
    .into_iter()
    .filter(|(_, amount)| *amount > Decimal::ZERO)
    .map(|(label, amount)| DonutBucket { label, amount })
    .collect();

    BudgetSummary {
        total_spent,
        budget,
        remaining,
        progress_percent,
        buckets,
    }
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
            ExpenseKind::Fix,
            Interval::Monatlich,
            None,
        )
    }

    #[test]
    fn test_totals_and_remaining() {
        let expenses = vec![
            expense(Category::Miete, dec!(850)),
            expense(Category::Essen, dec!(250)),
        ];

        let summary = budget_summary(Some(dec!(1600)), &expenses);
        assert_eq!(summary.total_spent, dec!(1100));
        assert_eq!(summary.remaining, dec!(500));
        assert_eq!(summary.progress_percent, dec!(68.75));
    }

    #[test]
    fn test_overspend_clamps_progress() {
        let expenses = vec![expense(Category::Miete, dec!(2000))];
        let summary = budget_summary(Some(dec!(1000)), &expenses);
        assert_eq!(summary.remaining, dec!(-1000));
        assert_eq!(summary.progress_percent, dec!(100));
    }

    #[test]
    fn test_missing_budget_does_not_divide_by_zero() {
        let expenses = vec![expense(Category::Essen, dec!(50))];
        let summary = budget_summary(None, &expenses);
        assert_eq!(summary.budget, Decimal::ZERO);
        // total / 1 clamps straight to 100
        assert_eq!(summary.progress_percent, dec!(100));
    }

    #[test]
    fn test_fractional_budget_uses_real_divisor() {
        let expenses = vec![expense(Category::Essen, dec!(0.25))];
        let summary = budget_summary(Some(dec!(0.5)), &expenses);
        assert_eq!(summary.progress_percent, dec!(50));
    }

    #[test]
    fn test_sonstiges_lumps_and_zero_buckets_drop() {
        let expenses = vec![
            expense(Category::Miete, dec!(900)),
            expense(Category::Freizeit, dec!(60)),
            expense(Category::Versich, dec!(40)),
            expense(Category::Sonstiges, dec!(10)),
        ];

        let summary = budget_summary(Some(dec!(1600)), &expenses);
        let labels: Vec<&str> = summary.buckets.iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Miete", "Sonstiges"]);

        let sonstiges = summary.buckets.iter().find(|b| b.label == "Sonstiges");
        assert_eq!(sonstiges.unwrap().amount, dec!(110));
    }

    #[test]
    fn test_no_expenses() {
        let summary = budget_summary(Some(dec!(1600)), &[]);
        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert_eq!(summary.progress_percent, Decimal::ZERO);
        assert!(summary.buckets.is_empty());
    }
}
