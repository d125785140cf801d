//! Ledger summary reporting
//!
//! Aggregates a slice of expenses into the figures the dashboard shows:
//! total spent, entry count, the single largest expense, and per-category
//! totals ordered biggest-first.

use std::collections::HashMap;

use crate::models::Expense;

/// Total spent in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Aggregate view over a ledger
#[derive(Debug, Clone)]
pub struct LedgerReport {
    pub total: f64,
    pub count: usize,
    /// The single biggest expense, absent for an empty ledger
    pub largest: Option<Expense>,
    /// Per-category totals, largest total first; ties break by name
    pub by_category: Vec<CategoryTotal>,
}

impl LedgerReport {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total = expenses.iter().map(|e| e.amount).sum();

        let largest = expenses
            .iter()
            .max_by(|a, b| a.amount.total_cmp(&b.amount))
            .cloned();

        let mut totals: HashMap<&str, f64> = HashMap::new();
        for expense in expenses {
            *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
        }
        let mut by_category: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            total,
            count: expenses.len(),
            largest,
            by_category,
        }
    }
}
