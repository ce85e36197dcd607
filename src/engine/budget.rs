// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::percent_of;
use crate::models::{Budget, Transaction, TxnType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category_id: i64,
    pub budgeted: Decimal,
    pub spent: Decimal,
    /// Negative when over budget.
    pub remaining: Decimal,
    pub progress_pct: Decimal,
}

impl BudgetStatus {
    pub fn is_over_budget(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}

/// Expense spend keyed by category. Uncategorized rows are left out.
pub fn spend_by_category(txns: &[Transaction]) -> HashMap<i64, Decimal> {
    let mut spent: HashMap<i64, Decimal> = HashMap::new();
    for t in txns.iter().filter(|t| t.r#type == TxnType::Expense) {
        if let Some(cid) = t.category_id {
            let total = spent.entry(cid).or_insert(Decimal::ZERO);
            *total = total.saturating_add(t.amount);
        }
    }
    spent
}

/// Join one period's budgets with that period's expenses, most over-budget
/// first. Spend against categories without a budget is ignored.
pub fn budget_statuses(budgets: &[Budget], expenses: &[Transaction]) -> Vec<BudgetStatus> {
    let spent = spend_by_category(expenses);
    let mut out: Vec<BudgetStatus> = budgets
        .iter()
        .map(|b| {
            let s = spent.get(&b.category_id).copied().unwrap_or(Decimal::ZERO);
            let progress_pct = if b.amount > Decimal::ZERO {
                percent_of(s, b.amount)
            } else {
                Decimal::ZERO
            };
            BudgetStatus {
                category_id: b.category_id,
                budgeted: b.amount,
                spent: s,
                remaining: b.amount.saturating_sub(s),
                progress_pct,
            }
        })
        .collect();
    out.sort_by(|a, b| a.remaining.cmp(&b.remaining));
    out
}
