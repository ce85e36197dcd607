// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Transaction, TxnType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Expense totals grouped by category name, largest first.
///
/// Rows without a category, or whose category id no longer resolves, are
/// grouped under [`UNCATEGORIZED`]. Equal totals keep first-seen order.
pub fn category_breakdown(expenses: &[Transaction], categories: &[Category]) -> Vec<CategoryTotal> {
    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut out: Vec<CategoryTotal> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for t in expenses.iter().filter(|t| t.r#type == TxnType::Expense) {
        let name = t
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNCATEGORIZED);
        let i = *slots.entry(name).or_insert_with(|| {
            out.push(CategoryTotal {
                category: name.to_string(),
                total: Decimal::ZERO,
            });
            out.len() - 1
        });
        out[i].total = out[i].total.saturating_add(t.amount);
    }
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}
