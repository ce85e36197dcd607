// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TxnType};
use crate::utils::{days_in_month, next_month};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One bucket per day of `month`.
    Daily { year: i32, month: u32 },
    /// One bucket per month of `year`.
    Monthly { year: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesBucket {
    pub label: String,
    pub start: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

impl SeriesBucket {
    fn empty(start: NaiveDate, label: String) -> Self {
        Self {
            label,
            start,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }
}

impl Granularity {
    fn buckets(&self) -> Vec<SeriesBucket> {
        match *self {
            Granularity::Daily { year, month } => {
                let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                    return Vec::new();
                };
                first
                    .iter_days()
                    .take(days_in_month(first) as usize)
                    .map(|d| SeriesBucket::empty(d, d.day().to_string()))
                    .collect()
            }
            Granularity::Monthly { year } => {
                let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
                    return Vec::new();
                };
                std::iter::successors(Some(first), |d| Some(next_month(*d)))
                    .take(12)
                    .map(|d| SeriesBucket::empty(d, d.format("%B").to_string()))
                    .collect()
            }
        }
    }

    fn key(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Daily { .. } => Some(date),
            Granularity::Monthly { .. } => date.with_day(1),
        }
    }
}

/// Gap-filled income/expense series in calendar order.
///
/// Every bucket is present even with no activity. Transactions falling
/// outside the range are dropped, as are transfers.
pub fn build_series(granularity: Granularity, txns: &[Transaction]) -> Vec<SeriesBucket> {
    let mut buckets = granularity.buckets();
    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.start, i))
        .collect();

    for t in txns {
        let slot = granularity
            .key(t.date.date_naive())
            .and_then(|k| index.get(&k).copied());
        let Some(i) = slot else {
            tracing::debug!(id = t.id, date = %t.date, "transaction outside series range, dropped");
            continue;
        };
        let b = &mut buckets[i];
        match t.r#type {
            TxnType::Income => b.income = b.income.saturating_add(t.amount),
            TxnType::Expense => b.expense = b.expense.saturating_add(t.amount),
            TxnType::Transfer => {}
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{dec, tx};

    #[test]
    fn daily_series_covers_every_day() {
        let txns = vec![
            tx(1, "2025-07-31", TxnType::Expense, "20", None),
            tx(2, "2025-07-01", TxnType::Income, "1000", None),
            tx(3, "2025-07-15T18:45:00Z", TxnType::Expense, "35.25", Some(2)),
            tx(4, "2025-07-15", TxnType::Expense, "4.75", None),
        ];
        let series = build_series(Granularity::Daily { year: 2025, month: 7 }, &txns);
        assert_eq!(series.len(), 31);
        assert_eq!(series[0].label, "1");
        assert_eq!(series[30].label, "31");
        assert!(series.windows(2).all(|w| w[0].start < w[1].start));
        assert_eq!(series[0].income, dec("1000"));
        assert_eq!(series[14].expense, dec("40"));
        assert_eq!(series[30].expense, dec("20"));
        assert_eq!(series[1].income + series[1].expense, Decimal::ZERO);
    }

    #[test]
    fn order_does_not_depend_on_input_order() {
        let mut txns = vec![
            tx(1, "2024-02-10", TxnType::Expense, "10", None),
            tx(2, "2024-02-29", TxnType::Income, "50", None),
            tx(3, "2024-02-01", TxnType::Expense, "7", None),
        ];
        let forward = build_series(Granularity::Daily { year: 2024, month: 2 }, &txns);
        txns.reverse();
        let backward = build_series(Granularity::Daily { year: 2024, month: 2 }, &txns);
        assert_eq!(forward.len(), 29);
        assert_eq!(forward, backward);
    }

    #[test]
    fn monthly_series_uses_month_names() {
        let txns = vec![
            tx(1, "2025-03-05", TxnType::Income, "100", None),
            tx(2, "2025-03-20", TxnType::Income, "25", None),
            tx(3, "2025-12-31T23:59:59Z", TxnType::Expense, "60", None),
            tx(4, "2025-05-02", TxnType::Transfer, "900", None),
        ];
        let series = build_series(Granularity::Monthly { year: 2025 }, &txns);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].label, "January");
        assert_eq!(series[11].label, "December");
        assert_eq!(series[2].income, dec("125"));
        assert_eq!(series[11].expense, dec("60"));
        assert_eq!(series[4].income + series[4].expense, Decimal::ZERO);
    }

    #[test]
    fn out_of_range_transactions_are_dropped() {
        let txns = vec![
            tx(1, "2025-06-30", TxnType::Expense, "10", None),
            tx(2, "2025-07-02", TxnType::Expense, "5", None),
        ];
        let series = build_series(Granularity::Daily { year: 2025, month: 7 }, &txns);
        let total: Decimal = series.iter().map(|b| b.expense).sum();
        assert_eq!(total, dec("5"));
    }

    #[test]
    fn invalid_month_yields_no_buckets() {
        assert!(build_series(Granularity::Daily { year: 2025, month: 13 }, &[]).is_empty());
    }
}
