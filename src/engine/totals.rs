// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::percent_of;
use crate::models::{Transaction, TxnType};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl PeriodTotals {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

/// Sum income and expense amounts. Transfers count toward neither.
pub fn period_totals(txns: &[Transaction]) -> PeriodTotals {
    txns.iter()
        .fold(PeriodTotals::default(), |mut acc, t| {
            match t.r#type {
                TxnType::Income => acc.income = acc.income.saturating_add(t.amount),
                TxnType::Expense => acc.expense = acc.expense.saturating_add(t.amount),
                TxnType::Transfer => {}
            }
            acc
        })
}

/// Period-over-period change of a metric.
///
/// `NoBaseline` means the previous period was empty but the current one is
/// not. It is never shown as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PercentChange {
    Percent(Decimal),
    NoBaseline,
}

impl PercentChange {
    /// `NoBaseline` maps to positive infinity.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Percent(p) => p.to_f64().unwrap_or(0.0),
            Self::NoBaseline => f64::INFINITY,
        }
    }

    pub fn is_no_baseline(&self) -> bool {
        matches!(self, Self::NoBaseline)
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) if p.is_sign_positive() && !p.is_zero() => {
                write!(f, "+{:.1}%", p.round_dp(1))
            }
            Self::Percent(p) => write!(f, "{:.1}%", p.round_dp(1)),
            Self::NoBaseline => f.write_str("no data last period"),
        }
    }
}

pub fn percentage_change(current: Decimal, previous: Decimal) -> PercentChange {
    if previous > Decimal::ZERO {
        PercentChange::Percent(percent_of(current.saturating_sub(previous), previous))
    } else if current > Decimal::ZERO {
        PercentChange::NoBaseline
    } else {
        PercentChange::Percent(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub income_change: PercentChange,
    pub expense_change: PercentChange,
    pub net_change: PercentChange,
}

pub fn compare_periods(current: PeriodTotals, previous: PeriodTotals) -> PeriodComparison {
    PeriodComparison {
        current,
        previous,
        income_change: percentage_change(current.income, previous.income),
        expense_change: percentage_change(current.expense, previous.expense),
        net_change: percentage_change(current.net(), previous.net()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{dec, tx};

    #[test]
    fn transfers_are_ignored() {
        let txns = vec![
            tx(1, "2025-06-01", TxnType::Income, "3000", None),
            tx(2, "2025-06-02", TxnType::Expense, "120.50", Some(1)),
            tx(3, "2025-06-03", TxnType::Transfer, "500", None),
            tx(4, "2025-06-04", TxnType::Expense, "79.50", None),
        ];
        let totals = period_totals(&txns);
        assert_eq!(totals.income, dec("3000"));
        assert_eq!(totals.expense, dec("200"));
        assert_eq!(totals.net(), dec("2800"));
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(period_totals(&[]), PeriodTotals::default());
    }

    #[test]
    fn percentage_change_three_cases() {
        assert_eq!(
            percentage_change(Decimal::ZERO, Decimal::ZERO),
            PercentChange::Percent(Decimal::ZERO)
        );
        assert_eq!(percentage_change(dec("50"), Decimal::ZERO), PercentChange::NoBaseline);
        assert_eq!(percentage_change(dec("50"), Decimal::ZERO).as_f64(), f64::INFINITY);
        assert_eq!(
            percentage_change(dec("150"), dec("100")),
            PercentChange::Percent(dec("50"))
        );
        assert_eq!(
            percentage_change(dec("75"), dec("100")),
            PercentChange::Percent(dec("-25"))
        );
    }

    #[test]
    fn tiny_baseline_saturates_instead_of_overflowing() {
        let change = percentage_change(dec("10000000000000000000000000"), dec("0.01"));
        assert_eq!(change, PercentChange::Percent(Decimal::MAX));
        assert!(change.as_f64() > 0.0);

        let txns = vec![
            tx(1, "2025-06-01", TxnType::Income, "79228162514264337593543950335", None),
            tx(2, "2025-06-02", TxnType::Income, "1", None),
        ];
        assert_eq!(period_totals(&txns).income, Decimal::MAX);
    }

    #[test]
    fn negative_previous_has_no_baseline() {
        // A month with net loss followed by a positive month.
        assert!(percentage_change(dec("10"), dec("-40")).is_no_baseline());
        assert_eq!(
            percentage_change(dec("-10"), dec("-40")),
            PercentChange::Percent(Decimal::ZERO)
        );
    }

    #[test]
    fn change_renders_without_numeric_infinity() {
        assert_eq!(PercentChange::NoBaseline.to_string(), "no data last period");
        assert_eq!(PercentChange::Percent(dec("12.345")).to_string(), "+12.3%");
        assert_eq!(PercentChange::Percent(dec("-4")).to_string(), "-4.0%");
    }

    #[test]
    fn compare_periods_reports_each_metric() {
        let cur = PeriodTotals {
            income: dec("2000"),
            expense: dec("1500"),
        };
        let prev = PeriodTotals {
            income: Decimal::ZERO,
            expense: dec("1000"),
        };
        let cmp = compare_periods(cur, prev);
        assert!(cmp.income_change.is_no_baseline());
        assert_eq!(cmp.expense_change, PercentChange::Percent(dec("50")));
        assert!(cmp.net_change.is_no_baseline());
    }
}
