// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation engine.
//!
//! Pure functions from record snapshots to report view models. Nothing in
//! here touches the database, holds state between calls, or fails: empty
//! input produces zeroed or empty output.

pub mod breakdown;
pub mod budget;
pub mod net_worth;
pub mod series;
pub mod totals;

use rust_decimal::Decimal;

pub use breakdown::{CategoryTotal, UNCATEGORIZED, category_breakdown};
pub use budget::{BudgetStatus, budget_statuses, spend_by_category};
pub use net_worth::{NetWorthPoint, Window, net_worth_trend, trailing_window};
pub use series::{Granularity, SeriesBucket, build_series};
pub use totals::{
    PercentChange, PeriodComparison, PeriodTotals, compare_periods, percentage_change,
    period_totals,
};

/// `part / whole * 100`, saturating at the ends of the `Decimal` range
/// instead of overflowing. `whole` must be non-zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    let saturated = if part.is_sign_negative() == whole.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    };
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(saturated)
}
