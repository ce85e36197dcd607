// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ParseKindError, Transaction, TxnType};
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetWorthPoint {
    pub date: DateTime<Utc>,
    pub cumulative_net_worth: Decimal,
}

/// Running net worth, one point per transaction.
///
/// Expects the owner's complete history in ascending date order and does
/// not re-sort. Transfers leave the running total unchanged.
pub fn net_worth_trend(txns: &[Transaction]) -> Vec<NetWorthPoint> {
    txns.iter()
        .scan(Decimal::ZERO, |running, t| {
            match t.r#type {
                TxnType::Income => *running = running.saturating_add(t.amount),
                TxnType::Expense => *running = running.saturating_sub(t.amount),
                TxnType::Transfer => {}
            }
            Some(NetWorthPoint {
                date: t.date,
                cumulative_net_worth: *running,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    LastYear,
    LastFiveYears,
    AllTime,
}

impl Window {
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Window::LastYear => now.checked_sub_months(Months::new(12)),
            Window::LastFiveYears => now.checked_sub_months(Months::new(60)),
            Window::AllTime => None,
        }
    }
}

impl FromStr for Window {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1y" => Ok(Window::LastYear),
            "5y" => Ok(Window::LastFiveYears),
            "all" => Ok(Window::AllTime),
            _ => Err(ParseKindError {
                kind: "range",
                value: s.to_string(),
            }),
        }
    }
}

/// Keep the points inside `window`. Run this on the finished series from
/// [`net_worth_trend`], never on its input: dropping older transactions
/// first would restart the running total from zero.
pub fn trailing_window(
    points: Vec<NetWorthPoint>,
    window: Window,
    now: DateTime<Utc>,
) -> Vec<NetWorthPoint> {
    match window.cutoff(now) {
        Some(cutoff) => points.into_iter().filter(|p| p.date >= cutoff).collect(),
        None => points,
    }
}
