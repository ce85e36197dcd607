// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result as StoreResult};
use crate::owner::Owner;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

const DEFAULT_CURRENCY: &str = "USD";

/// `YYYY-MM-DD` is read as midnight UTC; anything else must be RFC 3339.
pub fn instant_from_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(start_of_day(d));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    NaiveDate::from_ymd_opt(y, 1, 1).with_context(|| format!("Year {} out of range", y))?;
    Ok(y)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))
}

pub fn next_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MAX)
}

pub fn prev_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MIN)
}

/// Half-open `[start, end)` instants covering the month that starts at `first`.
pub fn month_bounds(first: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (start_of_day(first), start_of_day(next_month(first)))
}

pub fn year_bounds(year: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let next = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(NaiveDate::MAX);
    (start_of_day(first), start_of_day(next))
}

pub fn days_in_month(first: NaiveDate) -> u32 {
    (next_month(first) - first).num_days() as u32
}

/// Amounts are stored as decimal text to avoid float drift.
pub fn decimal_col(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_account(conn: &Connection, owner: &Owner, name: &str) -> StoreResult<i64> {
    conn.query_row(
        "SELECT id FROM accounts WHERE user_id=?1 AND name=?2 COLLATE NOCASE",
        params![owner, name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| Error::not_found("Account", name))
}

// Display currency, per owner
pub fn get_currency(conn: &Connection, owner: &Owner) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE user_id=?1 AND key='currency'",
            params![owner],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, owner: &Owner, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(user_id, key, value) VALUES(?1, 'currency', ?2)
         ON CONFLICT(user_id, key) DO UPDATE SET value=excluded.value",
        params![owner, ccy],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
