// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::categories;
use crate::error::{Error, Result as StoreResult};
use crate::models::{Budget, CategoryType};
use crate::owner::Owner;
use crate::utils::{decimal_col, maybe_print_json, parse_month, pretty_table};
use crate::validation::{FieldErrors, NewBudget, NewBudgetInput};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set_cmd(conn, owner, sub)?,
        Some(("update", sub)) => {
            let input = input_from(sub);
            let b = input.validate().map_err(Error::from)?;
            update_amount(conn, owner, &b)?;
            println!(
                "Budget for {} / {} updated to {}",
                b.period_start.format("%Y-%m"),
                b.category,
                b.amount
            );
        }
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("month").map(String::as_str).unwrap_or("");
            let month = parse_month(raw)?;
            let cat = sub.get_one::<String>("category").map(String::as_str).unwrap_or("");
            delete(conn, owner, cat, month)?;
            println!("Removed budget for {} / {}", month.format("%Y-%m"), cat.trim());
        }
        Some(("list", sub)) => list_cmd(conn, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn input_from(sub: &clap::ArgMatches) -> NewBudgetInput {
    NewBudgetInput {
        category: sub.get_one::<String>("category").cloned().unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        month: sub.get_one::<String>("month").cloned().unwrap_or_default(),
    }
}

fn set_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let b = input_from(sub).validate().map_err(Error::from)?;
    set(conn, owner, &b)?;
    println!(
        "Budget set for {} / {} = {}",
        b.period_start.format("%Y-%m"),
        b.category,
        b.amount
    );
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetRow {
    pub month: String,
    pub category: String,
    pub amount: Decimal,
}

fn budget_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<BudgetRow> {
    let start: NaiveDate = r.get(0)?;
    Ok(BudgetRow {
        month: start.format("%Y-%m").to_string(),
        category: r.get(1)?,
        amount: decimal_col(r, 2)?,
    })
}

fn list_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let mut sql = String::from(
        "SELECT b.period_start, c.name, b.amount FROM budgets b JOIN categories c ON b.category_id=c.id WHERE b.user_id=?1",
    );
    if month.is_some() {
        sql.push_str(" AND b.period_start=?2");
    }
    sql.push_str(" ORDER BY b.period_start DESC, c.name COLLATE NOCASE");
    let mut stmt = conn.prepare(&sql)?;
    let rows = match month {
        Some(m) => stmt
            .query_map(params![owner, m], budget_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        None => stmt
            .query_map(params![owner], budget_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.month, r.category, format!("{:.2}", r.amount)])
            .collect();
        println!("{}", pretty_table(&["Month", "Category", "Budget"], data));
    }
    Ok(())
}

fn expense_category_id(conn: &Connection, owner: &Owner, name: &str) -> StoreResult<i64> {
    match categories::find_by_name(conn, owner, name, Some(CategoryType::Expense)) {
        Ok(c) => Ok(c.id),
        Err(Error::NotFound { .. }) => Err(Error::Validation(FieldErrors::single(
            "category",
            format!("no expense category named '{}'", name),
        ))),
        Err(e) => Err(e),
    }
}

/// Create a budget. A second budget for the same category and month is a
/// `Duplicate`; use [`update_amount`] to change it.
pub fn set(conn: &Connection, owner: &Owner, b: &NewBudget) -> StoreResult<i64> {
    let category_id = expense_category_id(conn, owner, &b.category)?;
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, amount, period_start) VALUES (?1, ?2, ?3, ?4)",
        params![owner, category_id, b.amount.to_string(), b.period_start],
    )
    .map_err(|e| {
        Error::from_unique(
            e,
            "Budget",
            &format!("{} {}", b.category, b.period_start.format("%Y-%m")),
        )
    })?;
    let id = conn.last_insert_rowid();
    tracing::info!(user = %owner, id, category_id, period = %b.period_start, amount = %b.amount, "budget set");
    Ok(id)
}

pub fn update_amount(conn: &Connection, owner: &Owner, b: &NewBudget) -> StoreResult<()> {
    let category_id = expense_category_id(conn, owner, &b.category)?;
    let n = conn.execute(
        "UPDATE budgets SET amount=?1 WHERE user_id=?2 AND category_id=?3 AND period_start=?4",
        params![b.amount.to_string(), owner, category_id, b.period_start],
    )?;
    if n == 0 {
        return Err(Error::not_found(
            "Budget",
            format!("{} {}", b.category, b.period_start.format("%Y-%m")),
        ));
    }
    tracing::info!(user = %owner, category_id, period = %b.period_start, amount = %b.amount, "budget updated");
    Ok(())
}

pub fn delete(conn: &Connection, owner: &Owner, category: &str, period_start: NaiveDate) -> StoreResult<()> {
    let category_id = expense_category_id(conn, owner, category.trim())?;
    let n = conn.execute(
        "DELETE FROM budgets WHERE user_id=?1 AND category_id=?2 AND period_start=?3",
        params![owner, category_id, period_start],
    )?;
    if n == 0 {
        return Err(Error::not_found(
            "Budget",
            format!("{} {}", category.trim(), period_start.format("%Y-%m")),
        ));
    }
    tracing::info!(user = %owner, category_id, period = %period_start, "budget deleted");
    Ok(())
}

pub fn list_for_period(conn: &Connection, owner: &Owner, period_start: NaiveDate) -> StoreResult<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, amount, period_start FROM budgets
         WHERE user_id=?1 AND period_start=?2 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![owner, period_start], |r| {
        Ok(Budget {
            id: r.get(0)?,
            category_id: r.get(1)?,
            amount: decimal_col(r, 2)?,
            period_start: r.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
