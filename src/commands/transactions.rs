// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::categories;
use crate::error::{Error, Result as StoreResult};
use crate::models::{Transaction, TxnType};
use crate::owner::Owner;
use crate::utils::{
    decimal_col, id_for_account, maybe_print_json, month_bounds, parse_month, pretty_table,
};
use crate::validation::{FieldErrors, NewTransaction, NewTransactionInput};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ToSql, params};
use serde::Serialize;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, owner, sub)?,
        Some(("edit", sub)) => edit(conn, owner, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            delete(conn, owner, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("list", sub)) => list(conn, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn input_from(sub: &clap::ArgMatches) -> NewTransactionInput {
    NewTransactionInput {
        date: sub.get_one::<String>("date").cloned().unwrap_or_default(),
        r#type: sub.get_one::<String>("type").cloned().unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        category: sub.get_one::<String>("category").cloned(),
        account: sub.get_one::<String>("account").cloned(),
        description: sub.get_one::<String>("description").cloned(),
    }
}

fn add(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let tx = input_from(sub).validate().map_err(Error::from)?;
    let id = create(conn, owner, &tx)?;
    println!(
        "Recorded {} {} on {} (id {})",
        tx.r#type,
        tx.amount,
        tx.date.format("%Y-%m-%d"),
        id
    );
    Ok(())
}

fn edit(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let tx = input_from(sub).validate().map_err(Error::from)?;
    update(conn, owner, id, &tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, owner, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Account", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

/// Resolve category and account names against the owner's rows.
fn resolve_refs(
    conn: &Connection,
    owner: &Owner,
    tx: &NewTransaction,
) -> StoreResult<(Option<i64>, Option<i64>)> {
    let mut errs = FieldErrors::new();

    let category_id = match (&tx.category, tx.r#type.category_type()) {
        (Some(name), Some(kind)) => match categories::find_by_name(conn, owner, name, Some(kind)) {
            Ok(c) => Some(c.id),
            Err(Error::NotFound { .. }) => {
                errs.push("category", format!("no {} category named '{}'", kind, name));
                None
            }
            Err(e) => return Err(e),
        },
        _ => None,
    };

    let account_id = match &tx.account {
        Some(name) => match id_for_account(conn, owner, name) {
            Ok(id) => Some(id),
            Err(Error::NotFound { .. }) => {
                errs.push("account", format!("no account named '{}'", name));
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    if !errs.is_empty() {
        return Err(Error::Validation(errs));
    }
    Ok((category_id, account_id))
}

pub fn create(conn: &Connection, owner: &Owner, tx: &NewTransaction) -> StoreResult<i64> {
    let (category_id, account_id) = resolve_refs(conn, owner, tx)?;
    conn.execute(
        "INSERT INTO transactions(user_id, date, type, amount, category_id, account_id, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            owner,
            tx.date,
            tx.r#type,
            tx.amount.to_string(),
            category_id,
            account_id,
            tx.description
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user = %owner, id, kind = %tx.r#type, amount = %tx.amount, "transaction recorded");
    Ok(id)
}

pub fn update(conn: &Connection, owner: &Owner, id: i64, tx: &NewTransaction) -> StoreResult<()> {
    let (category_id, account_id) = resolve_refs(conn, owner, tx)?;
    let n = conn.execute(
        "UPDATE transactions SET date=?1, type=?2, amount=?3, category_id=?4, account_id=?5, description=?6
         WHERE user_id=?7 AND id=?8",
        params![
            tx.date,
            tx.r#type,
            tx.amount.to_string(),
            category_id,
            account_id,
            tx.description,
            owner,
            id
        ],
    )?;
    if n == 0 {
        return Err(Error::not_found("Transaction", id));
    }
    tracing::info!(user = %owner, id, "transaction updated");
    Ok(())
}

pub fn delete(conn: &Connection, owner: &Owner, id: i64) -> StoreResult<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
        params![owner, id],
    )?;
    if n == 0 {
        return Err(Error::not_found("Transaction", id));
    }
    tracing::info!(user = %owner, id, "transaction deleted");
    Ok(())
}

fn row_to_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        r#type: r.get(2)?,
        amount: decimal_col(r, 3)?,
        category_id: r.get(4)?,
        account_id: r.get(5)?,
        description: r.get(6)?,
    })
}

const SELECT_TXN: &str =
    "SELECT id, date, type, amount, category_id, account_id, description FROM transactions";

/// Transactions in `[from, to)`, oldest first.
pub fn load_range(
    conn: &Connection,
    owner: &Owner,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE user_id=?1 AND date>=?2 AND date<?3 ORDER BY date, id",
        SELECT_TXN
    ))?;
    let rows = stmt.query_map(params![owner, from, to], row_to_transaction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// The owner's whole history, oldest first.
pub fn load_all(conn: &Connection, owner: &Owner) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE user_id=?1 ORDER BY date, id",
        SELECT_TXN
    ))?;
    let rows = stmt.query_map(params![owner], row_to_transaction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub account: String,
    pub description: String,
}

pub fn query_rows(
    conn: &Connection,
    owner: &Owner,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.type, t.amount, c.name, a.name, t.description FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id LEFT JOIN categories c ON t.category_id=c.id WHERE t.user_id=?",
    );
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(owner.clone())];

    if let Some(month) = sub.get_one::<String>("month") {
        let (from, to) = month_bounds(parse_month(month)?);
        sql.push_str(" AND t.date>=? AND t.date<?");
        params_vec.push(Box::new(from));
        params_vec.push(Box::new(to));
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        sql.push_str(" AND t.type=?");
        params_vec.push(Box::new(kind.parse::<TxnType>()?));
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=? COLLATE NOCASE");
        params_vec.push(Box::new(cat.trim().to_string()));
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=? COLLATE NOCASE");
        params_vec.push(Box::new(acct.trim().to_string()));
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(*limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut rows = stmt.query(refs.as_slice())?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: DateTime<Utc> = r.get(1)?;
        let kind: TxnType = r.get(2)?;
        let category: Option<String> = r.get(4)?;
        let account: Option<String> = r.get(5)?;
        let description: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: date.format("%Y-%m-%d").to_string(),
            r#type: kind.to_string(),
            amount: format!("{:.2}", decimal_col(r, 3)?),
            category: category.unwrap_or_default(),
            account: account.unwrap_or_default(),
            description: description.unwrap_or_default(),
        });
    }
    Ok(data)
}
