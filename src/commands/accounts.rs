// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result as StoreResult};
use crate::models::Account;
use crate::owner::Owner;
use crate::utils::{decimal_col, get_currency, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use crate::validation::{NewAccount, NewAccountInput};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let input = NewAccountInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                r#type: sub.get_one::<String>("type").cloned().unwrap_or_default(),
                balance: sub.get_one::<String>("balance").cloned(),
            };
            let acct = create(conn, owner, &input.validate().map_err(Error::from)?)?;
            println!(
                "Added account '{}' ({}, balance {})",
                acct.name, acct.r#type, acct.balance
            );
        }
        Some(("list", sub)) => {
            let accounts = list(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let ccy = get_currency(conn, owner)?;
                let total = accounts
                    .iter()
                    .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.balance));
                let mut data: Vec<Vec<String>> = accounts
                    .into_iter()
                    .map(|a| vec![a.name, a.r#type, format!("{:.2}", a.balance)])
                    .collect();
                data.push(vec!["Total".into(), String::new(), format!("{:.2}", total)]);
                let hdr = format!("Balance ({})", ccy);
                println!("{}", pretty_table(&["Name", "Type", &hdr], data));
            }
        }
        Some(("set-balance", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or("");
            let raw = sub.get_one::<String>("balance").map(String::as_str).unwrap_or("");
            let balance = parse_decimal(raw)?;
            set_balance(conn, owner, name, balance)?;
            println!("Balance of '{}' set to {}", name.trim(), balance);
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or("");
            let to = sub.get_one::<String>("to").map(String::as_str).unwrap_or("");
            rename(conn, owner, name, to)?;
            println!("Renamed account '{}' -> '{}'", name.trim(), to.trim());
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or("");
            delete(conn, owner, name)?;
            println!("Removed account '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}

pub fn create(conn: &Connection, owner: &Owner, acct: &NewAccount) -> StoreResult<Account> {
    conn.execute(
        "INSERT INTO accounts(user_id, name, type, balance) VALUES (?1, ?2, ?3, ?4)",
        params![owner, acct.name, acct.r#type, acct.balance.to_string()],
    )
    .map_err(|e| Error::from_unique(e, "Account", &acct.name))?;
    let id = conn.last_insert_rowid();
    tracing::info!(user = %owner, id, name = %acct.name, "account created");
    Ok(Account {
        id,
        name: acct.name.clone(),
        r#type: acct.r#type.clone(),
        balance: acct.balance,
    })
}

pub fn list(conn: &Connection, owner: &Owner) -> StoreResult<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, balance FROM accounts WHERE user_id=?1 ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(Account {
            id: r.get(0)?,
            name: r.get(1)?,
            r#type: r.get(2)?,
            balance: decimal_col(r, 3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Balances are kept by hand; recording transactions does not move them.
pub fn set_balance(conn: &Connection, owner: &Owner, name: &str, balance: Decimal) -> StoreResult<()> {
    let id = id_for_account(conn, owner, name.trim())?;
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE user_id=?2 AND id=?3",
        params![balance.to_string(), owner, id],
    )?;
    tracing::info!(user = %owner, id, %balance, "account balance set");
    Ok(())
}

pub fn rename(conn: &Connection, owner: &Owner, name: &str, to: &str) -> StoreResult<()> {
    let input = NewAccountInput {
        name: to.to_string(),
        r#type: "-".to_string(),
        balance: None,
    };
    let valid = input.validate()?;
    let id = id_for_account(conn, owner, name.trim())?;
    conn.execute(
        "UPDATE accounts SET name=?1 WHERE user_id=?2 AND id=?3",
        params![valid.name, owner, id],
    )
    .map_err(|e| Error::from_unique(e, "Account", &valid.name))?;
    tracing::info!(user = %owner, id, name = %valid.name, "account renamed");
    Ok(())
}

pub fn delete(conn: &Connection, owner: &Owner, name: &str) -> StoreResult<()> {
    let id = id_for_account(conn, owner, name.trim())?;
    conn.execute(
        "DELETE FROM accounts WHERE user_id=?1 AND id=?2",
        params![owner, id],
    )?;
    tracing::info!(user = %owner, id, "account deleted");
    Ok(())
}
