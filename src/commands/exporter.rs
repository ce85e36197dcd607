// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::owner::Owner;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub
                .get_one::<String>("format")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| "csv".into());
            let out = sub.get_one::<String>("out").map(String::as_str).unwrap_or("");
            let n = export_transactions(conn, owner, &fmt, out)?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

type ExportRow = (
    DateTime<Utc>,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Write the owner's transactions, oldest first, as `csv` or `json`.
/// Returns the number of rows written.
pub fn export_transactions(conn: &Connection, owner: &Owner, fmt: &str, out: &str) -> Result<usize> {
    let mut stmt = conn.prepare(
        "SELECT t.date, t.type, t.amount, c.name as category, a.name as account, t.description
         FROM transactions t
         LEFT JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1
         ORDER BY t.date, t.id",
    )?;
    let rows: Vec<ExportRow> = stmt
        .query_map(params![owner], |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "amount", "category", "account", "description"])?;
            for (d, kind, amt, cat, acct, desc) in &rows {
                wtr.write_record([
                    d.to_rfc3339().as_str(),
                    kind.as_str(),
                    amt.as_str(),
                    cat.as_deref().unwrap_or_default(),
                    acct.as_deref().unwrap_or_default(),
                    desc.as_deref().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|(d, kind, amt, cat, acct, desc)| {
                    json!({
                        "date": d.to_rfc3339(), "type": kind, "amount": amt,
                        "category": cat, "account": acct, "description": desc
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(user = %owner, rows = rows.len(), out, "transactions exported");
    Ok(rows.len())
}
