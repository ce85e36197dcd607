// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::owner::Owner;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};

/// Data problems the store should have prevented. Each entry is
/// `(issue, detail)`.
pub fn find_issues(conn: &Connection, owner: &Owner) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at a category that no longer exists
    let mut stmt = conn.prepare(
        "SELECT t.id, t.category_id FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.category_id IS NOT NULL AND c.id IS NULL
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query(params![owner])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cid: i64 = r.get(1)?;
        rows.push(("orphaned_category".into(), format!("tx {} -> category {}", id, cid)));
    }

    // 2) Category type disagrees with transaction type (or transfer carries one)
    let mut stmt2 = conn.prepare(
        "SELECT t.id, t.type, c.name, c.type FROM transactions t
         JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.type != c.type
         ORDER BY t.id",
    )?;
    let mut cur2 = stmt2.query(params![owner])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let tt: String = r.get(1)?;
        let name: String = r.get(2)?;
        let ct: String = r.get(3)?;
        rows.push((
            "type_mismatch".into(),
            format!("tx {} ({}) uses {} category '{}'", id, tt, ct, name),
        ));
    }

    // 3) Negative stored amounts
    let mut stmt3 = conn.prepare(
        "SELECT id, amount FROM transactions WHERE user_id=?1 AND CAST(amount AS REAL) < 0 ORDER BY id",
    )?;
    let mut cur3 = stmt3.query(params![owner])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let amt: String = r.get(1)?;
        rows.push(("negative_amount".into(), format!("tx {} amount {}", id, amt)));
    }

    // 4) Budgets whose period is not the first of a month
    let mut stmt4 =
        conn.prepare("SELECT id, period_start FROM budgets WHERE user_id=?1 ORDER BY id")?;
    let mut cur4 = stmt4.query(params![owner])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(1)?;
        let ok = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_ok_and(|d| d.day() == 1);
        if !ok {
            rows.push(("budget_period".into(), format!("budget {} period {}", id, raw)));
        }
    }

    // 5) Budgets on income categories
    let mut stmt5 = conn.prepare(
        "SELECT b.id, c.name FROM budgets b JOIN categories c ON b.category_id=c.id
         WHERE b.user_id=?1 AND c.type != 'expense' ORDER BY b.id",
    )?;
    let mut cur5 = stmt5.query(params![owner])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push((
            "budget_category".into(),
            format!("budget {} targets income category '{}'", id, name),
        ));
    }

    Ok(rows)
}

pub fn handle(conn: &Connection, owner: &Owner) -> Result<()> {
    let issues = find_issues(conn, owner)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(user = %owner, count = issues.len(), "doctor found issues");
        let rows = issues.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
