// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result as StoreResult};
use crate::icons::icon_for;
use crate::models::{Category, CategoryType};
use crate::owner::Owner;
use crate::utils::{maybe_print_json, pretty_table};
use crate::validation::{FieldErrors, NewCategory, NewCategoryInput};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let input = NewCategoryInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                r#type: sub.get_one::<String>("type").cloned().unwrap_or_default(),
            };
            let cat = create(conn, owner, &input.validate().map_err(Error::from)?)?;
            println!("Added {} category '{}'", cat.r#type, cat.name);
        }
        Some(("list", sub)) => {
            let cats = list(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let mut data = Vec::new();
                for c in &cats {
                    let used = usage_count(conn, owner, c.id)?;
                    data.push(vec![
                        icon_for(&c.name).to_string(),
                        c.name.clone(),
                        c.r#type.to_string(),
                        used.to_string(),
                    ]);
                }
                println!(
                    "{}",
                    pretty_table(&["", "Category", "Type", "Transactions"], data)
                );
            }
        }
        Some(("edit", sub)) => {
            let current = find_by_name(
                conn,
                owner,
                sub.get_one::<String>("name").map(String::as_str).unwrap_or(""),
                type_arg(sub)?,
            )?;
            let input = NewCategoryInput {
                name: sub
                    .get_one::<String>("new_name")
                    .cloned()
                    .unwrap_or_else(|| current.name.clone()),
                r#type: sub
                    .get_one::<String>("new_type")
                    .cloned()
                    .unwrap_or_else(|| current.r#type.to_string()),
            };
            let updated = update(conn, owner, current.id, &input.validate().map_err(Error::from)?)?;
            println!("Updated category '{}' -> '{}' ({})", current.name, updated.name, updated.r#type);
        }
        Some(("rm", sub)) => {
            let cat = find_by_name(
                conn,
                owner,
                sub.get_one::<String>("name").map(String::as_str).unwrap_or(""),
                type_arg(sub)?,
            )?;
            delete(conn, owner, cat.id)?;
            println!("Removed category '{}'", cat.name);
        }
        _ => {}
    }
    Ok(())
}

fn type_arg(sub: &clap::ArgMatches) -> Result<Option<CategoryType>> {
    Ok(match sub.get_one::<String>("type") {
        Some(t) => Some(t.parse::<CategoryType>()?),
        None => None,
    })
}

fn row_to_category(r: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
    })
}

pub fn create(conn: &Connection, owner: &Owner, cat: &NewCategory) -> StoreResult<Category> {
    conn.execute(
        "INSERT INTO categories(user_id, name, type) VALUES (?1, ?2, ?3)",
        params![owner, cat.name, cat.r#type],
    )
    .map_err(|e| Error::from_unique(e, "Category", &cat.name))?;
    let id = conn.last_insert_rowid();
    tracing::info!(user = %owner, id, name = %cat.name, kind = %cat.r#type, "category created");
    Ok(Category {
        id,
        name: cat.name.clone(),
        r#type: cat.r#type,
    })
}

pub fn list(conn: &Connection, owner: &Owner) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type FROM categories WHERE user_id=?1 ORDER BY type, name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![owner], row_to_category)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get(conn: &Connection, owner: &Owner, id: i64) -> StoreResult<Category> {
    conn.query_row(
        "SELECT id, name, type FROM categories WHERE user_id=?1 AND id=?2",
        params![owner, id],
        row_to_category,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("Category", id))
}

/// Case-insensitive lookup. Without a type, a name that exists as both an
/// income and an expense category is rejected as ambiguous.
pub fn find_by_name(
    conn: &Connection,
    owner: &Owner,
    name: &str,
    r#type: Option<CategoryType>,
) -> StoreResult<Category> {
    let name = name.trim();
    let mut stmt = conn.prepare(
        "SELECT id, name, type FROM categories
         WHERE user_id=?1 AND name=?2 COLLATE NOCASE AND (?3 IS NULL OR type=?3)
         ORDER BY type",
    )?;
    let mut found = stmt
        .query_map(params![owner, name, r#type], row_to_category)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if found.len() > 1 {
        return Err(Error::Validation(FieldErrors::single(
            "type",
            format!("'{}' is both an income and an expense category; pass --type", name),
        )));
    }
    found.pop().ok_or_else(|| Error::not_found("Category", name))
}

pub fn usage_count(conn: &Connection, owner: &Owner, id: i64) -> StoreResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND category_id=?2",
        params![owner, id],
        |r| r.get(0),
    )?)
}

pub fn budget_count(conn: &Connection, owner: &Owner, id: i64) -> StoreResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM budgets WHERE user_id=?1 AND category_id=?2",
        params![owner, id],
        |r| r.get(0),
    )?)
}

/// Rename or retype a category. Refused while any transaction uses it,
/// except for a change in letter case only. Retyping is also refused while
/// budgets point at it.
pub fn update(conn: &Connection, owner: &Owner, id: i64, cat: &NewCategory) -> StoreResult<Category> {
    let current = get(conn, owner, id)?;
    let renamed = !current.name.eq_ignore_ascii_case(&cat.name);
    let retyped = current.r#type != cat.r#type;
    let used = usage_count(conn, owner, id)?;
    if used > 0 && (renamed || retyped) {
        return Err(Error::InUse {
            entity: "Category",
            name: current.name,
            count: used,
            action: "edited",
        });
    }
    let budgeted = if retyped { budget_count(conn, owner, id)? } else { 0 };
    if budgeted > 0 {
        return Err(Error::Validation(FieldErrors::single(
            "type",
            format!(
                "'{}' has {} budget(s); remove them before changing its type",
                current.name, budgeted
            ),
        )));
    }
    conn.execute(
        "UPDATE categories SET name=?1, type=?2 WHERE user_id=?3 AND id=?4",
        params![cat.name, cat.r#type, owner, id],
    )
    .map_err(|e| Error::from_unique(e, "Category", &cat.name))?;
    tracing::info!(user = %owner, id, name = %cat.name, "category updated");
    Ok(Category {
        id,
        name: cat.name.clone(),
        r#type: cat.r#type,
    })
}

pub fn delete(conn: &Connection, owner: &Owner, id: i64) -> StoreResult<()> {
    let current = get(conn, owner, id)?;
    let used = usage_count(conn, owner, id)?;
    if used > 0 {
        return Err(Error::InUse {
            entity: "Category",
            name: current.name,
            count: used,
            action: "deleted",
        });
    }
    conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND id=?2",
        params![owner, id],
    )?;
    tracing::info!(user = %owner, id, name = %current.name, "category deleted");
    Ok(())
}
