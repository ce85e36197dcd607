// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{budgets, categories, transactions};
use crate::engine::{
    self, BudgetStatus, CategoryTotal, Granularity, NetWorthPoint, PeriodComparison,
    SeriesBucket, UNCATEGORIZED, Window,
};
use crate::icons::icon_for;
use crate::models::{Transaction, TxnType};
use crate::owner::Owner;
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, month_bounds, parse_month, parse_year, pretty_table,
    prev_month, year_bounds,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

const TOP_CATEGORIES: usize = 5;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard_cmd(conn, owner, sub)?,
        Some(("budgets", sub)) => budgets_cmd(conn, owner, sub)?,
        Some(("series", sub)) => series_cmd(conn, owner, sub)?,
        Some(("net-worth", sub)) => net_worth_cmd(conn, owner, sub)?,
        Some(("categories", sub)) => categories_cmd(conn, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => {
            let today = Utc::now().date_naive();
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .context("Could not determine the current month")
        }
    }
}

fn expenses(txns: Vec<Transaction>) -> Vec<Transaction> {
    txns.into_iter()
        .filter(|t| t.r#type == TxnType::Expense)
        .collect()
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub month: String,
    #[serde(flatten)]
    pub comparison: PeriodComparison,
    pub net: Decimal,
    pub over_budget: usize,
    pub top_categories: Vec<CategoryTotal>,
}

/// Month totals against the previous month, plus the biggest spending
/// categories and how many budgets are exceeded.
pub fn dashboard(conn: &Connection, owner: &Owner, month: NaiveDate) -> Result<Dashboard> {
    let (from, to) = month_bounds(month);
    let (prev_from, prev_to) = month_bounds(prev_month(month));
    let current = transactions::load_range(conn, owner, from, to)?;
    let previous = transactions::load_range(conn, owner, prev_from, prev_to)?;

    let comparison =
        engine::compare_periods(engine::period_totals(&current), engine::period_totals(&previous));
    let cats = categories::list(conn, owner)?;
    let spend = expenses(current);
    let mut top = engine::category_breakdown(&spend, &cats);
    top.truncate(TOP_CATEGORIES);
    let statuses = engine::budget_statuses(&budgets::list_for_period(conn, owner, month)?, &spend);

    Ok(Dashboard {
        month: month.format("%Y-%m").to_string(),
        net: comparison.current.net(),
        comparison,
        over_budget: statuses.iter().filter(|s| s.is_over_budget()).count(),
        top_categories: top,
    })
}

fn dashboard_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let d = dashboard(conn, owner, month_arg(sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
        return Ok(());
    }
    let ccy = get_currency(conn, owner)?;
    let c = &d.comparison;
    let data = vec![
        vec![
            "Income".to_string(),
            format!("{:.2}", c.current.income),
            format!("{:.2}", c.previous.income),
            c.income_change.to_string(),
        ],
        vec![
            "Expense".to_string(),
            format!("{:.2}", c.current.expense),
            format!("{:.2}", c.previous.expense),
            c.expense_change.to_string(),
        ],
        vec![
            "Net".to_string(),
            format!("{:.2}", c.current.net()),
            format!("{:.2}", c.previous.net()),
            c.net_change.to_string(),
        ],
    ];
    println!("Dashboard for {} ({})", d.month, ccy);
    println!(
        "{}",
        pretty_table(&["Metric", "This month", "Last month", "Change"], data)
    );
    if !d.top_categories.is_empty() {
        let rows = d
            .top_categories
            .iter()
            .map(|t| {
                vec![
                    icon_for(&t.category).to_string(),
                    t.category.clone(),
                    format!("{:.2}", t.total),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["", "Top spending", "Total"], rows));
    }
    println!("Net this month: {}", fmt_money(&d.net, &ccy));
    if d.over_budget > 0 {
        println!("{} budget(s) over limit", d.over_budget);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub icon: &'static str,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

/// Budget consumption for `month`, most over-budget first.
pub fn budget_report(conn: &Connection, owner: &Owner, month: NaiveDate) -> Result<Vec<BudgetLine>> {
    let (from, to) = month_bounds(month);
    let spend = expenses(transactions::load_range(conn, owner, from, to)?);
    let budgets = budgets::list_for_period(conn, owner, month)?;
    let names: HashMap<i64, String> = categories::list(conn, owner)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(engine::budget_statuses(&budgets, &spend)
        .into_iter()
        .map(|status| {
            let category = names
                .get(&status.category_id)
                .cloned()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            BudgetLine {
                icon: icon_for(&category),
                category,
                status,
            }
        })
        .collect())
}

fn budgets_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let lines = budget_report(conn, owner, month_arg(sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        return Ok(());
    }
    let data = lines
        .iter()
        .map(|l| {
            vec![
                l.icon.to_string(),
                l.category.clone(),
                format!("{:.2}", l.status.budgeted),
                format!("{:.2}", l.status.spent),
                format!("{:.2}", l.status.remaining),
                format!("{:.1}%", l.status.progress_pct.round_dp(1)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["", "Category", "Budget", "Spent", "Remaining", "Used"],
            data
        )
    );
    Ok(())
}

/// Gap-filled income/expense series for a month (daily) or a year (monthly).
pub fn series(conn: &Connection, owner: &Owner, granularity: Granularity) -> Result<Vec<SeriesBucket>> {
    let (from, to) = match granularity {
        Granularity::Daily { year, month } => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)
                .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
            month_bounds(first)
        }
        Granularity::Monthly { year } => year_bounds(year),
    };
    let txns = transactions::load_range(conn, owner, from, to)?;
    Ok(engine::build_series(granularity, &txns))
}

fn series_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let granularity = match sub.get_one::<String>("year") {
        Some(y) => Granularity::Monthly {
            year: parse_year(y)?,
        },
        None => {
            let first = month_arg(sub)?;
            Granularity::Daily {
                year: first.year(),
                month: first.month(),
            }
        }
    };
    let buckets = series(conn, owner, granularity)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    let data = buckets
        .iter()
        .map(|b| {
            vec![
                b.label.clone(),
                format!("{:.2}", b.income),
                format!("{:.2}", b.expense),
            ]
        })
        .collect();
    let first = if matches!(granularity, Granularity::Daily { .. }) {
        "Day"
    } else {
        "Month"
    };
    println!("{}", pretty_table(&[first, "Income", "Expense"], data));
    Ok(())
}

/// Net worth trend over `window`, computed from the full history first.
pub fn net_worth(
    conn: &Connection,
    owner: &Owner,
    window: Window,
    now: DateTime<Utc>,
) -> Result<Vec<NetWorthPoint>> {
    let history = transactions::load_all(conn, owner)?;
    let points = engine::net_worth_trend(&history);
    Ok(engine::trailing_window(points, window, now))
}

fn net_worth_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let window = sub
        .get_one::<String>("range")
        .map(String::as_str)
        .unwrap_or("1y")
        .parse::<Window>()?;
    let points = net_worth(conn, owner, window, Utc::now())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        return Ok(());
    }
    let data = points
        .iter()
        .map(|p| {
            vec![
                p.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", p.cumulative_net_worth),
            ]
        })
        .collect();
    let hdr = format!("Net worth ({})", get_currency(conn, owner)?);
    println!("{}", pretty_table(&["Date", &hdr], data));
    Ok(())
}

pub fn category_report(conn: &Connection, owner: &Owner, month: NaiveDate) -> Result<Vec<CategoryTotal>> {
    let (from, to) = month_bounds(month);
    let spend = expenses(transactions::load_range(conn, owner, from, to)?);
    let cats = categories::list(conn, owner)?;
    Ok(engine::category_breakdown(&spend, &cats))
}

fn categories_cmd(conn: &Connection, owner: &Owner, sub: &clap::ArgMatches) -> Result<()> {
    let totals = category_report(conn, owner, month_arg(sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        return Ok(());
    }
    let sum = totals
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.total));
    let data = totals
        .iter()
        .map(|t| {
            let share = if sum.is_zero() {
                Decimal::ZERO
            } else {
                engine::percent_of(t.total, sum)
            };
            vec![
                icon_for(&t.category).to_string(),
                t.category.clone(),
                format!("{:.2}", t.total),
                format!("{:.1}%", share.round_dp(1)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["", "Category", "Spent", "Share"], data));
    Ok(())
}
