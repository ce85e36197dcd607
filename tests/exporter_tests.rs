// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetboard::commands::{accounts, categories, exporter, transactions};
use budgetboard::db;
use budgetboard::owner::Owner;
use budgetboard::validation::{NewAccountInput, NewCategoryInput, NewTransactionInput};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn seeded() -> (Connection, Owner) {
    let conn = db::open_in_memory().unwrap();
    let owner = Owner::new("u1").unwrap();
    let acct = NewAccountInput {
        name: "Checking".into(),
        r#type: "checking".into(),
        balance: None,
    };
    accounts::create(&conn, &owner, &acct.validate().unwrap()).unwrap();
    let cat = NewCategoryInput {
        name: "Groceries".into(),
        r#type: "expense".into(),
    };
    categories::create(&conn, &owner, &cat.validate().unwrap()).unwrap();
    let tx = NewTransactionInput {
        date: "2025-01-02".into(),
        r#type: "expense".into(),
        amount: "12.34".into(),
        category: Some("Groceries".into()),
        account: Some("Checking".into()),
        description: Some("Weekly run".into()),
    };
    transactions::create(&conn, &owner, &tx.validate().unwrap()).unwrap();

    // Someone else's row must never be exported.
    let other = Owner::new("u2").unwrap();
    let tx = NewTransactionInput {
        date: "2025-01-03".into(),
        r#type: "income".into(),
        amount: "1".into(),
        ..Default::default()
    };
    transactions::create(&conn, &other, &tx.validate().unwrap()).unwrap();
    (conn, owner)
}

#[test]
fn export_transactions_writes_pretty_json() {
    let (conn, owner) = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    let n = exporter::export_transactions(&conn, &owner, "json", out.to_str().unwrap()).unwrap();
    assert_eq!(n, 1);

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("\n  {"), "expected pretty output: {text}");
    let v: Value = serde_json::from_str(&text).unwrap();
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "expense");
    assert_eq!(rows[0]["amount"], "12.34");
    assert_eq!(rows[0]["category"], "Groceries");
    assert_eq!(rows[0]["account"], "Checking");
    assert_eq!(rows[0]["description"], "Weekly run");
    assert!(rows[0]["date"].as_str().unwrap().starts_with("2025-01-02T00:00:00"));
}

#[test]
fn export_transactions_writes_csv_with_header() {
    let (conn, owner) = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    exporter::export_transactions(&conn, &owner, "csv", out.to_str().unwrap())
        .unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["date", "type", "amount", "category", "account", "description"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][2], "12.34");
    assert_eq!(&records[0][5], "Weekly run");
}

#[test]
fn unknown_format_is_an_error() {
    let (conn, owner) = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.xml");
    assert!(exporter::export_transactions(&conn, &owner, "xml", out.to_str().unwrap()).is_err());
}
