// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetboard::commands::{accounts, categories, transactions};
use budgetboard::error::Error;
use budgetboard::owner::Owner;
use budgetboard::validation::{NewAccountInput, NewCategoryInput, NewTransactionInput};
use budgetboard::{cli, db};
use rusqlite::Connection;

fn input(date: &str, kind: &str, amount: &str, category: Option<&str>) -> NewTransactionInput {
    NewTransactionInput {
        date: date.into(),
        r#type: kind.into(),
        amount: amount.into(),
        category: category.map(Into::into),
        account: Some("Checking".into()),
        description: None,
    }
}

fn setup(owner: &Owner) -> Connection {
    let conn = db::open_in_memory().unwrap();
    seed(&conn, owner);
    conn
}

fn seed(conn: &Connection, owner: &Owner) {
    let acct = NewAccountInput {
        name: "Checking".into(),
        r#type: "checking".into(),
        balance: Some("100".into()),
    };
    accounts::create(conn, owner, &acct.validate().unwrap()).unwrap();
    let cat = NewCategoryInput {
        name: "Cat1".into(),
        r#type: "expense".into(),
    };
    categories::create(conn, owner, &cat.validate().unwrap()).unwrap();
    for i in 1..=3 {
        let tx = input(&format!("2025-01-0{}", i), "expense", "10", Some("Cat1"))
            .validate()
            .unwrap();
        transactions::create(conn, owner, &tx).unwrap();
    }
}

fn list_rows(conn: &Connection, owner: &Owner, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["budgetboard", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, owner, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

#[test]
fn list_limit_respected() {
    let owner = Owner::new("u1").unwrap();
    let conn = setup(&owner);
    let rows = list_rows(&conn, &owner, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].category, "Cat1");
    assert_eq!(rows[0].account, "Checking");
}

#[test]
fn list_filters_by_month_and_type() {
    let owner = Owner::new("u1").unwrap();
    let conn = setup(&owner);
    let pay = input("2025-02-01", "income", "2500", None).validate().unwrap();
    transactions::create(&conn, &owner, &pay).unwrap();

    assert_eq!(list_rows(&conn, &owner, &["--month", "2025-01"]).len(), 3);
    let income = list_rows(&conn, &owner, &["--type", "income"]);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].amount, "2500.00");
}

#[test]
fn owners_never_see_each_other() {
    let alice = Owner::new("alice").unwrap();
    let bob = Owner::new("bob").unwrap();
    let conn = setup(&alice);
    assert!(list_rows(&conn, &bob, &[]).is_empty());
    assert!(transactions::load_all(&conn, &bob).unwrap().is_empty());

    let id = transactions::load_all(&conn, &alice).unwrap()[0].id;
    assert!(matches!(
        transactions::delete(&conn, &bob, id),
        Err(Error::NotFound { .. })
    ));
    // Bob's lookups cannot reach Alice's category or account either.
    let tx = input("2025-01-05", "expense", "1", Some("Cat1")).validate().unwrap();
    match transactions::create(&conn, &bob, &tx).unwrap_err() {
        Error::Validation(f) => {
            assert!(f.get("category").is_some());
            assert!(f.get("account").is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn invalid_input_reports_every_field() {
    let bad = NewTransactionInput {
        date: "yesterday".into(),
        r#type: "gift".into(),
        amount: "-3.999".into(),
        category: None,
        account: None,
        description: Some("x".repeat(201)),
    };
    let errs = bad.validate().unwrap_err();
    for field in ["date", "type", "amount", "description"] {
        assert!(errs.get(field).is_some(), "missing error for {field}");
    }
}

#[test]
fn transfer_with_category_is_rejected() {
    let errs = input("2025-01-05", "transfer", "50", Some("Cat1"))
        .validate()
        .unwrap_err();
    assert!(errs.get("category").is_some());
}

#[test]
fn category_must_match_transaction_type() {
    let owner = Owner::new("u1").unwrap();
    let conn = setup(&owner);
    let tx = input("2025-01-05", "income", "5", Some("Cat1")).validate().unwrap();
    assert!(matches!(
        transactions::create(&conn, &owner, &tx),
        Err(Error::Validation(_))
    ));
}

#[test]
fn edit_moves_transaction_between_months() {
    let owner = Owner::new("u1").unwrap();
    let conn = setup(&owner);
    let id = transactions::load_all(&conn, &owner).unwrap()[0].id;
    let moved = input("2025-02-10", "expense", "42.10", Some("cat1"))
        .validate()
        .unwrap();
    transactions::update(&conn, &owner, id, &moved).unwrap();

    assert_eq!(list_rows(&conn, &owner, &["--month", "2025-01"]).len(), 2);
    let feb = list_rows(&conn, &owner, &["--month", "2025-02"]);
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].id, id);
    assert_eq!(feb[0].amount, "42.10");
}

#[test]
fn deleting_account_keeps_its_transactions() {
    let owner = Owner::new("u1").unwrap();
    let conn = setup(&owner);
    accounts::delete(&conn, &owner, "checking").unwrap();
    let rows = list_rows(&conn, &owner, &[]);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.account.is_empty()));
}
