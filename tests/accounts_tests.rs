// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetboard::commands::accounts;
use budgetboard::db;
use budgetboard::error::Error;
use budgetboard::owner::Owner;
use budgetboard::utils::{get_currency, set_currency};
use budgetboard::validation::NewAccountInput;
use rust_decimal::Decimal;
use std::str::FromStr;

fn new_account(name: &str, balance: Option<&str>) -> budgetboard::validation::NewAccount {
    NewAccountInput {
        name: name.into(),
        r#type: "checking".into(),
        balance: balance.map(Into::into),
    }
    .validate()
    .unwrap()
}

#[test]
fn balances_are_set_by_hand() {
    let conn = db::open_in_memory().unwrap();
    let owner = Owner::new("u1").unwrap();
    let acct = accounts::create(&conn, &owner, &new_account("Checking", None)).unwrap();
    assert_eq!(acct.balance, Decimal::ZERO);

    accounts::set_balance(&conn, &owner, "checking", Decimal::from_str("-42.50").unwrap()).unwrap();
    let listed = accounts::list(&conn, &owner).unwrap();
    assert_eq!(listed[0].balance, Decimal::from_str("-42.5").unwrap());
}

#[test]
fn rename_respects_uniqueness() {
    let conn = db::open_in_memory().unwrap();
    let owner = Owner::new("u1").unwrap();
    accounts::create(&conn, &owner, &new_account("Checking", Some("10"))).unwrap();
    accounts::create(&conn, &owner, &new_account("Savings", Some("20"))).unwrap();

    let err = accounts::rename(&conn, &owner, "Savings", "CHECKING").unwrap_err();
    assert!(matches!(err, Error::Duplicate { .. }), "got {err:?}");
    let err = accounts::rename(&conn, &owner, "Savings", "   ").unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");

    accounts::rename(&conn, &owner, "savings", "Rainy day").unwrap();
    let names: Vec<_> = accounts::list(&conn, &owner)
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Checking", "Rainy day"]);
}

#[test]
fn missing_account_is_not_found() {
    let conn = db::open_in_memory().unwrap();
    let owner = Owner::new("u1").unwrap();
    assert!(matches!(
        accounts::delete(&conn, &owner, "Nope"),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn currency_defaults_to_usd() {
    let conn = db::open_in_memory().unwrap();
    let owner = Owner::new("u1").unwrap();
    assert_eq!(get_currency(&conn, &owner).unwrap(), "USD");
    set_currency(&conn, &owner, "EUR").unwrap();
    set_currency(&conn, &owner, "GBP").unwrap();
    assert_eq!(get_currency(&conn, &owner).unwrap(), "GBP");
}

#[test]
fn currency_is_kept_per_user() {
    let conn = db::open_in_memory().unwrap();
    let alice = Owner::new("alice").unwrap();
    let bob = Owner::new("bob").unwrap();
    set_currency(&conn, &alice, "EUR").unwrap();
    assert_eq!(get_currency(&conn, &alice).unwrap(), "EUR");
    assert_eq!(get_currency(&conn, &bob).unwrap(), "USD");
    set_currency(&conn, &bob, "JPY").unwrap();
    assert_eq!(get_currency(&conn, &alice).unwrap(), "EUR");
}
