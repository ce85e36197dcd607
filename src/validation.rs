// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed command inputs and their validation.
//!
//! Each `*Input` holds raw, user-supplied text. `validate()` either returns
//! the typed command the store accepts, or every field problem at once so
//! the caller can show them next to the offending fields.

use crate::models::{CategoryType, TxnType};
use crate::utils::instant_from_str;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

const MAX_NAME_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.push(field, message);
        errs
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

fn required_name(errs: &mut FieldErrors, field: &'static str, raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errs.push(field, "is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errs.push(field, format!("must be at most {} characters", MAX_NAME_LEN));
    }
    name.to_string()
}

/// Largest magnitude accepted for any amount: 999,999,999,999.99.
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

fn money(errs: &mut FieldErrors, field: &'static str, raw: &str) -> Decimal {
    match raw.trim().parse::<Decimal>() {
        Ok(d) if d.normalize().scale() > 2 => {
            errs.push(field, "must have at most two decimal places");
            d
        }
        Ok(d) if d.abs() > max_amount() => {
            errs.push(field, format!("must be at most {} in size", max_amount()));
            d
        }
        Ok(d) => d,
        Err(_) => {
            errs.push(field, format!("'{}' is not a number", raw.trim()));
            Decimal::ZERO
        }
    }
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default)]
pub struct NewTransactionInput {
    pub date: String,
    pub r#type: String,
    pub amount: String,
    pub category: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
}

/// A validated transaction. Category and account are still names here;
/// the store resolves them against the owner's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: DateTime<Utc>,
    pub r#type: TxnType,
    pub amount: Decimal,
    pub category: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
}

impl NewTransactionInput {
    pub fn validate(&self) -> Result<NewTransaction, FieldErrors> {
        let mut errs = FieldErrors::new();

        let date = instant_from_str(&self.date);
        if date.is_none() {
            errs.push("date", "expected YYYY-MM-DD or an RFC 3339 timestamp");
        }

        let r#type = match self.r#type.parse::<TxnType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errs.push("type", "must be one of income, expense, transfer");
                None
            }
        };

        let amount = money(&mut errs, "amount", &self.amount);
        if amount < Decimal::ZERO {
            errs.push("amount", "must not be negative; use the type to record an expense");
        }

        let category = optional_text(self.category.as_deref());
        if r#type == Some(TxnType::Transfer) && category.is_some() {
            errs.push("category", "transfers cannot have a category");
        }

        let description = optional_text(self.description.as_deref());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            errs.push(
                "description",
                format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
            );
        }

        let account = optional_text(self.account.as_deref());
        match (date, r#type) {
            (Some(date), Some(r#type)) if errs.is_empty() => Ok(NewTransaction {
                date,
                r#type,
                amount,
                category,
                account,
                description,
            }),
            _ => Err(errs),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCategoryInput {
    pub name: String,
    pub r#type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub r#type: CategoryType,
}

impl NewCategoryInput {
    pub fn validate(&self) -> Result<NewCategory, FieldErrors> {
        let mut errs = FieldErrors::new();
        let name = required_name(&mut errs, "name", &self.name);
        let r#type = match self.r#type.parse::<CategoryType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errs.push("type", "must be income or expense");
                None
            }
        };
        match r#type {
            Some(r#type) if errs.is_empty() => Ok(NewCategory { name, r#type }),
            _ => Err(errs),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewBudgetInput {
    pub category: String,
    pub amount: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub period_start: NaiveDate,
}

/// Accepts `YYYY-MM`, or a full date that falls on the first of a month.
pub fn period_start_from_str(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Ok(d);
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) if d.day() == 1 => Ok(d),
        Ok(_) => Err("must be the first day of a month".to_string()),
        Err(_) => Err(format!("invalid month '{}', expected YYYY-MM", s)),
    }
}

impl NewBudgetInput {
    pub fn validate(&self) -> Result<NewBudget, FieldErrors> {
        let mut errs = FieldErrors::new();
        let category = required_name(&mut errs, "category", &self.category);
        let amount = money(&mut errs, "amount", &self.amount);
        if errs.get("amount").is_none() && amount <= Decimal::ZERO {
            errs.push("amount", "must be greater than zero");
        }
        let period_start = match period_start_from_str(&self.month) {
            Ok(d) => Some(d),
            Err(msg) => {
                errs.push("month", msg);
                None
            }
        };
        match period_start {
            Some(period_start) if errs.is_empty() => Ok(NewBudget {
                category,
                amount,
                period_start,
            }),
            _ => Err(errs),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewAccountInput {
    pub name: String,
    pub r#type: String,
    pub balance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub r#type: String,
    pub balance: Decimal,
}

impl NewAccountInput {
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errs = FieldErrors::new();
        let name = required_name(&mut errs, "name", &self.name);
        let r#type = required_name(&mut errs, "type", &self.r#type);
        let balance = match self.balance.as_deref() {
            Some(raw) if !raw.trim().is_empty() => money(&mut errs, "balance", raw),
            _ => Decimal::ZERO,
        };
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(NewAccount {
            name,
            r#type,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn transaction_collects_every_field_error() {
        let input = NewTransactionInput {
            date: "yesterday".into(),
            r#type: "refund".into(),
            amount: "abc".into(),
            ..Default::default()
        };
        let errs = input.validate().unwrap_err();
        assert!(errs.get("date").is_some());
        assert!(errs.get("type").is_some());
        assert!(errs.get("amount").is_some());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let input = NewTransactionInput {
            date: "2025-03-04".into(),
            r#type: "expense".into(),
            amount: "-12.50".into(),
            ..Default::default()
        };
        let errs = input.validate().unwrap_err();
        assert!(errs.get("amount").unwrap().contains("negative"));
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let input = NewTransactionInput {
            date: "2025-03-04".into(),
            r#type: "income".into(),
            amount: "10000000000000000000000000".into(),
            ..Default::default()
        };
        let errs = input.validate().unwrap_err();
        assert!(errs.get("amount").unwrap().contains("at most"));

        let input = NewTransactionInput {
            amount: "999999999999.99".into(),
            ..input
        };
        assert_eq!(input.validate().unwrap().amount, max_amount());

        let errs = NewAccountInput {
            name: "Card".into(),
            r#type: "credit".into(),
            balance: Some("-1000000000000".into()),
        }
        .validate()
        .unwrap_err();
        assert!(errs.get("balance").is_some());
    }

    #[test]
    fn transfer_with_category_is_rejected() {
        let input = NewTransactionInput {
            date: "2025-03-04".into(),
            r#type: "transfer".into(),
            amount: "100".into(),
            category: Some("Savings".into()),
            ..Default::default()
        };
        let errs = input.validate().unwrap_err();
        assert_eq!(errs.get("category"), Some("transfers cannot have a category"));
    }

    #[test]
    fn valid_transaction_trims_optional_text() {
        let input = NewTransactionInput {
            date: "2025-03-04".into(),
            r#type: " Expense ".into(),
            amount: "12.5".into(),
            category: Some("  Food ".into()),
            account: Some("   ".into()),
            description: Some(" lunch ".into()),
        };
        let tx = input.validate().unwrap();
        assert_eq!(tx.r#type, TxnType::Expense);
        assert_eq!(tx.amount, dec("12.5"));
        assert_eq!(tx.category.as_deref(), Some("Food"));
        assert_eq!(tx.account, None);
        assert_eq!(tx.description.as_deref(), Some("lunch"));
        assert_eq!(tx.date.to_rfc3339(), "2025-03-04T00:00:00+00:00");
    }

    #[test]
    fn budget_requires_positive_amount_and_month_start() {
        let errs = NewBudgetInput {
            category: "Food".into(),
            amount: "0".into(),
            month: "2025-03-15".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errs.get("amount"), Some("must be greater than zero"));
        assert_eq!(errs.get("month"), Some("must be the first day of a month"));

        let ok = NewBudgetInput {
            category: "Food".into(),
            amount: "250".into(),
            month: "2025-03".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.period_start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn category_name_is_required() {
        let errs = NewCategoryInput {
            name: "   ".into(),
            r#type: "expense".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errs.get("name"), Some("is required"));
    }

    #[test]
    fn account_balance_defaults_to_zero_and_may_be_negative() {
        let acct = NewAccountInput {
            name: "Card".into(),
            r#type: "credit".into(),
            balance: None,
        }
        .validate()
        .unwrap();
        assert!(acct.balance.is_zero());

        let acct = NewAccountInput {
            name: "Card".into(),
            r#type: "credit".into(),
            balance: Some("-420.10".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(acct.balance, dec("-420.10"));
    }
}
