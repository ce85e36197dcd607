// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::owner::Owner;
use crate::utils::{get_currency, set_currency};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, owner: &Owner, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let ccy = sub
                .get_one::<String>("currency")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code '{}', expected ISO 4217 like USD", ccy);
            }
            set_currency(conn, owner, &ccy)?;
            tracing::info!(user = %owner, currency = %ccy, "display currency set");
            println!("Display currency for {} set to {}", owner, ccy);
        }
        Some(("show", _)) => {
            println!("currency = {}", get_currency(conn, owner)?);
        }
        _ => {}
    }
    Ok(())
}
