// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use budgetboard::{cli, commands, db, logging, owner::Owner};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_flag("verbose"));

    let db_override = matches.get_one::<String>("db").map(PathBuf::from);
    let conn = db::open_or_init(db_override.as_deref())?;
    let owner = Owner::new(
        matches
            .get_one::<String>("user")
            .map(String::as_str)
            .unwrap_or_default(),
    )?;

    match matches.subcommand() {
        Some(("init", _)) => match &db_override {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("account", sub)) => commands::accounts::handle(&conn, &owner, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, &owner, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &owner, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, &owner, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &owner, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &owner, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &owner)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, &owner, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
