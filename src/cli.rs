// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn month_opt() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("date")
            .long("date")
            .required(true)
            .help("YYYY-MM-DD or RFC 3339 timestamp"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .required(true)
            .help("income|expense|transfer"),
    )
    .arg(Arg::new("amount").long("amount").required(true))
    .arg(Arg::new("category").long("category"))
    .arg(Arg::new("account").long("account"))
    .arg(Arg::new("description").long("description"))
}

fn budget_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .required(true)
            .help("YYYY-MM or the first day of the month"),
    )
    .arg(Arg::new("category").long("category").required(true))
    .arg(Arg::new("amount").long("amount").required(true))
}

pub fn build_cli() -> Command {
    Command::new("budgetboard")
        .about("Personal budgeting dashboard: accounts, transactions, budgets and reports")
        .version(crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("BUDGETBOARD_DB")
                .help("Path to the SQLite database (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env("BUDGETBOARD_USER")
                .default_value("default")
                .help("Owner whose data is read and written"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes priority)"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("e.g. checking, savings, credit"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true)
                                .help("Opening balance (default 0)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("set-balance")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("balance").required(true).allow_hyphen_values(true)),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("to").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .help("Disambiguate when the name exists for both types"),
                        )
                        .arg(Arg::new("new_name").long("new-name"))
                        .arg(Arg::new("new_type").long("new-type")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("type").long("type")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(tx_fields(Command::new("add")))
                .subcommand(tx_fields(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(month_opt())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly spending limits per expense category")
                .subcommand(budget_fields(Command::new("set")))
                .subcommand(budget_fields(Command::new("update")))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("month").long("month")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard aggregations")
                .subcommand(json_flags(Command::new("dashboard").arg(month_opt())))
                .subcommand(json_flags(Command::new("budgets").arg(month_opt())))
                .subcommand(json_flags(
                    Command::new("series")
                        .arg(month_opt().conflicts_with("year"))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .help("Monthly buckets for a whole year"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("net-worth").arg(
                        Arg::new("range")
                            .long("range")
                            .default_value("1y")
                            .help("1y|5y|all"),
                    ),
                ))
                .subcommand(json_flags(Command::new("categories").arg(month_opt()))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check data integrity"))
        .subcommand(
            Command::new("settings")
                .about("Display preferences for the selected --user")
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("currency").required(true)),
                )
                .subcommand(Command::new("show")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn user_defaults_and_propagates() {
        let m = build_cli().get_matches_from(["budgetboard", "report", "dashboard"]);
        assert_eq!(m.get_one::<String>("user").map(String::as_str), Some("default"));
        let m = build_cli().get_matches_from(["budgetboard", "tx", "list", "--user", "alice"]);
        assert_eq!(m.get_one::<String>("user").map(String::as_str), Some("alice"));
    }
}
