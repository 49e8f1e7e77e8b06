use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use crate::config::{AppConfig, StatWeights};
use crate::data::export::export_csv_file;
use crate::data::loader::load_faction_dir;
use crate::data::price_table::PriceTables;
use crate::data::validate::validate_faction_document;
use crate::server::{self, ApiState};
use crate::valuation::{enrich, top_by_true_efficiency};

const USAGE: &str = "usage: warvalue <load|value|export|validate|serve>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Load,
    Value,
    Export,
    Validate,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("load") => Some(Command::Load),
        Some("value") => Some(Command::Value),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Load) => handle_load(args),
        Some(Command::Value) => handle_value(args),
        Some(Command::Export) => handle_export(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Serve) => handle_serve(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the subcommand, skipping flags and their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--weights" | "--top" => {
                iter.next();
            }
            flag if flag.starts_with("--") => {}
            value => out.push(value),
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn config_for(dir: Option<&str>) -> AppConfig {
    match dir {
        Some(dir) => AppConfig::for_data_dir(dir),
        None => AppConfig::from_env(),
    }
}

fn handle_load(args: &[String]) -> i32 {
    let config = config_for(positionals(args).first().copied());
    match load_faction_dir(&config.data_dir) {
        Ok(dataset) => print_json(&dataset.summary()),
        Err(err) => {
            eprintln!("load failed: {err}");
            1
        }
    }
}

fn handle_value(args: &[String]) -> i32 {
    let config = config_for(positionals(args).first().copied());
    let weights = match flag_value(args, "--weights") {
        Some(path) => StatWeights::from_path(path),
        None => config.weights(),
    };
    let weights = match weights {
        Ok(weights) => weights,
        Err(err) => {
            eprintln!("invalid weights: {err}");
            return 1;
        }
    };
    let top = parse_usize_arg(flag_value(args, "--top"), "top");
    let as_table = args.iter().any(|arg| arg == "--table");

    let dataset = match load_faction_dir(&config.data_dir) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };
    let tables = PriceTables::load(&config.equipment_prices, &config.rule_prices);
    for notice in &tables.notices {
        eprintln!("notice: {notice}");
    }

    let ranked = top_by_true_efficiency(enrich(dataset.records(), &tables, &weights), top);

    if as_table {
        let mut out = String::from(
            "faction\tname\tpoints\tgear_value\trules_value\tnaked_points\tcombat_value\ttrue_efficiency\n",
        );
        for valued in &ranked {
            let m = &valued.metrics;
            let _ = writeln!(
                &mut out,
                "{}\t{}\t{}\t{:.1}\t{:.1}\t{:.1}\t{:.1}\t{:.4}",
                valued.record.faction,
                valued.record.name,
                valued.record.points,
                m.gear_value,
                m.rules_value,
                m.naked_points,
                m.combat_value,
                m.true_efficiency
            );
        }
        print!("{out}");
        0
    } else {
        print_json(&ranked)
    }
}

fn handle_export(args: &[String]) -> i32 {
    let positional = positionals(args);
    let (dir, out) = match positional.as_slice() {
        [out] => (None, *out),
        [dir, out, ..] => (Some(*dir), *out),
        [] => {
            eprintln!("usage: warvalue export [data-dir] <out.csv>");
            return 2;
        }
    };
    let config = config_for(dir);
    let dataset = match load_faction_dir(&config.data_dir) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };
    match export_csv_file(dataset.records(), PathBuf::from(out)) {
        Ok(()) => {
            println!("export complete: records={}, path='{out}'", dataset.len());
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = positionals(args).first().copied() else {
        eprintln!("usage: warvalue validate <faction.json>");
        return 2;
    };

    match validate_faction_document(path) {
        Ok(report) if !report.has_errors() => {
            println!(
                "validation passed: {path} ({} diagnostic(s))",
                report.diagnostics.len()
            );
            for diag in &report.diagnostics {
                println!("- {diag}");
            }
            0
        }
        Ok(report) => {
            eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
            for diag in &report.diagnostics {
                eprintln!("- {diag}");
            }
            1
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_serve() -> i32 {
    let config = AppConfig::from_env();
    let state = match ApiState::from_config(&config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return 1;
        }
    };
    match server::run_server(&config.bind_addr, &state) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_writer_pretty(io::stdout().lock(), value) {
        Ok(()) => {
            println!();
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn parse_usize_arg(raw: Option<&str>, name: &str) -> Option<usize> {
    let value = raw?;
    match value.parse::<usize>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("invalid {name} '{value}', ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["warvalue", "value"])), Some(Command::Value));
        assert_eq!(parse_command(&args(&["warvalue", "nope"])), None);
        assert_eq!(parse_command(&args(&["warvalue"])), None);
    }

    #[test]
    fn positionals_skip_flags_and_their_values() {
        let raw = args(&["warvalue", "value", "--weights", "w.json", "data", "--table", "--top", "5"]);
        assert_eq!(positionals(&raw), vec!["data"]);
        assert_eq!(flag_value(&raw, "--top"), Some("5"));
        assert_eq!(flag_value(&raw, "--missing"), None);
    }
}
