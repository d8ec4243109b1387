//! Rendering results for the terminal.

use anyhow::Result;
use colored::Colorize;
use opencti_guard_core::{GuardConfig, ValidationError};
use serde::Serialize;

/// JSON report for `validate --format json`.
#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    errors: &'a [ValidationError],
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_violations_json(errors: &[ValidationError]) -> Result<()> {
    print_json(&ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}

pub fn print_violations_text(errors: &[ValidationError]) {
    for error in errors {
        println!("{}: {}", error.key.bold(), error.message);
    }

    if errors.is_empty() {
        println!("{}", "No problems found".green());
    } else {
        let noun = if errors.len() == 1 { "problem" } else { "problems" };
        println!();
        println!("{}", format!("Found {} {}", errors.len(), noun).red().bold());
    }
}

pub fn print_rules(config: &GuardConfig) {
    for (id, name) in opencti_guard_rules::RULES_DATA {
        if config.is_rule_enabled(id) {
            println!("{}  {}", id.cyan(), name);
        } else {
            println!("{}  {} {}", id.cyan(), name, "(disabled)".dimmed());
        }
    }
}
