//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked, then the
//! validation report.

use anyhow::Result;
use pokedex_config::{redacted_snapshot, PokedexConfig, ValidationReport};

use crate::terminal_output::{note_error, note_success, note_warn};

pub fn run(config: &PokedexConfig, report: &ValidationReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&redacted_snapshot(config))?);

    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
    Ok(())
}
