//! Records command implementation

use std::path::Path;

use colored::Colorize;

use mirror_core::{RECORD_FILE_NAME, SyncRecordSet};

use crate::error::Result;

/// Run the records command
///
/// Lists what the last sync recorded for a target directory.
pub fn run_records(target: &Path, json: bool) -> Result<()> {
    let path = target.join(RECORD_FILE_NAME);
    if !path.exists() {
        println!(
            "{} No sync record in {}",
            "NONE".yellow().bold(),
            target.display()
        );
        return Ok(());
    }

    let records = SyncRecordSet::try_load(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{} {} recorded file(s) in {}",
        "=>".blue().bold(),
        records.len(),
        target.display()
    );
    for entry in records.entries() {
        let how = if entry.command.is_empty() {
            "copy".dimmed().to_string()
        } else {
            entry.command.clone()
        };
        println!(
            "   {} {} {} ({} bytes, {}) [{}]",
            entry.source_path.cyan(),
            "->".dimmed(),
            entry.target_path,
            entry.size,
            entry.mod_time.to_rfc3339(),
            how
        );
    }

    Ok(())
}
