//! Presentation helpers shared by one-shot commands and the shell.

use std::io::Write;

use anyhow::Result;
use dms_core::import::ImportReport;
use dms_core::{CharacterRecord, ThreatEntry};

/// Print records one per line, or as a JSON array.
pub fn records<W: Write>(out: &mut W, records: &[&CharacterRecord], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
    } else if records.is_empty() {
        writeln!(out, "(none)")?;
    } else {
        for record in records {
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

/// Print a single lookup result.
pub fn lookup<W: Write>(out: &mut W, record: Option<&CharacterRecord>, json: bool) -> Result<()> {
    match (record, json) {
        (Some(record), true) => {
            serde_json::to_writer_pretty(&mut *out, record)?;
            writeln!(out)?;
        }
        (None, true) => writeln!(out, "null")?,
        (Some(record), false) => writeln!(out, "{record}")?,
        (None, false) => writeln!(out, "No match")?,
    }
    Ok(())
}

/// Print ranked entries.
pub fn entries<W: Write>(out: &mut W, entries: &[ThreatEntry<'_>], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
    } else if entries.is_empty() {
        writeln!(out, "(none)")?;
    } else {
        for (rank, entry) in entries.iter().enumerate() {
            writeln!(out, "#{:<3} {entry}", rank + 1)?;
        }
    }
    Ok(())
}

/// Print an import summary followed by one line per failure.
pub fn import_report<W: Write>(out: &mut W, report: &ImportReport) -> Result<()> {
    writeln!(out, "{}", report.summary())?;
    for failure in &report.failures {
        writeln!(out, "  line {}: {}", failure.line, failure.error)?;
    }
    Ok(())
}
