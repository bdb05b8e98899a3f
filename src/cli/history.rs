//! History subcommand implementation.
//!
//! Handles `portsweep history` for listing and clearing saved scans.

use crate::error::CliResult;
use crate::output;
use crate::storage::{ScanRecord, ScanStore};
use clap::Parser;
use console::style;

/// View scan history.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    /// Number of recent scans to show
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Delete all saved scans
    #[arg(long)]
    pub clear: bool,
}

impl HistoryCommand {
    /// Execute the history command.
    pub fn execute(&self, quiet: bool) -> CliResult<()> {
        let store = ScanStore::new()?;

        if self.clear {
            let removed = store.clear()?;
            if !quiet {
                output::print_success(&format!("Removed {} saved scan(s).", removed));
            }
            return Ok(());
        }

        let records = store.list_recent(self.count)?;
        if records.is_empty() {
            if !quiet {
                output::print_info("No scans recorded yet.");
            }
            return Ok(());
        }

        for record in &records {
            println!("{}", format_entry(record));
        }
        Ok(())
    }
}

fn format_entry(record: &ScanRecord) -> String {
    format!(
        "{}  {}  {}",
        style(record.id.short()).cyan(),
        style(record.scan.started_at.format("%Y-%m-%d %H:%M:%S")).dim(),
        record.summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, PortStatus, ScanResult};
    use crate::types::{Port, Target};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_entry() {
        let scan = ScanResult::aggregate(
            Target::new("example.com").unwrap(),
            vec![PortResult::new(Port::new(443).unwrap(), PortStatus::Open)],
            false,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            40,
        );
        let record = ScanRecord::new(scan, "443", 1000);

        let line = console::strip_ansi_codes(&format_entry(&record)).into_owned();
        assert!(line.starts_with(&record.id.short()));
        assert!(line.contains("2024-03-01 12:30:00"));
        assert!(line.contains("example.com [443] - 1 open of 1 checked"));
    }
}
