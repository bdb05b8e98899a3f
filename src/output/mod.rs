//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_info, print_scan_header, print_success, print_warning, write_plain};

use crate::cli::OutputFormat;
use crate::scanner::ScanResult;
use std::io;

/// Format and print scan results according to the specified format.
pub fn print_results(result: &ScanResult, format: OutputFormat, show_closed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Plain => write_plain(&mut out, result, show_closed),
        OutputFormat::Json => write_json(&mut out, result),
        OutputFormat::Csv => write_csv(&mut out, result),
    }
}
