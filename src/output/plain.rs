//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{PortStatus, ScanResult};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write results in human-readable plain text format.
///
/// Open ports are always listed; closed ports only with `show_closed`.
pub fn write_plain<W: Write>(mut out: W, result: &ScanResult, show_closed: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                    {} Scan Results", style("portsweep").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), result.target)?;
    writeln!(
        out,
        "  {} {} ports checked in {:.2}s",
        style("Statistics:").bold(),
        result.checked,
        result.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open, {} closed",
        style(result.open_count()).green().bold(),
        style(result.closed_count()).red()
    )?;
    if result.cancelled {
        writeln!(out, "  {}", style("Scan cancelled before all ports were checked.").yellow())?;
    }
    writeln!(out)?;

    let rows: Vec<_> = result
        .results
        .iter()
        .filter(|r| show_closed || r.is_open())
        .collect();

    if !rows.is_empty() {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        for r in rows {
            let status_style = match r.status {
                PortStatus::Open => Style::new().green().bold(),
                PortStatus::Closed => Style::new().red(),
            };
            writeln!(
                out,
                "  Port {} is {} on {}",
                r.port,
                status_style.apply_to(r.status),
                result.target
            )?;
        }
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    if !result.has_open_ports() {
        writeln!(
            out,
            "  No open ports detected on {} (checked {} ports).",
            result.target, result.checked
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;
    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ports: usize, timeout_ms: u64, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Target: {}", style("•").dim(), style(target).white().bold());
    println!(
        "{} Scanning {} ports ({}ms timeout, {} in flight)...",
        style("•").dim(),
        style(ports).white().bold(),
        timeout_ms,
        concurrency
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}
