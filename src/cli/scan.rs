//! Scan subcommand implementation.
//!
//! Handles `portsweep scan [TARGET]`. Anything not given on the command line
//! is asked for on standard input, so the command also works interactively.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult, ScanError};
use crate::notify::{JsonLinesNotifier, MultiNotifier, TracingNotifier};
use crate::output;
use crate::scanner::{ScanResult, Scanner};
use crate::storage::{ResultsFile, ScanRecord, ScanStore};
use crate::types::{parse_port_spec, PortRange, PortSet, ResolverKind, Target};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Scan a target for open TCP ports.
#[derive(Parser, Debug, Default)]
pub struct ScanCommand {
    /// Target to scan (IP address or hostname); prompted for if omitted
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Ports to scan (e.g., "80", "80,443", "1-1024", "22,80,1000-1010")
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub ports: Option<String>,

    /// First port of an explicit range (requires --end)
    #[arg(long, requires = "end", allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Last port of an explicit range (requires --start)
    #[arg(long, requires = "start", allow_negative_numbers = true)]
    pub end: Option<i64>,

    /// Connection timeout per port in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Maximum number of simultaneous connection attempts (1 = sequential)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Show closed ports in output
    #[arg(long)]
    pub show_closed: bool,

    /// Resolver used for the target
    #[arg(long, value_enum)]
    pub resolver: Option<ResolverKind>,

    /// Append results to this file instead of the default results file
    #[arg(long, value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Append scan events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub events_file: Option<PathBuf>,

    /// Don't save results or history
    #[arg(long)]
    pub no_save: bool,
}

impl ScanCommand {
    /// A scan of `target` with every other option left to settings and prompts.
    pub fn for_target(target: Option<String>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let (target, ports, port_label) = {
            let mut input = io::stdin().lock();
            let (target, prompted) = match &self.target {
                Some(target) => (target.clone(), false),
                None => (prompt(&mut input, "Enter the target IP address or domain: ")?, true),
            };
            let target = Target::new(&target)
                .ok_or_else(|| ScanError::InvalidInput("no target provided".to_string()))?;
            let (ports, label) = self.port_set(settings, prompted.then_some(&mut input))?;
            (target, ports, label)
        };

        let timeout = self
            .timeout
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.default_timeout());
        let concurrency = self.concurrency.unwrap_or(settings.default_concurrency);

        let resolver = self
            .resolver
            .unwrap_or(settings.resolver)
            .build()
            .map_err(ScanError::from)?;

        let mut notifier = MultiNotifier::new().with(TracingNotifier);
        if let Some(path) = self.events_file.as_ref().or(settings.event_log.as_ref()) {
            notifier = notifier.with(JsonLinesNotifier::new(path));
        }

        let mut scanner = Scanner::new()
            .with_resolver(resolver)
            .with_notifier(Arc::new(notifier))
            .with_concurrency(concurrency);

        let plain = self.output == OutputFormat::Plain;
        if verbose && !quiet && plain {
            scanner = scanner.with_progress(progress_bar());
        }

        // Ctrl-C cancels the scan; completed ports are still reported.
        let cancel = scanner.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        if !quiet && plain {
            output::print_scan_header(
                target.as_str(),
                ports.len(),
                timeout.as_millis() as u64,
                scanner.concurrency(),
            );
        }

        let result = scanner.scan(target.as_str(), &ports, timeout).await?;

        output::print_results(&result, self.output, self.show_closed)?;

        if result.cancelled && !quiet {
            output::print_warning(&format!(
                "Scan cancelled after {} of {} ports.",
                result.checked,
                ports.len()
            ));
        }

        if !self.no_save {
            self.persist(settings, &result, &ports, &port_label, timeout, quiet && plain);
        }

        Ok(())
    }

    /// Build the port set from `--start/--end`, `--ports`, a prompt, or settings.
    fn port_set(
        &self,
        settings: &AppSettings,
        input: Option<&mut impl BufRead>,
    ) -> CliResult<(PortSet, String)> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            let range = PortRange::from_bounds(start, end)?;
            return Ok((range.to_port_set(), range.to_string()));
        }

        let spec = match (&self.ports, input) {
            (Some(spec), _) => spec.clone(),
            (None, Some(input)) => {
                let answer = prompt(input, "Enter ports (e.g. 22,80,443 or 1-1024): ")?;
                if answer.is_empty() {
                    settings.default_ports.clone()
                } else {
                    answer
                }
            }
            (None, None) => settings.default_ports.clone(),
        };

        let ports = parse_port_spec(&spec);
        if ports.is_empty() {
            return Err(ScanError::InvalidInput(format!("no valid ports parsed from '{}'", spec)).into());
        }
        debug!(spec = %spec, count = ports.len(), "parsed port spec");
        Ok((ports, spec))
    }

    /// Append to the results file and save history. Failures are warnings:
    /// the scan itself already succeeded.
    fn persist(
        &self,
        settings: &AppSettings,
        result: &ScanResult,
        ports: &PortSet,
        port_label: &str,
        timeout: Duration,
        silent: bool,
    ) {
        let results_file = match self.results_file.as_ref().or(settings.results_file.as_ref()) {
            Some(path) => Ok(ResultsFile::new(path)),
            None => ResultsFile::default_location(),
        };
        match results_file.and_then(|file| file.append(result, ports).map(|p| p.to_path_buf())) {
            Ok(path) if !silent => output::print_info(&format!("Results appended to {}", path.display())),
            Ok(_) => {}
            Err(e) => output::print_warning(&format!("could not write results file: {}", e)),
        }

        if settings.save_history && !result.cancelled {
            let record = ScanRecord::new(result.clone(), port_label, timeout.as_millis() as u64);
            match ScanStore::new().and_then(|store| store.save(&record)) {
                Ok(()) if !silent => output::print_info(&format!("Scan saved as {}", record.id.short())),
                Ok(()) => {}
                Err(e) => output::print_warning(&format!("could not save scan history: {}", e)),
            }
        }
    }
}

/// Ask `question` on stdout and read one trimmed line.
fn prompt(input: &mut impl BufRead, question: &str) -> CliResult<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Other("unexpected end of input".to_string()));
    }
    Ok(line.trim().to_string())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
