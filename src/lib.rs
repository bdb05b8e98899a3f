//! # portsweep - A Bounded-Concurrency TCP Port Scanner
//!
//! portsweep checks a single host for TCP ports that accept connections.
//! Each requested port is probed exactly once with a full connect attempt
//! and a bounded timeout; results come back sorted and deduplicated.
//!
//! ## Features
//!
//! - **Lenient Port Specs**: `"22,80,443"`, `"1-1024"`, mixed lists, with
//!   out-of-range bounds clamped and malformed tokens skipped
//! - **Bounded Concurrency**: from strictly sequential up to thousands of
//!   simultaneous probes, with identical results either way
//! - **Resolution Checks**: a scan aborts if its target stops resolving
//! - **Scan Events**: a best-effort notifier receives one event per
//!   completed scan and can never change its outcome
//! - **Result Persistence**: an append-only results file and JSON history
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::{parse_port_spec, scan, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     let ports = parse_port_spec("22,80,443");
//!     let result = scan("127.0.0.1", &ports, DEFAULT_TIMEOUT).await?;
//!
//!     for port in &result.open_ports {
//!         println!("Port {} is OPEN", port);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port sets, targets and host resolution
//! - [`scanner`] - The probe engine and result aggregation
//! - [`notify`] - Scan events and their sinks
//! - [`config`] - Settings and application paths
//! - [`storage`] - Results file and scan history
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities
//! - [`cli`] - Command line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod output;
pub mod scanner;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use notify::{EventKind, NoopNotifier, Notifier, ScanEvent};
pub use scanner::{
    scan, PortResult, PortStatus, ProbeOutcome, Prober, ScanResult, Scanner, DEFAULT_TIMEOUT,
};
pub use types::{
    is_valid_host, parse_port_spec, HostResolver, Port, PortRange, PortSet, SystemResolver,
    Target,
};
