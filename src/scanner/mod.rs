//! Scanner module - the probe engine.
//!
//! Validates the target, probes every port of a [`PortSet`] with bounded
//! concurrency, and aggregates the outcomes into a [`ScanResult`] ordered by
//! port regardless of completion order.
//!
//! Only two errors escape a scan: [`ScanError::InvalidInput`] before any
//! network activity, and [`ScanError::UnresolvableHost`] when the target
//! fails to resolve, either up front or during probing. Everything else a
//! probe runs into is recorded as a closed port.

pub mod results;
pub mod tcp;
pub mod traits;

pub use results::{PortResult, PortStatus, ScanResult};
pub use tcp::TcpConnectProber;
pub use traits::{ProbeOutcome, Prober};

use crate::error::{Result, ScanError};
use crate::notify::{self, NoopNotifier, Notifier};
use crate::types::{HostResolver, PortSet, SystemResolver, Target};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default number of simultaneous connection attempts.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Upper bound on simultaneous connection attempts.
pub const MAX_CONCURRENCY: usize = 5_000;

/// Port scanner.
///
/// Collaborators are injected through the `with_*` builders; the defaults
/// are the system resolver, a no-op notifier and a token nobody cancels.
///
/// ```rust,ignore
/// use portsweep::{parse_port_spec, Scanner};
/// use std::time::Duration;
///
/// let ports = parse_port_spec("22,80,443");
/// let result = Scanner::new()
///     .with_concurrency(50)
///     .scan("192.168.1.1", &ports, Duration::from_secs(1))
///     .await?;
/// println!("{} open of {}", result.open_count(), result.checked);
/// ```
pub struct Scanner {
    resolver: Arc<dyn HostResolver>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(SystemResolver),
            notifier: Arc::new(NoopNotifier),
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Use a custom resolver for validation and for every probe.
    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Send scan events to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the maximum number of in-flight probes (clamped to 1..=5000).
    /// A concurrency of 1 probes strictly sequentially.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Stop the scan early when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Report progress on `bar` (one tick per probed port).
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Token that cancels scans run by this scanner.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Scan `ports` on `target`, each probe bounded by `timeout`.
    ///
    /// Fails with `InvalidInput` for an empty target, an empty port set or a
    /// zero timeout, and with `UnresolvableHost` if the target does not
    /// resolve before or during the scan. Partial results are discarded on
    /// failure. If cancelled, returns the ports completed so far with
    /// `cancelled` set.
    pub async fn scan(&self, target: &str, ports: &PortSet, timeout: Duration) -> Result<ScanResult> {
        let target = Target::new(target)
            .ok_or_else(|| ScanError::InvalidInput("target cannot be empty".to_string()))?;
        if ports.is_empty() {
            return Err(ScanError::InvalidInput("no valid ports specified".to_string()));
        }
        if timeout.is_zero() {
            return Err(ScanError::InvalidInput("timeout must be greater than zero".to_string()));
        }

        if let Err(e) = self.resolver.resolve(target.as_str()).await {
            warn!(target_host = %target, error = %e, "target does not resolve");
            return Err(e.into());
        }

        let started_at = Utc::now();
        let start = Instant::now();
        if let Some(ref pb) = self.progress {
            pb.set_length(ports.len() as u64);
        }

        let prober = TcpConnectProber::new(Arc::clone(&self.resolver), timeout);
        let (results, cancelled) = self.probe_all(&prober, &target, ports).await?;

        if let Some(ref pb) = self.progress {
            pb.finish_with_message(if cancelled { "Scan cancelled" } else { "Scan complete" });
        }

        let result = ScanResult::aggregate(
            target,
            results,
            cancelled,
            started_at,
            start.elapsed().as_millis() as u64,
        );

        info!(
            target_host = %result.target,
            checked = result.checked,
            open = result.open_count(),
            cancelled = result.cancelled,
            duration_ms = result.duration_ms,
            "scan finished"
        );

        if !result.cancelled {
            notify::dispatch(self.notifier.as_ref(), &result.to_event(Utc::now())).await;
        }

        Ok(result)
    }

    /// Probe every port once, keeping at most `concurrency` attempts in flight.
    ///
    /// Each port owns one slot, written once when its probe completes.
    /// Returning early drops the stream, which drops every in-flight probe
    /// and closes its socket.
    async fn probe_all(
        &self,
        prober: &dyn Prober,
        target: &Target,
        ports: &PortSet,
    ) -> Result<(Vec<PortResult>, bool)> {
        let host = target.as_str();
        let mut slots: Vec<Option<PortStatus>> = vec![None; ports.len()];

        let mut probes = stream::iter(ports.iter().enumerate())
            .map(|(index, port)| async move { (index, port, prober.probe(host, port).await) })
            .buffer_unordered(self.concurrency);

        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!(target_host = %target, "scan cancelled");
                    cancelled = true;
                    break;
                }
                next = probes.next() => {
                    let Some((index, port, outcome)) = next else {
                        break;
                    };
                    debug!(target_host = %target, %port, %outcome, "probe finished");

                    let Some(status) = outcome.status() else {
                        warn!(target_host = %target, %port, %outcome, "host stopped resolving, aborting scan");
                        return Err(ScanError::UnresolvableHost(format!("{} ({})", target, outcome)));
                    };
                    slots[index] = Some(status);

                    if let Some(ref pb) = self.progress {
                        pb.inc(1);
                        if status == PortStatus::Open {
                            pb.set_message(format!("Found open port: {}", port));
                        }
                    }
                }
            }
        }

        let results = ports
            .iter()
            .zip(slots)
            .filter_map(|(port, slot)| slot.map(|status| PortResult::new(port, status)))
            .collect();

        Ok((results, cancelled))
    }
}

/// Scan with default settings: system resolver, no notifier, default concurrency.
pub async fn scan(target: &str, ports: &PortSet, timeout: Duration) -> Result<ScanResult> {
    Scanner::new().scan(target, ports, timeout).await
}
