//! Result aggregation.
//!
//! Turns per-port outcomes into the ordered report handed back to callers.
//! Everything here is pure and deterministic.

use crate::notify::{EventDetails, EventKind, ScanEvent};
use crate::types::{Port, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final classification of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortStatus {
    /// A TCP connection completed within the timeout.
    Open,
    /// Refused, timed out, unreachable, or any other non-resolution failure.
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    pub port: Port,
    pub status: PortStatus,
}

impl PortResult {
    pub fn new(port: Port, status: PortStatus) -> Self {
        Self { port, status }
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Complete outcome of one scan call. Owned by the caller; never shared
/// with the engine after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Target exactly as scanned.
    pub target: Target,
    /// One entry per probed port, ascending by port.
    pub results: Vec<PortResult>,
    /// Ports whose status is open, ascending.
    pub open_ports: Vec<Port>,
    /// Number of ports probed.
    pub checked: usize,
    /// Set when the scan was stopped early by its cancellation token.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ScanResult {
    /// Build a result from unordered `(port, status)` pairs.
    pub fn aggregate(
        target: Target,
        results: impl IntoIterator<Item = PortResult>,
        cancelled: bool,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let mut results: Vec<PortResult> = results.into_iter().collect();
        results.sort_by_key(|r| r.port);
        results.dedup_by_key(|r| r.port);

        let open_ports = results
            .iter()
            .filter(|r| r.is_open())
            .map(|r| r.port)
            .collect();
        let checked = results.len();

        Self {
            target,
            results,
            open_ports,
            checked,
            cancelled,
            started_at,
            duration_ms,
        }
    }

    pub fn open_count(&self) -> usize {
        self.open_ports.len()
    }

    pub fn closed_count(&self) -> usize {
        self.checked - self.open_ports.len()
    }

    pub fn has_open_ports(&self) -> bool {
        !self.open_ports.is_empty()
    }

    /// The event describing this scan, stamped with `time`.
    pub fn to_event(&self, time: DateTime<Utc>) -> ScanEvent {
        let (event, ports) = if self.has_open_ports() {
            (
                EventKind::OpenPorts,
                Some(self.open_ports.iter().map(|p| p.as_u16()).collect()),
            )
        } else {
            (EventKind::NoOpenPorts, None)
        };

        ScanEvent {
            event,
            target: self.target.to_string(),
            details: EventDetails {
                ports,
                checked: self.checked,
                time,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(port: u16, status: PortStatus) -> PortResult {
        PortResult::new(Port::new(port).unwrap(), status)
    }

    fn target() -> Target {
        Target::new("127.0.0.1").unwrap()
    }

    #[test]
    fn test_aggregate_orders_and_counts() {
        let scan = ScanResult::aggregate(
            target(),
            vec![
                result(443, PortStatus::Open),
                result(22, PortStatus::Closed),
                result(80, PortStatus::Open),
            ],
            false,
            Utc::now(),
            12,
        );

        let ports: Vec<u16> = scan.results.iter().map(|r| r.port.as_u16()).collect();
        assert_eq!(ports, vec![22, 80, 443]);
        assert_eq!(scan.open_ports, vec![Port::new(80).unwrap(), Port::new(443).unwrap()]);
        assert_eq!(scan.checked, 3);
        assert_eq!(scan.open_count(), 2);
        assert_eq!(scan.closed_count(), 1);
    }

    #[test]
    fn test_aggregate_empty() {
        let scan = ScanResult::aggregate(target(), Vec::new(), true, Utc::now(), 0);
        assert_eq!(scan.checked, 0);
        assert!(!scan.has_open_ports());
        assert!(scan.cancelled);
    }

    #[test]
    fn test_event_for_open_ports() {
        let scan = ScanResult::aggregate(
            target(),
            vec![result(22, PortStatus::Open), result(23, PortStatus::Closed)],
            false,
            Utc::now(),
            1,
        );
        let event = scan.to_event(Utc::now());
        assert_eq!(event.event, EventKind::OpenPorts);
        assert_eq!(event.details.ports, Some(vec![22]));
        assert_eq!(event.details.checked, 2);
    }

    #[test]
    fn test_event_without_open_ports() {
        let scan = ScanResult::aggregate(
            target(),
            vec![result(23, PortStatus::Closed)],
            false,
            Utc::now(),
            1,
        );
        let event = scan.to_event(Utc::now());
        assert_eq!(event.event, EventKind::NoOpenPorts);
        assert_eq!(event.details.ports, None);
        assert_eq!(event.target, "127.0.0.1");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "OPEN");
        assert_eq!(PortStatus::Closed.to_string(), "CLOSED");
    }
}
