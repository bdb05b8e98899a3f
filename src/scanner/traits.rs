//! Probe abstraction.
//!
//! A prober performs one bounded connection attempt against a single
//! (host, port) pair. The engine only sees [`ProbeOutcome`] values.

use crate::scanner::results::PortStatus;
use crate::types::Port;
use async_trait::async_trait;
use std::fmt;

/// Raw outcome of a single probe, before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Connection established within the timeout.
    Open,
    /// Attempt finished without a connection and without a resolution problem.
    Closed,
    /// The host no longer resolves. Fatal to the whole scan.
    Error(String),
}

impl ProbeOutcome {
    /// Status to record for this outcome, or None if it must abort the scan.
    pub fn status(&self) -> Option<PortStatus> {
        match self {
            Self::Open => Some(PortStatus::Open),
            Self::Closed => Some(PortStatus::Closed),
            Self::Error(_) => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Error(detail) => write!(f, "error: {}", detail),
        }
    }
}

/// Trait for single-port probe implementations.
///
/// # Example
///
/// ```ignore
/// use portsweep::scanner::{Prober, ProbeOutcome};
///
/// async fn is_open<P: Prober>(prober: &P, host: &str, port: Port) -> bool {
///     prober.probe(host, port).await == ProbeOutcome::Open
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one port exactly once.
    async fn probe(&self, target: &str, port: Port) -> ProbeOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status() {
        assert_eq!(ProbeOutcome::Open.status(), Some(PortStatus::Open));
        assert_eq!(ProbeOutcome::Closed.status(), Some(PortStatus::Closed));
        assert_eq!(ProbeOutcome::Error("gone".into()).status(), None);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProbeOutcome::Error("gone".into()).to_string(), "error: gone");
    }
}
