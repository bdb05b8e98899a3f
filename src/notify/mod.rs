//! Scan event notification.
//!
//! A [`Notifier`] receives one [`ScanEvent`] per completed scan. Delivery is
//! best-effort: [`dispatch`] swallows errors and panics from the notifier so
//! it can never change a scan's result. [`NoopNotifier`] is the default.

mod jsonl;

pub use jsonl::JsonLinesNotifier;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tracing::{info, warn};

/// Kind of scan event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    OpenPorts,
    NoOpenPorts,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenPorts => write!(f, "OPEN_PORTS"),
            Self::NoOpenPorts => write!(f, "NO_OPEN_PORTS"),
        }
    }
}

/// Event payload details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Open ports, present only for [`EventKind::OpenPorts`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<u16>>,
    /// Number of ports checked.
    pub checked: usize,
    /// Emission time, ISO-8601 UTC with second precision.
    #[serde(serialize_with = "serialize_iso_seconds")]
    pub time: DateTime<Utc>,
}

/// A structured record of one scan's findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub event: EventKind,
    pub target: String,
    pub details: EventDetails,
}

fn serialize_iso_seconds<S: Serializer>(time: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Error type for notifier failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Sink for scan events.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &ScanEvent) -> Result<(), NotifyError>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &ScanEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Emits each event as a structured `tracing` record at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: &ScanEvent) -> Result<(), NotifyError> {
        info!(
            event = %event.event,
            target = %event.target,
            ports = ?event.details.ports,
            checked = event.details.checked,
            time = %event.details.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            "scan event"
        );
        Ok(())
    }
}

/// Fans one event out to several notifiers, attempting every one.
#[derive(Default)]
pub struct MultiNotifier {
    sinks: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl Notifier + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(&self, event: &ScanEvent) -> Result<(), NotifyError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.notify(event).await {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Deliver `event` to `notifier`, absorbing any failure.
///
/// Returns true if the notifier accepted the event.
pub async fn dispatch(notifier: &dyn Notifier, event: &ScanEvent) -> bool {
    match AssertUnwindSafe(notifier.notify(event)).catch_unwind().await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(target_host = %event.target, error = %e, "event notification failed");
            false
        }
        Err(_) => {
            warn!(target_host = %event.target, "event notifier panicked");
            false
        }
    }
}
