//! Append-only JSON lines event log.

use super::{NotifyError, Notifier, ScanEvent};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Appends each event as one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesNotifier {
    path: PathBuf,
}

impl JsonLinesNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Notifier for JsonLinesNotifier {
    async fn notify(&self, event: &ScanEvent) -> Result<(), NotifyError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{EventDetails, EventKind};
    use chrono::Utc;

    fn event(checked: usize) -> ScanEvent {
        ScanEvent {
            event: EventKind::NoOpenPorts,
            target: "db.internal".into(),
            details: EventDetails {
                ports: None,
                checked,
                time: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let notifier = JsonLinesNotifier::new(&path);

        notifier.notify(&event(10)).await.unwrap();
        notifier.notify(&event(20)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: ScanEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.details.checked, 20);
        assert_eq!(second.target, "db.internal");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let notifier = JsonLinesNotifier::new(dir.path());
        assert!(notifier.notify(&event(1)).await.is_err());
    }
}
