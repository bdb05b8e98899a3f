//! Append-only, human-readable results file.
//!
//! Each scan appends a block:
//!
//! ```text
//! Scan Results for 10.0.0.5 (Ports 20-25) - 2024-05-01T12:30:00Z
//! CLOSED 20/tcp on 10.0.0.5
//! OPEN 22/tcp on 10.0.0.5
//! ...
//!
//! ```

use crate::config::Paths;
use crate::error::{StorageError, StorageResult};
use crate::scanner::ScanResult;
use crate::types::PortSet;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File that scan summaries are appended to.
#[derive(Debug, Clone)]
pub struct ResultsFile {
    path: PathBuf,
}

impl ResultsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The results file in the application data directory.
    pub fn default_location() -> StorageResult<Self> {
        Ok(Self::new(Paths::get()?.results_file()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the block for `result`, returning the file path.
    pub fn append(&self, result: &ScanResult, ports: &PortSet) -> StorageResult<&Path> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::DirectoryError(e.to_string()))?;
        }

        let block = render(result, ports, Utc::now());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::SaveFailed(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(block.as_bytes())
            .map_err(|e| StorageError::SaveFailed(e.to_string()))?;

        Ok(&self.path)
    }
}

/// One status line per probed port.
pub fn status_lines(result: &ScanResult) -> Vec<String> {
    result
        .results
        .iter()
        .map(|r| format!("{} {}/tcp on {}", r.status, r.port, result.target))
        .collect()
}

/// Render the block appended for one scan.
pub fn render(result: &ScanResult, ports: &PortSet, time: DateTime<Utc>) -> String {
    let mut block = format!(
        "Scan Results for {} (Ports {}) - {}\n",
        result.target,
        ports,
        time.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    for line in status_lines(result) {
        block.push_str(&line);
        block.push('\n');
    }
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, PortStatus};
    use crate::types::{parse_port_spec, Port, Target};
    use chrono::TimeZone;

    fn sample() -> (ScanResult, PortSet) {
        let ports = parse_port_spec("21-23");
        let results = ports.iter().map(|p| {
            let status = if p.as_u16() == 22 { PortStatus::Open } else { PortStatus::Closed };
            PortResult::new(p, status)
        });
        let result = ScanResult::aggregate(
            Target::new("10.0.0.5").unwrap(),
            results,
            false,
            Utc::now(),
            3,
        );
        (result, ports)
    }

    #[test]
    fn test_render_format() {
        let (result, ports) = sample();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        assert_eq!(
            render(&result, &ports, time),
            "Scan Results for 10.0.0.5 (Ports 21-23) - 2024-05-01T12:30:00Z\n\
             CLOSED 21/tcp on 10.0.0.5\n\
             OPEN 22/tcp on 10.0.0.5\n\
             CLOSED 23/tcp on 10.0.0.5\n\
             \n"
        );
    }

    #[test]
    fn test_append_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let file = ResultsFile::new(dir.path().join("results").join("scan_results.txt"));
        let (result, ports) = sample();

        file.append(&result, &ports).unwrap();
        file.append(&result, &ports).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.matches("Scan Results for 10.0.0.5").count(), 2);
        assert_eq!(content.lines().filter(|l| l.starts_with("OPEN ")).count(), 2);
        assert!(content.contains(&format!("OPEN {}/tcp", Port::new(22).unwrap())));
    }
}
