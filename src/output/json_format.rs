//! JSON output formatting.

use crate::scanner::ScanResult;
use std::io::{self, Write};

/// Write results as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, result: &ScanResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, result)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, PortStatus};
    use crate::types::{Port, Target};
    use chrono::Utc;

    #[test]
    fn test_json_fields() {
        let result = ScanResult::aggregate(
            Target::new("127.0.0.1").unwrap(),
            vec![PortResult::new(Port::new(22).unwrap(), PortStatus::Open)],
            false,
            Utc::now(),
            5,
        );
        let mut buf = Vec::new();
        write_json(&mut buf, &result).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["target"], "127.0.0.1");
        assert_eq!(value["open_ports"], serde_json::json!([22]));
        assert_eq!(value["results"][0]["status"], "OPEN");
        assert_eq!(value["checked"], 1);
    }
}
