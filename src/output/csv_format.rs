//! CSV output formatting.

use crate::scanner::ScanResult;
use std::io::{self, Write};

/// Write one `target,port,status` row per probed port.
pub fn write_csv<W: Write>(out: W, result: &ScanResult) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["target", "port", "status"])?;
    for r in &result.results {
        let port = r.port.to_string();
        let status = r.status.to_string();
        wtr.write_record([result.target.as_str(), port.as_str(), status.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
