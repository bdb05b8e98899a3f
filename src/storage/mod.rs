//! Scan result persistence.
//!
//! Two stores: the human-readable results file that scan summaries are
//! appended to, and a JSON history with one file per scan.

mod json_store;
mod results_file;

pub use json_store::{ScanRecord, ScanStore};
pub use results_file::ResultsFile;
