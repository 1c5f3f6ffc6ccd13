pub mod config;
pub mod error;
pub mod export;

pub use config::{Config, DEFAULT_OUTPUT_PATH};
pub use error::{ExportError, Result};
pub use export::{
    extract_row, fetch_records, run_export, write_csv, EventRow, ExportSummary, MISSING_VALUE,
};
