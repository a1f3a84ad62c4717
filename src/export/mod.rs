//! Export sinks: the only way a session's log leaves memory.

/// CSV table export.
pub mod delimited;
/// JSON document export.
pub mod json;
/// "Key: Value" report blocks for printable output.
pub mod report;

use thiserror::Error;

use crate::core::store::DiveLog;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Destination for a whole log, written in current log order.
pub trait ExportSink {
    /// Writes every record and returns how many were written.
    fn write_log(&mut self, log: &DiveLog) -> ExportResult<usize>;
    fn flush(&mut self) -> ExportResult<()> {
        Ok(())
    }
}
