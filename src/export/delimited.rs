use std::io::Write;

use crate::core::{store::DiveLog, table::Column};

use super::{ExportError, ExportResult, ExportSink};

/// Header row then one row per record; the image column is never written.
/// Depth and coordinates are written unrounded so the file re-imports
/// to the same records.
pub struct CsvExport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExport<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> ExportResult<W> {
        self.writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }
}

impl<W: Write> ExportSink for CsvExport<W> {
    fn write_log(&mut self, log: &DiveLog) -> ExportResult<usize> {
        self.writer
            .write_record(Column::exported().map(Column::header))?;
        for rec in log {
            let row: Vec<String> = Column::exported()
                .map(|c| c.exact_text(rec))
                .collect();
            self.writer.write_record(&row)?;
        }
        Ok(log.len())
    }

    fn flush(&mut self) -> ExportResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Renders `log` as CSV text.
pub fn to_csv_string(log: &DiveLog) -> ExportResult<String> {
    let mut sink = CsvExport::new(Vec::new());
    sink.write_log(log)?;
    let bytes = sink.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
