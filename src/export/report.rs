use std::io::Write;

use crate::core::{store::DiveLog, table::TableRow};

use super::{ExportResult, ExportSink};

pub const REPORT_TITLE: &str = "Dive Log Summary";
pub const RECORD_SEPARATOR: &str = "---";

/// Line layout handed to a page renderer: a title, then one `Key: Value`
/// line per field for each record followed by a separator line. Photos
/// are left out.
pub struct ReportExport<W: Write> {
    out: W,
}

impl<W: Write> ReportExport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ExportSink for ReportExport<W> {
    fn write_log(&mut self, log: &DiveLog) -> ExportResult<usize> {
        writeln!(self.out, "{REPORT_TITLE}")?;
        for rec in log {
            for (column, cell) in TableRow::project(rec, false).cells {
                writeln!(self.out, "{column}: {cell}")?;
            }
            writeln!(self.out, "{RECORD_SEPARATOR}")?;
        }
        Ok(log.len())
    }

    fn flush(&mut self) -> ExportResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Report lines for `log`, title first.
pub fn report_lines(log: &DiveLog) -> Vec<String> {
    let mut lines = vec![REPORT_TITLE.to_string()];
    for rec in log {
        lines.extend(
            TableRow::project(rec, false)
                .cells
                .into_iter()
                .map(|(column, cell)| format!("{column}: {cell}")),
        );
        lines.push(RECORD_SEPARATOR.to_string());
    }
    lines
}
