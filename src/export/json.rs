use std::io::Write;

use serde::Serialize;

use crate::{
    core::store::DiveLog,
    dive::DiveRecord,
    stats::summary::Summary,
};

use super::{ExportResult, ExportSink};

#[derive(Serialize)]
struct ExportedDive<'a> {
    #[serde(flatten)]
    record: &'a DiveRecord,
    air_used_bar: u32,
}

#[derive(Serialize)]
struct Document<'a> {
    summary: Summary,
    dives: Vec<ExportedDive<'a>>,
}

/// `{ "summary": .., "dives": [..] }` with photos omitted.
pub struct JsonExport<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonExport<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    pub fn pretty(out: W) -> Self {
        Self { out, pretty: true }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ExportSink for JsonExport<W> {
    fn write_log(&mut self, log: &DiveLog) -> ExportResult<usize> {
        let doc = Document {
            summary: log.summary(),
            dives: log
                .iter()
                .map(|record| ExportedDive {
                    record,
                    air_used_bar: record.air_used_bar(),
                })
                .collect(),
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &doc)?;
        } else {
            serde_json::to_writer(&mut self.out, &doc)?;
        }
        Ok(log.len())
    }

    fn flush(&mut self) -> ExportResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
