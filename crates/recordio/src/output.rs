use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::scan::{ScanEvent, ScanSummary};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RecordOutput {
    Record {
        index: usize,
        size: usize,
        payload: String,
    },
    Skipped {
        index: usize,
        size: u32,
    },
}

impl From<&ScanEvent<'_>> for RecordOutput {
    fn from(event: &ScanEvent<'_>) -> Self {
        match *event {
            ScanEvent::Record { index, payload } => RecordOutput::Record {
                index,
                size: payload.len(),
                payload: payload_preview(payload),
            },
            ScanEvent::Skipped { index, length } => RecordOutput::Skipped {
                index,
                size: length,
            },
        }
    }
}

/// Prints records as a scan produces them.
///
/// JSON, pretty and raw output stream one record at a time; the table is
/// collected and rendered by [`RecordPrinter::finish`].
pub struct RecordPrinter<W: Write> {
    out: W,
    format: OutputFormat,
    table: Option<Table>,
}

impl<W: Write> RecordPrinter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        let table = (format == OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "SIZE", "PAYLOAD"]);
            table
        });
        Self { out, format, table }
    }

    pub fn print(&mut self, event: &ScanEvent<'_>) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&RecordOutput::from(event))
                    .unwrap_or_else(|_| "{}".to_string());
                writeln!(self.out, "{line}")
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(table_row(event));
                }
                Ok(())
            }
            OutputFormat::Pretty => match *event {
                ScanEvent::Record { index, payload } => writeln!(
                    self.out,
                    "#{index} size={} payload={}",
                    payload.len(),
                    payload_preview(payload)
                ),
                ScanEvent::Skipped { index, length } => {
                    writeln!(self.out, "#{index} size={length} skipped")
                }
            },
            OutputFormat::Raw => match *event {
                ScanEvent::Record { payload, .. } => self.out.write_all(payload),
                ScanEvent::Skipped { .. } => Ok(()),
            },
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(table) = self.table.take() {
            writeln!(self.out, "{table}")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

fn table_row(event: &ScanEvent<'_>) -> Vec<String> {
    match *event {
        ScanEvent::Record { index, payload } => vec![
            index.to_string(),
            payload.len().to_string(),
            payload_preview(payload),
        ],
        ScanEvent::Skipped { index, length } => {
            vec![index.to_string(), length.to_string(), "<skipped>".to_string()]
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    path: &'a str,
    #[serde(flatten)]
    summary: &'a ScanSummary,
}

pub fn print_summary<W: Write>(
    out: &mut W,
    path: &str,
    summary: &ScanSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let line = serde_json::to_string(&SummaryOutput { path, summary })
                .unwrap_or_else(|_| "{}".to_string());
            writeln!(out, "{line}")
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["path".to_string(), path.to_string()])
                .add_row(vec!["records".to_string(), summary.records.to_string()])
                .add_row(vec!["skipped".to_string(), summary.skipped.to_string()])
                .add_row(vec![
                    "payload_bytes".to_string(),
                    summary.payload_bytes.to_string(),
                ])
                .add_row(vec!["min_size".to_string(), optional(summary.min_size)])
                .add_row(vec!["max_size".to_string(), optional(summary.max_size)]);
            writeln!(out, "{table}")
        }
        OutputFormat::Pretty => writeln!(
            out,
            "{path}: records={} skipped={} payload_bytes={} min={} max={}",
            summary.records,
            summary.skipped,
            summary.payload_bytes,
            optional(summary.min_size),
            optional(summary.max_size)
        ),
    }
}

fn optional(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
