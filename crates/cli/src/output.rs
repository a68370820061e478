use async_trait::async_trait;
use engine_core::sink::{RowSink, SinkControl};
use engine_runtime::sink::RegionalRecord;
use model::{
    records::reserved_instance::ReservedInstance,
    table::{Row, columns},
};
use std::io::Write;
use tracing::warn;

/// Columns shown in table mode. JSON mode always carries every column.
const TABLE_COLUMNS: [(&str, usize); 7] = [
    ("reserved_instance_id", 38),
    ("reservation_name", 24),
    ("instance_type", 22),
    ("instance_count", 14),
    ("state", 16),
    ("payment_option", 18),
    ("region", 14),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    JsonLines,
}

/// Writes each projected row as soon as it arrives. A failed write (for
/// example a closed pipe) stops the query.
pub struct RowWriter<W> {
    out: W,
    format: OutputFormat,
    header_written: bool,
    rows: u64,
}

impl<W: Write + Send> RowWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        RowWriter {
            out,
            format,
            header_written: false,
            rows: 0,
        }
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_row(&mut self, row: &Row) -> std::io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.out, row)?;
                writeln!(self.out)?;
            }
            OutputFormat::Table => {
                if !self.header_written {
                    self.write_cells(|name| name.to_string())?;
                    self.header_written = true;
                }
                self.write_cells(|name| row.display(name))?;
            }
        }
        self.rows += 1;
        self.out.flush()
    }

    fn write_cells(&mut self, cell: impl Fn(&str) -> String) -> std::io::Result<()> {
        let line = TABLE_COLUMNS
            .iter()
            .map(|(name, width)| format!("{:<width$}", cell(name), width = *width))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.out, "{}", line.trim_end())
    }
}

#[async_trait]
impl<W: Write + Send> RowSink<RegionalRecord<ReservedInstance>> for RowWriter<W> {
    async fn emit(&mut self, item: RegionalRecord<ReservedInstance>) -> SinkControl {
        let row = Row::project(&item.record, &item.region);
        match self.write_row(&row) {
            Ok(()) => SinkControl::Continue,
            Err(e) => {
                warn!(error = %e, "Failed to write row. Stopping.");
                SinkControl::Stop
            }
        }
    }
}

/// Print the column catalogue.
pub fn write_columns<W: Write>(mut out: W, as_json: bool) -> Result<(), crate::error::CliError> {
    if as_json {
        serde_json::to_writer_pretty(&mut out, columns())?;
        writeln!(out)?;
        return Ok(());
    }

    for column in columns() {
        writeln!(
            out,
            "{:<32} {:<10} {}",
            column.name, column.ty, column.description
        )?;
    }
    Ok(())
}
