//! Report renderers.

use std::io;

use super::link::ExportFormat;
use super::table::ExportTable;
use crate::error::{PagesError, Result};

/// Writes an [`ExportTable`] as a report document.
///
/// Pdf and spreadsheet output is left to application renderers; the crate
/// ships [`CsvRenderer`].
pub trait ReportRenderer {
    /// Format this renderer produces.
    fn format(&self) -> ExportFormat;

    /// MIME type of the output.
    fn content_type(&self) -> &'static str;

    fn render(&self, table: &ExportTable, out: &mut dyn io::Write) -> Result<()>;

    /// Renders into memory.
    fn render_to_vec(&self, table: &ExportTable) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.render(table, &mut buf)?;
        Ok(buf)
    }
}

/// Comma-separated output: one label row, then one row per record.
#[derive(Debug, Clone, Copy)]
pub struct CsvRenderer {
    delimiter: u8,
}

impl CsvRenderer {
    pub fn new() -> Self {
        CsvRenderer { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Renders `table` as a string.
    pub fn render_to_string(&self, table: &ExportTable) -> Result<String> {
        String::from_utf8(self.render_to_vec(table)?)
            .map_err(|err| PagesError::Render(err.to_string()))
    }
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for CsvRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn render(&self, table: &ExportTable, out: &mut dyn io::Write) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);

        wtr.write_record(table.labels())?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
