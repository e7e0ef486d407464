//! Streaming CSV rendering.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SinkError;
use crate::projection::{cells, OutputRow};
use crate::writer::RowWriter;

/// Writes rows as delimited text with `\n` line endings.
///
/// A field is quoted only if it contains the delimiter, a quote, `\r` or `\n`;
/// quotes inside it are doubled.
pub struct CsvWriter<W: Write> {
    out: W,
    delimiter: u8,
}

impl<W: Write> CsvWriter<W> {
    /// A comma-separated writer.
    pub fn new(out: W) -> Self {
        Self::with_delimiter(out, b',')
    }

    /// A writer with a custom single-byte delimiter.
    pub fn with_delimiter(out: W, delimiter: u8) -> Self {
        Self { out, delimiter }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record<'a>(&mut self, fields: impl Iterator<Item = &'a str>) -> Result<(), SinkError> {
        for (i, field) in fields.enumerate() {
            if i > 0 {
                self.out.write_all(&[self.delimiter])?;
            }
            self.write_field(field)?;
        }
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn write_field(&mut self, field: &str) -> Result<(), SinkError> {
        let d = self.delimiter;
        let needs_quotes = field
            .bytes()
            .any(|b| b == d || matches!(b, b'"' | b'\r' | b'\n'));
        if !needs_quotes {
            self.out.write_all(field.as_bytes())?;
            return Ok(());
        }
        self.out.write_all(b"\"")?;
        self.out.write_all(field.replace('"', "\"\"").as_bytes())?;
        self.out.write_all(b"\"")?;
        Ok(())
    }
}

impl CsvWriter<BufWriter<File>> {
    /// Creates (or truncates) a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the file cannot be created.
    pub fn create(path: &Path, delimiter: u8) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self::with_delimiter(BufWriter::new(file), delimiter))
    }
}

impl<W: Write> RowWriter for CsvWriter<W> {
    fn write_header(&mut self, columns: &[String]) -> Result<(), SinkError> {
        self.write_record(columns.iter().map(String::as_str))
    }

    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError> {
        let fields: Vec<_> = cells(row).collect();
        self.write_record(fields.iter().map(|c| c.as_ref()))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
