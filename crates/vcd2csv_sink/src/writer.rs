//! The row renderer interface.

use crate::error::SinkError;
use crate::projection::OutputRow;

/// Renders projected rows: one header, then rows in time order.
pub trait RowWriter {
    /// Writes the column names, `time` first.
    fn write_header(&mut self, columns: &[String]) -> Result<(), SinkError>;

    /// Writes one row; `row.values` lines up with the non-time columns.
    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError>;

    /// Flushes buffered output.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<W: RowWriter + ?Sized> RowWriter for &mut W {
    fn write_header(&mut self, columns: &[String]) -> Result<(), SinkError> {
        (**self).write_header(columns)
    }

    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError> {
        (**self).write_row(row)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}
