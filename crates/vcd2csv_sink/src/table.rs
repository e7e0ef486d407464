//! An in-memory table of projected rows.

use serde::Serialize;

use crate::error::SinkError;
use crate::projection::{OutputRow, TIME_COLUMN};
use crate::writer::RowWriter;

/// Every projected row of a conversion, kept in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<OutputRow>,
}

impl Table {
    /// Column names, `time` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in time order.
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no row was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The time of every row.
    pub fn times(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.time).collect()
    }

    fn value_index(&self, name: &str) -> Option<usize> {
        if name == TIME_COLUMN {
            return None;
        }
        // `columns[0]` is the time column.
        self.columns.iter().skip(1).position(|c| c == name)
    }

    /// Every value of a signal column, or `None` if there is no such column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let i = self.value_index(name)?;
        Some(self.rows.iter().map(|r| r.values[i].as_str()).collect())
    }

    /// The value of a signal column in row `row`.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let i = self.value_index(name)?;
        self.rows.get(row).map(|r| r.values[i].as_str())
    }

    /// Writes the whole table to another renderer.
    pub fn replay_into<W: RowWriter>(&self, writer: &mut W) -> Result<(), SinkError> {
        writer.write_header(&self.columns)?;
        for row in &self.rows {
            writer.write_row(row)?;
        }
        writer.finish()
    }
}

impl RowWriter for Table {
    fn write_header(&mut self, columns: &[String]) -> Result<(), SinkError> {
        self.columns = columns.to_vec();
        Ok(())
    }

    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError> {
        self.rows.push(row.clone());
        Ok(())
    }
}
