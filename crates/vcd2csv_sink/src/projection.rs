//! Projection of the full value snapshot onto the selected output columns.
//!
//! [`Projection`] fixes the column list once the header is known; it never
//! changes afterwards. [`ProjectionSink`] turns every time step into an
//! [`OutputRow`] and hands it to a [`RowWriter`].

use serde::Serialize;
use vcd2csv_parser::{
    decode, CurrentValues, Header, SignalId, SignalTable, TimeStep, Tracked, WaveformSink,
};

use crate::error::SinkError;
use crate::select::Selection;
use crate::writer::RowWriter;

/// The name of the first output column.
pub const TIME_COLUMN: &str = "time";

/// One output column: a reference name and the signal it reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// The reference name used as the column heading.
    pub name: String,
    /// The signal whose value fills the column.
    pub id: SignalId,
}

/// One rendered row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    /// The simulation time.
    pub time: u64,
    /// Decoded values, one per signal column.
    pub values: Vec<String>,
}

/// The fixed column layout of one conversion.
#[derive(Clone, Debug)]
pub struct Projection {
    columns: Vec<Column>,
    header: Vec<String>,
    tracked: Tracked,
}

impl Projection {
    /// Builds the column list for `table`.
    ///
    /// With no patterns the columns are the first reference name of every
    /// declaration, sorted, and every signal is tracked. Otherwise they follow
    /// the selection order and only the selected signals are tracked; an
    /// empty selection tracks everything.
    pub fn new(table: &SignalTable, selection: &Selection) -> Self {
        let columns: Vec<Column> = if selection.is_all() {
            let mut names: Vec<(&str, SignalId)> = table
                .iter()
                .map(|(id, decl)| (decl.primary_reference(), id))
                .collect();
            names.sort();
            names.dedup_by(|a, b| a.0 == b.0);
            names
                .into_iter()
                .map(|(name, id)| Column {
                    name: name.to_string(),
                    id,
                })
                .collect()
        } else {
            selection
                .resolve(table.references())
                .into_iter()
                .filter_map(|name| {
                    let id = *table.ids_for_reference(&name).first()?;
                    Some(Column { name, id })
                })
                .collect()
        };

        let tracked = if selection.is_all() {
            Tracked::All
        } else {
            Tracked::from_ids(columns.iter().map(|c| c.id))
        };

        let header = std::iter::once(TIME_COLUMN.to_string())
            .chain(columns.iter().map(|c| c.name.clone()))
            .collect();

        log::debug!("projecting {} of {} signals", columns.len(), table.len());
        Self {
            columns,
            header,
            tracked,
        }
    }

    /// Column names, `time` first.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// The signal columns, without `time`.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The signals whose changes are tracked.
    pub fn tracked(&self) -> &Tracked {
        &self.tracked
    }

    /// Returns `true` if any tracked signal has a record in `step`.
    pub fn changed_in(&self, step: &TimeStep) -> bool {
        step.changed.iter().any(|&id| self.tracked.contains(id))
    }

    /// Decodes the current value of every column.
    pub fn row(&self, time: u64, values: &CurrentValues) -> OutputRow {
        OutputRow {
            time,
            values: self
                .columns
                .iter()
                .map(|c| decode(values.get(c.id)))
                .collect(),
        }
    }
}

/// Renders the cells of a row, the time first.
pub fn cells(row: &OutputRow) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
    std::iter::once(std::borrow::Cow::Owned(row.time.to_string()))
        .chain(row.values.iter().map(|v| std::borrow::Cow::Borrowed(v.as_str())))
}

/// A [`WaveformSink`] that writes one projected row per time step.
pub struct ProjectionSink<W> {
    selection: Selection,
    writer: W,
    suppress_unchanged: bool,
    projection: Option<Projection>,
    rows_written: u64,
}

impl<W: RowWriter> ProjectionSink<W> {
    /// Creates a sink that writes every step.
    pub fn new(selection: Selection, writer: W) -> Self {
        Self {
            selection,
            writer,
            suppress_unchanged: false,
            projection: None,
            rows_written: 0,
        }
    }

    /// Drops steps in which no tracked signal changed.
    pub fn suppress_unchanged(mut self, suppress: bool) -> Self {
        self.suppress_unchanged = suppress;
        self
    }

    /// The projection, once the header has been seen.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: RowWriter> WaveformSink for ProjectionSink<W> {
    type Error = SinkError;

    fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, SinkError> {
        let projection = Projection::new(&header.signals, &self.selection);
        self.writer.write_header(projection.header())?;
        let tracked = projection.tracked().clone();
        self.projection = Some(projection);
        Ok(tracked)
    }

    fn on_time_step(
        &mut self,
        step: &TimeStep,
        values: &CurrentValues,
        _table: &SignalTable,
    ) -> Result<(), SinkError> {
        debug_assert!(self.projection.is_some(), "time step before the header");
        let Some(projection) = &self.projection else {
            return Ok(());
        };
        // `step.tracked_changed` may be a union with other sinks' signals.
        if self.suppress_unchanged && !projection.changed_in(step) {
            return Ok(());
        }
        let row = projection.row(step.time, values);
        self.writer.write_row(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        log::debug!("wrote {} rows", self.rows_written);
        self.writer.finish()
    }
}
