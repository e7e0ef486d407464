//! Line-oriented printing of individual value changes.

use std::collections::HashMap;
use std::io::Write;

use vcd2csv_parser::{
    decode, CurrentValues, Header, SignalId, SignalTable, TimeStep, Tracked, WaveformSink,
};

use crate::error::SinkError;
use crate::select::Selection;

/// Prints `<time> <value> <reference>` for every selected signal that changed.
///
/// A signal declared under several selected names is printed once per name.
pub struct DeltaPrinter<W: Write> {
    selection: Selection,
    out: W,
    names: HashMap<SignalId, Vec<String>>,
    lines: u64,
}

impl<W: Write> DeltaPrinter<W> {
    /// Creates a printer writing to `out`.
    pub fn new(selection: Selection, out: W) -> Self {
        Self {
            selection,
            out,
            names: HashMap::new(),
            lines: 0,
        }
    }

    /// Number of lines printed so far.
    pub fn lines_printed(&self) -> u64 {
        self.lines
    }

    /// Returns the output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WaveformSink for DeltaPrinter<W> {
    type Error = SinkError;

    fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, SinkError> {
        let table = &header.signals;
        self.names.clear();
        if self.selection.is_all() {
            for (id, decl) in table.iter() {
                self.names.insert(id, decl.references.clone());
            }
            return Ok(Tracked::All);
        }
        for name in self.selection.resolve(table.references()) {
            for &id in table.ids_for_reference(&name) {
                self.names.entry(id).or_default().push(name.clone());
            }
        }
        Ok(Tracked::from_ids(self.names.keys().copied()))
    }

    fn on_time_step(
        &mut self,
        step: &TimeStep,
        values: &CurrentValues,
        _table: &SignalTable,
    ) -> Result<(), SinkError> {
        for id in &step.changed {
            let Some(names) = self.names.get(id) else {
                continue;
            };
            let value = decode(values.get(*id));
            for name in names {
                writeln!(self.out, "{} {} {}", step.time, value, name)?;
                self.lines += 1;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
