//! Consumers of the VCD event stream.
//!
//! [`Selection`] picks the signals of interest, [`Projection`] fixes the
//! output columns, and [`ProjectionSink`] feeds one [`OutputRow`] per time
//! step into a [`RowWriter`]: [`CsvWriter`] for files, [`Table`] for memory.
//! [`DeltaPrinter`] prints individual value changes instead.

#![warn(missing_docs)]

pub mod csv;
pub mod deltas;
pub mod error;
pub mod projection;
pub mod select;
pub mod table;
pub mod writer;

pub use csv::CsvWriter;
pub use deltas::DeltaPrinter;
pub use error::SinkError;
pub use projection::{cells, Column, OutputRow, Projection, ProjectionSink, TIME_COLUMN};
pub use select::{select_signals, MatchMode, Selection};
pub use table::Table;
pub use writer::RowWriter;
