//! Single-pass streaming parser for Value Change Dump (VCD) files.
//!
//! The parser never loads the whole file: the [`Lexer`] reads one line at a
//! time, [`parse_header`] builds the frozen [`SignalTable`], and
//! [`ValueChangeStream`] walks the body, producing one [`TimeStep`] per time
//! marker together with a snapshot of [`CurrentValues`].
//!
//! # Usage
//!
//! ```ignore
//! use vcd2csv_parser::{decode, parse_header, Lexer, Tracked, ValueChangeStream};
//!
//! let mut lexer = Lexer::new(reader);
//! let header = parse_header(&mut lexer)?;
//! let mut stream = ValueChangeStream::new(lexer, &header.signals, Tracked::All);
//! while let Some(step) = stream.next_step()? {
//!     for (id, decl) in header.signals.iter() {
//!         println!("{} {} {}", step.time, decl.primary_reference(), decode(stream.values().get(id)));
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - `token`: Token kinds and source positions
//! - `lexer`: Line-buffered tokenizer
//! - `header`: Declaration parsing and the signal table
//! - `stream`: Time-step processing over the body
//! - `decode`: Hex/pass-through display decoding
//! - `sink`: The `WaveformSink` event interface and `drive`
//! - `time`: `$timescale` units

#![warn(missing_docs)]

pub mod decode;
pub mod error;
pub mod header;
pub mod lexer;
pub mod sink;
pub mod stream;
pub mod time;
pub mod token;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use decode::decode;
pub use error::{VcdError, VcdResult};
pub use header::{parse_header, Header, SignalDeclaration, SignalId, SignalTable, VarType};
pub use lexer::Lexer;
pub use sink::{drive, WaveformSink};
pub use stream::{CurrentValues, TimeStep, Tracked, ValueChangeStream};
pub use time::{TimeUnit, Timescale};
pub use token::{Position, Token, TokenKind};

/// Opens a VCD file for buffered reading.
///
/// # Errors
///
/// Returns [`VcdError::Io`] if the file cannot be opened.
pub fn open_vcd_file(path: &Path) -> VcdResult<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Reads only the header of a VCD file; the body is never touched.
///
/// # Errors
///
/// Returns [`VcdError`] on I/O or header parse errors.
pub fn read_header_file(path: &Path) -> VcdResult<Header> {
    let mut lexer = Lexer::new(open_vcd_file(path)?);
    parse_header(&mut lexer)
}
