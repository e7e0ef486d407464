//! Error types for the sink layer.

use std::io;

use vcd2csv_parser::VcdError;

/// Errors that can occur while selecting signals or rendering output.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The VCD input could not be parsed.
    #[error(transparent)]
    Parse(#[from] VcdError),

    /// Writing the output failed.
    #[error("output I/O error: {0}")]
    Io(#[from] io::Error),

    /// A `--regexp` signal pattern is not a valid regular expression.
    #[error("invalid signal pattern `{pattern}`: {source}")]
    InvalidRegex {
        /// The pattern as given.
        pattern: String,
        /// The regex compiler's error.
        #[source]
        source: regex::Error,
    },
}
