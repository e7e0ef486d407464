//! Error types for VCD parsing.
//!
//! Every failure aborts the whole conversion, so each variant carries enough
//! context (token, time, identifier code, position) to be reported directly.

use std::io;

use crate::token::Position;

/// Errors that can occur while reading a VCD stream.
#[derive(Debug, thiserror::Error)]
pub enum VcdError {
    /// An I/O error occurred while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be tokenized or a declaration is structurally invalid.
    #[error("malformed token at {position}: {message}")]
    MalformedToken {
        /// Where the offending token starts.
        position: Position,
        /// Description of the problem.
        message: String,
    },

    /// An identifier code was re-declared with an incompatible width or type.
    #[error(
        "conflicting declaration of identifier `{code}` at {position}: \
         `{reference}` is {found}, previously declared as {expected}"
    )]
    DuplicateIdentifier {
        /// Where the conflicting `$var` starts.
        position: Position,
        /// The identifier code.
        code: String,
        /// Reference name of the conflicting declaration.
        reference: String,
        /// Width and type of the earlier declaration.
        expected: String,
        /// Width and type of the conflicting declaration.
        found: String,
    },

    /// A time marker went backwards.
    #[error("time marker #{time} at {position} is earlier than current time #{previous}")]
    OutOfOrderTime {
        /// Where the time marker starts.
        position: Position,
        /// The time in effect before the marker.
        previous: u64,
        /// The offending time.
        time: u64,
    },

    /// A value change referenced an identifier code that was never declared.
    #[error("value change at {position} references undeclared identifier `{code}`")]
    UnknownIdentifier {
        /// Where the value-change record starts.
        position: Position,
        /// The undeclared identifier code.
        code: String,
    },
}

impl VcdError {
    pub(crate) fn malformed(position: Position, message: impl Into<String>) -> Self {
        Self::MalformedToken {
            position,
            message: message.into(),
        }
    }
}

/// Result alias for parser operations.
pub type VcdResult<T> = Result<T, VcdError>;
