//! Token types produced by the VCD lexer.
//!
//! Defines [`TokenKind`] covering declaration keywords, plain header words,
//! time markers and value-change records, plus the [`Token`] struct pairing a
//! kind with its source [`Position`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based line/column location in the VCD input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Byte column within the line, starting at 1.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and column.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A `$keyword` that opens a declaration or simulation command.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Keyword {
    /// `$date`
    Date,
    /// `$version`
    Version,
    /// `$timescale`
    Timescale,
    /// `$scope`
    Scope,
    /// `$upscope`
    Upscope,
    /// `$var`
    Var,
    /// `$comment`
    Comment,
    /// `$enddefinitions`
    EndDefinitions,
    /// `$dumpvars`
    DumpVars,
    /// `$dumpall`
    DumpAll,
    /// `$dumpon`
    DumpOn,
    /// `$dumpoff`
    DumpOff,
    /// Any other `$word`, stored without the leading `$`.
    Other(String),
}

impl Keyword {
    /// Maps the text after `$` to a keyword. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Self {
        match name {
            "date" => Self::Date,
            "version" => Self::Version,
            "timescale" => Self::Timescale,
            "scope" => Self::Scope,
            "upscope" => Self::Upscope,
            "var" => Self::Var,
            "comment" => Self::Comment,
            "enddefinitions" => Self::EndDefinitions,
            "dumpvars" => Self::DumpVars,
            "dumpall" => Self::DumpAll,
            "dumpon" => Self::DumpOn,
            "dumpoff" => Self::DumpOff,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns `true` for the `$dump*` commands that wrap value changes.
    pub fn is_dump_command(&self) -> bool {
        matches!(
            self,
            Self::DumpVars | Self::DumpAll | Self::DumpOn | Self::DumpOff
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Version => "version",
            Self::Timescale => "timescale",
            Self::Scope => "scope",
            Self::Upscope => "upscope",
            Self::Var => "var",
            Self::Comment => "comment",
            Self::EndDefinitions => "enddefinitions",
            Self::DumpVars => "dumpvars",
            Self::DumpAll => "dumpall",
            Self::DumpOn => "dumpon",
            Self::DumpOff => "dumpoff",
            Self::Other(name) => name,
        };
        write!(f, "${name}")
    }
}

/// The encoding of a value-change record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ChangeKind {
    /// `0!`, `1!`, `x!`, `z!`: one state character glued to the code.
    Scalar,
    /// `b0101 !`: binary vector.
    Vector,
    /// `r1.5 !`: real number.
    Real,
    /// `shello !`: string payload.
    String,
}

/// A VCD token kind.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// A `$keyword` opening a block.
    Keyword(Keyword),
    /// `$end`
    End,
    /// A plain word inside a header declaration.
    Word(String),
    /// A `#<n>` simulation time marker.
    Time(u64),
    /// A value-change record from the body.
    Change {
        /// How the value was encoded.
        kind: ChangeKind,
        /// The raw value with its `b`/`r`/`s` prefix removed.
        value: String,
        /// The identifier code the value applies to.
        code: String,
    },
}

/// A token with its source position.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Where the token starts.
    pub position: Position,
}
