//! Value-change stream processing.
//!
//! [`ValueChangeStream`] walks the body of a VCD file after the header has
//! been parsed. Value changes accumulate into [`CurrentValues`]; every time
//! marker closes the step in progress and hands it to the caller as a
//! [`TimeStep`]. End of input closes the last step.

use std::collections::BTreeSet;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{VcdError, VcdResult};
use crate::header::{SignalId, SignalTable};
use crate::lexer::Lexer;
use crate::token::{Position, TokenKind};

/// The raw value that every signal holds before its first value change.
pub const INITIAL_VALUE: &str = "x";

/// The latest raw value of every declared signal.
///
/// Only the stream processor can write to it; sinks receive it by `&`.
#[derive(Clone, Debug)]
pub struct CurrentValues {
    values: Vec<String>,
    assigned: Vec<bool>,
}

impl CurrentValues {
    fn new(len: usize) -> Self {
        Self {
            values: vec![INITIAL_VALUE.to_string(); len],
            assigned: vec![false; len],
        }
    }

    /// The raw value of a signal (`0`/`1`/`x`/`z` string, real or string payload).
    pub fn get(&self, id: SignalId) -> &str {
        &self.values[id.index()]
    }

    /// Returns `true` once any value change has been seen for the signal.
    pub fn is_assigned(&self, id: SignalId) -> bool {
        self.assigned[id.index()]
    }

    /// Number of signals.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table had no signals.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, id: SignalId, value: String) {
        let i = id.index();
        self.assigned[i] = true;
        self.values[i] = value;
    }
}

/// The signals whose changes decide the [`TimeStep::tracked_changed`] flag.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Tracked {
    /// Every signal is tracked.
    #[default]
    All,
    /// Only the listed signals are tracked.
    Only(BTreeSet<SignalId>),
}

impl Tracked {
    /// Tracks the given signals; an empty set tracks everything.
    pub fn from_ids(ids: impl IntoIterator<Item = SignalId>) -> Self {
        let set: BTreeSet<SignalId> = ids.into_iter().collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    /// Returns `true` if changes of `id` are tracked.
    pub fn contains(&self, id: SignalId) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&id),
        }
    }

    /// Tracks everything either side tracks.
    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (Self::Only(mut a), Self::Only(b)) => {
                a.extend(b);
                Self::Only(a)
            }
            _ => Self::All,
        }
    }
}

/// All value changes that happened at one simulation time.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TimeStep {
    /// The simulation time, in timescale units.
    pub time: u64,
    /// Signals with at least one value-change record in this step, in order
    /// of their first record.
    pub changed: Vec<SignalId>,
    /// Whether any tracked signal changed in this step.
    pub tracked_changed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum StreamState {
    AwaitingTime,
    Accumulating { time: u64 },
    Finished,
}

/// Pull-based processor over the VCD body.
///
/// ```ignore
/// let mut lexer = Lexer::new(reader);
/// let header = parse_header(&mut lexer)?;
/// let mut stream = ValueChangeStream::new(lexer, &header.signals, Tracked::All);
/// while let Some(step) = stream.next_step()? {
///     println!("{} {}", step.time, stream.values().get(id));
/// }
/// ```
pub struct ValueChangeStream<'a, R> {
    lexer: Lexer<R>,
    table: &'a SignalTable,
    tracked: Tracked,
    values: CurrentValues,
    state: StreamState,
    changed: Vec<SignalId>,
    changed_mask: Vec<bool>,
    tracked_changed: bool,
    steps: u64,
}

impl<'a, R: BufRead> ValueChangeStream<'a, R> {
    /// Creates a stream over a lexer that [`parse_header`](crate::parse_header)
    /// has already advanced past `$enddefinitions`.
    pub fn new(lexer: Lexer<R>, table: &'a SignalTable, tracked: Tracked) -> Self {
        debug_assert!(lexer.in_body(), "stream created before the header was parsed");
        Self {
            lexer,
            table,
            tracked,
            values: CurrentValues::new(table.len()),
            state: StreamState::AwaitingTime,
            changed: Vec::new(),
            changed_mask: vec![false; table.len()],
            tracked_changed: false,
            steps: 0,
        }
    }

    /// The value snapshot as of the last returned step.
    pub fn values(&self) -> &CurrentValues {
        &self.values
    }

    /// The signal table the stream resolves identifier codes against.
    pub fn table(&self) -> &'a SignalTable {
        self.table
    }

    /// Number of steps returned so far.
    pub fn steps_emitted(&self) -> u64 {
        self.steps
    }

    /// Advances to the next time step.
    ///
    /// Returns `None` once the input is exhausted and the final step has been
    /// returned. Changes that precede the first time marker belong to the
    /// first step; a body with changes but no marker yields one step at 0.
    ///
    /// # Errors
    ///
    /// Returns [`VcdError::OutOfOrderTime`] when a marker decreases,
    /// [`VcdError::UnknownIdentifier`] for an undeclared code, plus any
    /// lexer error.
    pub fn next_step(&mut self) -> VcdResult<Option<TimeStep>> {
        if self.state == StreamState::Finished {
            return Ok(None);
        }

        loop {
            let Some(token) = self.lexer.next_token()? else {
                let pending = match self.state {
                    StreamState::Accumulating { time } => Some(time),
                    StreamState::AwaitingTime if !self.changed.is_empty() => Some(0),
                    _ => None,
                };
                self.state = StreamState::Finished;
                let step = pending.map(|time| self.take_step(time));
                log::debug!(
                    "body: {} time steps from {} lines",
                    self.steps,
                    self.lexer.lines_read()
                );
                return Ok(step);
            };

            match token.kind {
                TokenKind::Time(next) => match self.state {
                    StreamState::Accumulating { time } => {
                        if next < time {
                            return Err(VcdError::OutOfOrderTime {
                                position: token.position,
                                previous: time,
                                time: next,
                            });
                        }
                        let step = self.take_step(time);
                        self.state = StreamState::Accumulating { time: next };
                        return Ok(Some(step));
                    }
                    StreamState::AwaitingTime | StreamState::Finished => {
                        self.state = StreamState::Accumulating { time: next };
                    }
                },
                TokenKind::Change { value, code, .. } => {
                    self.apply(code, value, token.position)?;
                }
                // `$dumpvars` and friends only bracket value changes.
                TokenKind::Keyword(_) | TokenKind::End | TokenKind::Word(_) => {}
            }
        }
    }

    fn apply(&mut self, code: String, value: String, position: Position) -> VcdResult<()> {
        let Some(id) = self.table.lookup_code(&code) else {
            return Err(VcdError::UnknownIdentifier { position, code });
        };
        // Every record counts, including one that repeats the current value.
        self.values.set(id, value);
        if !self.changed_mask[id.index()] {
            self.changed_mask[id.index()] = true;
            self.changed.push(id);
        }
        if self.tracked.contains(id) {
            self.tracked_changed = true;
        }
        Ok(())
    }

    fn take_step(&mut self, time: u64) -> TimeStep {
        for id in &self.changed {
            self.changed_mask[id.index()] = false;
        }
        self.steps += 1;
        TimeStep {
            time,
            changed: std::mem::take(&mut self.changed),
            tracked_changed: std::mem::replace(&mut self.tracked_changed, false),
        }
    }
}
