//! The event interface between the parser and its consumers.
//!
//! A [`WaveformSink`] is told once when the header is complete and then once
//! per time step. [`drive`] runs the whole parse against a sink. Sinks
//! compose: `(A, B)` forwards every event to both.

use std::io::BufRead;

use crate::error::VcdError;
use crate::header::{parse_header, Header, SignalTable};
use crate::lexer::Lexer;
use crate::stream::{CurrentValues, TimeStep, Tracked, ValueChangeStream};

/// A consumer of parse events.
pub trait WaveformSink {
    /// The sink's error type; parse errors convert into it.
    type Error: From<VcdError>;

    /// Called once after `$enddefinitions`. Returns the signals whose changes
    /// should set [`TimeStep::tracked_changed`].
    fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, Self::Error>;

    /// Called for every time step with the value snapshot after it.
    fn on_time_step(
        &mut self,
        step: &TimeStep,
        values: &CurrentValues,
        table: &SignalTable,
    ) -> Result<(), Self::Error>;

    /// Called once after the last step.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S: WaveformSink + ?Sized> WaveformSink for &mut S {
    type Error = S::Error;

    fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, Self::Error> {
        (**self).on_header_complete(header)
    }

    fn on_time_step(
        &mut self,
        step: &TimeStep,
        values: &CurrentValues,
        table: &SignalTable,
    ) -> Result<(), Self::Error> {
        (**self).on_time_step(step, values, table)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        (**self).finish()
    }
}

impl<A, B> WaveformSink for (A, B)
where
    A: WaveformSink,
    B: WaveformSink<Error = A::Error>,
{
    type Error = A::Error;

    fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, Self::Error> {
        let a = self.0.on_header_complete(header)?;
        let b = self.1.on_header_complete(header)?;
        Ok(a.union(b))
    }

    fn on_time_step(
        &mut self,
        step: &TimeStep,
        values: &CurrentValues,
        table: &SignalTable,
    ) -> Result<(), Self::Error> {
        self.0.on_time_step(step, values, table)?;
        self.1.on_time_step(step, values, table)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.0.finish()?;
        self.1.finish()
    }
}

/// Parses a whole VCD stream into `sink`.
///
/// Returns the number of time steps delivered.
///
/// # Errors
///
/// Stops at the first parse or sink error; nothing after it is delivered.
pub fn drive<R: BufRead, S: WaveformSink>(reader: R, sink: &mut S) -> Result<u64, S::Error> {
    let mut lexer = Lexer::new(reader);
    let header = parse_header(&mut lexer)?;
    let tracked = sink.on_header_complete(&header)?;

    let mut stream = ValueChangeStream::new(lexer, &header.signals, tracked);
    while let Some(step) = stream.next_step()? {
        sink.on_time_step(&step, stream.values(), &header.signals)?;
    }
    sink.finish()?;
    Ok(stream.steps_emitted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use std::io::Cursor;

    const VCD: &str = "\
$scope module top $end
$var wire 1 ! clk $end
$var wire 4 \" data $end
$upscope $end
$enddefinitions $end
#0 0! b0000 \"
#10 1!
#20 b0101 \"
";

    #[derive(Default)]
    struct Recorder {
        columns: Vec<String>,
        rows: Vec<(u64, Vec<String>)>,
        tracked: Option<&'static str>,
        finished: bool,
    }

    impl WaveformSink for Recorder {
        type Error = VcdError;

        fn on_header_complete(&mut self, header: &Header) -> Result<Tracked, VcdError> {
            self.columns = header.signals.references().to_vec();
            Ok(match self.tracked {
                Some(name) => Tracked::from_ids(header.signals.ids_for_reference(name).iter().copied()),
                None => Tracked::All,
            })
        }

        fn on_time_step(
            &mut self,
            step: &TimeStep,
            values: &CurrentValues,
            table: &SignalTable,
        ) -> Result<(), VcdError> {
            if step.tracked_changed {
                let row = table.iter().map(|(id, _)| decode(values.get(id))).collect();
                self.rows.push((step.time, row));
            }
            Ok(())
        }

        fn finish(&mut self) -> Result<(), VcdError> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn drive_delivers_every_step() {
        let mut rec = Recorder::default();
        let steps = drive(Cursor::new(VCD), &mut rec).unwrap();
        assert_eq!(steps, 3);
        assert_eq!(rec.columns, ["top.clk", "top.data"]);
        assert_eq!(
            rec.rows,
            vec![
                (0, vec!["0".to_string(), "0".to_string()]),
                (10, vec!["1".to_string(), "0".to_string()]),
                (20, vec!["1".to_string(), "5".to_string()]),
            ]
        );
        assert!(rec.finished);
    }

    #[test]
    fn pair_unions_tracked_sets() {
        let mut pair = (
            Recorder {
                tracked: Some("top.data"),
                ..Recorder::default()
            },
            Recorder {
                tracked: Some("top.clk"),
                ..Recorder::default()
            },
        );
        drive(Cursor::new(VCD), &mut pair).unwrap();
        // Both recorders see the union, so every step is flagged.
        assert_eq!(pair.0.rows.len(), 3);
        assert_eq!(pair.1.rows.len(), 3);
        assert!(pair.0.finished && pair.1.finished);
    }

    #[test]
    fn single_tracked_signal_filters_steps() {
        let mut rec = Recorder {
            tracked: Some("top.data"),
            ..Recorder::default()
        };
        drive(Cursor::new(VCD), &mut rec).unwrap();
        let times: Vec<u64> = rec.rows.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, [0, 20]);
    }

    #[test]
    fn parse_error_stops_before_finish() {
        let mut rec = Recorder::default();
        let src = VCD.replace("#20", "#5");
        let err = drive(Cursor::new(src), &mut rec).unwrap_err();
        assert!(matches!(err, VcdError::OutOfOrderTime { .. }));
        assert!(!rec.finished);
        assert_eq!(rec.rows.len(), 1);
    }
}
