//! Timescale parsing for the `$timescale` declaration.
//!
//! VCD timestamps are integers counted in timescale units. The CSV keeps the
//! raw counts; [`Timescale`] is kept on the header for reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A timescale unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Microseconds.
    Us,
    /// Nanoseconds.
    Ns,
    /// Picoseconds.
    Ps,
    /// Femtoseconds.
    Fs,
}

impl TimeUnit {
    fn from_suffix(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" => Some(Self::S),
            "ms" => Some(Self::Ms),
            "us" => Some(Self::Us),
            "ns" => Some(Self::Ns),
            "ps" => Some(Self::Ps),
            "fs" => Some(Self::Fs),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::S => "s",
            Self::Ms => "ms",
            Self::Us => "us",
            Self::Ns => "ns",
            Self::Ps => "ps",
            Self::Fs => "fs",
        }
    }
}

/// The `$timescale` of a VCD file, e.g. `10 ns`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Timescale {
    /// 1, 10 or 100.
    pub magnitude: u32,
    /// The unit the magnitude is counted in.
    pub unit: TimeUnit,
}

impl Timescale {
    /// Parses the body of a `$timescale` block.
    ///
    /// Accepts the number and unit glued (`1ns`) or split (`1 ns`); the
    /// caller joins the block's words first. A missing number means 1.
    pub fn parse(body: &str) -> Result<Self, String> {
        let s: String = body.split_whitespace().collect();
        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (num_str, unit_str) = s.split_at(digit_end);

        let magnitude = if num_str.is_empty() {
            1
        } else {
            num_str
                .parse::<u32>()
                .map_err(|_| format!("invalid timescale number `{num_str}`"))?
        };
        if !matches!(magnitude, 1 | 10 | 100) {
            return Err(format!(
                "timescale magnitude must be 1, 10 or 100, got {magnitude}"
            ));
        }

        let unit = TimeUnit::from_suffix(unit_str)
            .ok_or_else(|| format!("unknown timescale unit `{unit_str}`"))?;
        Ok(Self { magnitude, unit })
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}
