//! vcd2csv: convert Value Change Dump waveforms to CSV.
//!
//! `vcd2csv wave.vcd` writes `wave.csv` with one row per time step and one
//! column per signal. Signal patterns narrow the columns, `-l` lists names
//! instead of converting, and `-d` prints individual value changes.

#![warn(missing_docs)]

mod convert;
mod list;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use vcd2csv_config::{CliOverrides, SelectMode};
use vcd2csv_sink::MatchMode;

/// Convert VCD (Value Change Dump) files to CSV.
#[derive(Parser, Debug)]
#[command(
    name = "vcd2csv",
    version,
    about = "Convert VCD (Value Change Dump) files to CSV",
    after_help = "Examples:\n  vcd2csv a.vcd\n  vcd2csv a.vcd -c out.csv\n  vcd2csv -l a.vcd\n  vcd2csv a.vcd clk data -x"
)]
pub struct Cli {
    /// The VCD file to read.
    pub vcd_path: PathBuf,

    /// Only use these signals. A signal matches if its name contains the
    /// pattern, unless `--exact` or `--regexp` is given.
    pub signals: Vec<String>,

    /// Print value changes to stdout instead of writing a CSV file.
    #[arg(short, long)]
    pub deltas: bool,

    /// List the matching signal names (all if no patterns) and exit.
    #[arg(short, long)]
    pub list: bool,

    /// CSV output path [default: the input path with a `.csv` extension].
    #[arg(short, long, value_name = "PATH")]
    pub csvfile: Option<PathBuf>,

    /// Patterns must equal the full signal name.
    #[arg(short = 'x', long, conflicts_with = "regexp")]
    pub exact: bool,

    /// Patterns are regular expressions searched in the signal name.
    #[arg(short, long)]
    pub regexp: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a custom `vcd2csv.toml` configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The match mode requested on the command line, if any.
    pub fn overrides(&self) -> CliOverrides {
        let mode = if self.exact {
            Some(SelectMode::Exact)
        } else if self.regexp {
            Some(SelectMode::Regex)
        } else {
            None
        };
        CliOverrides { mode }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

/// Maps the configured mode onto the matcher.
pub fn match_mode(mode: SelectMode) -> MatchMode {
    match mode {
        SelectMode::Substring => MatchMode::Substring,
        SelectMode::Exact => MatchMode::Exact,
        SelectMode::Regex => MatchMode::Regex,
    }
}

fn log_level(global: &GlobalArgs) -> LevelFilter {
    if global.quiet {
        LevelFilter::ERROR
    } else if global.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

fn init_logging(global: &GlobalArgs) {
    // Also installs the bridge for `log` records from the library crates.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(global))
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config.clone(),
    };
    init_logging(&global);

    let mut stdout = std::io::stdout().lock();
    let result = if cli.list {
        list::run(&cli, &global, &mut stdout)
    } else {
        convert::run(&cli, &global, &mut stdout)
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
