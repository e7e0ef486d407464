//! The default command: convert a VCD file to CSV, or print its deltas.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use vcd2csv_config::{load_optional_config, resolve_options, ResolvedOptions};
use vcd2csv_parser::{drive, open_vcd_file};
use vcd2csv_sink::{CsvWriter, DeltaPrinter, ProjectionSink, Selection};

use crate::{match_mode, Cli, GlobalArgs};

/// Loads the configuration, applies the command-line overrides and compiles
/// the signal patterns.
///
/// The configuration file is `--config` if given, else `vcd2csv.toml` in
/// `dir` if it exists.
pub fn prepare(
    cli: &Cli,
    global: &GlobalArgs,
    dir: &Path,
) -> Result<(Selection, ResolvedOptions), Box<dyn Error>> {
    let config = load_optional_config(global.config.as_deref(), dir)?;
    let options = resolve_options(&config, cli.overrides());
    log::debug!("options: {options:?}");
    let selection = Selection::new(&cli.signals, match_mode(options.mode))?;
    Ok((selection, options))
}

/// The CSV path: `--csvfile`, or the input path with its extension replaced.
pub fn csv_path(cli: &Cli) -> PathBuf {
    cli.csvfile
        .clone()
        .unwrap_or_else(|| cli.vcd_path.with_extension("csv"))
}

/// Runs the conversion; status lines go to `out`.
pub fn run(cli: &Cli, global: &GlobalArgs, out: &mut impl Write) -> Result<i32, Box<dyn Error>> {
    let dir = std::env::current_dir()?;
    run_in(cli, global, &dir, out)
}

fn run_in(
    cli: &Cli,
    global: &GlobalArgs,
    dir: &Path,
    out: &mut impl Write,
) -> Result<i32, Box<dyn Error>> {
    let (selection, options) = prepare(cli, global, dir)?;
    let reader = open_vcd_file(&cli.vcd_path)?;

    if cli.deltas {
        let mut printer = DeltaPrinter::new(selection, &mut *out);
        drive(reader, &mut printer)?;
        log::debug!("printed {} changes", printer.lines_printed());
        return Ok(0);
    }

    let csv = csv_path(cli);
    if !global.quiet {
        eprintln!("   Converting {} -> {}", cli.vcd_path.display(), csv.display());
    }
    let writer = CsvWriter::create(&csv, options.delimiter)?;
    let mut sink =
        ProjectionSink::new(selection, writer).suppress_unchanged(options.suppress_unchanged);
    let steps = drive(reader, &mut sink)?;
    log::debug!("{steps} time steps, {} rows", sink.rows_written());

    writeln!(out, "{} saved", csv.display())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const VCD: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 4 \" data $end
$upscope $end
$enddefinitions $end
#0 0! b0000 \"
#10 1!
#20 b0101 \"
";

    fn global(cli: &Cli) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: cli.config.clone(),
        }
    }

    fn run_args(dir: &Path, args: &[&str]) -> Result<String, Box<dyn Error>> {
        let cli = Cli::parse_from(std::iter::once("vcd2csv").chain(args.iter().copied()));
        let mut out = Vec::new();
        run_in(&cli, &global(&cli), dir, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn write_vcd(dir: &Path) -> PathBuf {
        let path = dir.join("wave.vcd");
        std::fs::write(&path, VCD).unwrap();
        path
    }

    #[test]
    fn default_csv_path_replaces_extension() {
        let cli = Cli::parse_from(["vcd2csv", "dumps/wave.vcd"]);
        assert_eq!(csv_path(&cli), PathBuf::from("dumps/wave.csv"));
        let cli = Cli::parse_from(["vcd2csv", "wave"]);
        assert_eq!(csv_path(&cli), PathBuf::from("wave.csv"));
        let cli = Cli::parse_from(["vcd2csv", "wave.vcd", "-c", "x.txt"]);
        assert_eq!(csv_path(&cli), PathBuf::from("x.txt"));
    }

    #[test]
    fn converts_to_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let vcd = write_vcd(dir.path());
        let out = run_args(dir.path(), &[vcd.to_str().unwrap()]).unwrap();

        let csv = dir.path().join("wave.csv");
        assert_eq!(out, format!("{} saved\n", csv.display()));
        assert_eq!(
            std::fs::read_to_string(csv).unwrap(),
            "time,top.clk,top.data\n0,0,0\n10,1,0\n20,1,5\n"
        );
    }

    #[test]
    fn explicit_csv_and_exact_selection() {
        let dir = tempfile::tempdir().unwrap();
        let vcd = write_vcd(dir.path());
        let csv = dir.path().join("out.csv");
        run_args(
            dir.path(),
            &[vcd.to_str().unwrap(), "top.data", "-x", "-c", csv.to_str().unwrap()],
        )
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(csv).unwrap(),
            "time,top.data\n0,0\n20,5\n"
        );
    }

    #[test]
    fn step_without_selected_change_is_dropped_by_default() {
        // Only clk changes at #10.
        let dir = tempfile::tempdir().unwrap();
        let vcd = write_vcd(dir.path());
        run_args(dir.path(), &[vcd.to_str().unwrap(), "data"]).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("wave.csv")).unwrap(),
            "time,top.data\n0,0\n20,5\n"
        );
    }

    #[test]
    fn config_in_dir_sets_delimiter_and_keeps_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let vcd = write_vcd(dir.path());
        std::fs::write(
            dir.path().join("vcd2csv.toml"),
            "[output]\ndelimiter = \";\"\nsuppress_unchanged = false\n",
        )
        .unwrap();
        run_args(dir.path(), &[vcd.to_str().unwrap(), "data"]).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("wave.csv")).unwrap(),
            "time;top.data\n0;0\n10;0\n20;5\n"
        );
    }

    #[test]
    fn deltas_print_to_out_without_csv() {
        let dir = tempfile::tempdir().unwrap();
        let vcd = write_vcd(dir.path());
        let out = run_args(dir.path(), &[vcd.to_str().unwrap(), "-d", "clk"]).unwrap();
        assert_eq!(out, "0 0 top.clk\n10 1 top.clk\n");
        assert!(!dir.path().join("wave.csv").exists());
    }

    #[test]
    fn invalid_regex_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_args(dir.path(), &["missing.vcd", "-r", "(clk"]).unwrap_err();
        assert!(err.to_string().starts_with("invalid signal pattern `(clk`"));
    }

    #[test]
    fn missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.vcd");
        assert!(run_args(dir.path(), &[missing.to_str().unwrap()]).is_err());
    }

    #[test]
    fn malformed_body_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.vcd");
        std::fs::write(&path, VCD.replace("#20", "#5")).unwrap();
        let err = run_args(dir.path(), &[path.to_str().unwrap()]).unwrap_err();
        assert!(err.to_string().contains("line 9"), "{err}");
    }
}
