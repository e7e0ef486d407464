//! `vcd2csv -l`: print signal names without reading the body.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use vcd2csv_parser::read_header_file;

use crate::convert::prepare;
use crate::{Cli, GlobalArgs};

/// Prints the matching reference names, or all of them, one per line.
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
    let (selection, _) = prepare(cli, global, dir)?;
    let header = read_header_file(&cli.vcd_path)?;
    for name in selection.resolve(header.signals.references()) {
        writeln!(out, "{name}")?;
    }
    Ok(0)
}
