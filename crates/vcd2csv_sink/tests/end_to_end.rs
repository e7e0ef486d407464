use std::io::Cursor;

use vcd2csv_parser::{drive, read_header_file, VcdError};
use vcd2csv_sink::{
    CsvWriter, DeltaPrinter, MatchMode, ProjectionSink, RowWriter, Selection, SinkError, Table,
};

const CLK_DATA: &str = "\
$date today $end
$version test bench $end
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 4 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
b0000 \"
#10
1!
#20
b0101 \"
";

fn to_csv(src: &str, selection: Selection, suppress: bool) -> Result<String, SinkError> {
    let mut sink =
        ProjectionSink::new(selection, CsvWriter::new(Vec::new())).suppress_unchanged(suppress);
    drive(Cursor::new(src), &mut sink)?;
    Ok(String::from_utf8(sink.into_writer().into_inner()).unwrap())
}

#[test]
fn default_conversion() {
    let csv = to_csv(CLK_DATA, Selection::all(), false).unwrap();
    assert_eq!(csv, "time,top.clk,top.data\n0,0,0\n10,1,0\n20,1,5\n");
}

#[test]
fn timestamps_follow_markers() {
    let src = "\
$var wire 1 ! a $end
$enddefinitions $end
#0 0!
#3
#3 1!
#100 0!
";
    let mut sink = ProjectionSink::new(Selection::all(), Table::default());
    drive(Cursor::new(src), &mut sink).unwrap();
    let table = sink.into_writer();
    assert_eq!(table.times(), [0, 3, 3, 100]);
    assert_eq!(table.column("a").unwrap(), ["0", "0", "1", "0"]);
}

#[test]
fn deltas_on_tracked_signal() {
    // Only clk changes at #10: tracking data drops that row, tracking clk keeps it.
    let data = Selection::new(&["top.data"], MatchMode::Exact).unwrap();
    assert_eq!(
        to_csv(CLK_DATA, data, true).unwrap(),
        "time,top.data\n0,0\n20,5\n"
    );
    let clk = Selection::new(&["top.clk"], MatchMode::Exact).unwrap();
    assert_eq!(
        to_csv(CLK_DATA, clk, true).unwrap(),
        "time,top.clk\n0,0\n10,1\n"
    );
}

#[test]
fn substring_and_exact_modes() {
    let src = "\
$scope module top $end
$var wire 1 ! clk $end
$var wire 1 \" clk2 $end
$var wire 1 # Clk3 $end
$upscope $end
$enddefinitions $end
#0 1! 0\" 1#
";
    let sub = Selection::new(&["clk"], MatchMode::Substring).unwrap();
    assert_eq!(to_csv(src, sub, false).unwrap(), "time,top.clk,top.clk2\n0,1,0\n");

    let exact = Selection::new(&["top.clk"], MatchMode::Exact).unwrap();
    assert_eq!(to_csv(src, exact, false).unwrap(), "time,top.clk\n0,1\n");

    let re = Selection::new(&["(?i)clk[0-9]"], MatchMode::Regex).unwrap();
    assert_eq!(to_csv(src, re, false).unwrap(), "time,top.clk2,top.Clk3\n0,0,1\n");
}

#[test]
fn non_binary_values_pass_through() {
    let src = "\
$var wire 4 ! bus $end
$enddefinitions $end
#0 bxxxx !
#1 b10z1 !
#2 b11111 !
";
    assert_eq!(
        to_csv(src, Selection::all(), false).unwrap(),
        "time,bus\n0,x\n1,z\n2,1f\n"
    );
}

#[test]
fn unassigned_signals_render_as_x() {
    let src = "\
$var wire 1 ! a $end
$var wire 1 # b $end
$enddefinitions $end
#0 1!
";
    assert_eq!(to_csv(src, Selection::all(), false).unwrap(), "time,a,b\n0,1,x\n");
}

#[test]
fn dollar_identifier_codes() {
    let src = "\
$scope module top $end
$var wire 1 $a sig $end
$var wire 2 $end_ bus $end
$upscope $end
$enddefinitions $end
#0 1$a b10 $end_
#5 0$a
";
    let csv = to_csv(src, Selection::all(), false).unwrap();
    assert_eq!(csv, "time,top.bus,top.sig\n0,2,1\n5,2,0\n");
}

#[test]
fn dumpall_repeats_keep_their_rows() {
    let src = "\
$var wire 1 ! clk $end
$var wire 1 # rst $end
$enddefinitions $end
#0 0! 1#
#10 $dumpall 0! 1# $end
#20 0#
";
    let clk = Selection::new(&["clk"], MatchMode::Exact).unwrap();
    assert_eq!(to_csv(src, clk, true).unwrap(), "time,clk\n0,0\n10,0\n");
}

#[test]
fn parse_errors_surface_through_the_sink() {
    let src = CLK_DATA.replace("#20", "#5");
    let err = to_csv(&src, Selection::all(), false).unwrap_err();
    assert!(matches!(
        err,
        SinkError::Parse(VcdError::OutOfOrderTime { previous: 10, time: 5, .. })
    ));

    let src = CLK_DATA.replace("1!", "1?");
    let err = to_csv(&src, Selection::all(), false).unwrap_err();
    assert!(matches!(err, SinkError::Parse(VcdError::UnknownIdentifier { .. })));
}

#[test]
fn csv_and_table_together() {
    let pair_selection = || Selection::new(&["data"], MatchMode::Substring).unwrap();
    let mut sinks = (
        ProjectionSink::new(pair_selection(), CsvWriter::new(Vec::new())),
        ProjectionSink::new(pair_selection(), Table::default()),
    );
    drive(Cursor::new(CLK_DATA), &mut sinks).unwrap();
    let (csv, table) = sinks;
    let mut replayed = CsvWriter::new(Vec::new());
    table.into_writer().replay_into(&mut replayed).unwrap();
    assert_eq!(csv.into_writer().into_inner(), replayed.into_inner());
}

#[test]
fn delta_printer_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wave.vcd");
    std::fs::write(&path, CLK_DATA).unwrap();

    let header = read_header_file(&path).unwrap();
    assert_eq!(header.signals.references(), ["top.clk", "top.data"]);
    assert_eq!(header.timescale.map(|t| t.to_string()).as_deref(), Some("1ns"));

    let reader = vcd2csv_parser::open_vcd_file(&path).unwrap();
    let mut printer = DeltaPrinter::new(Selection::all(), Vec::new());
    drive(reader, &mut printer).unwrap();
    assert_eq!(
        String::from_utf8(printer.into_inner()).unwrap(),
        "0 0 top.clk\n0 0 top.data\n10 1 top.clk\n20 5 top.data\n"
    );
}

#[test]
fn csv_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wave.csv");
    let mut sink = ProjectionSink::new(Selection::all(), CsvWriter::create(&path, b';').unwrap());
    drive(Cursor::new(CLK_DATA), &mut sink).unwrap();
    let mut writer = sink.into_writer();
    writer.finish().unwrap();
    drop(writer);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "time;top.clk;top.data\n0;0;0\n10;1;0\n20;1;5\n"
    );
}
