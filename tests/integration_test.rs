//! Integration tests for cmbl2csv
//!
//! These tests run the full pipeline from a CMBL file on disk to CSV files.

use cmbl2csv::cmbl::{parse, ParseError, Precision};
use cmbl2csv::converter::{CmblConverter, ConversionError};
use cmbl2csv::writer::{write_datasets, CsvWriter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// A trimmed-down export in the shape Logger Pro writes
const COOLING_CMBL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document>
  <AppName>Logger Pro</AppName>
  <DocumentProperties>
    <Author>lab</Author>
  </DocumentProperties>
  <DataSet>
    <DataSetName>Run 1</DataSetName>
    <DataColumn>
      <DataObjectName>Time</DataObjectName>
      <DataObjectShortName>t</DataObjectShortName>
      <ColumnUnits>s</ColumnUnits>
      <ColumnCells>
0
10
20
30
40
</ColumnCells>
    </DataColumn>
    <DataColumn>
      <DataObjectName>Temperature</DataObjectName>
      <DataObjectShortName>T</DataObjectShortName>
      <ColumnUnits>°C</ColumnUnits>
      <ColumnCells>
37.0
36.2
n/a
34.9
34.3
</ColumnCells>
    </DataColumn>
  </DataSet>
  <DataSet>
    <DataSetName></DataSetName>
    <DataColumn>
      <DataObjectName>Notes</DataObjectName>
      <ColumnCells>
stirred
</ColumnCells>
    </DataColumn>
  </DataSet>
  <DataSet>
    <DataSetName> </DataSetName>
    <DataColumn>
      <DataObjectName>Pressure</DataObjectName>
      <DataObjectShortName>P</DataObjectShortName>
      <ColumnUnits>kPa</ColumnUnits>
      <ColumnCells>101.3
101.2</ColumnCells>
    </DataColumn>
  </DataSet>
</Document>"#;

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Test the complete file-to-files conversion
#[test]
fn test_convert_cmbl_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cooling.cmbl");
    fs::write(&input, COOLING_CMBL).unwrap();

    let stats = CmblConverter::new()
        .with_precision(Precision::Double)
        .convert(&input, dir.path().join("cooling"))
        .unwrap();

    assert_eq!(stats.datasets, 2);
    assert_eq!(stats.warnings.len(), 2);
    assert_eq!(stats.warnings[0].value, "n/a");
    assert_eq!(stats.warnings[0].header, "Temperature (T) [°C]");
    assert_eq!(stats.warnings[1].value, "stirred");

    assert_eq!(
        files_in(dir.path()),
        vec!["cooling.cmbl", "cooling_Dataset_3.csv", "cooling_Run 1.csv"]
    );

    // The temperature column lost one value, so only four rows survive.
    assert_eq!(
        fs::read_to_string(dir.path().join("cooling_Run 1.csv")).unwrap(),
        "Time (t) [s],Temperature (T) [°C]\n\
         0.0,37.0\n\
         10.0,36.2\n\
         20.0,34.9\n\
         30.0,34.3\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("cooling_Dataset_3.csv")).unwrap(),
        "Pressure (P) [kPa]\n101.3\n101.2\n"
    );
}

/// Parsing the same bytes twice gives the same datasets
#[test]
fn test_parse_is_deterministic() {
    let first = parse(COOLING_CMBL.as_bytes(), Precision::Single).unwrap();
    let second = parse(COOLING_CMBL.as_bytes(), Precision::Single).unwrap();
    assert_eq!(first, second);
}

/// Malformed XML aborts before any file is written
#[test]
fn test_malformed_document_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.cmbl");
    let truncated = &COOLING_CMBL.as_bytes()[..COOLING_CMBL.len() / 2];
    fs::write(&input, truncated).unwrap();

    let err = CmblConverter::new()
        .convert(&input, dir.path().join("broken"))
        .unwrap_err();

    assert!(matches!(
        err,
        ConversionError::Parse(ParseError::NotTextFormat { .. })
    ));
    assert!(err.to_string().starts_with("Only text-based CMBL files are supported"));
    assert_eq!(files_in(dir.path()), vec!["broken.cmbl"]);
}

/// Two datasets with the same resolved name share one file; the later one wins
#[test]
fn test_colliding_names_overwrite() {
    let dir = tempdir().unwrap();
    let xml = "<Document>\
        <DataSet><DataSetName>Trial</DataSetName>\
          <DataColumn><DataObjectName>a</DataObjectName><ColumnCells>1\n2\n3</ColumnCells></DataColumn>\
        </DataSet>\
        <DataSet><DataSetName>Trial</DataSetName>\
          <DataColumn><DataObjectName>b</DataObjectName><ColumnCells>7</ColumnCells></DataColumn>\
        </DataSet>\
        </Document>";

    let document = parse(xml.as_bytes(), Precision::Single).unwrap();
    let stem = dir.path().join("trial");
    write_datasets(&document.datasets, &stem).unwrap();

    let mut expected = Vec::new();
    CsvWriter::default()
        .write_dataset_to(&mut expected, &document.datasets[1])
        .unwrap();

    assert_eq!(files_in(dir.path()), vec!["trial_Trial.csv"]);
    assert_eq!(fs::read(dir.path().join("trial_Trial.csv")).unwrap(), expected);
}

/// Columns of lengths 5, 7 and 3 produce exactly 3 rows
#[test]
fn test_ragged_columns_truncate() {
    let dir = tempdir().unwrap();
    let xml = "<Document><DataSet><DataSetName>r</DataSetName>\
        <DataColumn><DataObjectName>a</DataObjectName><ColumnCells>1\n2\n3\n4\n5</ColumnCells></DataColumn>\
        <DataColumn><DataObjectName>b</DataObjectName><ColumnCells>1\n2\n3\n4\n5\n6\n7</ColumnCells></DataColumn>\
        <DataColumn><DataObjectName>c</DataObjectName><ColumnCells>1\n2\n3</ColumnCells></DataColumn>\
        </DataSet></Document>";

    let stats = CmblConverter::new()
        .convert_bytes(xml.as_bytes(), dir.path().join("ragged"))
        .unwrap();

    assert_eq!(stats.files[0].rows, 3);
    let text = fs::read_to_string(dir.path().join("ragged_r.csv")).unwrap();
    let rows: Vec<_> = text.lines().skip(1).collect();
    assert_eq!(rows, vec!["1.0,1.0,1.0", "2.0,2.0,2.0", "3.0,3.0,3.0"]);
}

/// Binary (non-text) input fails with a structural error, not a panic
#[test]
fn test_binary_input_is_rejected() {
    let bytes: Vec<u8> = (0..1024u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
    assert!(matches!(
        parse(&bytes, Precision::Single),
        Err(ParseError::NotTextFormat { .. })
    ));
}
