//! # cmbl2csv - CMBL to CSV Conversion
//!
//! `cmbl2csv` reads Logger Pro CMBL documents (the XML container sensor-logging
//! software uses to store named datasets of numeric columns) and writes one flat
//! CSV file per dataset for downstream analysis tools.
//!
//! ## Key Features
//!
//! - **Tolerant Parsing**: a cell line that is not a number is skipped with a
//!   warning; columns and datasets without usable samples are dropped.
//!
//! - **Strict Structure**: input that is not well-formed XML, including
//!   binary-encoded CMBL files, fails cleanly with a single error.
//!
//! - **Selectable Precision**: samples are stored as 32-bit or 64-bit floats.
//!
//! - **Locale-Invariant Output**: values always use `.` as the decimal point.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmbl2csv::converter::CmblConverter;
//! use cmbl2csv::cmbl::Precision;
//!
//! let stats = CmblConverter::new()
//!     .with_precision(Precision::Double)
//!     .convert("cooling.cmbl", "cooling")?;
//!
//! for file in &stats.files {
//!     println!("{}", file);
//! }
//! println!("Converted {} datasets.", stats.datasets);
//! # Ok::<(), cmbl2csv::converter::ConversionError>(())
//! ```
//!
//! A document with datasets `Run 1` and `Run 2` produces:
//! ```text
//! cooling_Run 1.csv
//! cooling_Run 2.csv
//! ```
//!
//! ## Parsing and Writing Separately
//!
//! ```rust
//! use cmbl2csv::cmbl::{parse, Precision};
//! use cmbl2csv::writer::CsvWriter;
//!
//! let xml = b"<Document><DataSet><DataSetName>Run 1</DataSetName>\
//!     <DataColumn><DataObjectName>Time</DataObjectName><DataObjectShortName>t</DataObjectShortName>\
//!     <ColumnUnits>s</ColumnUnits><ColumnCells>0\n0.5</ColumnCells></DataColumn>\
//!     </DataSet></Document>";
//!
//! let document = parse(xml, Precision::Single)?;
//! let mut out = Vec::new();
//! CsvWriter::default().write_dataset_to(&mut out, &document.datasets[0])?;
//! assert_eq!(String::from_utf8(out).unwrap(), "Time (t) [s]\n0.0\n0.5\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`cmbl`]: streaming CMBL parser and the dataset model
//! - [`writer`]: CSV serialization, one file per dataset
//! - [`converter`]: the parse-then-write pipeline for one document

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cmbl;
pub mod converter;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cmbl::{
        parse, parse_file, CmblDocument, CmblReader, Column, Dataset, ParseError, Precision,
        Samples, ValueWarning,
    };
    pub use crate::converter::{CmblConverter, ConversionConfig, ConversionError, ConversionStats};
    pub use crate::writer::{
        write_datasets, CsvWriter, WriteError, WriterConfig, WriterStats, WrittenFile,
    };
}
