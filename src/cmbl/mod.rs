//! # CMBL Parser Module
//!
//! Parsing of Logger Pro CMBL documents: the XML container in which sensor
//! logging software stores one or more datasets of numeric columns.
//!
//! ## Design Goals
//!
//! - **Tolerant**: a bad cell value costs one sample, never the document
//! - **Strict about structure**: input that is not well-formed XML (including
//!   binary-encoded CMBL files) fails with [`ParseError::NotTextFormat`]
//! - **Order-preserving**: datasets and columns keep document order
//!
//! ## CMBL Structure
//!
//! ```text
//! Document (any root element name)
//! └── DataSet* (many)
//!     ├── DataSetName
//!     └── DataColumn* (many)
//!         ├── DataObjectName
//!         ├── DataObjectShortName
//!         ├── ColumnUnits
//!         └── ColumnCells (one value per line)
//! ```
//!
//! Anything else in the document is ignored.

mod error;
mod models;
mod parser;


pub use error::{ParseError, SampleError};
pub use models::{
    synthesize_header, CmblDocument, Column, Dataset, Precision, Samples, ValueWarning,
};
pub use parser::{parse, parse_file, CmblReader, DEFAULT_INPUT_BUFFER_SIZE};
