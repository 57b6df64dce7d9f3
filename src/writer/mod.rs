//! # CSV Writer Module
//!
//! Serializes parsed datasets as delimited text, one file per dataset.
//!
//! ## Layout
//!
//! ```text
//! {stem}_{dataset name}.csv
//! ├── header row: column headers in document order
//! └── data rows: row i holds sample i of every column
//! ```
//!
//! Columns of unequal length are aligned by position and cut at the shortest
//! one. Values are rendered by [`format`] and never depend on the process locale.

mod config;
mod error;
pub mod format;
mod stats;
mod writer_impl;


pub use config::WriterConfig;
pub use error::WriteError;
pub use stats::{WriterStats, WrittenFile};
pub use writer_impl::{write_datasets, CsvWriter};
