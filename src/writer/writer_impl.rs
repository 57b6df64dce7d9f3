use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::config::WriterConfig;
use super::error::WriteError;
use super::format::format_sample;
use super::stats::{WriterStats, WrittenFile};
use crate::cmbl::Dataset;

/// Writes datasets as delimited text, one file per dataset
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    config: WriterConfig,
}

impl CsvWriter {
    /// Create a writer with the given configuration
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Get the writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Output path for a dataset: `{stem}_{name}.{extension}`.
    ///
    /// The dataset name is used verbatim; two datasets with the same name map
    /// to the same path.
    pub fn dataset_path(&self, stem: &Path, dataset_name: &str) -> PathBuf {
        let mut path = OsString::from(stem.as_os_str());
        path.push("_");
        path.push(dataset_name);
        path.push(".");
        path.push(&self.config.extension);
        PathBuf::from(path)
    }

    fn write_records<W: Write>(
        &self,
        wtr: &mut csv::Writer<W>,
        dataset: &Dataset,
    ) -> Result<usize, csv::Error> {
        wtr.write_record(dataset.headers())?;

        // Rows stop at the shortest column; longer columns lose their tail.
        let rows = dataset.row_count();
        for i in 0..rows {
            wtr.write_record(
                dataset
                    .columns
                    .iter()
                    .map(|c| format_sample(&c.samples, i).unwrap_or_default()),
            )?;
        }
        Ok(rows)
    }

    /// Write one dataset to any sink, returning the number of data rows
    pub fn write_dataset_to<W: Write>(&self, sink: W, dataset: &Dataset) -> Result<usize, csv::Error> {
        let mut wtr = self.config.csv_builder().from_writer(sink);
        let rows = self.write_records(&mut wtr, dataset)?;
        wtr.flush()?;
        Ok(rows)
    }

    /// Write one dataset to `path`, replacing any existing file
    pub fn write_dataset(&self, path: &Path, dataset: &Dataset) -> Result<WrittenFile, WriteError> {
        let file = File::create(path).map_err(|e| WriteError::CreateFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut wtr = self.config.csv_builder().from_writer(BufWriter::new(file));

        let rows = self
            .write_records(&mut wtr, dataset)
            .map_err(|e| WriteError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

        wtr.flush().map_err(|e| WriteError::Flush {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WrittenFile {
            dataset: dataset.name.clone(),
            path: path.to_path_buf(),
            columns: dataset.columns.len(),
            rows,
        })
    }

    /// Write every dataset next to `stem`.
    ///
    /// Stops at the first failure; files already written are left in place.
    pub fn write_all(&self, datasets: &[Dataset], stem: &Path) -> Result<WriterStats, WriteError> {
        let mut stats = WriterStats::default();

        for dataset in datasets {
            let path = self.dataset_path(stem, &dataset.name);
            info!(
                "Writing {} columns to {}",
                dataset.columns.len(),
                path.display()
            );
            let written = self.write_dataset(&path, dataset)?;
            stats.files.push(written);
        }

        Ok(stats)
    }
}

/// Write datasets with the default configuration (comma-separated `.csv`)
pub fn write_datasets<P: AsRef<Path>>(datasets: &[Dataset], stem: P) -> Result<WriterStats, WriteError> {
    CsvWriter::default().write_all(datasets, stem.as_ref())
}
