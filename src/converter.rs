//! CMBL to CSV converter
//!
//! High-level pipeline for one input document: parse, reject empty results,
//! then write one CSV file per dataset.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::cmbl::{parse, CmblDocument, ParseError, Precision, ValueWarning};
use crate::writer::{CsvWriter, WriteError, WriterConfig, WrittenFile};

/// Errors that can occur during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The input could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    ReadInput {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input is not a readable CMBL document
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The document parsed but contained no dataset with usable columns
    #[error("No valid datasets found in the file")]
    NoDatasets,

    /// An output file already exists and overwriting is disabled
    #[error("Output file '{}' already exists (use --force to overwrite)", path.display())]
    OutputExists {
        /// Existing output path
        path: PathBuf,
    },

    /// Writing an output file failed
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Precision samples are parsed and stored at
    pub precision: Precision,

    /// Replace output files that exist before the run
    pub overwrite: bool,

    /// CSV output settings
    pub writer_config: WriterConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Single,
            overwrite: true,
            writer_config: WriterConfig::default(),
        }
    }
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Number of datasets converted
    pub datasets: usize,
    /// Files written, in order
    pub files: Vec<WrittenFile>,
    /// Values that were skipped because they are not numbers
    pub warnings: Vec<ValueWarning>,
}

impl ConversionStats {
    /// Total number of columns written across all files
    pub fn columns_written(&self) -> usize {
        self.files.iter().map(|f| f.columns).sum()
    }
}

/// Converter from CMBL documents to CSV files
#[derive(Debug, Clone, Default)]
pub struct CmblConverter {
    config: ConversionConfig,
}

impl CmblConverter {
    /// Create a new converter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom configuration
    pub fn with_config(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Set sample precision
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.config.precision = precision;
        self
    }

    /// Allow or refuse replacing files that exist before the run
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Get the converter configuration
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert the CMBL file at `input_path`, writing `{output_stem}_{dataset}.csv` files
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_stem: Q,
    ) -> Result<ConversionStats, ConversionError> {
        let input_path = input_path.as_ref();
        info!("Converting {}", input_path.display());

        let bytes = std::fs::read(input_path).map_err(|e| ConversionError::ReadInput {
            path: input_path.to_path_buf(),
            source: e,
        })?;

        self.convert_bytes(&bytes, output_stem)
    }

    /// Convert an in-memory CMBL document
    pub fn convert_bytes<Q: AsRef<Path>>(
        &self,
        bytes: &[u8],
        output_stem: Q,
    ) -> Result<ConversionStats, ConversionError> {
        let document = parse(bytes, self.config.precision)?;
        self.write_document(document, output_stem.as_ref())
    }

    fn write_document(
        &self,
        document: CmblDocument,
        output_stem: &Path,
    ) -> Result<ConversionStats, ConversionError> {
        if document.is_empty() {
            return Err(ConversionError::NoDatasets);
        }
        info!(
            "Parsed {} datasets ({} samples at {})",
            document.datasets.len(),
            document
                .datasets
                .iter()
                .flat_map(|d| d.columns.iter())
                .map(|c| c.len())
                .sum::<usize>(),
            self.config.precision
        );

        let writer = CsvWriter::new(self.config.writer_config.clone());

        if !self.config.overwrite {
            let targets: BTreeSet<PathBuf> = document
                .datasets
                .iter()
                .map(|d| writer.dataset_path(output_stem, &d.name))
                .collect();
            if let Some(existing) = targets.into_iter().find(|p| p.exists()) {
                return Err(ConversionError::OutputExists { path: existing });
            }
        }

        let stats = writer.write_all(&document.datasets, output_stem)?;
        debug!("{}", stats);

        Ok(ConversionStats {
            datasets: document.datasets.len(),
            files: stats.files,
            warnings: document.warnings,
        })
    }
}
