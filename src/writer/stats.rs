use std::fmt;
use std::path::PathBuf;

/// One CSV file produced for a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Name of the dataset the file was written for
    pub dataset: String,
    /// Output path
    pub path: PathBuf,
    /// Number of columns in the header row
    pub columns: usize,
    /// Number of data rows written
    pub rows: usize,
}

impl fmt::Display for WrittenFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} columns to {}",
            self.columns,
            self.path.display()
        )
    }
}

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Files in the order they were written (later entries may share a path
    /// with earlier ones when dataset names collide)
    pub files: Vec<WrittenFile>,
}

impl WriterStats {
    /// Number of datasets written
    pub fn datasets_written(&self) -> usize {
        self.files.len()
    }

    /// Total number of data rows across all files
    pub fn rows_written(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} datasets ({} rows)",
            self.datasets_written(),
            self.rows_written()
        )
    }
}
