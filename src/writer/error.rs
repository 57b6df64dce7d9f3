use std::path::PathBuf;

/// Errors that can occur while writing CSV output
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Failed to create or open the output file
    #[error("Failed to create file '{}': {source}", path.display())]
    CreateFile {
        /// File that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a CSV record
    #[error("CSV write error for '{}': {source}", path.display())]
    Csv {
        /// File being written
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Failed to flush buffered output to disk
    #[error("Failed to write to file '{}': {source}", path.display())]
    Flush {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Path of the file that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            WriteError::CreateFile { path, .. }
            | WriteError::Csv { path, .. }
            | WriteError::Flush { path, .. } => path,
        }
    }
}
