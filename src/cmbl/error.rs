/// Errors that can occur while parsing a CMBL document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input is not a well-formed, text-encoded CMBL document
    #[error("Only text-based CMBL files are supported: {reason} (at byte {position})")]
    NotTextFormat {
        /// What made the document unreadable
        reason: String,
        /// Byte offset in the input where the problem was detected
        position: u64,
    },

    /// I/O error while reading the input stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn not_text(reason: impl ToString, position: u64) -> Self {
        ParseError::NotTextFormat {
            reason: reason.to_string(),
            position,
        }
    }
}

/// Failure to read one cell line as a sample
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// The line is not a decimal floating-point literal
    #[error("not a number: {0}")]
    Invalid(#[from] std::num::ParseFloatError),
}
