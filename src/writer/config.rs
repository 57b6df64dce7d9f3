/// Configuration for CSV output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Field delimiter byte
    pub delimiter: u8,

    /// File extension appended to every output path (without the dot)
    pub extension: String,

    /// Terminate records with `\r\n` instead of `\n`
    pub crlf: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            extension: "csv".to_string(),
            crlf: false,
        }
    }
}

impl WriterConfig {
    /// Tab-separated output with a `.tsv` extension
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            extension: "tsv".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn csv_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.delimiter);
        if self.crlf {
            builder.terminator(csv::Terminator::CRLF);
        } else {
            builder.terminator(csv::Terminator::Any(b'\n'));
        }
        builder
    }
}
