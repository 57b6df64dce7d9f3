//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in a
//! config file. Command-line flags take precedence.
//!
//! ```toml
//! # cmbl2csv.toml
//! [conversion]
//! double_precision = true
//! force = false
//!
//! [output]
//! delimiter = ";"
//! crlf = true
//! extension = "csv"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use cmbl2csv::writer::WriterConfig;

/// Root configuration structure for cmbl2csv.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Parsing and overwrite settings.
    #[serde(default)]
    pub conversion: ConversionSettings,

    /// CSV output settings.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Settings for the conversion itself.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSettings {
    /// Store samples as 64-bit floats.
    pub double_precision: Option<bool>,

    /// Overwrite output files that already exist.
    pub force: Option<bool>,
}

/// Settings for the CSV files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Single-character field delimiter.
    pub delimiter: Option<String>,

    /// Use `\r\n` record terminators.
    pub crlf: Option<bool>,

    /// Output file extension, without the dot.
    pub extension: Option<String>,
}

impl OutputSettings {
    /// Build the writer configuration, falling back to defaults.
    pub fn writer_config(&self) -> Result<WriterConfig> {
        let mut config = WriterConfig::default();

        if let Some(ref delimiter) = self.delimiter {
            match delimiter.as_bytes() {
                [byte] if byte.is_ascii() => config.delimiter = *byte,
                _ => bail!(
                    "delimiter must be a single ASCII character, got {:?}",
                    delimiter
                ),
            }
        }
        if let Some(crlf) = self.crlf {
            config.crlf = crlf;
        }
        if let Some(ref extension) = self.extension {
            config.extension = extension.trim_start_matches('.').to_string();
        }

        Ok(config)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [conversion]
            double_precision = true
            force = false

            [output]
            delimiter = ";"
            crlf = true
            extension = ".txt"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.conversion.double_precision, Some(true));
        assert_eq!(config.conversion.force, Some(false));

        let writer = config.output.writer_config().unwrap();
        assert_eq!(writer.delimiter, b';');
        assert!(writer.crlf);
        assert_eq!(writer.extension, "txt");
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [conversion]
            double_precision = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.conversion.double_precision, Some(true));
        assert_eq!(config.conversion.force, None);
        assert_eq!(config.output.writer_config().unwrap(), WriterConfig::default());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.conversion.double_precision, None);
    }

    #[test]
    fn test_tab_delimiter() {
        let config = Config::from_str("[output]\ndelimiter = \"\\t\"\n").unwrap();
        assert_eq!(config.output.writer_config().unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_rejects_bad_delimiter() {
        let config = Config::from_str("[output]\ndelimiter = \"::\"\n").unwrap();
        assert!(config.output.writer_config().is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Config::from_str("[conversion]\ncompression_level = 3\n").is_err());
    }
}
