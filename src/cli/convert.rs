use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use cmbl2csv::cmbl::Precision;
use cmbl2csv::converter::{CmblConverter, ConversionConfig};
use cmbl2csv::writer::{WriterConfig, WrittenFile};

/// Resolved arguments for a conversion run
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub double: bool,
    pub writer_config: WriterConfig,
}

/// Output stem: the explicit one or the input's base name, minus one extension.
///
/// The default stem is the input's file stem, which loses one more extension
/// on the way, so `a.b.cmbl` writes `a_<dataset>.csv`.
fn output_stem(input: &Path, output: Option<&Path>) -> PathBuf {
    let stem = match output {
        Some(stem) => stem.to_path_buf(),
        None => PathBuf::from(input.file_stem().unwrap_or_default()),
    };
    stem.with_extension("")
}

#[cfg(feature = "colorized_output")]
fn report_file(file: &WrittenFile) {
    println!(
        "{} {} columns to {}",
        console::style("Wrote").green().bold(),
        file.columns,
        console::style(file.path.display()).cyan()
    );
}

#[cfg(not(feature = "colorized_output"))]
fn report_file(file: &WrittenFile) {
    println!("{}", file);
}

/// Convert a CMBL file to one CSV file per dataset
pub fn run(args: ConvertArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file '{}' not found.", args.input.display());
    }

    let stem = output_stem(&args.input, args.output.as_deref());
    let precision = Precision::from_double_flag(args.double);

    info!("cmbl2csv - CMBL to CSV");
    info!("======================");
    info!("Input:       {}", args.input.display());
    info!("Output stem: {}", stem.display());
    info!("Precision:   {}", precision);
    if args.force {
        info!("Overwrite:   enabled");
    }

    let converter = CmblConverter::with_config(ConversionConfig {
        precision,
        overwrite: args.force,
        writer_config: args.writer_config,
    });

    let stats = converter
        .convert(&args.input, &stem)
        .context("Conversion failed")?;

    for file in &stats.files {
        report_file(file);
    }
    if !stats.warnings.is_empty() {
        info!("Skipped {} non-numeric values", stats.warnings.len());
    }
    println!("Converted {} datasets.", stats.datasets);

    Ok(())
}
