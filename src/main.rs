//! # cmbl2csv
//!
//! A command-line tool for converting Logger Pro CMBL files to CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Writes cooling_<dataset>.csv for every dataset in the file
//! cmbl2csv cooling.cmbl
//!
//! # Custom output stem, 64-bit samples, replace existing files
//! cmbl2csv cooling.cmbl -o results/cooling -D -f
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
