use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod convert;

pub use config::Config;

/// cmbl2csv - Convert Logger Pro CMBL files to CSV
#[derive(Parser)]
#[command(name = "cmbl2csv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input CMBL file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV base name (default: input name)
    #[arg(short, long, value_name = "STEM")]
    output: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short, long)]
    force: bool,

    /// Use double precision
    #[arg(short = 'D', long)]
    double: bool,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };

    convert::run(convert::ConvertArgs {
        input: cli.input,
        output: cli.output,
        force: cli.force || config.conversion.force.unwrap_or(false),
        double: cli.double || config.conversion.double_precision.unwrap_or(false),
        writer_config: config.output.writer_config()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["cmbl2csv", "run.cmbl", "-o", "out", "-f", "-D", "-vv"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("run.cmbl"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.force);
        assert!(cli.double);
        assert_eq!(cli.verbosity(), 2);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["cmbl2csv"]).is_err());
    }
}
