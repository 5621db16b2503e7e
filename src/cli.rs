//! Pieces shared by the `obo2go`, `gaf2go` and `gff2tsv` binaries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use crate::config::{ConfigLoader, ResolvedConfig};
use crate::error::ConvertError;
use crate::logging::init_logging;
use crate::output::OutputMode;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose (DEBUG level) logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Also write every log message to FILE
    #[arg(short = 'l', long = "log", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// JSON config file overriding converter defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON run summary on stdout
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    /// Sets up logging and loads the config file, in that order.
    pub fn init(&self) -> Result<ResolvedConfig, ConvertError> {
        init_logging(self.verbose, self.log_file.as_deref())?;
        ConfigLoader::resolve(self.config.as_deref())
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

/// Reports a failed run on stderr and picks the process exit code.
pub fn exit_code(result: miette::Result<()>) -> ExitCode {
    let Err(report) = result else {
        return ExitCode::SUCCESS;
    };
    eprintln!("{report:?}");
    match report.downcast_ref::<ConvertError>() {
        Some(err) => ExitCode::from(err.exit_code()),
        None => ExitCode::from(1),
    }
}
