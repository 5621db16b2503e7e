use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use annoconv::cli::{CommonArgs, exit_code};
use annoconv::diagnostics::TracingSink;
use annoconv::error::ConvertError;
use annoconv::gff::convert_gff_file;
use annoconv::output::{JsonOutput, OutputMode, RunReport};

/// Extract gene annotation records from a GFF3 file into a TSV table.
#[derive(Parser)]
#[command(name = "gff2tsv")]
#[command(version)]
struct Cli {
    /// Input GFF3 file
    #[arg(short = 'i', long, value_name = "FILE")]
    input: PathBuf,

    /// Output TSV file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: PathBuf,

    /// Feature type to extract [default: gene]
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    feature_type: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    exit_code(run())
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let mut config = cli.common.init()?;
    if let Some(feature_type) = cli.feature_type {
        config.gff.feature_type = feature_type;
    }

    let summary = convert_gff_file(&cli.input, &cli.output, &config.gff, &TracingSink)?;

    if let OutputMode::Json = cli.common.output_mode() {
        JsonOutput::print_summary(&RunReport::new("gff2tsv", &cli.output, summary))
            .map_err(ConvertError::from)?;
    }
    Ok(())
}
