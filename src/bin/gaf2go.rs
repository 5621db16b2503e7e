use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use annoconv::cli::{CommonArgs, exit_code};
use annoconv::diagnostics::TracingSink;
use annoconv::error::ConvertError;
use annoconv::gaf::convert_gaf_file;
use annoconv::output::{JsonOutput, OutputMode, RunReport};

/// Convert a GAF (Gene Association File) to the simplified GO annotation format.
#[derive(Parser)]
#[command(name = "gaf2go")]
#[command(version)]
#[command(after_help = "Output format:
  GeneID    GO_Type              GO_ID       GO_Description
  gene1     biological_process   GO:0008150  metabolic process
  gene2     molecular_function   GO:0003674  catalytic activity")]
struct Cli {
    /// Input GAF file path
    input: PathBuf,

    /// Output file path for the simplified format
    output: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    exit_code(run())
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = cli.common.init()?;

    info!("gaf2go v{}", env!("CARGO_PKG_VERSION"));
    debug!("input file: {}", cli.input.display());
    debug!("output file: {}", cli.output.display());

    let summary = convert_gaf_file(&cli.input, &cli.output, &config.gaf, &TracingSink)?;
    info!(
        "conversion complete, processed {} annotations",
        summary.rows_written
    );

    if let OutputMode::Json = cli.common.output_mode() {
        JsonOutput::print_summary(&RunReport::new("gaf2go", &cli.output, summary))
            .map_err(ConvertError::from)?;
    }
    Ok(())
}
