use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use annoconv::annotation::{JoinSummary, join_annotation_file};
use annoconv::cli::{CommonArgs, exit_code};
use annoconv::diagnostics::TracingSink;
use annoconv::obo::{IndexStats, OntologyIndex};
use annoconv::output::{JsonOutput, OutputMode, RunReport};

/// Convert a gene -> GO list file into a long-format TSV, resolving names and
/// namespaces from an OBO file (obsolete terms and alt_ids included).
#[derive(Parser)]
#[command(name = "obo2go")]
#[command(version)]
struct Cli {
    /// Gene annotation file, e.g. `LG0105162<TAB>GO:0000278,GO:0000724`
    #[arg(short = 'g', long = "gene_file", value_name = "FILE")]
    gene_file: PathBuf,

    /// Gene Ontology OBO file, e.g. go-basic.obo
    #[arg(short = 'o', long = "obo_file", value_name = "FILE")]
    obo_file: PathBuf,

    /// Long-format TSV output file
    #[arg(long = "output_file", visible_alias = "out", value_name = "FILE")]
    output_file: PathBuf,

    /// Index a final [Term] block even if the OBO file lacks a trailing blank line
    #[arg(long)]
    flush_final_term: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct Obo2GoSummary {
    index_entries: usize,
    index: IndexStats,
    join: JoinSummary,
}

fn main() -> ExitCode {
    exit_code(run())
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = cli.common.init()?;

    let mut options = config.obo;
    options.flush_at_eof |= cli.flush_final_term;

    let sink = TracingSink;
    let index = OntologyIndex::from_path(&cli.obo_file, options, &sink)?;
    let join = join_annotation_file(&cli.gene_file, &index, &cli.output_file, &sink)?;
    info!(
        "{} unresolved GO IDs, {} malformed lines",
        join.unresolved_ids, join.malformed_lines
    );

    if let OutputMode::Json = cli.common.output_mode() {
        let summary = Obo2GoSummary {
            index_entries: index.len(),
            index: index.stats(),
            join,
        };
        JsonOutput::print_summary(&RunReport::new("obo2go", &cli.output_file, summary))
            .map_err(annoconv::error::ConvertError::from)?;
    }
    Ok(())
}
