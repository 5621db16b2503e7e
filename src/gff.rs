//! GFF3 feature extraction into a flat gene table.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::GffOptions;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::{GENE_TSV_HEADER, GeneRow};
use crate::error::ConvertError;
use crate::fs_util::{StagedOutput, open_input};

const GFF3_COLUMNS: usize = 9;
const MISSING: &str = "NA";
const PROGRESS_INTERVAL: usize = 10_000;
/// Short-line warnings are only emitted this early in the file.
const WARN_LINE_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GffSummary {
    pub lines_read: usize,
    pub features_written: usize,
    pub short_lines: usize,
}

/// Parses column 9, e.g. `ID=gene01;Name=EDEN;Note=Something`.
///
/// Values are trimmed, keys are kept verbatim, later duplicates win and parts
/// without `=` are ignored.
pub fn parse_attributes(column: &str) -> HashMap<&str, &str> {
    let mut attributes = HashMap::new();
    if column.is_empty() || column == "." {
        return attributes;
    }
    for part in column.trim().trim_matches(';').split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            attributes.insert(key, value.trim());
        }
    }
    attributes
}

fn first_of<'a>(attributes: &HashMap<&str, &'a str>, keys: &[String]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| attributes.get(key.as_str()).copied())
}

fn percent_decode(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}

/// Builds a row from a trimmed GFF3 line, or `None` when the line is short or
/// the feature type does not match.
pub fn extract_feature(columns: &[&str], options: &GffOptions) -> Option<GeneRow> {
    if columns.len() < GFF3_COLUMNS {
        return None;
    }
    let feature_type = columns[2];
    if feature_type != options.feature_type {
        return None;
    }
    let attributes = parse_attributes(columns[8]);
    let gene_id = first_of(&attributes, &options.id_keys).unwrap_or(MISSING);
    let gene_name = first_of(&attributes, &options.name_keys).unwrap_or(MISSING);
    let description = match first_of(&attributes, &options.description_keys) {
        Some(MISSING) | None => MISSING.to_string(),
        Some(raw) => percent_decode(raw),
    };

    Some(GeneRow {
        gene_id: gene_id.to_string(),
        gene_name: gene_name.to_string(),
        chrom: columns[0].to_string(),
        start: columns[3].to_string(),
        end: columns[4].to_string(),
        strand: columns[6].to_string(),
        feature_type: feature_type.to_string(),
        description,
    })
}

pub fn convert_gff<R: BufRead, W: Write>(
    reader: R,
    options: &GffOptions,
    writer: W,
    sink: &dyn DiagnosticSink,
) -> Result<GffSummary, ConvertError> {
    let mut summary = GffSummary::default();
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    tsv.write_record(GENE_TSV_HEADER).map_err(io::Error::from)?;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        summary.lines_read = line_no;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let columns = line.trim().split('\t').collect::<Vec<_>>();
        if columns.len() < GFF3_COLUMNS {
            summary.short_lines += 1;
            if line_no < WARN_LINE_LIMIT {
                sink.event(DiagnosticEvent::MalformedLine {
                    line: line_no,
                    reason: format!("expected 9 columns, found {}", columns.len()),
                });
            }
            continue;
        }

        let Some(row) = extract_feature(&columns, options) else {
            continue;
        };
        tsv.write_record(row.fields()).map_err(io::Error::from)?;
        summary.features_written += 1;

        if summary.features_written % PROGRESS_INTERVAL == 0 {
            sink.event(DiagnosticEvent::Progress(format!(
                "extracted {} features (at line {line_no})",
                summary.features_written
            )));
        }
    }

    tsv.flush()?;
    Ok(summary)
}

pub fn convert_gff_file(
    input: &Path,
    output: &Path,
    options: &GffOptions,
    sink: &dyn DiagnosticSink,
) -> Result<GffSummary, ConvertError> {
    sink.event(DiagnosticEvent::Progress(format!(
        "processing file: {}",
        input.display()
    )));
    sink.event(DiagnosticEvent::Progress(format!(
        "target feature type: {}",
        options.feature_type
    )));
    let reader = open_input(input)?;
    let mut staged = StagedOutput::create(output)?;
    let summary = convert_gff(reader, options, &mut staged, sink)?;
    staged.finish()?;

    if summary.features_written == 0 {
        sink.event(DiagnosticEvent::Warning(format!(
            "processing finished, but no features of type '{}' were found",
            options.feature_type
        )));
    } else {
        sink.event(DiagnosticEvent::Progress(format!(
            "extracted {} '{}' features to {}",
            summary.features_written,
            options.feature_type,
            output.display()
        )));
    }
    Ok(summary)
}
