//! GAF 2.x to long-format GO table conversion.
//!
//! Columns used (1-based): 2 DB Object ID, 5 GO ID, 9 aspect, 10 DB Object Name.

use std::io::{BufRead, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::GafOptions;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::{AnnotationRow, GO_TSV_HEADER};
use crate::error::ConvertError;
use crate::fs_util::{StagedOutput, open_input};
use crate::output::write_tsv_record;

const GENE_ID_COLUMN: usize = 1;
const GO_ID_COLUMN: usize = 4;
const ASPECT_COLUMN: usize = 8;
const DESCRIPTION_COLUMN: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GafSummary {
    pub lines_read: usize,
    pub rows_written: usize,
    pub comment_lines: usize,
    pub invalid_lines: usize,
    pub unknown_aspects: usize,
}

/// Parses one non-comment GAF line. Unknown aspect codes pass through unchanged.
pub fn parse_gaf_line(line: &str, options: &GafOptions) -> Result<(AnnotationRow, bool), usize> {
    let fields = line.trim().split('\t').collect::<Vec<_>>();
    if fields.len() < options.min_columns.max(DESCRIPTION_COLUMN + 1) {
        return Err(fields.len());
    }
    let aspect = fields[ASPECT_COLUMN];
    let (go_type, known) = match options.aspects.get(aspect) {
        Some(namespace) => (namespace.clone(), true),
        None => (aspect.to_string(), false),
    };
    let row = AnnotationRow {
        gene_id: fields[GENE_ID_COLUMN].to_string(),
        go_type,
        go_id: fields[GO_ID_COLUMN].to_string(),
        description: fields[DESCRIPTION_COLUMN].to_string(),
    };
    Ok((row, known))
}

pub fn convert_gaf<R: BufRead, W: Write>(
    reader: R,
    options: &GafOptions,
    mut writer: W,
    sink: &dyn DiagnosticSink,
) -> Result<GafSummary, ConvertError> {
    let mut summary = GafSummary::default();
    write_tsv_record(&mut writer, &GO_TSV_HEADER)?;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        summary.lines_read = line_no;

        if line.starts_with('!') {
            summary.comment_lines += 1;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let (row, known_aspect) = match parse_gaf_line(&line, options) {
            Ok(parsed) => parsed,
            Err(found) => {
                summary.invalid_lines += 1;
                sink.event(DiagnosticEvent::MalformedLine {
                    line: line_no,
                    reason: format!("insufficient columns ({found})"),
                });
                continue;
            }
        };
        if !known_aspect {
            summary.unknown_aspects += 1;
            sink.event(DiagnosticEvent::UnknownAspect {
                line: line_no,
                gene_id: row.gene_id.clone(),
                code: row.go_type.clone(),
            });
        }

        write_tsv_record(&mut writer, &row.fields())?;
        summary.rows_written += 1;
    }

    writer.flush()?;
    Ok(summary)
}

pub fn convert_gaf_file(
    input: &Path,
    output: &Path,
    options: &GafOptions,
    sink: &dyn DiagnosticSink,
) -> Result<GafSummary, ConvertError> {
    sink.event(DiagnosticEvent::Progress(format!(
        "starting GAF file conversion: {}",
        input.display()
    )));
    let reader = open_input(input)?;
    let mut staged = StagedOutput::create(output)?;
    let summary = convert_gaf(reader, options, &mut staged, sink)?;
    staged.finish()?;

    sink.event(DiagnosticEvent::Progress(format!(
        "parsed {} annotations; skipped {} comment lines and {} invalid lines",
        summary.rows_written, summary.comment_lines, summary.invalid_lines
    )));
    sink.event(DiagnosticEvent::Progress(format!(
        "output written to: {}",
        output.display()
    )));
    Ok(summary)
}
