//! Joins a gene -> GO list file against an [`OntologyIndex`].
//!
//! Input lines look like `LG0105162\tGO:0000278,GO:0000724`; a lone `-` in the
//! second column means the gene has no annotations. Every identifier found in
//! the index produces one output row, everything else is reported and skipped.

use std::io::{BufRead, Write};
use std::path::Path;

use serde::Serialize;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::{AnnotationRow, GO_TSV_HEADER};
use crate::error::ConvertError;
use crate::fs_util::{StagedOutput, open_input};
use crate::obo::OntologyIndex;
use crate::output::write_tsv_record;

const NO_ANNOTATION: &str = "-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinSummary {
    pub lines_read: usize,
    pub rows_written: usize,
    pub unannotated_genes: usize,
    pub unresolved_ids: usize,
    pub malformed_lines: usize,
    pub skipped_lines: usize,
}

/// Parsed form of one annotation line.
#[derive(Debug, PartialEq, Eq)]
enum AnnotationLine<'a> {
    Ignored,
    MissingTab,
    Malformed(usize),
    Unannotated,
    Terms { gene_id: &'a str, terms: &'a str },
}

fn classify(line: &str) -> AnnotationLine<'_> {
    if line.is_empty() || line.starts_with('[') {
        return AnnotationLine::Ignored;
    }
    if !line.contains('\t') {
        return AnnotationLine::MissingTab;
    }
    let fields = line.split('\t').collect::<Vec<_>>();
    let &[gene_id, terms] = fields.as_slice() else {
        return AnnotationLine::Malformed(fields.len());
    };
    if terms == NO_ANNOTATION {
        return AnnotationLine::Unannotated;
    }
    AnnotationLine::Terms { gene_id, terms }
}

/// Streams `reader`, writing the header and one row per resolved identifier.
pub fn join_annotations<R: BufRead, W: Write>(
    reader: R,
    index: &OntologyIndex,
    mut writer: W,
    sink: &dyn DiagnosticSink,
) -> Result<JoinSummary, ConvertError> {
    let mut summary = JoinSummary::default();
    write_tsv_record(&mut writer, &GO_TSV_HEADER)?;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        summary.lines_read = line_no;

        let (gene_id, terms) = match classify(line.trim()) {
            AnnotationLine::Ignored => continue,
            AnnotationLine::MissingTab => {
                summary.skipped_lines += 1;
                sink.event(DiagnosticEvent::SkippedLine {
                    line: line_no,
                    reason: "no tab separator".to_string(),
                });
                continue;
            }
            AnnotationLine::Unannotated => {
                summary.unannotated_genes += 1;
                continue;
            }
            AnnotationLine::Malformed(found) => {
                summary.malformed_lines += 1;
                sink.event(DiagnosticEvent::MalformedLine {
                    line: line_no,
                    reason: format!("expected 2 tab-separated columns, found {found}"),
                });
                continue;
            }
            AnnotationLine::Terms { gene_id, terms } => (gene_id, terms),
        };

        for term_id in terms.split(',').map(str::trim) {
            if term_id.is_empty() {
                continue;
            }
            let Some(info) = index.get(term_id) else {
                summary.unresolved_ids += 1;
                sink.event(DiagnosticEvent::UnresolvedTerm {
                    gene_id: gene_id.to_string(),
                    term_id: term_id.to_string(),
                });
                continue;
            };
            let row = AnnotationRow {
                gene_id: gene_id.to_string(),
                go_type: info.namespace.clone(),
                go_id: term_id.to_string(),
                description: info.name.clone(),
            };
            write_tsv_record(&mut writer, &row.fields())?;
            summary.rows_written += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}

pub fn join_annotation_file(
    gene_path: &Path,
    index: &OntologyIndex,
    output_path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<JoinSummary, ConvertError> {
    sink.event(DiagnosticEvent::Progress(format!(
        "processing annotation file: {}",
        gene_path.display()
    )));
    let reader = open_input(gene_path)?;
    let mut output = StagedOutput::create(output_path)?;
    let summary = join_annotations(reader, index, &mut output, sink)?;
    output.finish()?;

    sink.event(DiagnosticEvent::Progress(format!(
        "processing complete: read {} lines, wrote {} annotations to {}",
        summary.lines_read,
        summary.rows_written,
        output_path.display()
    )));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::IndexOptions;
    use crate::diagnostics::testing::RecordingSink;

    const OBO: &str = "[Term]\nid: GO:0001\nname: x\nnamespace: biological_process\n\n\
                       [Term]\nid: GO:0002\nalt_id: GO:0003\nname: y\nnamespace: cellular_component\n\n";

    fn run(input: &str) -> (String, JoinSummary, RecordingSink) {
        let index = OntologyIndex::from_reader(
            Cursor::new(OBO),
            IndexOptions::default(),
            &RecordingSink::default(),
        )
        .unwrap();
        let sink = RecordingSink::default();
        let mut out = Vec::new();
        let summary = join_annotations(Cursor::new(input), &index, &mut out, &sink).unwrap();
        (String::from_utf8(out).unwrap(), summary, sink)
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify(""), AnnotationLine::Ignored);
        assert_eq!(classify("geneA GO:0001"), AnnotationLine::MissingTab);
        assert_eq!(classify("[header]\tx"), AnnotationLine::Ignored);
        assert_eq!(classify("geneB\t-"), AnnotationLine::Unannotated);
        assert_eq!(classify("a\tb\tc"), AnnotationLine::Malformed(3));
        assert_eq!(
            classify("geneA\tGO:0001"),
            AnnotationLine::Terms {
                gene_id: "geneA",
                terms: "GO:0001"
            }
        );
    }

    #[test]
    fn resolves_hits_and_reports_misses() {
        let (out, summary, sink) = run("geneA\tGO:0001,GO:9999\n");
        assert_eq!(
            out,
            "GeneID\tGO_Type\tGO_ID\tGO_Description\ngeneA\tbiological_process\tGO:0001\tx\n"
        );
        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.unresolved_ids, 1);
        assert_eq!(
            sink.anomalies(),
            vec![DiagnosticEvent::UnresolvedTerm {
                gene_id: "geneA".to_string(),
                term_id: "GO:9999".to_string(),
            }]
        );
    }

    #[test]
    fn dash_produces_no_rows_and_no_diagnostic() {
        let (out, summary, sink) = run("geneB\t-\n");
        assert_eq!(out, "GeneID\tGO_Type\tGO_ID\tGO_Description\n");
        assert_eq!(summary.unannotated_genes, 1);
        assert!(sink.anomalies().is_empty());
    }

    #[test]
    fn header_written_for_empty_input() {
        let (out, summary, _) = run("");
        assert_eq!(out, "GeneID\tGO_Type\tGO_ID\tGO_Description\n");
        assert_eq!(summary, JoinSummary::default());
    }

    #[test]
    fn tokens_are_trimmed_and_empty_tokens_skipped() {
        let (out, summary, sink) = run("geneC\t GO:0003 ,, GO:0002,\n");
        let rows = out.lines().skip(1).collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                "geneC\tcellular_component\tGO:0003\ty",
                "geneC\tcellular_component\tGO:0002\ty",
            ]
        );
        assert_eq!(summary.rows_written, 2);
        assert!(sink.anomalies().is_empty());
    }

    #[test]
    fn duplicate_ids_produce_duplicate_rows() {
        let (out, summary, _) = run("geneD\tGO:0001,GO:0001\n");
        assert_eq!(out.lines().count(), 3);
        assert_eq!(summary.rows_written, 2);
    }

    #[test]
    fn malformed_line_is_reported_and_processing_continues() {
        let (out, summary, sink) = run("lonely\ngeneA\tGO:0001\textra\ngeneA\tGO:0001\n");
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.rows_written, 1);
        assert!(out.ends_with("geneA\tbiological_process\tGO:0001\tx\n"));
        let anomalies = sink.anomalies();
        assert!(matches!(anomalies[0], DiagnosticEvent::SkippedLine { line: 1, .. }));
        assert!(matches!(anomalies[1], DiagnosticEvent::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn file_join_reports_start_and_completion() {
        let dir = tempfile::tempdir().unwrap();
        let genes = dir.path().join("genes.tsv");
        let output = dir.path().join("nested").join("out.tsv");
        std::fs::write(&genes, "geneA\tGO:0001\n").unwrap();
        let index = OntologyIndex::from_reader(
            Cursor::new(OBO),
            IndexOptions::default(),
            &RecordingSink::default(),
        )
        .unwrap();

        let sink = RecordingSink::default();
        join_annotation_file(&genes, &index, &output, &sink).unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, DiagnosticEvent::Progress(_))));
        assert!(events[1].to_string().contains("wrote 1 annotations"));
        assert!(output.exists());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let (out, summary, _) = run("  geneE\tGO:0001  \r\n");
        assert_eq!(summary.rows_written, 1);
        assert!(out.contains("geneE\tbiological_process\tGO:0001\tx\n"));
    }
}
