use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use assert_matches::assert_matches;

use annoconv::annotation::{join_annotation_file, join_annotations};
use annoconv::config::IndexOptions;
use annoconv::diagnostics::{DiagnosticEvent, DiagnosticSink};
use annoconv::error::ConvertError;
use annoconv::obo::OntologyIndex;

#[derive(Default)]
struct RecordingSink(RefCell<Vec<DiagnosticEvent>>);

impl RecordingSink {
    fn anomalies(&self) -> Vec<DiagnosticEvent> {
        self.0
            .borrow()
            .iter()
            .filter(|event| !matches!(event, DiagnosticEvent::Progress(_)))
            .cloned()
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn event(&self, event: DiagnosticEvent) {
        self.0.borrow_mut().push(event);
    }
}

fn fixture_index(options: IndexOptions) -> OntologyIndex {
    OntologyIndex::from_path(
        Path::new("tests/fixtures/mini.obo"),
        options,
        &RecordingSink::default(),
    )
    .unwrap()
}

#[test]
fn single_term_end_to_end() {
    let index = OntologyIndex::from_reader(
        Cursor::new("[Term]\nid: GO:0001\nname: x\nnamespace: biological_process\n\n"),
        IndexOptions::default(),
        &RecordingSink::default(),
    )
    .unwrap();

    let sink = RecordingSink::default();
    let mut out = Vec::new();
    join_annotations(Cursor::new("geneA\tGO:0001,GO:9999\n"), &index, &mut out, &sink).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "GeneID\tGO_Type\tGO_ID\tGO_Description\ngeneA\tbiological_process\tGO:0001\tx\n"
    );
    assert_eq!(
        sink.anomalies(),
        vec![DiagnosticEvent::UnresolvedTerm {
            gene_id: "geneA".to_string(),
            term_id: "GO:9999".to_string(),
        }]
    );
}

#[test]
fn fixture_pipeline_writes_output_file() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("results").join("genes_go.tsv");
    let index = fixture_index(IndexOptions::default());
    let sink = RecordingSink::default();

    let summary =
        join_annotation_file(Path::new("tests/fixtures/genes.tsv"), &index, &output, &sink)
            .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "GeneID\tGO_Type\tGO_ID\tGO_Description\n\
         LG0105162\tbiological_process\tGO:0000001\tmitochondrion inheritance\n\
         LG0105162\tbiological_process\tGO:0000011\tmitochondrion inheritance\n\
         LG0105165\tcellular_component\tGO:0000017\tphosphopyruvate hydratase complex\n"
    );
    assert_eq!(summary.lines_read, 7);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.unresolved_ids, 2);
    assert_eq!(summary.malformed_lines, 1);
    assert_eq!(summary.skipped_lines, 1);
    assert_eq!(summary.unannotated_genes, 1);

    let anomalies = sink.anomalies();
    assert!(anomalies.contains(&DiagnosticEvent::MalformedLine {
        line: 5,
        reason: "expected 2 tab-separated columns, found 3".to_string(),
    }));
    assert!(anomalies.contains(&DiagnosticEvent::UnresolvedTerm {
        gene_id: "LG0105165".to_string(),
        term_id: "GO:0000100".to_string(),
    }));
}

#[test]
fn flushing_final_term_resolves_more_ids() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("genes_go.tsv");
    let index = fixture_index(IndexOptions { flush_at_eof: true });

    let summary = join_annotation_file(
        Path::new("tests/fixtures/genes.tsv"),
        &index,
        &output,
        &RecordingSink::default(),
    )
    .unwrap();

    assert_eq!(summary.rows_written, 4);
    assert!(
        fs::read_to_string(&output)
            .unwrap()
            .ends_with("LG0105165\tbiological_process\tGO:0000100\tunterminated final term\n")
    );
}

#[test]
fn rows_never_exceed_identifier_count() {
    let index = fixture_index(IndexOptions::default());
    let input = "g1\tGO:0000001,GO:0000015,GO:0000016,GO:1,GO:2\n";
    let mut out = Vec::new();
    let summary =
        join_annotations(Cursor::new(input), &index, &mut out, &RecordingSink::default()).unwrap();
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.unresolved_ids, 2);
    assert_eq!(summary.rows_written + summary.unresolved_ids, 5);
}

#[test]
fn missing_gene_file_leaves_no_output() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("out.tsv");
    let index = fixture_index(IndexOptions::default());

    let err = join_annotation_file(
        &temp.path().join("absent.tsv"),
        &index,
        &output,
        &RecordingSink::default(),
    )
    .unwrap_err();

    assert_matches!(err, ConvertError::InputNotFound(_));
    assert!(!output.exists());
}
