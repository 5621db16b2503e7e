//! OBO ontology indexing.
//!
//! Only `[Term]` stanzas are read. Each complete term contributes its primary
//! `id` and every `alt_id` to the index, all mapped to the same
//! `(namespace, name)` pair. Obsolete terms are indexed like any other term so
//! that annotations against retired identifiers still resolve.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::Serialize;

use crate::config::IndexOptions;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::TermInfo;
use crate::error::ConvertError;
use crate::fs_util::open_input;

const TERM_HEADER: &str = "[Term]";
const OBSOLETE_MARKER: &str = "is_obsolete: true";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub terms: usize,
    pub aliases: usize,
    pub obsolete: usize,
    pub incomplete: usize,
    pub overwritten: usize,
    pub unterminated: usize,
}

#[derive(Debug, Default)]
struct TermAccumulator {
    id: Option<String>,
    name: Option<String>,
    namespace: Option<String>,
    alt_ids: Vec<String>,
    obsolete: bool,
}

impl TermAccumulator {
    fn into_entry(self) -> Option<(String, Vec<String>, TermInfo, bool)> {
        let id = self.id?;
        let name = self.name?;
        let namespace = self.namespace?;
        Some((id, self.alt_ids, TermInfo { namespace, name }, self.obsolete))
    }
}

#[derive(Debug)]
enum ParserState {
    Outside,
    InTerm(TermAccumulator),
}

#[derive(Debug, Clone, Default)]
pub struct OntologyIndex {
    terms: HashMap<String, TermInfo>,
    stats: IndexStats,
}

impl OntologyIndex {
    pub fn from_path(
        path: &Path,
        options: IndexOptions,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConvertError> {
        sink.event(DiagnosticEvent::Progress(format!(
            "parsing OBO file: {}",
            path.display()
        )));
        let reader = open_input(path)?;
        Self::from_reader(reader, options, sink).map_err(|err| match err {
            ConvertError::Io(err) => ConvertError::from_read(path, err),
            other => other,
        })
    }

    pub fn from_reader<R: BufRead>(
        reader: R,
        options: IndexOptions,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConvertError> {
        let mut builder = IndexBuilder::default();
        for (idx, line) in reader.lines().enumerate() {
            builder.push_line(idx + 1, &line?, sink);
        }
        let index = builder.finish(options, sink);
        sink.event(DiagnosticEvent::Progress(format!(
            "OBO file parsed: loaded {} GO entries ({} terms, {} alternative ids, {} obsolete)",
            index.len(),
            index.stats.terms,
            index.stats.aliases,
            index.stats.obsolete
        )));
        Ok(index)
    }

    pub fn get(&self, id: &str) -> Option<&TermInfo> {
        self.terms.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.terms.contains_key(id)
    }

    /// Number of distinct identifiers, primary and alternative.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}

#[derive(Debug)]
struct IndexBuilder {
    state: ParserState,
    index: OntologyIndex,
    last_line: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self {
            state: ParserState::Outside,
            index: OntologyIndex::default(),
            last_line: 0,
        }
    }
}

impl IndexBuilder {
    fn push_line(&mut self, line_no: usize, raw: &str, sink: &dyn DiagnosticSink) {
        self.last_line = line_no;
        let line = raw.trim();

        if line == TERM_HEADER {
            self.state = ParserState::InTerm(TermAccumulator::default());
            return;
        }

        let ParserState::InTerm(term) = &mut self.state else {
            return;
        };

        if line.is_empty() {
            let ParserState::InTerm(term) =
                std::mem::replace(&mut self.state, ParserState::Outside)
            else {
                return;
            };
            self.flush(term, line_no, sink);
            return;
        }

        let slot = if line.starts_with("id:") {
            Some(&mut term.id)
        } else if line.starts_with("name:") {
            Some(&mut term.name)
        } else if line.starts_with("namespace:") {
            Some(&mut term.namespace)
        } else {
            None
        };

        if let Some(slot) = slot {
            match tag_value(line) {
                Some(value) => *slot = Some(value.to_string()),
                None => sink.event(missing_value(line_no, line)),
            }
        } else if line.starts_with(OBSOLETE_MARKER) {
            term.obsolete = true;
        } else if line.starts_with("alt_id:") {
            match tag_value(line) {
                Some(value) => term.alt_ids.push(value.to_string()),
                None => sink.event(missing_value(line_no, line)),
            }
        }
    }

    fn flush(&mut self, term: TermAccumulator, line_no: usize, sink: &dyn DiagnosticSink) {
        let Some((id, alt_ids, info, obsolete)) = term.into_entry() else {
            self.index.stats.incomplete += 1;
            sink.event(DiagnosticEvent::IncompleteTerm { line: line_no });
            return;
        };

        self.index.stats.terms += 1;
        self.index.stats.aliases += alt_ids.len();
        if obsolete {
            self.index.stats.obsolete += 1;
        }

        for key in std::iter::once(id).chain(alt_ids) {
            if self.index.terms.contains_key(&key) {
                self.index.stats.overwritten += 1;
                sink.event(DiagnosticEvent::DuplicateIdentifier { id: key.clone() });
            }
            self.index.terms.insert(key, info.clone());
        }
    }

    fn finish(mut self, options: IndexOptions, sink: &dyn DiagnosticSink) -> OntologyIndex {
        if let ParserState::InTerm(term) = std::mem::replace(&mut self.state, ParserState::Outside)
        {
            if options.flush_at_eof {
                let line_no = self.last_line;
                self.flush(term, line_no, sink);
            } else {
                self.index.stats.unterminated += 1;
            }
        }
        self.index
    }
}

/// Text after the first space of a `tag: value` line.
fn tag_value(line: &str) -> Option<&str> {
    line.split_once(' ').map(|(_, value)| value)
}

fn missing_value(line_no: usize, line: &str) -> DiagnosticEvent {
    DiagnosticEvent::MalformedLine {
        line: line_no,
        reason: format!("tag without value '{line}'"),
    }
}
