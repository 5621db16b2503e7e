//! Diagnostic channel shared by the converters.
//!
//! Parsers never log directly; they report through a [`DiagnosticSink`] so
//! callers decide where messages go. The binaries use [`TracingSink`].

use std::fmt;

use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    Progress(String),
    Warning(String),
    /// A line that could not be split into the expected columns.
    MalformedLine { line: usize, reason: String },
    /// A line passed over without being parsed.
    SkippedLine { line: usize, reason: String },
    /// An annotation references an identifier missing from the ontology.
    UnresolvedTerm { gene_id: String, term_id: String },
    /// A `[Term]` block ended without `id`, `name` and `namespace`.
    IncompleteTerm { line: usize },
    DuplicateIdentifier { id: String },
    UnknownAspect {
        line: usize,
        gene_id: String,
        code: String,
    },
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::Progress(message) | DiagnosticEvent::Warning(message) => {
                write!(f, "{message}")
            }
            DiagnosticEvent::MalformedLine { line, reason } => {
                write!(f, "line {line}: {reason}, skipping")
            }
            DiagnosticEvent::SkippedLine { line, reason } => {
                write!(f, "line {line}: skipped ({reason})")
            }
            DiagnosticEvent::UnresolvedTerm { gene_id, term_id } => write!(
                f,
                "GO ID '{term_id}' for gene {gene_id} not found in OBO file, skipping"
            ),
            DiagnosticEvent::IncompleteTerm { line } => write!(
                f,
                "term ending at line {line} lacks id, name or namespace, dropped"
            ),
            DiagnosticEvent::DuplicateIdentifier { id } => {
                write!(f, "identifier {id} redefined by a later term")
            }
            DiagnosticEvent::UnknownAspect {
                line,
                gene_id,
                code,
            } => write!(f, "line {line}: unknown aspect code '{code}' for {gene_id}"),
        }
    }
}

pub trait DiagnosticSink {
    fn event(&self, event: DiagnosticEvent);
}

/// Forwards events to the global `tracing` subscriber.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn event(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::Progress(_) => info!("{event}"),
            DiagnosticEvent::SkippedLine { .. }
            | DiagnosticEvent::IncompleteTerm { .. }
            | DiagnosticEvent::DuplicateIdentifier { .. } => debug!("{event}"),
            DiagnosticEvent::Warning(_)
            | DiagnosticEvent::MalformedLine { .. }
            | DiagnosticEvent::UnresolvedTerm { .. }
            | DiagnosticEvent::UnknownAspect { .. } => warn!("{event}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::{DiagnosticEvent, DiagnosticSink};

    #[derive(Default)]
    pub struct RecordingSink {
        events: RefCell<Vec<DiagnosticEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<DiagnosticEvent> {
            self.events.borrow().clone()
        }

        /// Everything except progress chatter.
        pub fn anomalies(&self) -> Vec<DiagnosticEvent> {
            self.events
                .borrow()
                .iter()
                .filter(|event| !matches!(event, DiagnosticEvent::Progress(_)))
                .cloned()
                .collect()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn event(&self, event: DiagnosticEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}
