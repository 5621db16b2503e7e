use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

/// Writes one tab-separated record. Fields are written verbatim, without quoting.
pub fn write_tsv_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            writer.write_all(b"\t")?;
        }
        writer.write_all(field.as_bytes())?;
    }
    writer.write_all(b"\n")
}

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

/// Machine-readable summary of one converter run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<T: Serialize> {
    pub tool: &'static str,
    pub version: &'static str,
    pub output: String,
    pub finished_at: String,
    pub summary: T,
}

impl<T: Serialize> RunReport<T> {
    pub fn new(tool: &'static str, output: &Path, summary: T) -> Self {
        Self {
            tool,
            version: env!("CARGO_PKG_VERSION"),
            output: output.display().to_string(),
            finished_at: chrono::Utc::now().to_rfc3339(),
            summary,
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    /// Prints a run summary to stdout.
    pub fn print_summary<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
