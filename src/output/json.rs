use crate::errors::Result;
use crate::label::Label;
use crate::resolve::{FindResult, ImportSpec, IndexDiagnostic, Resolution};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub metadata: Metadata,
    pub rules: Vec<RuleReport>,
    pub diagnostics: Vec<IndexDiagnostic>,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub root: PathBuf,
    pub repo_name: String,
    pub languages: Vec<String>,
    pub build_files: usize,
    pub rules_total: usize,
    pub rules_indexed: usize,
    pub unresolved_imports: usize,
    pub elapsed_ms: u64,
}

/// Dependencies resolved for one rule.
#[derive(Debug, Serialize)]
pub struct RuleReport {
    pub label: Label,
    pub kind: String,
    pub language: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

#[derive(Debug, Serialize)]
pub struct QueryReport {
    pub import: ImportSpec,
    pub lang: String,
    pub results: Vec<FindResult>,
}

/// Write any report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
