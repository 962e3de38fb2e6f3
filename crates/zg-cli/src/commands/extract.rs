//! Extract command implementation
//!
//! Runs the extractor over one term file without any locator or sink, to
//! debug how a record is routed and classified.

use anyhow::{Context, Result};
use std::path::Path;
use zg_core::{TermId, TermOrigin, TermRecord};
use zg_extract::{Extraction, TermExtractor};

use crate::cli::{ExtractArgs, ExtractFormat, GlobalArgs};
use crate::commands::common::load_project;

/// Read a term file into a record attributed to `term` (or the file stem).
pub(crate) fn read_term_file(path: &Path, term: Option<&str>) -> Result<TermRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let body: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let id = term
        .map(String::from)
        .or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .and_then(TermId::try_new)
        .with_context(|| format!("Cannot derive a term id from {}", path.display()))?;

    Ok(TermRecord::new(id, TermOrigin::Mirror, body).with_display_name(path.display().to_string()))
}

fn to_json(extraction: &Extraction) -> serde_json::Value {
    serde_json::json!({
        "edges": extraction.edges,
        "failures": extraction.failures,
    })
}

/// Execute the extract command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let record = read_term_file(Path::new(&args.file), args.term.as_deref())?;
    let extraction = TermExtractor::from_config(&project.config).extract(&record);

    match args.format {
        ExtractFormat::Json => {
            let rendered = serde_json::to_string_pretty(&to_json(&extraction))
                .context("Failed to render extraction")?;
            println!("{}", rendered);
        }
        ExtractFormat::Text => {
            println!("Term {} ({})", record.id, record.display_name);
            if extraction.is_empty() {
                println!("  nothing extracted");
            }
            for edge in &extraction.edges {
                println!("  edge    {} -> {}", edge.source, edge.target);
            }
            for failure in &extraction.failures {
                println!("  failure [{}] {}", failure.category, failure.message);
            }
        }
    }
    Ok(())
}
