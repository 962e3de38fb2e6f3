//! Flat CSV exports of a run.

use crate::error::{PipelineError, PipelineResult};
use serde::Serialize;
use std::path::Path;
use zg_core::{FailureReport, LineageEdge, LineageGraph};

/// One edge of the lineage plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub source_table: String,
    pub source_zone: String,
    pub target_table: String,
    pub target_zone: String,
    pub provenance_term_id: String,
}

impl From<&LineageEdge> for PlanRow {
    fn from(edge: &LineageEdge) -> Self {
        Self {
            source_table: edge.source.name.to_string(),
            source_zone: edge.source.zone.to_string(),
            target_table: edge.target.name.to_string(),
            target_zone: edge.target.zone.to_string(),
            provenance_term_id: edge.provenance.to_string(),
        }
    }
}

/// One failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow<'a> {
    pub term_id: &'a str,
    pub category: &'static str,
    pub message: &'a str,
}

fn prepare_parent(path: &Path) -> PipelineResult<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => std::fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.display().to_string(),
            source,
        }),
        None => Ok(()),
    }
}

fn write_rows<T: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> PipelineResult<usize> {
    prepare_parent(path)?;
    let export_err = |source: csv::Error| PipelineError::Export {
        path: path.display().to_string(),
        source,
    };

    // Headers are written explicitly so an empty export still has them.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(export_err)?;
    writer.write_record(headers).map_err(export_err)?;

    let mut written = 0;
    for row in rows {
        writer.serialize(row).map_err(export_err)?;
        written += 1;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(written)
}

/// Column order of the plan export.
pub const PLAN_HEADERS: [&str; 5] = [
    "source_table",
    "source_zone",
    "target_table",
    "target_zone",
    "provenance_term_id",
];

/// Column order of the failure report.
pub const FAILURE_HEADERS: [&str; 3] = ["term_id", "category", "message"];

/// Write every edge of `graph` as a plan row, in insertion order.
///
/// Returns the number of rows written.
pub fn write_plan_csv(graph: &LineageGraph, path: &Path) -> PipelineResult<usize> {
    let edges = graph.edges();
    let written = write_rows(path, &PLAN_HEADERS, edges.iter().map(PlanRow::from))?;

    if written == 0 {
        log::warn!("No lineage found for any term");
    } else {
        log::info!("Plan saved to {} ({} rows)", path.display(), written);
    }
    Ok(written)
}

/// Write the failure report, one row per (term, category).
pub fn write_failures_csv(report: &FailureReport, path: &Path) -> PipelineResult<usize> {
    write_rows(
        path,
        &FAILURE_HEADERS,
        report.records().iter().map(|f| FailureRow {
            term_id: f.term_id.as_str(),
            category: f.category.as_str(),
            message: &f.message,
        }),
    )
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
