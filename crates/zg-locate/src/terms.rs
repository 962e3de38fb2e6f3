//! Term list loading.

use crate::error::{LocateError, LocateResult};
use std::collections::HashSet;
use std::path::Path;
use zg_core::TermId;

/// Column of the terms CSV holding term ids.
pub const TERM_COLUMN: &str = "atlas_term";

/// Build the list of terms to process.
///
/// Reads the `atlas_term` column of `csv_path` (trimmed, blanks dropped),
/// then appends the stem of every file matching `listing_glob` under
/// `mirror_dir`. Duplicates are removed keeping the first occurrence, so CSV
/// order comes first and mirror stems follow in path order.
pub fn load_term_ids(
    csv_path: &Path,
    mirror_dir: &Path,
    listing_glob: &str,
) -> LocateResult<Vec<TermId>> {
    let csv_terms = read_csv_terms(csv_path)?;
    let mirror_terms = mirror_stems(mirror_dir, listing_glob)?;

    log::info!("Found {} terms in CSV file", csv_terms.len());
    log::info!("Found {} terms in mirror directory", mirror_terms.len());

    let terms = dedup(csv_terms.into_iter().chain(mirror_terms));
    log::info!("Total terms: {}", terms.len());
    Ok(terms)
}

/// Term ids listed in the CSV, in file order, deduplicated.
pub fn read_csv_terms(csv_path: &Path) -> LocateResult<Vec<TermId>> {
    if !csv_path.exists() {
        return Err(LocateError::TermsCsvNotFound {
            path: csv_path.display().to_string(),
        });
    }

    let csv_err = |source: csv::Error| LocateError::Csv {
        path: csv_path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(csv_path).map_err(csv_err)?;
    let column = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .position(|h| h.trim() == TERM_COLUMN)
        .ok_or_else(|| LocateError::MissingTermColumn {
            path: csv_path.display().to_string(),
            column: TERM_COLUMN.to_string(),
        })?;

    let mut terms = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if let Some(id) = record.get(column).and_then(|v| TermId::try_new(v.trim())) {
            terms.push(id);
        }
    }
    Ok(dedup(terms))
}

/// File stems matching `listing_glob` below `mirror_dir`, sorted by path.
pub fn mirror_stems(mirror_dir: &Path, listing_glob: &str) -> LocateResult<Vec<TermId>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&mirror_dir.to_string_lossy()),
        listing_glob
    );
    let entries = glob::glob(&pattern).map_err(|e| LocateError::InvalidPattern {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut stems = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if let Some(id) = path
                    .file_stem()
                    .and_then(|s| TermId::try_new(s.to_string_lossy().into_owned()))
                {
                    stems.push(id);
                }
            }
            Err(e) => log::warn!("Skipping unreadable mirror entry: {}", e),
        }
    }
    Ok(stems)
}

fn dedup(ids: impl IntoIterator<Item = TermId>) -> Vec<TermId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "terms_test.rs"]
mod tests;
