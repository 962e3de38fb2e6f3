//! Failure accounting for a lineage run.

use crate::term::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Why a term (or the output step) did not yield lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureCategory {
    /// The term declares no table it writes to
    NoWriteTarget,
    /// A source or target could not be placed in a zone
    UnknownZone,
    /// Embedded SQL could not be parsed or recovered
    SqlParseFailure,
    /// Neither the mirror nor the catalog had the term
    LocatorNotFound,
    /// Persisting or exporting the graph failed
    SinkWriteFailure,
}

impl FailureCategory {
    /// All categories, in report order
    pub const ALL: [FailureCategory; 5] = [
        FailureCategory::NoWriteTarget,
        FailureCategory::UnknownZone,
        FailureCategory::SqlParseFailure,
        FailureCategory::LocatorNotFound,
        FailureCategory::SinkWriteFailure,
    ];

    /// Name used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            FailureCategory::NoWriteTarget => "NoWriteTarget",
            FailureCategory::UnknownZone => "UnknownZone",
            FailureCategory::SqlParseFailure => "SqlParseFailure",
            FailureCategory::LocatorNotFound => "LocatorNotFound",
            FailureCategory::SinkWriteFailure => "SinkWriteFailure",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Term the failure belongs to (`*` for run-level failures)
    pub term_id: TermId,
    /// Failure category
    pub category: FailureCategory,
    /// Human-readable detail
    pub message: String,
}

impl ExtractionFailure {
    /// Create a new failure record
    pub fn new(term_id: TermId, category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            term_id,
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.term_id, self.message)
    }
}

/// Ordered failure records, one per (term, category).
///
/// The first message for a pair is kept; repeats only bump its occurrence
/// count.
#[derive(Debug, Default)]
pub struct FailureReport {
    records: Vec<ExtractionFailure>,
    occurrences: Vec<usize>,
    index: HashMap<(TermId, FailureCategory), usize>,
}

impl FailureReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Returns `true` if it was the first for its (term, category).
    pub fn record(&mut self, failure: ExtractionFailure) -> bool {
        let key = (failure.term_id.clone(), failure.category);
        if let Some(&pos) = self.index.get(&key) {
            self.occurrences[pos] += 1;
            return false;
        }
        self.index.insert(key, self.records.len());
        self.records.push(failure);
        self.occurrences.push(1);
        true
    }

    /// Record every failure from an iterator
    pub fn extend(&mut self, failures: impl IntoIterator<Item = ExtractionFailure>) {
        for failure in failures {
            self.record(failure);
        }
    }

    /// Records in first-seen order
    pub fn records(&self) -> &[ExtractionFailure] {
        &self.records
    }

    /// Number of distinct (term, category) records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no failure was recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record exists for the given term and category
    pub fn contains(&self, term_id: &TermId, category: FailureCategory) -> bool {
        self.index.contains_key(&(term_id.clone(), category))
    }

    /// How many times a (term, category) pair was reported
    pub fn occurrences(&self, term_id: &TermId, category: FailureCategory) -> usize {
        self.index
            .get(&(term_id.clone(), category))
            .map_or(0, |&pos| self.occurrences[pos])
    }

    /// Distinct record count per category
    pub fn count_by_category(&self) -> BTreeMap<FailureCategory, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
#[path = "failure_test.rs"]
mod tests;
