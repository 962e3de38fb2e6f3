//! Lineage edges between zoned tables.

use crate::table::TableRef;
use crate::term::TermId;
use crate::zone::is_write_admissible;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed "feeds" relationship: `source` is read to produce `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    /// Table that is read
    pub source: TableRef,
    /// Table that is written
    pub target: TableRef,
    /// Term record the edge was extracted from
    pub provenance: TermId,
}

impl LineageEdge {
    /// Create a new edge
    pub fn new(source: TableRef, target: TableRef, provenance: TermId) -> Self {
        Self {
            source,
            target,
            provenance,
        }
    }

    /// Whether the edge satisfies the zone-ordering rule.
    pub fn is_admissible(&self) -> bool {
        is_write_admissible(self.source.zone, self.target.zone)
    }

    /// Identity of the edge, ignoring provenance.
    pub fn identity(&self) -> (&TableRef, &TableRef) {
        (&self.source, &self.target)
    }
}

impl fmt::Display for LineageEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.provenance)
    }
}
