//! zg-extract - Term extraction for zonegraph
//!
//! Turns one metadata term record into candidate lineage edges. Each section
//! of the record is routed attribute by attribute into SQL, explicit table
//! lists, landing files and zone overrides; the resulting sources and targets
//! are classified into zones and every admissible pair becomes an edge.

pub mod extractor;
pub mod overrides;
pub mod routing;

pub use extractor::{Extraction, TermExtractor};
pub use overrides::PlaceholderMatcher;
pub use routing::{route_attribute, AttributeRoute};
