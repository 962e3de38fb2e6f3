//! zg-core - Core library for zonegraph
//!
//! This crate provides the shared vocabulary of the lineage pipeline: the
//! ordered zone taxonomy and its classifier, table references, term records,
//! lineage edges, the aggregated lineage graph, failure accounting, and the
//! `zonegraph.yml` configuration.

pub mod classifier;
pub mod config;
pub mod error;
pub mod failure;
pub mod graph;
pub mod lineage;
mod newtype_string;
pub mod table;
pub mod term;
pub mod zone;

pub use classifier::{Classified, TableDescriptor, ZoneClassifier};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use failure::{ExtractionFailure, FailureCategory, FailureReport};
pub use graph::LineageGraph;
pub use lineage::LineageEdge;
pub use newtype_string::EmptyIdentifier;
pub use table::{NodeKind, TableName, TableRef};
pub use term::{TermId, TermOrigin, TermRecord, TermSection};
pub use zone::{is_write_admissible, Zone};
