//! Metadata term records describing data-flow jobs.
//!
//! A term body comes in one of two shapes:
//!
//! - catalog shape: a `classifications` array where each entry carries a
//!   `typeName` and an `attributes` object;
//! - mirror shape: a flat attribute object.
//!
//! Either way the extractor walks it as a list of [`TermSection`]s.

use crate::newtype_string::define_newtype_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

define_newtype_string! {
    /// Identifier of a term record (the glossary term name).
    pub struct TermId;
}

/// Where a term record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermOrigin {
    /// Mirrored repository of term JSON files
    Mirror,
    /// Live metadata catalog API
    Catalog,
}

impl fmt::Display for TermOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermOrigin::Mirror => write!(f, "mirror"),
            TermOrigin::Catalog => write!(f, "catalog"),
        }
    }
}

/// One metadata definition of a data-flow job. Never mutated after fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    /// Term identifier
    pub id: TermId,
    /// Human-readable name (file path or catalog display name)
    pub display_name: String,
    /// Source the record was fetched from
    pub origin: TermOrigin,
    /// Catalog GUID, when fetched from the catalog
    #[serde(default)]
    pub guid: Option<String>,
    /// Raw JSON body
    pub body: Value,
}

/// A named group of attributes inside a term record.
#[derive(Debug, Clone)]
pub struct TermSection<'a> {
    /// Classification type name, empty for mirror-shaped records
    pub name: &'a str,
    /// Attribute key/value pairs, ordered by key
    pub attributes: Vec<(&'a str, &'a Value)>,
}

const DEFAULT_SECTION_NAME: &str = "Clasificacion";

impl TermRecord {
    /// Create a record whose display name is the term id.
    pub fn new(id: TermId, origin: TermOrigin, body: Value) -> Self {
        Self {
            display_name: id.to_string(),
            id,
            origin,
            guid: None,
            body,
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the catalog GUID
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// Non-empty `classifications` array, if the record has the catalog shape.
    fn classifications(&self) -> Option<&Vec<Value>> {
        self.body
            .get("classifications")
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
    }

    /// Split the body into attribute sections.
    pub fn sections(&self) -> Vec<TermSection<'_>> {
        if let Some(classifications) = self.classifications() {
            return classifications
                .iter()
                .filter(|c| c.is_object())
                .map(|c| {
                    let name = c
                        .get("typeName")
                        .or_else(|| c.get("type"))
                        .and_then(Value::as_str)
                        .unwrap_or(DEFAULT_SECTION_NAME);
                    let attributes = c
                        .get("attributes")
                        .and_then(Value::as_object)
                        .map(|attrs| attrs.iter().map(|(k, v)| (k.as_str(), v)).collect())
                        .unwrap_or_default();
                    TermSection { name, attributes }
                })
                .collect();
        }

        match self.body.as_object() {
            Some(attrs) => vec![TermSection {
                name: "",
                attributes: attrs
                    .iter()
                    .filter(|(k, _)| k.as_str() != "classifications")
                    .map(|(k, v)| (k.as_str(), v))
                    .collect(),
            }],
            None => Vec::new(),
        }
    }
}
