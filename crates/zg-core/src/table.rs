//! Zoned table references.

use crate::newtype_string::define_newtype_string;
use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

define_newtype_string! {
    /// Normalized table name, optionally schema-qualified (`schema.table`).
    ///
    /// Names are lower-case and unquoted; templated parts keep their `$var`
    /// placeholder form.
    pub struct TableName;
}

/// Graph node label for a table reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A relational or lake table
    Table,
    /// A file or directory on the landing area
    File,
}

impl NodeKind {
    /// Label used by the graph store.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Table => "table",
            NodeKind::File => "file",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table living in a specific zone.
///
/// Identity is the (name, zone) pair: the same name in two zones is two
/// distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    /// Normalized table name
    pub name: TableName,
    /// Zone the table was classified into
    pub zone: Zone,
}

impl TableRef {
    /// Create a new reference
    pub fn new(name: TableName, zone: Zone) -> Self {
        Self { name, zone }
    }

    /// Landing references are files; everything else is a table.
    pub fn kind(&self) -> NodeKind {
        if self.zone == Zone::Landing {
            NodeKind::File
        } else {
            NodeKind::Table
        }
    }

    /// Stable key used by graph stores (`Zone::name`).
    pub fn key(&self) -> String {
        format!("{}::{}", self.zone, self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.zone, self.name)
    }
}
