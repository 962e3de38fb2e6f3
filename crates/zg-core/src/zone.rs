//! Ordered zone taxonomy of the data lake.
//!
//! Zones are compared through an explicit rank table rather than by name, so
//! renaming a zone can never silently reorder the pipeline stages.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A processing stage of the data lake/warehouse lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Operational source systems (relational engines reached over JDBC)
    Origen,
    /// Files dropped on the landing area
    Landing,
    /// Raw copies of landed data
    Raw,
    /// Curated, cleaned data
    Curado,
    /// Refined, business-modelled data
    Refinado,
    /// Consumption layer (Kudu/Impala serving tables)
    Consumo,
    /// Departmental data marts
    Datamart,
}

impl Zone {
    /// Every zone, earliest stage first.
    pub const ALL: [Zone; 7] = [
        Zone::Origen,
        Zone::Landing,
        Zone::Raw,
        Zone::Curado,
        Zone::Refinado,
        Zone::Consumo,
        Zone::Datamart,
    ];

    /// Position of the zone in the pipeline (0 = earliest).
    pub fn rank(self) -> u8 {
        match self {
            Zone::Origen => 0,
            Zone::Landing => 1,
            Zone::Raw => 2,
            Zone::Curado => 3,
            Zone::Refinado => 4,
            Zone::Consumo => 5,
            Zone::Datamart => 6,
        }
    }

    /// True when `self` is a strictly earlier stage than `other`.
    pub fn is_before(self, other: Zone) -> bool {
        self.rank() < other.rank()
    }

    /// Display name used in exports and the graph store.
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Origen => "Origen",
            Zone::Landing => "Landing",
            Zone::Raw => "Raw",
            Zone::Curado => "Curado",
            Zone::Refinado => "Refinado",
            Zone::Consumo => "Consumo",
            Zone::Datamart => "Datamart",
        }
    }
}

impl PartialOrd for Zone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Zone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|z| z.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownZone {
                name: s.to_string(),
            })
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Zone-ordering admission rule for a (source, target) pair.
///
/// A read only feeds a write when it comes from a strictly earlier zone. The
/// single exception is a Datamart target, which may also read from another
/// Datamart. Same-zone reads into any other zone and later-into-earlier reads
/// are rejected.
pub fn is_write_admissible(source: Zone, target: Zone) -> bool {
    source.is_before(target) || (target == Zone::Datamart && source.rank() <= target.rank())
}

#[cfg(test)]
#[path = "zone_test.rs"]
mod tests;
