//! Name and keyword based zone classification.
//!
//! Detection is best-effort: a table is placed in a zone by looking at its
//! schema (structural match), then at the caller's hint, then at keywords
//! anywhere in the text. The same input always yields the same answer.

use crate::table::{TableName, TableRef};
use crate::zone::Zone;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Built-in zone vocabulary (token → zone).
const ZONE_TOKENS: &[(&str, Zone)] = &[
    ("origen", Zone::Origen),
    ("landing", Zone::Landing),
    ("land", Zone::Landing),
    ("lnd", Zone::Landing),
    ("1land", Zone::Landing),
    ("file", Zone::Landing),
    ("archivo", Zone::Landing),
    ("path", Zone::Landing),
    ("directorio", Zone::Landing),
    ("carpeta", Zone::Landing),
    ("folder", Zone::Landing),
    ("raw", Zone::Raw),
    ("1raw", Zone::Raw),
    ("cur", Zone::Curado),
    ("2cur", Zone::Curado),
    ("curado", Zone::Curado),
    ("ref", Zone::Refinado),
    ("3ref", Zone::Refinado),
    ("refinado", Zone::Refinado),
    ("con", Zone::Consumo),
    ("4con", Zone::Consumo),
    ("consumo", Zone::Consumo),
    ("kudu", Zone::Consumo),
    ("insertkudu", Zone::Consumo),
    ("dm", Zone::Datamart),
    ("mart", Zone::Datamart),
    ("datamart", Zone::Datamart),
    ("data_analytics", Zone::Datamart),
];

/// Deprecated transfer zones that are never placed in the taxonomy.
const DEPRECATED_TOKENS: &[&str] = &["sftp", "ftp"];

/// Relational engines reached through JDBC connections.
const SOURCE_ENGINES: &[&str] = &[
    "oracle",
    "sqlserver",
    "mssql",
    "postgres",
    "mysql",
    "mariadb",
    "db2",
    "teradata",
    "informix",
    "sybase",
];

fn keyword_checks() -> &'static [(Regex, Zone)] {
    static CHECKS: OnceLock<Vec<(Regex, Zone)>> = OnceLock::new();
    CHECKS.get_or_init(|| {
        [
            (r"datamart_[a-z0-9_]+", Zone::Datamart),
            (r"raw|1raw", Zone::Raw),
            (r"ref|refinado|3ref", Zone::Refinado),
            (r"cur|curado|2cur", Zone::Curado),
            (r"land|lnd|landing|1land|archivo", Zone::Landing),
            (r"con|consumo|4con", Zone::Consumo),
            (r"dm|mart|datamart", Zone::Datamart),
            (r"archivo|file|path|directorio|carpeta|folder", Zone::Landing),
        ]
        .into_iter()
        .map(|(tokens, zone)| {
            let re = Regex::new(&format!(r"(^|[^a-z0-9])({tokens})($|[^a-z0-9])"))
                .expect("valid regex");
            (re, zone)
        })
        .collect()
    })
}

fn placeholder_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:\$\{?|var_)[a-z0-9]+\}?_)+").expect("valid regex")
    })
}

fn datamart_schema_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|_)datamart_([a-z0-9_]+)$").expect("valid regex"))
}

fn zone_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:^|_)(1land|2cur|3ref|4con|1raw|raw|ref|cur|dm|mart|datamart|data_analytics|kudu|insertkudu|landing|lnd|land|con|consumo)$",
        )
        .expect("valid regex")
    })
}

/// Strip quoting and aliases from a raw table reference, lower-casing it.
pub fn clean_table_text(raw: &str) -> String {
    let first = raw.split_whitespace().next().unwrap_or("");
    let mut name: String = first
        .chars()
        .filter(|c| !matches!(c, '`' | '[' | ']'))
        .collect();
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        name = name[1..name.len() - 1].to_string();
    }
    name.to_lowercase()
}

/// Input to [`ZoneClassifier::classify`].
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor<'a> {
    /// Table text as found in the term (possibly quoted or qualified)
    pub raw: &'a str,
    /// Zone suggested by the surrounding attribute or connection
    pub hint: Option<Zone>,
}

impl<'a> TableDescriptor<'a> {
    /// Descriptor without a zone hint
    pub fn new(raw: &'a str) -> Self {
        Self { raw, hint: None }
    }

    /// Descriptor with an optional zone hint
    pub fn with_hint(raw: &'a str, hint: Option<Zone>) -> Self {
        Self { raw, hint }
    }
}

/// Result of classifying a table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classified {
    /// Detected zone, `None` when unknown
    pub zone: Option<Zone>,
    /// Canonical table name
    pub name: String,
}

impl Classified {
    /// Build a [`TableRef`] when both a name and a zone are known.
    pub fn to_table_ref(&self) -> Option<TableRef> {
        let zone = self.zone?;
        let name = TableName::try_new(self.name.clone())?;
        Some(TableRef::new(name, zone))
    }
}

/// Maps table identifiers and connection descriptors to zones.
#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier {
    extra_tokens: BTreeMap<String, Zone>,
}

impl ZoneClassifier {
    /// Classifier with the built-in vocabulary only
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with additional schema tokens (checked before the built-ins).
    pub fn with_tokens(tokens: &BTreeMap<String, Zone>) -> Self {
        Self {
            extra_tokens: tokens
                .iter()
                .map(|(k, v)| (k.to_lowercase(), *v))
                .collect(),
        }
    }

    /// Map a single token (schema name, attribute suffix) to a zone.
    pub fn normalize_token(&self, token: &str) -> Option<Zone> {
        let t = token.trim().to_lowercase();
        if t.is_empty() || DEPRECATED_TOKENS.contains(&t.as_str()) {
            return None;
        }
        if let Some(zone) = self.extra_tokens.get(&t) {
            return Some(*zone);
        }
        if let Some((_, zone)) = ZONE_TOKENS.iter().find(|(tok, _)| *tok == t) {
            return Some(*zone);
        }
        if t.starts_with("datamart_") {
            return Some(Zone::Datamart);
        }
        None
    }

    /// Guess a zone from free text (table name or attribute key).
    pub fn infer_from_text(&self, text: &str) -> Option<Zone> {
        let txt = text.to_lowercase();
        if txt.is_empty() {
            return None;
        }

        if txt.contains("kudu") {
            return Some(Zone::Consumo);
        }
        if txt.contains("data_analytics") {
            return Some(Zone::Datamart);
        }
        if DEPRECATED_TOKENS.iter().any(|t| txt.contains(t)) {
            return None;
        }
        if txt.contains("archivo") {
            return Some(Zone::Landing);
        }

        keyword_checks()
            .iter()
            .find(|(re, _)| re.is_match(&txt))
            .map(|(_, zone)| *zone)
    }

    /// Guess a zone from a table name, looking at the schema first.
    pub fn infer_from_table_name(&self, table: &str) -> Option<Zone> {
        let cleaned = clean_table_text(table);
        if let Some((schema, _)) = cleaned.split_once('.') {
            if let Some(zone) = self.infer_from_text(schema) {
                return Some(zone);
            }
        }
        self.infer_from_text(&cleaned)
    }

    /// Zone of a connection descriptor (JDBC URL, engine name, service name).
    pub fn classify_connection(&self, descriptor: &str) -> Option<Zone> {
        let d = descriptor.trim().to_lowercase();
        if d.starts_with("jdbc:") || SOURCE_ENGINES.iter().any(|e| d.contains(e)) {
            return Some(Zone::Origen);
        }
        self.infer_from_text(&d)
    }

    /// Classify a table reference into a zone and canonical name.
    ///
    /// Resolution order: schema structure (`datamart_*`, exact zone token,
    /// `_<zone>` suffix), then the descriptor hint, then keyword inference.
    pub fn classify(&self, descriptor: &TableDescriptor<'_>) -> Classified {
        let s = clean_table_text(descriptor.raw);
        if s.is_empty() {
            return Classified {
                zone: None,
                name: String::new(),
            };
        }

        let hint = descriptor.hint;
        let Some((left, right)) = s.split_once('.') else {
            return Classified {
                zone: hint.or_else(|| self.infer_from_text(&s)),
                name: s,
            };
        };

        let stripped = placeholder_prefix_re().replace(left, "");
        let clean_left: &str = if stripped.is_empty() { left } else { &stripped };

        if let Some(caps) = datamart_schema_re().captures(clean_left) {
            return Classified {
                zone: Some(Zone::Datamart),
                name: format!("{}.{right}", &caps[1]),
            };
        }
        if clean_left == "data_analytics" {
            return Classified {
                zone: Some(Zone::Datamart),
                name: format!("analytics.{right}"),
            };
        }

        if let Some(zone) = self.normalize_token(clean_left) {
            return Classified {
                zone: Some(zone),
                name: right.to_string(),
            };
        }

        if let Some(caps) = zone_suffix_re().captures(clean_left) {
            let zone = self
                .normalize_token(&caps[1])
                .or(hint)
                .or_else(|| self.infer_from_text(&caps[1]));
            return Classified {
                zone,
                name: format!("{clean_left}.{right}"),
            };
        }

        Classified {
            zone: hint.or_else(|| self.infer_from_text(left)),
            name: format!("{left}.{right}"),
        }
    }

    /// Tokens that mark an attribute key as pointing at landing files.
    pub fn landing_tokens(&self) -> impl Iterator<Item = &'static str> {
        ZONE_TOKENS
            .iter()
            .filter(|(_, zone)| *zone == Zone::Landing)
            .map(|(token, _)| *token)
    }
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
