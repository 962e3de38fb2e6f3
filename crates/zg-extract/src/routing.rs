//! Attribute routing: what a term attribute contributes to lineage.
//!
//! Keys are matched lower-cased and trimmed; the first matching rule wins.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use zg_core::{Zone, ZoneClassifier};

/// Where an attribute's value goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeRoute {
    /// `pre-query` DELETE: tables that re-zone matching Consumo candidates
    PreDelete,
    /// `post-query` UPDATE: re-zoning tables, extra targets when unmatched
    PostUpdate,
    /// Connection descriptor for the section
    Connection(Option<Zone>),
    /// Default schema for unqualified names in the section
    Schema,
    /// HBase lane target table
    HBaseTarget,
    /// HBase lane SQL
    HBaseSql,
    /// SQL whose reads are sources and writes are targets
    Sql { hint: Option<Zone> },
    /// File on the landing area (both source and target)
    LandingFile,
    /// Explicit target tables
    Targets { hint: Option<Zone> },
    /// Explicit source tables
    Sources { hint: Option<Zone> },
    /// Nothing to do with lineage
    Ignored,
}

const CONNECTION_KEYS: &[&str] = &[
    "conexion",
    "connection",
    "jdbc",
    "jdbc_url",
    "connection_url",
    "url_conexion",
];

const SCHEMA_KEYS: &[&str] = &["schema", "esquema", "default_schema", "database", "base_de_datos"];

macro_rules! key_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

key_regex!(ing_table_re, r"^\s*ing[_ ]tabla[_ ]([a-z0-9_]+)\s*:?\s*$");
key_regex!(ing_query_re, r"^\s*ing[_ ]query[_ ]([a-z0-9_]+)\s*:?\s*$");
key_regex!(insert_query_re, r"query.*insert(ar)?|insertkudu.*query");
key_regex!(destination_re, r"tabla[_ ].*destino|(^|[_ ])destino([_ ]|$)");
key_regex!(source_re, r"tabla[_ ].*origen");
key_regex!(sql_keyword_re, r"(?i)\b(select|insert|update|from|join)\b");
key_regex!(
    path_re,
    r"(?x)^(
        (/[^/\x00]+)+/?
      | (\\\\[^\\/\x00]+\\[^\\/\x00]+(?:\\[^\\/\x00]+)*)
      | (\.{1,2}[\\/].+ | [^\\/\x00]+([\\/][^\\/\x00]+)+)
    )$"
);

/// Whether a value reads like a SQL statement
pub fn looks_like_sql(value: &str) -> bool {
    let padded = format!(
        " {} ",
        value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    );
    [" select ", " from ", " join ", " insert "]
        .iter()
        .any(|kw| padded.contains(kw))
}

/// Whether a value contains a SQL keyword (used for table lists)
pub fn contains_sql_keyword(value: &str) -> bool {
    sql_keyword_re().is_match(value)
}

/// Whether a value reads like a filesystem path
pub fn looks_like_path(value: &str) -> bool {
    path_re().is_match(value.trim())
}

/// Text form of an attribute value (arrays joined by newlines)
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) => String::new(),
    }
}

/// Decide what an attribute contributes.
pub fn route_attribute(classifier: &ZoneClassifier, key: &str, value: &str) -> AttributeRoute {
    let key = key.trim().to_lowercase();
    if key.is_empty() || value.trim().is_empty() {
        return AttributeRoute::Ignored;
    }
    let lowered_value = value.to_lowercase();

    if key.contains("pre-query") && lowered_value.contains("delete") {
        return AttributeRoute::PreDelete;
    }
    if key.contains("post-query") && lowered_value.contains("update") {
        return AttributeRoute::PostUpdate;
    }
    if CONNECTION_KEYS.contains(&key.as_str()) {
        return AttributeRoute::Connection(classifier.classify_connection(value));
    }
    if SCHEMA_KEYS.contains(&key.as_str()) {
        return AttributeRoute::Schema;
    }
    if key.contains("inserthbase") && key.contains("tabla") {
        return AttributeRoute::HBaseTarget;
    }
    if key.contains("inserthbase") && key.contains("query") {
        return AttributeRoute::HBaseSql;
    }
    if key.contains("origen") && key.contains("query") {
        return AttributeRoute::Sql {
            hint: Some(Zone::Origen),
        };
    }

    let has_landing_token = classifier.landing_tokens().any(|t| key.contains(t));
    if has_landing_token && !key.contains("encoding") {
        return AttributeRoute::LandingFile;
    }

    if let Some(caps) = ing_table_re().captures(&key) {
        let token = &caps[1];
        return AttributeRoute::Targets {
            hint: classifier
                .normalize_token(token)
                .or_else(|| classifier.infer_from_text(token)),
        };
    }
    if let Some(caps) = ing_query_re().captures(&key) {
        let token = &caps[1];
        return AttributeRoute::Sql {
            hint: classifier
                .normalize_token(token)
                .or_else(|| classifier.infer_from_text(token)),
        };
    }

    if insert_query_re().is_match(&key) {
        return AttributeRoute::Sql {
            hint: classifier.infer_from_text(&key),
        };
    }
    if destination_re().is_match(&key) {
        return AttributeRoute::Targets {
            hint: classifier.infer_from_text(&key),
        };
    }
    if source_re().is_match(&key) {
        return AttributeRoute::Sources {
            hint: classifier.infer_from_text(&key),
        };
    }

    if looks_like_sql(value) {
        return AttributeRoute::Sql { hint: None };
    }
    if looks_like_path(value) {
        return AttributeRoute::LandingFile;
    }
    AttributeRoute::Ignored
}

#[cfg(test)]
#[path = "routing_test.rs"]
mod tests;
