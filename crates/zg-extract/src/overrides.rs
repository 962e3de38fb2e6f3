//! Placeholder-aware table name matching for pre/post query overrides.

use regex::Regex;
use std::collections::BTreeMap;

/// Drop the schema part of `schema.table`
fn strip_schema(name: &str) -> &str {
    name.split_once('.').map_or(name, |(_, table)| table)
}

/// Compares table names where `$NAME` placeholders stand for a known set of
/// values (e.g. `$entidad` for `bsc|bsj|ber|bsf`).
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMatcher {
    /// (escaped `$name`, alternation group), longest name first
    substitutions: Vec<(String, String)>,
}

impl PlaceholderMatcher {
    /// Build from placeholder name → allowed values
    pub fn new(placeholders: &BTreeMap<String, Vec<String>>) -> Self {
        let mut substitutions: Vec<(String, String)> = placeholders
            .iter()
            .map(|(name, values)| {
                let var = regex::escape(&format!("${}", name.to_lowercase()));
                let alternatives = values
                    .iter()
                    .map(|v| regex::escape(&v.to_lowercase()))
                    .collect::<Vec<_>>()
                    .join("|");
                (var, format!("({alternatives})"))
            })
            .collect();
        substitutions.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { substitutions }
    }

    fn pattern(&self, table: &str) -> Option<Regex> {
        let mut pattern = regex::escape(table);
        for (var, group) in &self.substitutions {
            pattern = pattern.replace(var.as_str(), group);
        }
        match Regex::new(&format!("^{pattern}$")) {
            Ok(re) => Some(re),
            Err(e) => {
                log::debug!("Cannot build matcher for '{}': {}", table, e);
                None
            }
        }
    }

    /// Whether two table names denote the same table.
    ///
    /// Schemas are ignored; placeholders on either side match any of their
    /// configured values.
    pub fn tables_equal(&self, a: &str, b: &str) -> bool {
        let a = strip_schema(a).to_lowercase();
        let b = strip_schema(b).to_lowercase();
        if a == b {
            return true;
        }
        let matches = |pattern_of: &str, candidate: &str| {
            self.pattern(pattern_of)
                .is_some_and(|re| re.is_match(candidate))
        };
        matches(&a, &b) || matches(&b, &a)
    }
}
