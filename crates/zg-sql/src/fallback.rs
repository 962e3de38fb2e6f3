//! Regex recovery for statements no dialect accepts.
//!
//! Only the table-bearing clauses are looked at: `FROM`/`JOIN` for reads,
//! `INSERT INTO`/`UPDATE`/`TABLE`/`INTO` for the write target, `DELETE FROM`
//! for deletes, and `name AS (` for CTE names.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn cte_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\w+)\s+AS\s*\(").expect("valid regex"))
}

fn from_join_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:FROM|JOIN)\s+([a-zA-Z0-9_."`]+)"#).expect("valid regex")
    })
}

fn write_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:INSERT\s+INTO|UPDATE|TABLE|INTO)\s+([a-zA-Z0-9_."`]+)"#)
            .expect("valid regex")
    })
}

fn delete_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bDELETE\s+FROM\s+([a-zA-Z0-9_."`]+)"#).expect("valid regex")
    })
}

fn clean(name: &str) -> String {
    name.to_lowercase().replace(['"', '`'], "")
}

/// Tables recovered by pattern matching, not yet normalized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveredTables {
    /// Tables read
    pub reads: BTreeSet<String>,
    /// Write target, if any
    pub write: Option<String>,
    /// Delete target, if any
    pub delete: Option<String>,
}

impl RecoveredTables {
    /// Whether nothing at all was recovered
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.write.is_none() && self.delete.is_none()
    }
}

/// Recover read/write tables from a (sanitized) statement.
pub fn recover_tables(sql: &str) -> RecoveredTables {
    let ctes: BTreeSet<String> = cte_re()
        .captures_iter(sql)
        .map(|c| c[1].to_lowercase())
        .filter(|c| !c.contains('.'))
        .collect();

    let delete = delete_re().captures(sql).map(|c| clean(&c[1]));
    let write = write_re()
        .captures(sql)
        .map(|c| clean(&c[1]))
        .filter(|w| Some(w) != delete.as_ref());

    let reads = from_join_re()
        .captures_iter(sql)
        .map(|c| clean(&c[1]))
        .filter(|s| s.contains('.') || !ctes.contains(s))
        .filter(|s| Some(s) != write.as_ref() && Some(s) != delete.as_ref())
        .filter(|s| s.len() > 1)
        .collect();

    RecoveredTables {
        reads,
        write,
        delete,
    }
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
