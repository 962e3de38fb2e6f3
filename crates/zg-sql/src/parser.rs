//! SqlStatementParser: tolerant read/write table extraction

use crate::dialect::{ConfiguredDialect, SqlDialect};
use crate::error::SqlError;
use crate::extractor::{statement_tables, TargetKind};
use crate::fallback::recover_tables;
use crate::sanitize::{is_structural_keyword, restore_placeholders, sanitize};
use crate::split::split_statements;
use serde::Serialize;
use sqlparser::ast::Statement;
use std::collections::{BTreeSet, HashSet};
use zg_core::config::{Dialect as DialectKind, SqlConfig};

/// Naming context used to qualify unqualified table names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContext {
    /// Schema prepended to unqualified names
    pub default_schema: Option<String>,
}

impl SchemaContext {
    /// Context with a default schema
    pub fn with_default_schema(schema: impl Into<String>) -> Self {
        Self {
            default_schema: Some(schema.into()),
        }
    }

    fn qualify(&self, name: String) -> String {
        match &self.default_schema {
            Some(schema) if !name.contains('.') => format!("{}.{}", schema.to_lowercase(), name),
            _ => name,
        }
    }
}

/// How a SQL text was understood
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseOutcome {
    /// Nothing to parse after sanitizing
    Empty,
    /// The whole text parsed with one dialect
    Parsed { dialect: &'static str },
    /// The text was split and recovered statement by statement
    Recovered {
        /// Statements parsed by some dialect
        parsed: usize,
        /// Statements recovered with the regex fallback
        fallback: usize,
        /// Statements nothing could be recovered from
        failed: usize,
    },
    /// No table could be recovered
    Failed { message: String },
}

impl ParseOutcome {
    /// Whether the text could not be understood at all
    pub fn is_failed(&self) -> bool {
        matches!(self, ParseOutcome::Failed { .. })
    }
}

/// Tables read, written and deleted by a SQL text (normalized, sorted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableExtraction {
    /// Tables read (FROM, JOIN, subqueries, CTE bodies)
    pub reads: BTreeSet<String>,
    /// Tables written (INSERT, MERGE, UPDATE, CREATE TABLE)
    pub writes: BTreeSet<String>,
    /// Tables deleted from
    pub deletes: BTreeSet<String>,
    /// Parse outcome
    pub outcome: ParseOutcome,
}

impl TableExtraction {
    fn new(outcome: ParseOutcome) -> Self {
        Self {
            reads: BTreeSet::new(),
            writes: BTreeSet::new(),
            deletes: BTreeSet::new(),
            outcome,
        }
    }

    /// Whether no table was found
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty() && self.deletes.is_empty()
    }
}

/// Lower-case, unquote and restore placeholders in a table name
pub fn normalize_table_name(raw: &str) -> String {
    let lowered = raw
        .trim()
        .to_lowercase()
        .replace(['"', '`', '\'', '[', ']'], "");
    restore_placeholders(&lowered)
}

/// Whether a normalized name can be a table: longer than one character and
/// not a bare SQL keyword.
fn is_table_name(name: &str) -> bool {
    name.len() > 1 && (name.contains('.') || !is_structural_keyword(name))
}

/// Accumulates normalized tables across statements
#[derive(Default)]
struct Accumulator {
    reads: BTreeSet<String>,
    writes: BTreeSet<String>,
    deletes: BTreeSet<String>,
}

impl Accumulator {
    fn add_statement(&mut self, statement: &Statement, ctx: &SchemaContext) {
        let tables = statement_tables(statement);
        let target = tables
            .target
            .map(|(name, kind)| (normalize_table_name(&name), kind));

        for relation in &tables.relations {
            let name = normalize_table_name(relation);
            if !is_table_name(&name) || (!name.contains('.') && tables.ctes.contains(&name)) {
                continue;
            }
            if target.as_ref().is_some_and(|(t, _)| *t == name) {
                continue;
            }
            self.reads.insert(ctx.qualify(name));
        }

        if let Some((name, kind)) = target.filter(|(name, _)| is_table_name(name)) {
            let name = ctx.qualify(name);
            match kind {
                TargetKind::Write => self.writes.insert(name),
                TargetKind::Delete => self.deletes.insert(name),
            };
        }
    }

    fn add_recovered(&mut self, sql: &str, ctx: &SchemaContext) -> bool {
        let recovered = recover_tables(sql);
        let restore = |name: &str| {
            let name = normalize_table_name(name);
            is_table_name(&name).then(|| ctx.qualify(name))
        };
        let reads: Vec<String> = recovered.reads.iter().filter_map(|n| restore(n)).collect();
        let write = recovered.write.as_deref().and_then(restore);
        let delete = recovered.delete.as_deref().and_then(restore);
        if reads.is_empty() && write.is_none() && delete.is_none() {
            return false;
        }
        self.reads.extend(reads);
        self.writes.extend(write);
        self.deletes.extend(delete);
        true
    }

    fn finish(self, outcome: ParseOutcome) -> TableExtraction {
        TableExtraction {
            reads: self.reads,
            writes: self.writes,
            deletes: self.deletes,
            outcome,
        }
    }
}

/// Extracts read/write table sets from SQL fragments.
///
/// Never fails: text no dialect can parse is split into statements and each
/// is retried, then recovered by pattern matching. Only when nothing at all
/// is recovered does the outcome become [`ParseOutcome::Failed`].
pub struct SqlStatementParser {
    dialects: Vec<Box<dyn SqlDialect>>,
}

impl SqlStatementParser {
    /// Parser trying the given dialects in order
    pub fn new(kinds: &[DialectKind]) -> Self {
        Self {
            dialects: kinds
                .iter()
                .map(|k| Box::new(ConfiguredDialect::new(*k)) as Box<dyn SqlDialect>)
                .collect(),
        }
    }

    /// Parser from the `sql` configuration section
    pub fn from_config(config: &SqlConfig) -> Self {
        Self::new(&config.dialects)
    }

    /// Names of the dialects, in trial order
    pub fn dialect_names(&self) -> Vec<&'static str> {
        self.dialects.iter().map(|d| d.name()).collect()
    }

    /// First dialect that parses `sql`, with its statements
    fn parse_any(&self, sql: &str) -> Result<(&'static str, Vec<Statement>), SqlError> {
        let mut first_error = None;
        for dialect in &self.dialects {
            match dialect.parse(sql) {
                Ok(statements) if !statements.is_empty() => {
                    return Ok((dialect.name(), statements));
                }
                Ok(_) => {}
                Err(e) => {
                    log::debug!("Dialect {} failed: {}", dialect.name(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error.unwrap_or(SqlError::NoDialect))
    }

    /// Extract the tables a SQL text reads, writes and deletes.
    pub fn extract_tables(&self, sql: &str, ctx: &SchemaContext) -> TableExtraction {
        let clean = sanitize(sql);
        if clean.trim().is_empty() {
            return TableExtraction::new(ParseOutcome::Empty);
        }

        let first_error = match self.parse_any(&clean) {
            Ok((dialect, statements)) => {
                let mut acc = Accumulator::default();
                for statement in &statements {
                    acc.add_statement(statement, ctx);
                }
                return acc.finish(ParseOutcome::Parsed { dialect });
            }
            Err(e) => e,
        };

        let names = self.dialect_names().join(", ");
        log::warn!(
            "All SQL dialects ({}) failed for statement (first 200 chars): {:.200}",
            names,
            clean.trim()
        );

        let mut acc = Accumulator::default();
        let (mut parsed, mut fallback, mut failed) = (0, 0, 0);
        for piece in split_statements(&clean) {
            if let Ok((_, statements)) = self.parse_any(piece) {
                for statement in &statements {
                    acc.add_statement(statement, ctx);
                }
                parsed += 1;
            } else if acc.add_recovered(piece, ctx) {
                fallback += 1;
            } else {
                log::debug!("Nothing recovered from statement: {:.200}", piece);
                failed += 1;
            }
        }

        if parsed == 0 && fallback == 0 {
            return TableExtraction::new(ParseOutcome::Failed {
                message: first_error.to_string(),
            });
        }
        acc.finish(ParseOutcome::Recovered {
            parsed,
            fallback,
            failed,
        })
    }
}

impl Default for SqlStatementParser {
    fn default() -> Self {
        Self::from_config(&SqlConfig::default())
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
