//! SQL dialect abstraction

use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    DatabricksDialect, Dialect, GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect,
    PostgreSqlDialect,
};
use sqlparser::parser::Parser;
use std::sync::OnceLock;
use zg_core::config::Dialect as DialectKind;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        if sql.trim().is_empty() {
            return Err(SqlError::EmptySql);
        }
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let message = e.to_string();
            let (line, column) = error_location(&message);
            SqlError::ParseError {
                message,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Line and column from a sqlparser error message ("... at Line: X, Column: Y").
///
/// `ParserError` carries no structured location, so the text is scanned.
fn error_location(msg: &str) -> (usize, usize) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Line: (\d+), Column: (\d+)").expect("valid regex"));
    re.captures(msg)
        .and_then(|c| Some((c[1].parse().ok()?, c[2].parse().ok()?)))
        .unwrap_or((0, 0))
}

/// A sqlparser dialect selected from configuration
pub struct ConfiguredDialect {
    kind: DialectKind,
    dialect: Box<dyn Dialect + Send + Sync>,
}

impl ConfiguredDialect {
    /// Create the dialect for a configured kind
    pub fn new(kind: DialectKind) -> Self {
        let dialect: Box<dyn Dialect + Send + Sync> = match kind {
            DialectKind::Hive => Box::new(HiveDialect {}),
            DialectKind::Databricks => Box::new(DatabricksDialect {}),
            DialectKind::MsSql => Box::new(MsSqlDialect {}),
            DialectKind::MySql => Box::new(MySqlDialect {}),
            DialectKind::Postgres => Box::new(PostgreSqlDialect {}),
            DialectKind::Generic => Box::new(GenericDialect {}),
        };
        Self { kind, dialect }
    }

    /// Configured kind
    pub fn kind(&self) -> DialectKind {
        self.kind
    }
}

impl SqlDialect for ConfiguredDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    fn name(&self) -> &'static str {
        match self.kind {
            DialectKind::Hive => "hive",
            DialectKind::Databricks => "databricks",
            DialectKind::MsSql => "mssql",
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::Generic => "generic",
        }
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
