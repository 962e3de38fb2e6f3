//! Read/write table extraction from SQL AST

use sqlparser::ast::{
    ObjectName, ObjectNamePart, Query, SetExpr, Statement, TableObject, Visit, Visitor,
};
use std::collections::HashSet;
use std::ops::ControlFlow;

/// What a statement does to its target table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// INSERT, MERGE, UPDATE, CREATE TABLE
    Write,
    /// DELETE
    Delete,
}

/// Raw (un-normalized) tables referenced by one statement
#[derive(Debug, Default, Clone)]
pub struct StatementTables {
    /// Every relation in visit order, target included
    pub relations: Vec<String>,
    /// CTE names declared anywhere in the statement (lower-case)
    pub ctes: HashSet<String>,
    /// Statement target, if any
    pub target: Option<(String, TargetKind)>,
}

/// Collects relation names and CTE aliases while walking the AST.
#[derive(Default)]
struct RelationCollector {
    relations: Vec<String>,
    ctes: HashSet<String>,
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.ctes.insert(cte.alias.name.value.to_lowercase());
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        let name = object_name_text(relation);
        if !name.is_empty() {
            self.relations.push(name);
        }
        ControlFlow::Continue(())
    }
}

/// Dotted text of an object name (identifier values, quotes already removed)
pub fn object_name_text(name: &ObjectName) -> String {
    name.0
        .iter()
        .filter_map(|part| match part {
            ObjectNamePart::Identifier(ident) => Some(ident.value.as_str()),
            #[allow(unreachable_patterns)]
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn collect(statement: &Statement) -> RelationCollector {
    let mut collector = RelationCollector::default();
    let _ = statement.visit(&mut collector);
    collector
}

/// Target of a statement.
///
/// UPDATE, MERGE and DELETE visit their target relation first.
fn statement_target(statement: &Statement, relations: &[String]) -> Option<(String, TargetKind)> {
    match statement {
        Statement::Insert(insert) => match &insert.table {
            TableObject::TableName(name) => Some((object_name_text(name), TargetKind::Write)),
            #[allow(unreachable_patterns)]
            _ => None,
        },
        Statement::CreateTable(create) => {
            Some((object_name_text(&create.name), TargetKind::Write))
        }
        Statement::Update { .. } | Statement::Merge { .. } => relations
            .first()
            .map(|name| (name.clone(), TargetKind::Write)),
        Statement::Delete { .. } => relations
            .first()
            .map(|name| (name.clone(), TargetKind::Delete)),
        Statement::Query(query) => match query.body.as_ref() {
            SetExpr::Insert(inner) | SetExpr::Update(inner) => {
                let nested = collect(inner);
                statement_target(inner, &nested.relations)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Relations, CTE names and target of one parsed statement
pub fn statement_tables(statement: &Statement) -> StatementTables {
    let collector = collect(statement);
    let target = statement_target(statement, &collector.relations);
    StatementTables {
        relations: collector.relations,
        ctes: collector.ctes,
        target,
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
