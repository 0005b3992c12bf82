//! Bound SELECT statement
//!
//! The output of a successful bind. Every table and field it references was
//! present in the catalog at bind time; it is immutable once built.

use crate::catalog::{FieldMeta, Table};
use crate::planner::aggregation::AggregationKind;
use crate::planner::filter::FilterStmt;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A resolved (table, field, aggregation) triple
#[derive(Debug, Clone)]
pub struct BoundField {
    table: Arc<Table>,
    field_index: usize,
    aggregation: AggregationKind,
}

impl BoundField {
    /// `field_index` must address a field of `table`
    pub(crate) fn new(table: Arc<Table>, field_index: usize, aggregation: AggregationKind) -> Self {
        debug_assert!(field_index < table.field_count());
        Self {
            table,
            field_index,
            aggregation,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        self.table.get_name()
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn field_meta(&self) -> &FieldMeta {
        &self.table.fields()[self.field_index]
    }

    pub fn field_name(&self) -> &str {
        self.field_meta().get_name()
    }

    pub fn aggregation(&self) -> AggregationKind {
        self.aggregation
    }
}

impl PartialEq for BoundField {
    fn eq(&self, other: &Self) -> bool {
        self.table_name() == other.table_name()
            && self.field_index == other.field_index
            && self.aggregation == other.aggregation
    }
}

impl fmt::Display for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.aggregation {
            AggregationKind::None => write!(f, "{}.{}", self.table_name(), self.field_name()),
            AggregationKind::CountAll => write!(f, "COUNT({}.*)", self.table_name()),
            AggregationKind::Function(function) => write!(
                f,
                "{}({}.{})",
                function,
                self.table_name(),
                self.field_name()
            ),
        }
    }
}

/// Bound SELECT statement
///
/// Owns the resolved table list, the projected fields and the WHERE filter.
/// Dropping the statement releases all three.
#[derive(Debug)]
pub struct SelectStmt {
    tables: Vec<Arc<Table>>,
    query_fields: Vec<BoundField>,
    filter_stmt: FilterStmt,
    is_aggregate: bool,
}

impl SelectStmt {
    pub(crate) fn new(
        tables: Vec<Arc<Table>>,
        query_fields: Vec<BoundField>,
        filter_stmt: FilterStmt,
        is_aggregate: bool,
    ) -> Self {
        Self {
            tables,
            query_fields,
            filter_stmt,
            is_aggregate,
        }
    }

    /// Tables in FROM order
    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    pub fn query_fields(&self) -> &[BoundField] {
        &self.query_fields
    }

    pub fn filter_stmt(&self) -> &FilterStmt {
        &self.filter_stmt
    }

    /// True when every projected field is aggregated
    pub fn is_aggregate(&self) -> bool {
        self.is_aggregate
    }

    /// Serializable description for display and JSON output
    pub fn summary(&self) -> StatementSummary {
        StatementSummary {
            tables: self
                .tables
                .iter()
                .map(|table| table.get_name().to_string())
                .collect(),
            fields: self
                .query_fields
                .iter()
                .map(|field| FieldSummary {
                    table: field.table_name().to_string(),
                    field: field.field_name().to_string(),
                    field_type: field.field_meta().field_type.to_string(),
                    aggregation: field.aggregation().to_string(),
                })
                .collect(),
            is_aggregate: self.is_aggregate,
            filter: self.filter_stmt.to_string(),
        }
    }
}

impl PartialEq for SelectStmt {
    fn eq(&self, other: &Self) -> bool {
        self.tables.len() == other.tables.len()
            && self
                .tables
                .iter()
                .zip(&other.tables)
                .all(|(a, b)| a.get_name() == b.get_name())
            && self.query_fields == other.query_fields
            && self.filter_stmt == other.filter_stmt
            && self.is_aggregate == other.is_aggregate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub table: String,
    pub field: String,
    pub field_type: String,
    pub aggregation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSummary {
    pub tables: Vec<String>,
    pub fields: Vec<FieldSummary>,
    pub is_aggregate: bool,
    pub filter: String,
}
