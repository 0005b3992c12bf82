//! Database implementation
//!
//! This module provides the `Database` facade that ties together the catalog,
//! the parser and the SELECT binder. DDL statements change the catalog;
//! SELECT statements are bound against it.

use crate::catalog::{Catalog, CatalogAccessor};
use crate::common::config::BinderConfig;
use crate::common::error::{BinderError, BinderResult};
use crate::parser::{SqlParser, Statement};
use crate::planner::{SelectBinder, SelectStmt, StatementSummary};
use std::sync::Arc;
use tracing::info;

/// Outcome of one executed statement
#[derive(Debug)]
pub enum StatementResult {
    TableCreated(String),
    TableDropped(String),
    Bound(SelectStmt),
}

impl StatementResult {
    /// Short human readable status line
    pub fn status(&self) -> String {
        match self {
            StatementResult::TableCreated(name) => format!("Table '{}' created", name),
            StatementResult::TableDropped(name) => format!("Table '{}' dropped", name),
            StatementResult::Bound(stmt) => format!(
                "Bound {} field(s) over {} table(s)",
                stmt.query_fields().len(),
                stmt.tables().len()
            ),
        }
    }
}

/// Main database instance
pub struct Database {
    /// Catalog for table management
    catalog: Arc<Catalog>,
    binder: SelectBinder,
    parser: SqlParser,
}

impl Database {
    /// Create a new in-memory database with the default configuration
    pub fn new_in_memory() -> Self {
        Self::with_config(BinderConfig::default())
    }

    pub fn with_config(config: BinderConfig) -> Self {
        Self::from_catalog(Catalog::new(), config)
    }

    /// Wrap an existing catalog, such as one loaded from a schema file
    pub fn from_catalog(catalog: Catalog, config: BinderConfig) -> Self {
        let catalog = Arc::new(catalog);
        let binder = SelectBinder::new_with_catalog(catalog.clone()).with_config(config);
        Self {
            catalog,
            binder,
            parser: SqlParser::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &BinderConfig {
        self.binder.config()
    }

    /// Execute a single statement
    pub fn execute(&self, sql: &str) -> BinderResult<StatementResult> {
        let statement = self.parser.parse(sql)?;
        self.execute_statement(statement)
    }

    /// Execute every statement in `sql`, stopping at the first failure
    pub fn execute_script(&self, sql: &str) -> BinderResult<Vec<StatementResult>> {
        self.parser
            .parse_multiple(sql)?
            .into_iter()
            .map(|statement| self.execute_statement(statement))
            .collect()
    }

    /// Bind a SELECT statement
    pub fn bind(&self, sql: &str) -> BinderResult<SelectStmt> {
        match self.parser.parse(sql)? {
            Statement::Select(select) => self.binder.bind_select(&select),
            _ => Err(BinderError::InvalidArgument(
                "Only SELECT statements can be bound".to_string(),
            )),
        }
    }

    fn execute_statement(&self, statement: Statement) -> BinderResult<StatementResult> {
        match statement {
            Statement::Select(select) => {
                Ok(StatementResult::Bound(self.binder.bind_select(&select)?))
            }
            Statement::CreateTable(create) => {
                self.catalog.create_table(&create.to_table_info())?;
                info!(catalog = self.catalog.name(), table = %create.table_name, "created table");
                Ok(StatementResult::TableCreated(create.table_name))
            }
            Statement::DropTable(drop) => {
                self.catalog.drop_table(&drop.table_name)?;
                info!(catalog = self.catalog.name(), table = %drop.table_name, "dropped table");
                Ok(StatementResult::TableDropped(drop.table_name))
            }
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl StatementSummary {
    /// Render the projection as a box-drawn table followed by the filter
    pub fn to_table_string(&self) -> String {
        let headers = ["#", "table", "field", "type", "aggregation"];
        let rows: Vec<[String; 5]> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                [
                    (i + 1).to_string(),
                    field.table.clone(),
                    field.field.clone(),
                    field.field_type.clone(),
                    field.aggregation.clone(),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(&border(&widths, '┌', '┬', '┐'));
        output.push_str(&line(&widths, headers.iter().map(|h| h.to_string())));
        output.push_str(&border(&widths, '├', '┼', '┤'));
        for row in &rows {
            output.push_str(&line(&widths, row.iter().cloned()));
        }
        output.push_str(&border(&widths, '└', '┴', '┘'));

        output.push_str(&format!("tables: {}\n", self.tables.join(", ")));
        output.push_str(&format!("aggregate: {}\n", self.is_aggregate));
        output.push_str(&format!("filter: {}\n", self.filter));
        output
    }
}

fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut output = String::new();
    output.push(left);
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(width + 2));
        if i < widths.len() - 1 {
            output.push(middle);
        }
    }
    output.push(right);
    output.push('\n');
    output
}

fn line(widths: &[usize], cells: impl Iterator<Item = String>) -> String {
    let mut output = String::from("│");
    for (cell, width) in cells.zip(widths) {
        let padding = width - cell.chars().count();
        output.push_str(&format!(" {}{} │", cell, " ".repeat(padding)));
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;

    #[test]
    fn test_ddl_then_bind() {
        let db = Database::new_in_memory();
        let results = db
            .execute_script("CREATE TABLE t (a INT, b VARCHAR(8)); SELECT * FROM t;")
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(&results[0], StatementResult::TableCreated(name) if name == "t"));
        assert_eq!(results[1].status(), "Bound 2 field(s) over 1 table(s)");

        let dropped = db.execute("DROP TABLE t").unwrap();
        assert!(matches!(dropped, StatementResult::TableDropped(_)));
        assert_eq!(db.bind("SELECT * FROM t").unwrap_err().code(), ErrorCode::TableNotFound);
    }

    #[test]
    fn test_bind_only_accepts_select() {
        let db = Database::new_in_memory();
        let err = db.bind("CREATE TABLE t (a INT)").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(!db.catalog().table_exists("t"));
    }

    #[test]
    fn test_summary_table_rendering() {
        let db = Database::new_in_memory();
        db.execute("create table people (id int, name text)").unwrap();
        let rendered = db
            .bind("select name from people where id = 1")
            .unwrap()
            .summary()
            .to_table_string();

        assert!(rendered.starts_with('┌'));
        assert!(rendered.contains("│ 1 │ people │ name  │ VARCHAR │ none        │"));
        assert!(rendered.contains("filter: people.id = 1"));
    }
}
