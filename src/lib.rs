//! PrismDB Binder - SELECT statement binding
//!
//! Resolves parsed SELECT statements against a catalog of tables. A bound
//! statement references concrete tables and typed fields, carries a validated
//! aggregation kind for every projected field and owns its bound WHERE filter.
//!
//! ```
//! use prism_binder::Database;
//!
//! let db = Database::new_in_memory();
//! db.execute("CREATE TABLE users (id INT, name VARCHAR(20))").unwrap();
//! let stmt = db.bind("SELECT count(*) FROM users").unwrap();
//! assert!(stmt.is_aggregate());
//! ```

pub mod catalog;
pub mod common;
pub mod database;
pub mod parser;
pub mod planner;
pub mod types;

// Re-export catalog system for convenience
pub use catalog::{
    Catalog, CatalogAccessor, CatalogDefinition, ColumnInfo, FieldMeta, Table, TableInfo,
};

// Re-export common types for convenience
pub use common::{
    BinderConfig, BinderError, BinderResult, DuplicateTablePolicy, ErrorCode, ProjectionOrder,
};

// Re-export type system for convenience
pub use types::{LogicalType, Value};

// Re-export database for convenience
pub use crate::database::{Database, StatementResult};

// Re-export parser entry points for convenience
pub use parser::{parse_sql, parse_sql_multiple, SelectSyntax, Statement};

// Re-export planner system for convenience
pub use planner::{
    AggregateFunction, AggregationKind, BindContext, BoundField, FilterBinder, FilterStmt,
    PredicateBinder, SelectBinder, SelectStmt, StatementSummary,
};
