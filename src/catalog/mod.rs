//! Catalog System
//!
//! This module provides the table and field metadata the binder resolves names
//! against. The binder only talks to the `CatalogAccessor` trait; `Catalog` is
//! the in-memory implementation used by the database facade and the CLI.

pub mod field;
pub mod table;

pub use field::*;
pub use table::*;

use crate::common::constants::DEFAULT_CATALOG_NAME;
use crate::common::error::{BinderError, BinderResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Read-only view of a catalog, as consumed by the binder
///
/// Implementations must tolerate concurrent readers, since binds may run on
/// several threads against the same catalog.
pub trait CatalogAccessor: Send + Sync {
    /// Catalog name, used in diagnostics
    fn name(&self) -> &str;

    /// Look up a table by name
    fn find_table(&self, name: &str) -> Option<Arc<Table>>;

    /// Names of all tables, used for suggestions
    fn table_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Main catalog that manages table metadata
#[derive(Debug)]
pub struct Catalog {
    name: String,
    tables: RwLock<HashMap<String, Arc<Table>>>,
    metadata: RwLock<CatalogMetadata>,
}

impl Catalog {
    /// Create a new catalog with the default name
    pub fn new() -> Self {
        Self::with_name(DEFAULT_CATALOG_NAME)
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tables: RwLock::new(HashMap::new()),
            metadata: RwLock::new(CatalogMetadata::new()),
        }
    }

    /// Build a catalog from a schema definition
    pub fn from_definition(definition: &CatalogDefinition) -> BinderResult<Self> {
        let catalog = Self::with_name(&definition.name);
        for table_info in &definition.tables {
            catalog.create_table(table_info)?;
        }
        Ok(catalog)
    }

    /// Load a JSON schema definition file
    pub fn load_definition<P: AsRef<Path>>(path: P) -> BinderResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let definition: CatalogDefinition = serde_json::from_str(&text).map_err(|e| {
            BinderError::Catalog(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_definition(&definition)
    }

    /// Snapshot of the catalog as a schema definition
    pub fn to_definition(&self) -> CatalogDefinition {
        let tables = self.tables.read();
        let mut infos: Vec<TableInfo> = tables.values().map(|t| t.to_table_info()).collect();
        infos.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        CatalogDefinition {
            name: self.name.clone(),
            tables: infos,
        }
    }

    /// Create a table
    pub fn create_table(&self, table_info: &TableInfo) -> BinderResult<()> {
        let table = Table::new(table_info)?;

        let mut tables = self.tables.write();
        if tables.contains_key(&table_info.table_name) {
            return Err(BinderError::Catalog(format!(
                "Table '{}' already exists in catalog '{}'",
                table_info.table_name, self.name
            )));
        }
        tables.insert(table_info.table_name.clone(), Arc::new(table));
        self.metadata.write().increment_version();
        Ok(())
    }

    /// Drop a table
    pub fn drop_table(&self, table_name: &str) -> BinderResult<()> {
        let mut tables = self.tables.write();
        if tables.remove(table_name).is_none() {
            return Err(BinderError::table_not_found(&self.name, table_name));
        }
        self.metadata.write().increment_version();
        Ok(())
    }

    /// Get a table
    pub fn get_table(&self, table_name: &str) -> BinderResult<Arc<Table>> {
        self.find_table(table_name)
            .ok_or_else(|| BinderError::table_not_found(&self.name, table_name))
    }

    /// List all tables, sorted by name
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a table exists
    pub fn table_exists(&self, table_name: &str) -> bool {
        self.tables.read().contains_key(table_name)
    }

    /// Get catalog metadata
    pub fn get_metadata(&self) -> CatalogMetadata {
        self.metadata.read().clone()
    }
}

impl CatalogAccessor for Catalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_table(&self, name: &str) -> Option<Arc<Table>> {
        self.tables.read().get(name).cloned()
    }

    fn table_names(&self) -> Vec<String> {
        self.list_tables()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable description of a whole catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default = "default_catalog_name")]
    pub name: String,
    pub tables: Vec<TableInfo>,
}

fn default_catalog_name() -> String {
    DEFAULT_CATALOG_NAME.to_string()
}

/// Catalog metadata
#[derive(Debug, Clone)]
pub struct CatalogMetadata {
    /// Catalog version, bumped on every schema change
    pub version: u64,
    /// Creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last modified time
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

impl CatalogMetadata {
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            version: 1,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn increment_version(&mut self) {
        self.version += 1;
        self.modified_at = chrono::Utc::now();
    }
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::types::LogicalType;

    fn sample_info(name: &str) -> TableInfo {
        TableInfo::new(
            name,
            vec![
                ColumnInfo::new("id", LogicalType::Integer),
                ColumnInfo::new("name", LogicalType::Varchar),
            ],
        )
    }

    #[test]
    fn test_create_and_find_table() {
        let catalog = Catalog::new();
        catalog.create_table(&sample_info("users")).unwrap();

        assert!(catalog.table_exists("users"));
        let table = catalog.find_table("users").unwrap();
        assert_eq!(table.get_name(), "users");
        assert!(catalog.find_table("orders").is_none());
        assert_eq!(catalog.name(), DEFAULT_CATALOG_NAME);
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let catalog = Catalog::new();
        catalog.create_table(&sample_info("users")).unwrap();
        let err = catalog.create_table(&sample_info("users")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Catalog);
    }

    #[test]
    fn test_drop_table() {
        let catalog = Catalog::new();
        catalog.create_table(&sample_info("users")).unwrap();
        catalog.drop_table("users").unwrap();
        assert!(!catalog.table_exists("users"));
        assert_eq!(
            catalog.drop_table("users").unwrap_err().code(),
            ErrorCode::TableNotFound
        );
    }

    #[test]
    fn test_version_bumped_on_ddl() {
        let catalog = Catalog::new();
        let before = catalog.get_metadata().version;
        catalog.create_table(&sample_info("a")).unwrap();
        catalog.create_table(&sample_info("b")).unwrap();
        catalog.drop_table("a").unwrap();
        assert_eq!(catalog.get_metadata().version, before + 3);
    }

    #[test]
    fn test_table_creation_time() {
        let catalog = Catalog::new();
        let created = catalog.get_metadata().created_at;
        catalog.create_table(&sample_info("users")).unwrap();

        let table = catalog.get_table("users").unwrap();
        assert!(table.created_at() >= created);
        assert!(table.created_at() <= catalog.get_metadata().modified_at);
    }

    #[test]
    fn test_list_tables_sorted() {
        let catalog = Catalog::new();
        for name in ["zeta", "alpha", "mid"] {
            catalog.create_table(&sample_info(name)).unwrap();
        }
        assert_eq!(catalog.list_tables(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_definition_round_trip() {
        let json = r#"{
            "name": "shop",
            "tables": [
                {"table_name": "orders", "columns": [
                    {"name": "id", "column_type": "integer", "nullable": false},
                    {"name": "placed", "column_type": "date"}
                ]}
            ]
        }"#;
        let definition: CatalogDefinition = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from_definition(&definition).unwrap();
        assert_eq!(catalog.name(), "shop");

        let orders = catalog.get_table("orders").unwrap();
        assert_eq!(orders.field_by_name("placed").unwrap().field_type, LogicalType::Date);
        assert_eq!(catalog.to_definition(), definition);
    }
}
