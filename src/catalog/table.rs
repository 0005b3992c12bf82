//! Table Management
//!
//! Table metadata as the binder sees it: a name plus an ordered field list
//! whose leading entries are hidden system fields.

use crate::catalog::FieldMeta;
use crate::common::constants::{ROW_ID_FIELD, SYS_FIELD_NUM};
use crate::common::error::{BinderError, BinderResult};
use crate::common::helper::is_blank;
use crate::types::LogicalType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column definition used to create a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Column type
    pub column_type: LogicalType,
    /// Whether column can contain null values
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, column_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Table definition used to create a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name
    pub table_name: String,
    /// User columns in declaration order
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }
}

/// Catalog table
#[derive(Debug)]
pub struct Table {
    name: String,
    fields: Vec<FieldMeta>,
    sys_field_num: usize,
    created_at: DateTime<Utc>,
}

impl Table {
    /// Create a new table from its definition
    ///
    /// The row identifier system field is placed ahead of the user columns.
    pub fn new(info: &TableInfo) -> BinderResult<Self> {
        if is_blank(&info.table_name) {
            return Err(BinderError::InvalidArgument(
                "Table name cannot be empty".to_string(),
            ));
        }
        if info.columns.is_empty() {
            return Err(BinderError::Catalog(format!(
                "Table '{}' must have at least one column",
                info.table_name
            )));
        }

        let mut fields = Vec::with_capacity(SYS_FIELD_NUM + info.columns.len());
        fields.push(FieldMeta::system(ROW_ID_FIELD, LogicalType::BigInt, 0));

        for column in &info.columns {
            if is_blank(&column.name) {
                return Err(BinderError::InvalidArgument(format!(
                    "Column name cannot be empty in table '{}'",
                    info.table_name
                )));
            }
            if fields.iter().any(|f| f.name == column.name) {
                return Err(BinderError::Catalog(format!(
                    "Column '{}' already exists in table '{}'",
                    column.name, info.table_name
                )));
            }

            let mut field = FieldMeta::new(
                column.name.clone(),
                column.column_type.clone(),
                fields.len(),
            );
            field.nullable = column.nullable;
            fields.push(field);
        }

        Ok(Self {
            name: info.table_name.clone(),
            fields,
            sys_field_num: SYS_FIELD_NUM,
            created_at: Utc::now(),
        })
    }

    /// Get table name
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of fields, system fields included
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of leading system fields
    pub fn system_field_count(&self) -> usize {
        self.sys_field_num
    }

    pub fn field_at(&self, index: usize) -> Option<&FieldMeta> {
        self.fields.get(index)
    }

    /// Get field metadata by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get field index by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_by_name(name).is_some()
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Fields visible to `SELECT *`
    pub fn user_fields(&self) -> &[FieldMeta] {
        &self.fields[self.sys_field_num..]
    }

    /// Rebuild the definition this table was created from
    pub fn to_table_info(&self) -> TableInfo {
        TableInfo {
            table_name: self.name.clone(),
            columns: self
                .user_fields()
                .iter()
                .map(|f| ColumnInfo {
                    name: f.name.clone(),
                    column_type: f.field_type.clone(),
                    nullable: f.nullable,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableInfo {
        TableInfo::new(
            "users",
            vec![
                ColumnInfo::new("id", LogicalType::Integer).not_null(),
                ColumnInfo::new("name", LogicalType::Varchar),
                ColumnInfo::new("age", LogicalType::Integer),
            ],
        )
    }

    #[test]
    fn test_system_field_prepended() {
        let table = Table::new(&users()).unwrap();
        assert_eq!(table.field_count(), 4);
        assert_eq!(table.system_field_count(), 1);
        assert_eq!(table.field_at(0).unwrap().name, ROW_ID_FIELD);
        assert!(table.field_at(0).unwrap().is_system());

        let names: Vec<&str> = table.user_fields().iter().map(|f| f.get_name()).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
    }

    #[test]
    fn test_field_lookup() {
        let table = Table::new(&users()).unwrap();
        assert_eq!(table.field_index("name"), Some(2));
        assert_eq!(table.field_by_name("age").unwrap().field_index, 3);
        assert!(!table.field_by_name("id").unwrap().nullable);
        assert!(table.field_by_name("missing").is_none());
        assert!(table.has_field(ROW_ID_FIELD));
    }

    #[test]
    fn test_invalid_definitions() {
        let dup = TableInfo::new(
            "t",
            vec![
                ColumnInfo::new("a", LogicalType::Integer),
                ColumnInfo::new("a", LogicalType::Integer),
            ],
        );
        assert!(Table::new(&dup).is_err());
        assert!(Table::new(&TableInfo::new("t", vec![])).is_err());
        assert!(Table::new(&TableInfo::new(
            " ",
            vec![ColumnInfo::new("a", LogicalType::Integer)]
        ))
        .is_err());
    }

    #[test]
    fn test_to_table_info_round_trip() {
        let info = users();
        let table = Table::new(&info).unwrap();
        assert_eq!(table.to_table_info(), info);
    }
}
