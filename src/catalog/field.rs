//! Field Metadata
//!
//! Catalog description of a single column.

use crate::types::LogicalType;
use serde::{Deserialize, Serialize};

/// Column metadata as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: LogicalType,
    /// Whether the field can contain null values
    pub nullable: bool,
    /// Position of the field in its table, system fields included
    pub field_index: usize,
    /// False for system fields hidden from `SELECT *`
    pub visible: bool,
}

impl FieldMeta {
    pub fn new(name: String, field_type: LogicalType, field_index: usize) -> Self {
        Self {
            name,
            field_type,
            nullable: true,
            field_index,
            visible: true,
        }
    }

    /// Create a hidden system field
    pub fn system(name: &str, field_type: LogicalType, field_index: usize) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            nullable: false,
            field_index,
            visible: false,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_system(&self) -> bool {
        !self.visible
    }
}
