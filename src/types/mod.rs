//! Type system module
//!
//! - LogicalType: SQL-level types carried by catalog fields
//! - Value: literal values that appear in WHERE conditions

pub mod logical_type;
pub mod value;

pub use logical_type::LogicalType;
pub use value::Value;
