use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical types represent the SQL-level types a catalog field can carry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// NULL literal type
    Null,
    /// Boolean type (TRUE/FALSE)
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Fixed length character string
    Char { length: usize },
    /// Variable length string
    Varchar,
    /// Date value (days since 1970-01-01)
    Date,
}

impl LogicalType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::Integer | LogicalType::BigInt | LogicalType::Float | LogicalType::Double
        )
    }

    /// Check if this is an integral type
    pub fn is_integral(&self) -> bool {
        matches!(self, LogicalType::Integer | LogicalType::BigInt)
    }

    /// Check if this is a string type
    pub fn is_string(&self) -> bool {
        matches!(self, LogicalType::Varchar | LogicalType::Char { .. })
    }

    /// Check if values of the two types can appear on either side of a comparison
    pub fn is_comparable_with(&self, other: &LogicalType) -> bool {
        if *self == LogicalType::Null || *other == LogicalType::Null {
            return true;
        }
        (self.is_numeric() && other.is_numeric())
            || (self.is_string() && other.is_string())
            || (self == other)
    }

    /// Storage width in bytes, for fixed-size types
    pub fn get_fixed_size(&self) -> Option<usize> {
        match self {
            LogicalType::Boolean => Some(1),
            LogicalType::Integer | LogicalType::Float | LogicalType::Date => Some(4),
            LogicalType::BigInt | LogicalType::Double => Some(8),
            LogicalType::Char { length } => Some(*length),
            LogicalType::Null | LogicalType::Varchar => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Null => write!(f, "NULL"),
            LogicalType::Boolean => write!(f, "BOOLEAN"),
            LogicalType::Integer => write!(f, "INTEGER"),
            LogicalType::BigInt => write!(f, "BIGINT"),
            LogicalType::Float => write!(f, "FLOAT"),
            LogicalType::Double => write!(f, "DOUBLE"),
            LogicalType::Char { length } => write!(f, "CHAR({})", length),
            LogicalType::Varchar => write!(f, "VARCHAR"),
            LogicalType::Date => write!(f, "DATE"),
        }
    }
}
