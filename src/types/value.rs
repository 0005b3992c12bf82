use crate::common::error::{BinderError, BinderResult};
use crate::types::logical_type::LogicalType;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A literal value appearing in a WHERE condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    BigInt(i64),
    /// 64-bit double precision
    Double(f64),
    /// String value
    Varchar(String),
    /// Date value (days since 1970-01-01)
    Date(i32),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the logical type of this value
    pub fn get_type(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigInt(_) => LogicalType::BigInt,
            Value::Double(_) => LogicalType::Double,
            Value::Varchar(_) => LogicalType::Varchar,
            Value::Date(_) => LogicalType::Date,
        }
    }

    /// Build an integer value from a numeric literal, widening when needed
    pub fn from_numeric_literal(text: &str) -> BinderResult<Value> {
        if let Ok(v) = text.parse::<i32>() {
            return Ok(Value::Integer(v));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Value::BigInt(v));
        }
        text.parse::<f64>()
            .map(Value::Double)
            .map_err(|_| BinderError::Parse(format!("Invalid numeric literal: {}", text)))
    }

    /// Parse a `YYYY-MM-DD` string into a date value
    pub fn parse_date(text: &str) -> BinderResult<Value> {
        let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
            BinderError::InvalidArgument(format!("Invalid date literal: '{}'", text))
        })?;
        Ok(Value::Date(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
    }

    /// Convert a literal so it can be compared against a field of `target_type`
    ///
    /// Only conversions that keep the literal's meaning are performed: string to
    /// DATE and integer widening. Anything else is returned unchanged when the
    /// types are comparable, and rejected otherwise.
    pub fn coerce_for(&self, target_type: &LogicalType) -> BinderResult<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }

        match (self, target_type) {
            (Value::Varchar(text), LogicalType::Date) => Value::parse_date(text),
            (Value::Integer(v), LogicalType::BigInt) => Ok(Value::BigInt(*v as i64)),
            (Value::Integer(v), LogicalType::Float | LogicalType::Double) => {
                Ok(Value::Double(*v as f64))
            }
            (Value::BigInt(v), LogicalType::Float | LogicalType::Double) => {
                Ok(Value::Double(*v as f64))
            }
            _ if self.get_type().is_comparable_with(target_type) => Ok(self.clone()),
            _ => Err(BinderError::TypeMismatch(format!(
                "Cannot compare {} value {} with {} field",
                self.get_type(),
                self,
                target_type
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::BigInt(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Varchar(value) => write!(f, "'{}'", value),
            Value::Date(days) => {
                let date = days
                    .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                    .and_then(NaiveDate::from_num_days_from_ce_opt);
                match date {
                    Some(date) => write!(f, "DATE '{}'", date.format("%Y-%m-%d")),
                    None => write!(f, "DATE({})", days),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_literals() {
        assert_eq!(Value::from_numeric_literal("42").unwrap(), Value::Integer(42));
        assert_eq!(
            Value::from_numeric_literal("5000000000").unwrap(),
            Value::BigInt(5_000_000_000)
        );
        assert_eq!(Value::from_numeric_literal("2.5").unwrap(), Value::Double(2.5));
        assert!(Value::from_numeric_literal("1.2.3").is_err());
    }

    #[test]
    fn test_date_parsing() {
        assert_eq!(Value::parse_date("1970-01-01").unwrap(), Value::Date(0));
        assert_eq!(Value::parse_date("1970-01-11").unwrap(), Value::Date(10));
        assert_eq!(
            Value::parse_date("2024-02-29").unwrap().to_string(),
            "DATE '2024-02-29'"
        );
        assert!(Value::parse_date("2023-02-29").is_err());
        assert!(Value::parse_date("yesterday").is_err());
    }

    #[test]
    fn test_coercion() {
        let date = Value::Varchar("2000-01-01".to_string())
            .coerce_for(&LogicalType::Date)
            .unwrap();
        assert_eq!(date.get_type(), LogicalType::Date);

        assert_eq!(
            Value::Integer(3).coerce_for(&LogicalType::Double).unwrap(),
            Value::Double(3.0)
        );
        assert_eq!(
            Value::Null.coerce_for(&LogicalType::Integer).unwrap(),
            Value::Null
        );
        let err = Value::Varchar("abc".to_string())
            .coerce_for(&LogicalType::Integer)
            .unwrap_err();
        assert_eq!(err.code(), crate::common::ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_signed_literal_bounds() {
        assert_eq!(
            Value::from_numeric_literal("-2147483648").unwrap(),
            Value::Integer(i32::MIN)
        );
        assert_eq!(
            Value::from_numeric_literal("-9223372036854775808").unwrap(),
            Value::BigInt(i64::MIN)
        );
        assert_eq!(Value::from_numeric_literal("-0.5").unwrap(), Value::Double(-0.5));
    }
}
