//! Error handling for the PrismDB binder

use thiserror::Error;

/// Status codes surfaced by a failed bind
///
/// Callers that only need to branch on the failure class (tests, the CLI exit
/// status, an outer planner) match on these instead of the full error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    TableNotFound,
    FieldMissing,
    NestedAggregation,
    AggregationUnmatched,
    TypeMismatch,
    Parse,
    Catalog,
    Config,
    Io,
}

/// Main error type for binder operations
#[derive(Error, Debug)]
pub enum BinderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Table '{table}' does not exist in catalog '{catalog}'")]
    TableNotFound { catalog: String, table: String },

    #[error("Field missing: {detail}{}", hint(.suggestion))]
    FieldMissing {
        detail: String,
        suggestion: Option<String>,
    },

    #[error("Nested aggregation functions are not allowed: {attribute}")]
    NestedAggregation { attribute: String },

    #[error("Aggregation unmatched: {0}")]
    AggregationUnmatched(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

impl BinderError {
    /// Status code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            BinderError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            BinderError::TableNotFound { .. } => ErrorCode::TableNotFound,
            BinderError::FieldMissing { .. } => ErrorCode::FieldMissing,
            BinderError::NestedAggregation { .. } => ErrorCode::NestedAggregation,
            BinderError::AggregationUnmatched(_) => ErrorCode::AggregationUnmatched,
            BinderError::TypeMismatch(_) => ErrorCode::TypeMismatch,
            BinderError::Parse(_) => ErrorCode::Parse,
            BinderError::Catalog(_) => ErrorCode::Catalog,
            BinderError::Config(_) => ErrorCode::Config,
            BinderError::Io(_) => ErrorCode::Io,
        }
    }

    /// Field-missing error without a suggestion
    pub fn field_missing(detail: impl Into<String>) -> Self {
        BinderError::FieldMissing {
            detail: detail.into(),
            suggestion: None,
        }
    }

    pub fn table_not_found(catalog: &str, table: &str) -> Self {
        BinderError::TableNotFound {
            catalog: catalog.to_string(),
            table: table.to_string(),
        }
    }
}

impl From<serde_json::Error> for BinderError {
    fn from(err: serde_json::Error) -> Self {
        BinderError::Config(err.to_string())
    }
}

/// Result type alias for binder operations
pub type BinderResult<T> = std::result::Result<T, BinderError>;

/// Macro for creating invalid-argument errors
#[macro_export]
macro_rules! invalid_arg_err {
    ($msg:expr) => {
        $crate::common::error::BinderError::InvalidArgument($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BinderError::InvalidArgument(format!($fmt, $($arg)*))
    };
}

/// Macro for creating parse errors
#[macro_export]
macro_rules! parse_err {
    ($msg:expr) => {
        $crate::common::error::BinderError::Parse($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BinderError::Parse(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BinderError::table_not_found("main", "t").code(),
            ErrorCode::TableNotFound
        );
        assert_eq!(
            BinderError::field_missing("no such field").code(),
            ErrorCode::FieldMissing
        );
        assert_eq!(invalid_arg_err!("bad").code(), ErrorCode::InvalidArgument);
        assert_eq!(parse_err!("at {}", 3).code(), ErrorCode::Parse);
    }

    #[test]
    fn test_field_missing_display_with_hint() {
        let err = BinderError::FieldMissing {
            detail: "no such field 'nmae' in table 'users'".to_string(),
            suggestion: Some("name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Field missing: no such field 'nmae' in table 'users' (did you mean 'name'?)"
        );

        let err = BinderError::field_missing("ambiguous");
        assert_eq!(err.to_string(), "Field missing: ambiguous");
    }
}
