//! Aggregation kinds and shape validation
//!
//! The parser records the raw shape of every projected attribute. This module
//! turns that shape into a single `AggregationKind`, or into the one error the
//! shape deserves, so later stages never see a half-validated attribute.

use crate::common::error::{BinderError, BinderResult};
use crate::common::helper::is_wildcard;
use crate::parser::ast::{AggregateShape, RelAttrSyntax};
use std::fmt;
use tracing::warn;

/// Aggregate functions accepted in a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        };
        write!(f, "{}", name)
    }
}

/// How a bound field takes part in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggregationKind {
    /// Plain projected column
    #[default]
    None,
    /// `COUNT(*)`; the field it is attached to is only a placeholder
    CountAll,
    /// A function applied to exactly one field
    Function(AggregateFunction),
}

impl AggregationKind {
    pub fn is_aggregate(&self) -> bool {
        !matches!(self, AggregationKind::None)
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationKind::None => write!(f, "none"),
            AggregationKind::CountAll => write!(f, "COUNT(*)"),
            AggregationKind::Function(function) => write!(f, "{}", function),
        }
    }
}

/// Validate an attribute's aggregate shape in one step
pub fn validate_shape(attr: &RelAttrSyntax) -> BinderResult<AggregationKind> {
    match &attr.aggregate {
        AggregateShape::Plain => Ok(AggregationKind::None),
        AggregateShape::Call(AggregateFunction::Count) if is_wildcard(&attr.attribute_name) => {
            Ok(AggregationKind::CountAll)
        }
        AggregateShape::Call(function) => Ok(AggregationKind::Function(*function)),
        AggregateShape::Nested { .. } => {
            warn!(attribute = %attr, "Nested aggregation functions are not allowed");
            Err(BinderError::NestedAggregation {
                attribute: attr.to_string(),
            })
        }
        AggregateShape::MultipleArguments { function, count } => {
            warn!(
                attribute = %attr,
                "Multiple attributes are not allowed in aggregation functions"
            );
            Err(BinderError::AggregationUnmatched(format!(
                "{} takes one attribute, got {}",
                function, count
            )))
        }
        AggregateShape::Malformed(reason) => {
            warn!(attribute = %attr, reason = %reason, "Malformed aggregation");
            Err(BinderError::InvalidArgument(format!(
                "Malformed aggregation: {}",
                reason
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;

    #[test]
    fn test_valid_shapes() {
        let count_all = RelAttrSyntax::wildcard()
            .with_aggregate(AggregateShape::Call(AggregateFunction::Count));
        assert_eq!(validate_shape(&count_all).unwrap(), AggregationKind::CountAll);

        let count_field = RelAttrSyntax::unqualified("id")
            .with_aggregate(AggregateShape::Call(AggregateFunction::Count));
        assert_eq!(
            validate_shape(&count_field).unwrap(),
            AggregationKind::Function(AggregateFunction::Count)
        );

        let sum_all = RelAttrSyntax::wildcard()
            .with_aggregate(AggregateShape::Call(AggregateFunction::Sum));
        assert_eq!(
            validate_shape(&sum_all).unwrap(),
            AggregationKind::Function(AggregateFunction::Sum)
        );

        assert_eq!(
            validate_shape(&RelAttrSyntax::unqualified("id")).unwrap(),
            AggregationKind::None
        );
    }

    #[test]
    fn test_invalid_shapes() {
        let nested = RelAttrSyntax::unqualified("a").with_aggregate(AggregateShape::Nested {
            outer: AggregateFunction::Sum,
            inner: AggregateFunction::Count,
        });
        let err = validate_shape(&nested).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NestedAggregation);
        assert!(err.to_string().contains("SUM(COUNT(a))"));

        let multiple =
            RelAttrSyntax::unqualified("a").with_aggregate(AggregateShape::MultipleArguments {
                function: AggregateFunction::Max,
                count: 3,
            });
        assert_eq!(
            validate_shape(&multiple).unwrap_err().code(),
            ErrorCode::AggregationUnmatched
        );

        let malformed = RelAttrSyntax::unqualified("")
            .with_aggregate(AggregateShape::Malformed("no argument".to_string()));
        assert_eq!(
            validate_shape(&malformed).unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
    }
}
