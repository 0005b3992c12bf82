//! Abstract Syntax Tree (AST) for SQL statements
//!
//! Defines the structure of parsed SQL statements. Nothing here is checked
//! against the catalog; that is the binder's job.

use crate::catalog::{ColumnInfo, TableInfo};
use crate::common::constants::WILDCARD;
use crate::planner::aggregation::AggregateFunction;
use crate::types::{LogicalType, Value};
use std::fmt;

/// SQL statement types
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectSyntax),
    CreateTable(CreateTableStatement),
    DropTable(DropTableStatement),
}

/// SELECT statement as written
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectSyntax {
    /// FROM list, in source order
    pub relations: Vec<String>,
    /// Projection list, in source order
    pub attributes: Vec<RelAttrSyntax>,
    /// WHERE conjuncts, in source order
    pub conditions: Vec<ConditionSyntax>,
}

/// Aggregate call structure recorded by the parser
///
/// The parser only describes what it saw. Whether a shape is acceptable is
/// decided in a single step by `planner::aggregation::validate_shape`.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateShape {
    /// Not an aggregate call
    Plain,
    /// `f(arg)` with exactly one attribute argument
    Call(AggregateFunction),
    /// `outer(inner(...))`
    Nested {
        outer: AggregateFunction,
        inner: AggregateFunction,
    },
    /// `f(a, b, ...)`
    MultipleArguments {
        function: AggregateFunction,
        count: usize,
    },
    /// Any other unusable call, such as an empty argument list
    Malformed(String),
}

impl AggregateShape {
    pub fn is_plain(&self) -> bool {
        matches!(self, AggregateShape::Plain)
    }

    /// Outermost aggregate function, if the shape names one
    pub fn function(&self) -> Option<AggregateFunction> {
        match self {
            AggregateShape::Call(function) => Some(*function),
            AggregateShape::Nested { outer, .. } => Some(*outer),
            AggregateShape::MultipleArguments { function, .. } => Some(*function),
            AggregateShape::Plain | AggregateShape::Malformed(_) => None,
        }
    }
}

/// A (possibly qualified, possibly aggregated) attribute reference
#[derive(Debug, Clone, PartialEq)]
pub struct RelAttrSyntax {
    /// Table qualifier, `None` when the attribute is unqualified
    pub relation_name: Option<String>,
    /// Field name, or `*`
    pub attribute_name: String,
    pub aggregate: AggregateShape,
}

impl RelAttrSyntax {
    pub fn new(relation_name: Option<String>, attribute_name: impl Into<String>) -> Self {
        Self {
            relation_name,
            attribute_name: attribute_name.into(),
            aggregate: AggregateShape::Plain,
        }
    }

    pub fn unqualified(attribute_name: impl Into<String>) -> Self {
        Self::new(None, attribute_name)
    }

    pub fn qualified(relation_name: impl Into<String>, attribute_name: impl Into<String>) -> Self {
        Self::new(Some(relation_name.into()), attribute_name)
    }

    /// Bare `*`
    pub fn wildcard() -> Self {
        Self::unqualified(WILDCARD)
    }

    pub fn with_aggregate(mut self, aggregate: AggregateShape) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Qualifier, treating a blank one as absent
    pub fn qualifier(&self) -> Option<&str> {
        self.relation_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    fn target(&self) -> String {
        match self.qualifier() {
            Some(relation) => format!("{}.{}", relation, self.attribute_name),
            None => self.attribute_name.clone(),
        }
    }
}

impl fmt::Display for RelAttrSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        match &self.aggregate {
            AggregateShape::Plain => write!(f, "{}", target),
            AggregateShape::Call(function) => write!(f, "{}({})", function, target),
            AggregateShape::Nested { outer, inner } => {
                write!(f, "{}({}({}))", outer, inner, target)
            }
            AggregateShape::MultipleArguments { function, count } => {
                write!(f, "{}({}, ... {} arguments)", function, target, count)
            }
            AggregateShape::Malformed(reason) => write!(f, "{} <{}>", target, reason),
        }
    }
}

/// Comparison operators allowed in WHERE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    NotLike,
}

impl CompOp {
    pub fn is_pattern_match(&self) -> bool {
        matches!(self, CompOp::Like | CompOp::NotLike)
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CompOp::Equal => "=",
            CompOp::NotEqual => "<>",
            CompOp::LessThan => "<",
            CompOp::LessThanOrEqual => "<=",
            CompOp::GreaterThan => ">",
            CompOp::GreaterThanOrEqual => ">=",
            CompOp::Like => "LIKE",
            CompOp::NotLike => "NOT LIKE",
        };
        write!(f, "{}", text)
    }
}

/// One side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOperand {
    Attribute(RelAttrSyntax),
    Literal(Value),
}

impl fmt::Display for ConditionOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOperand::Attribute(attr) => write!(f, "{}", attr),
            ConditionOperand::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// A single `left op right` WHERE conjunct
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSyntax {
    pub left: ConditionOperand,
    pub op: CompOp,
    pub right: ConditionOperand,
}

impl ConditionSyntax {
    pub fn new(left: ConditionOperand, op: CompOp, right: ConditionOperand) -> Self {
        Self { left, op, right }
    }
}

impl fmt::Display for ConditionSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl CreateTableStatement {
    pub fn to_table_info(&self) -> TableInfo {
        TableInfo::new(
            self.table_name.clone(),
            self.columns
                .iter()
                .map(|column| ColumnInfo {
                    name: column.name.clone(),
                    column_type: column.data_type.clone(),
                    nullable: column.nullable,
                })
                .collect(),
        )
    }
}

/// Column definition inside CREATE TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: LogicalType,
    pub nullable: bool,
}

/// DROP TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    pub table_name: String,
}
