//! WHERE clause binding
//!
//! The select binder hands the raw condition list to a `PredicateBinder`
//! together with the tables it resolved. `FilterBinder` is the default
//! implementation: it resolves attribute operands, checks operand types and
//! converts date literals.

use crate::catalog::{CatalogAccessor, FieldMeta, Table};
use crate::common::error::{BinderError, BinderResult};
use crate::common::helper::{closest_match, is_wildcard};
use crate::parser::ast::{CompOp, ConditionOperand, ConditionSyntax, RelAttrSyntax};
use crate::types::{LogicalType, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a predicate binder may consult
pub struct BindContext<'a> {
    pub catalog: &'a dyn CatalogAccessor,
    /// The only table in FROM, if there is exactly one
    pub default_table: Option<&'a Arc<Table>>,
    /// FROM names to tables
    pub tables: &'a HashMap<String, Arc<Table>>,
}

/// Binds a WHERE condition list into a filter
pub trait PredicateBinder: Send + Sync {
    fn bind_conditions(
        &self,
        ctx: &BindContext<'_>,
        conditions: &[ConditionSyntax],
    ) -> BinderResult<FilterStmt>;
}

/// Field reference inside a filter
#[derive(Debug, Clone)]
pub struct BoundFieldRef {
    table: Arc<Table>,
    field_index: usize,
}

impl BoundFieldRef {
    pub fn new(table: Arc<Table>, field_index: usize) -> Option<Self> {
        (field_index < table.field_count()).then_some(Self { table, field_index })
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn field_meta(&self) -> &FieldMeta {
        &self.table.fields()[self.field_index]
    }
}

impl PartialEq for BoundFieldRef {
    fn eq(&self, other: &Self) -> bool {
        self.table.get_name() == other.table.get_name() && self.field_index == other.field_index
    }
}

impl fmt::Display for BoundFieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table.get_name(), self.field_meta().get_name())
    }
}

/// One side of a bound comparison
#[derive(Debug, Clone, PartialEq)]
pub enum FilterObj {
    Field(BoundFieldRef),
    Value(Value),
}

impl FilterObj {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            FilterObj::Field(field) => field.field_meta().field_type.clone(),
            FilterObj::Value(value) => value.get_type(),
        }
    }
}

impl fmt::Display for FilterObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterObj::Field(field) => write!(f, "{}", field),
            FilterObj::Value(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterUnit {
    pub left: FilterObj,
    pub comp: CompOp,
    pub right: FilterObj,
}

impl fmt::Display for FilterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.comp, self.right)
    }
}

/// Conjunction of filter units; empty means always true
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterStmt {
    units: Vec<FilterUnit>,
}

impl FilterStmt {
    pub fn new(units: Vec<FilterUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[FilterUnit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }
}

impl fmt::Display for FilterStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_empty() {
            return write!(f, "TRUE");
        }
        for (i, unit) in self.units.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", unit)?;
        }
        Ok(())
    }
}

/// Default predicate binder
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBinder;

impl FilterBinder {
    pub fn new() -> Self {
        Self
    }

    fn bind_unit(
        &self,
        ctx: &BindContext<'_>,
        condition: &ConditionSyntax,
    ) -> BinderResult<FilterUnit> {
        let left = self.bind_operand(ctx, &condition.left)?;
        let right = self.bind_operand(ctx, &condition.right)?;
        let op = condition.op;

        // Literals are converted towards the field they are compared with
        let (left, right) = match (left, right) {
            (FilterObj::Field(field), FilterObj::Value(value)) if !op.is_pattern_match() => {
                let value = value.coerce_for(&field.field_meta().field_type)?;
                (FilterObj::Field(field), FilterObj::Value(value))
            }
            (FilterObj::Value(value), FilterObj::Field(field)) if !op.is_pattern_match() => {
                let value = value.coerce_for(&field.field_meta().field_type)?;
                (FilterObj::Value(value), FilterObj::Field(field))
            }
            pair => pair,
        };

        check_operand_types(&left, op, &right)?;
        Ok(FilterUnit {
            left,
            comp: op,
            right,
        })
    }

    fn bind_operand(
        &self,
        ctx: &BindContext<'_>,
        operand: &ConditionOperand,
    ) -> BinderResult<FilterObj> {
        match operand {
            ConditionOperand::Literal(value) => Ok(FilterObj::Value(value.clone())),
            ConditionOperand::Attribute(attr) => {
                self.bind_attribute(ctx, attr).map(FilterObj::Field)
            }
        }
    }

    fn bind_attribute(
        &self,
        ctx: &BindContext<'_>,
        attr: &RelAttrSyntax,
    ) -> BinderResult<BoundFieldRef> {
        if !attr.aggregate.is_plain() {
            return Err(BinderError::InvalidArgument(format!(
                "Aggregate '{}' is not allowed in WHERE",
                attr
            )));
        }
        if is_wildcard(&attr.attribute_name) || attr.qualifier().is_some_and(is_wildcard) {
            return Err(BinderError::InvalidArgument(format!(
                "Wildcard '{}' cannot be compared",
                attr
            )));
        }

        let table = match attr.qualifier() {
            Some(name) => ctx.tables.get(name).ok_or_else(|| {
                warn!(
                    catalog = ctx.catalog.name(),
                    table = name,
                    "No such table in FROM list"
                );
                BinderError::table_not_found(ctx.catalog.name(), name)
            })?,
            None => ctx.default_table.ok_or_else(|| {
                warn!(attribute = %attr, "Cannot resolve unqualified attribute in WHERE");
                BinderError::field_missing(format!(
                    "cannot resolve '{}' without a single table in FROM",
                    attr.attribute_name
                ))
            })?,
        };

        let index = table.field_index(&attr.attribute_name).ok_or_else(|| {
            warn!(table = table.get_name(), field = %attr.attribute_name, "No such field");
            BinderError::FieldMissing {
                detail: format!(
                    "no such field '{}' in table '{}'",
                    attr.attribute_name,
                    table.get_name()
                ),
                suggestion: closest_match(
                    &attr.attribute_name,
                    table.user_fields().iter().map(|f| f.get_name()),
                ),
            }
        })?;

        BoundFieldRef::new(Arc::clone(table), index).ok_or_else(|| {
            BinderError::field_missing(format!("field index {} out of range", index))
        })
    }
}

fn check_operand_types(left: &FilterObj, op: CompOp, right: &FilterObj) -> BinderResult<()> {
    let left_type = left.logical_type();
    let right_type = right.logical_type();

    if op.is_pattern_match() {
        for operand_type in [&left_type, &right_type] {
            if !operand_type.is_string() && *operand_type != LogicalType::Null {
                return Err(BinderError::TypeMismatch(format!(
                    "{} requires string operands, got {}",
                    op, operand_type
                )));
            }
        }
        return Ok(());
    }

    if !left_type.is_comparable_with(&right_type) {
        return Err(BinderError::TypeMismatch(format!(
            "Cannot compare {} ({}) with {} ({})",
            left, left_type, right, right_type
        )));
    }
    Ok(())
}

impl PredicateBinder for FilterBinder {
    fn bind_conditions(
        &self,
        ctx: &BindContext<'_>,
        conditions: &[ConditionSyntax],
    ) -> BinderResult<FilterStmt> {
        let units = conditions
            .iter()
            .map(|condition| {
                self.bind_unit(ctx, condition).inspect_err(|e| {
                    warn!(condition = %condition, error = %e, "Cannot bind condition");
                })
            })
            .collect::<BinderResult<Vec<_>>>()?;

        debug!(units = units.len(), "Bound WHERE clause");
        Ok(FilterStmt::new(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ColumnInfo, TableInfo};
    use crate::common::ErrorCode;

    fn catalog() -> Catalog {
        let catalog = Catalog::new();
        catalog
            .create_table(&TableInfo::new(
                "orders",
                vec![
                    ColumnInfo::new("id", LogicalType::Integer),
                    ColumnInfo::new("item", LogicalType::Varchar),
                    ColumnInfo::new("placed", LogicalType::Date),
                    ColumnInfo::new("total", LogicalType::Double),
                ],
            ))
            .unwrap();
        catalog
    }

    fn bind(catalog: &Catalog, conditions: &[ConditionSyntax]) -> BinderResult<FilterStmt> {
        let orders = catalog.get_table("orders").unwrap();
        let mut tables = HashMap::new();
        tables.insert("orders".to_string(), Arc::clone(&orders));
        let ctx = BindContext {
            catalog,
            default_table: Some(&orders),
            tables: &tables,
        };
        FilterBinder::new().bind_conditions(&ctx, conditions)
    }

    fn cond(left: ConditionOperand, op: CompOp, right: ConditionOperand) -> ConditionSyntax {
        ConditionSyntax::new(left, op, right)
    }

    fn attr(name: &str) -> ConditionOperand {
        ConditionOperand::Attribute(RelAttrSyntax::unqualified(name))
    }

    fn lit(value: Value) -> ConditionOperand {
        ConditionOperand::Literal(value)
    }

    #[test]
    fn test_empty_conditions() {
        let filter = bind(&catalog(), &[]).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "TRUE");
    }

    #[test]
    fn test_numeric_comparison_widens_literal() {
        let filter = bind(
            &catalog(),
            &[cond(attr("total"), CompOp::GreaterThan, lit(Value::Integer(10)))],
        )
        .unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.units()[0].right, FilterObj::Value(Value::Double(10.0)));
        assert_eq!(filter.to_string(), "orders.total > 10");
    }

    #[test]
    fn test_date_literal_converted() {
        let filter = bind(
            &catalog(),
            &[cond(
                lit(Value::Varchar("2024-02-29".to_string())),
                CompOp::LessThanOrEqual,
                attr("placed"),
            )],
        )
        .unwrap();
        assert!(matches!(
            filter.units()[0].left,
            FilterObj::Value(Value::Date(_))
        ));

        let err = bind(
            &catalog(),
            &[cond(
                attr("placed"),
                CompOp::Equal,
                lit(Value::Varchar("2023-02-29".to_string())),
            )],
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_type_mismatch() {
        let err = bind(
            &catalog(),
            &[cond(attr("id"), CompOp::Equal, lit(Value::Varchar("x".to_string())))],
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);

        let err = bind(
            &catalog(),
            &[cond(attr("id"), CompOp::Like, lit(Value::Varchar("1%".to_string())))],
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_like_and_null() {
        let filter = bind(
            &catalog(),
            &[
                cond(attr("item"), CompOp::NotLike, lit(Value::Varchar("a%".to_string()))),
                cond(attr("placed"), CompOp::NotEqual, lit(Value::Null)),
            ],
        )
        .unwrap();
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_resolution_errors() {
        let catalog = catalog();

        let err = bind(&catalog, &[cond(attr("itme"), CompOp::Equal, lit(Value::Null))])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::FieldMissing);
        assert!(err.to_string().contains("did you mean 'item'"));

        let qualified = ConditionOperand::Attribute(RelAttrSyntax::qualified("users", "id"));
        let err = bind(&catalog, &[cond(qualified, CompOp::Equal, lit(Value::Integer(1)))])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TableNotFound);

        let err = bind(&catalog, &[cond(attr("*"), CompOp::Equal, lit(Value::Integer(1)))])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_unqualified_without_default_table() {
        let catalog = catalog();
        let tables = HashMap::new();
        let ctx = BindContext {
            catalog: &catalog,
            default_table: None,
            tables: &tables,
        };
        let err = FilterBinder::new()
            .bind_conditions(&ctx, &[cond(attr("id"), CompOp::Equal, lit(Value::Integer(1)))])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::FieldMissing);
    }
}
