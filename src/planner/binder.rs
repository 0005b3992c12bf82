//! SELECT Binder
//!
//! Resolves a parsed SELECT against the catalog: the FROM list becomes a list
//! of tables, every projected attribute becomes one or more bound fields, and
//! the WHERE list is handed to the predicate binder. The first failure aborts
//! the bind and no statement is produced.

use crate::catalog::{CatalogAccessor, Table};
use crate::common::config::{BinderConfig, DuplicateTablePolicy, ProjectionOrder};
use crate::common::error::{BinderError, BinderResult};
use crate::common::helper::{closest_match, is_blank, is_wildcard};
use crate::parser::ast::{RelAttrSyntax, SelectSyntax};
use crate::planner::aggregation::{validate_shape, AggregationKind};
use crate::planner::filter::{BindContext, FilterBinder, PredicateBinder};
use crate::planner::select_stmt::{BoundField, SelectStmt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tables named in FROM
#[derive(Debug, Clone, Default)]
pub struct ResolvedTables {
    /// In FROM order, duplicates included
    pub tables: Vec<Arc<Table>>,
    /// Name to table; a repeated name keeps its last table
    pub table_map: HashMap<String, Arc<Table>>,
}

impl ResolvedTables {
    /// The table unqualified names resolve against
    pub fn default_table(&self) -> Option<&Arc<Table>> {
        match self.tables.as_slice() {
            [table] => Some(table),
            _ => None,
        }
    }
}

/// Projection produced by the field resolver
#[derive(Debug, Clone, Default)]
pub struct ResolvedFields {
    pub fields: Vec<BoundField>,
    pub is_aggregate: bool,
}

/// Binder for SELECT statements
pub struct SelectBinder {
    catalog: Option<Arc<dyn CatalogAccessor>>,
    config: BinderConfig,
    predicate_binder: Box<dyn PredicateBinder>,
}

impl SelectBinder {
    /// Binder without a catalog; every bind fails until one is supplied
    pub fn new() -> Self {
        Self {
            catalog: None,
            config: BinderConfig::default(),
            predicate_binder: Box::new(FilterBinder::new()),
        }
    }

    /// Create a new binder with catalog access
    pub fn new_with_catalog(catalog: Arc<dyn CatalogAccessor>) -> Self {
        Self {
            catalog: Some(catalog),
            ..Self::new()
        }
    }

    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the WHERE clause binder
    pub fn with_predicate_binder(mut self, predicate_binder: Box<dyn PredicateBinder>) -> Self {
        self.predicate_binder = predicate_binder;
        self
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind a parsed SELECT into a statement
    pub fn bind_select(&self, select: &SelectSyntax) -> BinderResult<SelectStmt> {
        let catalog = self.catalog.as_deref().ok_or_else(|| {
            warn!("invalid argument. catalog is not set");
            BinderError::InvalidArgument("No catalog to bind against".to_string())
        })?;

        let resolved = self.resolve_tables(catalog, &select.relations)?;
        let projection = self.resolve_fields(catalog, &select.attributes, &resolved)?;

        info!(
            tables = resolved.tables.len(),
            fields = projection.fields.len(),
            "got {} tables in from stmt and {} fields in query stmt",
            resolved.tables.len(),
            projection.fields.len()
        );

        let ctx = BindContext {
            catalog,
            default_table: resolved.default_table(),
            tables: &resolved.table_map,
        };
        let filter_stmt = self
            .predicate_binder
            .bind_conditions(&ctx, &select.conditions)
            .inspect_err(|e| warn!(error = %e, "cannot construct filter stmt"))?;

        Ok(SelectStmt::new(
            resolved.tables,
            projection.fields,
            filter_stmt,
            projection.is_aggregate,
        ))
    }

    /// Look up every FROM name in the catalog
    pub fn resolve_tables(
        &self,
        catalog: &dyn CatalogAccessor,
        relations: &[String],
    ) -> BinderResult<ResolvedTables> {
        let mut resolved = ResolvedTables::default();

        for (index, name) in relations.iter().enumerate() {
            if is_blank(name) {
                warn!(index, "invalid argument. relation name is empty");
                return Err(BinderError::InvalidArgument(format!(
                    "Relation name at index {} is empty",
                    index
                )));
            }

            let table = catalog.find_table(name).ok_or_else(|| {
                let names = catalog.table_names();
                let suggestion = closest_match(name, names.iter().map(String::as_str));
                warn!(
                    catalog = catalog.name(),
                    table = %name,
                    suggestion = ?suggestion,
                    "no such table"
                );
                BinderError::table_not_found(catalog.name(), name)
            })?;

            if self.config.duplicate_tables == DuplicateTablePolicy::Reject
                && resolved.table_map.contains_key(name)
            {
                warn!(table = %name, index, "duplicate table in from list");
                return Err(BinderError::InvalidArgument(format!(
                    "Table '{}' appears more than once in FROM (index {})",
                    name, index
                )));
            }

            resolved.tables.push(Arc::clone(&table));
            resolved.table_map.insert(name.clone(), table);
        }

        Ok(resolved)
    }

    /// Resolve the projection list
    ///
    /// Attributes are visited last to first. The configured projection order
    /// decides whether the output keeps that order or the SQL order; fields
    /// produced by one wildcard always stay in table then declaration order.
    pub fn resolve_fields(
        &self,
        catalog: &dyn CatalogAccessor,
        attributes: &[RelAttrSyntax],
        resolved: &ResolvedTables,
    ) -> BinderResult<ResolvedFields> {
        let mut groups: Vec<Vec<BoundField>> = Vec::with_capacity(attributes.len());
        let mut has_aggregate = false;
        let mut has_plain = false;

        for (index, attr) in attributes.iter().enumerate().rev() {
            let kind = validate_shape(attr)?;
            if kind.is_aggregate() {
                has_aggregate = true;
            } else {
                has_plain = true;
            }
            if has_aggregate && has_plain {
                warn!(
                    attribute = %attr,
                    "Aggregate functions and attributes cannot be queried simultaneously"
                );
                return Err(BinderError::AggregationUnmatched(format!(
                    "'{}' cannot be combined with {} attributes in one projection",
                    attr,
                    if kind.is_aggregate() { "plain" } else { "aggregate" }
                )));
            }

            let group = self.resolve_attribute(catalog, index, attr, kind, resolved)?;
            debug!(attribute = %attr, index, fields = group.len(), "resolved attribute");
            groups.push(group);
        }

        if self.config.projection_order == ProjectionOrder::Source {
            groups.reverse();
        }

        Ok(ResolvedFields {
            fields: groups.into_iter().flatten().collect(),
            is_aggregate: has_aggregate,
        })
    }

    fn resolve_attribute(
        &self,
        catalog: &dyn CatalogAccessor,
        index: usize,
        attr: &RelAttrSyntax,
        kind: AggregationKind,
        resolved: &ResolvedTables,
    ) -> BinderResult<Vec<BoundField>> {
        let field_name = attr.attribute_name.as_str();
        if is_blank(field_name) {
            warn!(index, "invalid argument. attribute name is empty");
            return Err(BinderError::InvalidArgument(format!(
                "Attribute at index {} has no name",
                index
            )));
        }

        let mut fields = Vec::new();
        match attr.qualifier() {
            // `*`
            None if is_wildcard(field_name) => {
                check_wildcard_aggregation(attr, kind)?;
                for table in &resolved.tables {
                    wildcard_fields(table, kind, &mut fields);
                }
            }
            // `f`
            None => {
                let table = resolved.default_table().ok_or_else(|| {
                    warn!(
                        attribute = field_name,
                        tables = resolved.tables.len(),
                        "invalid. I do not know the attr's table"
                    );
                    BinderError::field_missing(format!(
                        "cannot tell which of {} tables '{}' belongs to",
                        resolved.tables.len(),
                        field_name
                    ))
                })?;
                fields.push(lookup_field(catalog, table, field_name, kind)?);
            }
            // `*.*` and `*.f`
            Some(table_name) if is_wildcard(table_name) => {
                if !is_wildcard(field_name) {
                    warn!(attribute = field_name, "invalid field name while table is *");
                    return Err(BinderError::field_missing(format!(
                        "'*.{}' is not a valid attribute",
                        field_name
                    )));
                }
                check_wildcard_aggregation(attr, kind)?;
                for table in &resolved.tables {
                    wildcard_fields(table, kind, &mut fields);
                }
            }
            // `t.*` and `t.f`
            Some(table_name) => {
                let table = resolved.table_map.get(table_name).ok_or_else(|| {
                    warn!(table = table_name, "no such table in from list");
                    BinderError::FieldMissing {
                        detail: format!("table '{}' is not in the FROM list", table_name),
                        suggestion: closest_match(
                            table_name,
                            resolved.table_map.keys().map(String::as_str),
                        ),
                    }
                })?;

                if is_wildcard(field_name) {
                    check_wildcard_aggregation(attr, kind)?;
                    wildcard_fields(table, kind, &mut fields);
                } else {
                    fields.push(lookup_field(catalog, table, field_name, kind)?);
                }
            }
        }

        Ok(fields)
    }
}

impl Default for SelectBinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Only plain columns and `COUNT(*)` may be applied to a wildcard
fn check_wildcard_aggregation(attr: &RelAttrSyntax, kind: AggregationKind) -> BinderResult<()> {
    match kind {
        AggregationKind::None | AggregationKind::CountAll => Ok(()),
        AggregationKind::Function(function) => {
            warn!(
                attribute = %attr,
                aggregation = %function,
                "Invalid aggregation type for field '*'"
            );
            Err(BinderError::InvalidArgument(format!(
                "{} cannot be applied to '*'",
                function
            )))
        }
    }
}

/// Expand a table for `*` or `COUNT(*)`
fn wildcard_fields(table: &Arc<Table>, kind: AggregationKind, out: &mut Vec<BoundField>) {
    if kind == AggregationKind::CountAll {
        out.push(BoundField::new(Arc::clone(table), 0, kind));
        return;
    }
    for index in table.system_field_count()..table.field_count() {
        out.push(BoundField::new(Arc::clone(table), index, kind));
    }
}

fn lookup_field(
    catalog: &dyn CatalogAccessor,
    table: &Arc<Table>,
    field_name: &str,
    kind: AggregationKind,
) -> BinderResult<BoundField> {
    match table.field_index(field_name) {
        Some(index) => Ok(BoundField::new(Arc::clone(table), index, kind)),
        None => {
            warn!(
                catalog = catalog.name(),
                table = table.get_name(),
                field = field_name,
                "no such field"
            );
            Err(BinderError::FieldMissing {
                detail: format!(
                    "no such field '{}' in table '{}'",
                    field_name,
                    table.get_name()
                ),
                suggestion: closest_match(
                    field_name,
                    table.user_fields().iter().map(|f| f.get_name()),
                ),
            })
        }
    }
}
