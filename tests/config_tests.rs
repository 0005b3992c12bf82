//! Configuration and schema file tests

use pretty_assertions::assert_eq;
use prism_binder::{
    BinderConfig, BinderResult, Catalog, CatalogAccessor, Database, DuplicateTablePolicy,
    ErrorCode, LogicalType, ProjectionOrder,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const SHOP_SCHEMA: &str = r#"{
    "name": "shop",
    "tables": [
        {
            "table_name": "customers",
            "columns": [
                {"name": "id", "column_type": "integer", "nullable": false},
                {"name": "email", "column_type": "varchar"}
            ]
        },
        {
            "table_name": "invoices",
            "columns": [
                {"name": "id", "column_type": "bigint", "nullable": false},
                {"name": "customer_id", "column_type": "integer"},
                {"name": "issued", "column_type": "date"},
                {"name": "code", "column_type": {"char": {"length": 8}}}
            ]
        }
    ]
}"#;

#[test]
fn test_load_config_file() -> BinderResult<()> {
    let file = write_temp(r#"{"projection_order": "source", "duplicate_tables": "reject"}"#);
    let config = BinderConfig::load(file.path())?;
    assert_eq!(
        config,
        BinderConfig::new()
            .with_projection_order(ProjectionOrder::Source)
            .with_duplicate_tables(DuplicateTablePolicy::Reject)
    );

    // Missing keys fall back to defaults
    let partial = write_temp(r#"{"projection_order": "source"}"#);
    let config = BinderConfig::load(partial.path())?;
    assert_eq!(config.duplicate_tables, DuplicateTablePolicy::LastWins);
    Ok(())
}

#[test]
fn test_bad_config_files() {
    let unknown = write_temp(r#"{"projection": "source"}"#);
    assert_eq!(
        BinderConfig::load(unknown.path()).unwrap_err().code(),
        ErrorCode::Config
    );

    let bad_value = write_temp(r#"{"projection_order": "sideways"}"#);
    assert_eq!(
        BinderConfig::load(bad_value.path()).unwrap_err().code(),
        ErrorCode::Config
    );

    let missing = std::env::temp_dir().join("prism-binder-no-such-config.json");
    assert_eq!(BinderConfig::load(missing).unwrap_err().code(), ErrorCode::Io);
}

#[test]
fn test_schema_file_binding() -> BinderResult<()> {
    let file = write_temp(SHOP_SCHEMA);
    let catalog = Catalog::load_definition(file.path())?;
    assert_eq!(catalog.name(), "shop");
    assert_eq!(catalog.list_tables(), vec!["customers", "invoices"]);

    let invoices = catalog.get_table("invoices")?;
    assert_eq!(
        invoices.field_by_name("code").map(|f| f.field_type.clone()),
        Some(LogicalType::Char { length: 8 })
    );

    let db = Database::from_catalog(catalog, BinderConfig::default());
    let stmt = db.bind(
        "SELECT customers.email, invoices.issued FROM customers, invoices \
         WHERE customers.id = invoices.customer_id AND invoices.code = 'INV-0001'",
    )?;
    assert_eq!(stmt.tables().len(), 2);
    assert_eq!(stmt.filter_stmt().len(), 2);

    let err = db.bind("SELECT * FROM orders").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Table 'orders' does not exist in catalog 'shop'"
    );
    Ok(())
}

#[test]
fn test_invalid_schema_file() {
    let duplicate_columns = write_temp(
        r#"{"tables": [{"table_name": "t", "columns": [
            {"name": "a", "column_type": "integer"},
            {"name": "a", "column_type": "integer"}
        ]}]}"#,
    );
    assert_eq!(
        Catalog::load_definition(duplicate_columns.path())
            .unwrap_err()
            .code(),
        ErrorCode::Catalog
    );

    let not_json = write_temp("tables: []");
    assert_eq!(
        Catalog::load_definition(not_json.path()).unwrap_err().code(),
        ErrorCode::Catalog
    );
}
