//! PrismDB Binder - Main Entry Point
//!
//! Command line front end: loads a schema, then binds SELECT statements given
//! on the command line or typed at an interactive prompt.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process;
use tracing::Level;

use prism_binder::common::constants::HISTORY_FILE_NAME;
use prism_binder::{
    BinderConfig, Catalog, Database, DuplicateTablePolicy, ProjectionOrder, StatementResult,
    Table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn run_interactive_mode(database: &Database, mut format: OutputFormat) -> anyhow::Result<()> {
    println!("PrismDB Binder v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter '.help' for usage hints.");
    println!("Enter SQL statements terminated with a semicolon (;)");
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_file = dirs::home_dir()
        .map(|mut path| {
            path.push(HISTORY_FILE_NAME);
            path
        })
        .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME));

    // Load history if it exists
    let _ = rl.load_history(&history_file);

    let mut sql_buffer = String::new();

    loop {
        let prompt = if sql_buffer.is_empty() {
            "prism> "
        } else {
            "    -> "
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle special commands
                if sql_buffer.is_empty() && trimmed.starts_with('.') {
                    let _ = rl.add_history_entry(trimmed);
                    if handle_special_command(trimmed, database, &mut format) {
                        break;
                    }
                    continue;
                }

                if trimmed.is_empty() {
                    continue;
                }

                if !sql_buffer.is_empty() {
                    sql_buffer.push(' ');
                }
                sql_buffer.push_str(trimmed);

                // Check if statement is complete (ends with semicolon)
                if trimmed.ends_with(';') {
                    let _ = rl.add_history_entry(&sql_buffer);
                    if let Err(e) = execute_sql(database, &sql_buffer, format) {
                        eprintln!("Error: {}", e);
                    }
                    sql_buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                sql_buffer.clear();
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_file);

    Ok(())
}

/// Returns true when the REPL should exit
fn handle_special_command(command: &str, database: &Database, format: &mut OutputFormat) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("");

    match cmd {
        ".exit" | ".quit" => {
            println!("Goodbye!");
            return true;
        }
        ".help" => print_help(),
        ".tables" => show_tables(database),
        ".schema" => show_schema(database, parts.get(1).copied()),
        ".config" => match database.config().to_json_string() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        },
        ".format" => match parts.get(1) {
            Some(value) => match OutputFormat::from_str(value, true) {
                Ok(new_format) => {
                    *format = new_format;
                    println!("Format set to: {}", value);
                }
                Err(_) => eprintln!("Invalid format. Use: table or json"),
            },
            None => println!("Current format: {:?}", format),
        },
        ".version" => println!("PrismDB Binder v{}", env!("CARGO_PKG_VERSION")),
        _ => {
            println!("Unknown command: {}", cmd);
            println!("Type '.help' for list of available commands.");
        }
    }
    false
}

fn show_tables(database: &Database) {
    let tables = database.catalog().list_tables();
    if tables.is_empty() {
        println!("No tables found");
    }
    for table in tables {
        println!("{}", table);
    }
}

fn show_schema(database: &Database, table_name: Option<&str>) {
    let catalog = database.catalog();
    for name in catalog.list_tables() {
        if table_name.is_some_and(|filter| filter != name) {
            continue;
        }
        match catalog.get_table(&name) {
            Ok(table) => {
                println!("-- created {}", table.created_at().format("%Y-%m-%d %H:%M:%S UTC"));
                println!("{}", create_statement(&table));
            }
            Err(e) => eprintln!("Error getting table '{}': {}", name, e),
        }
    }
}

fn create_statement(table: &Table) -> String {
    let columns: Vec<String> = table
        .user_fields()
        .iter()
        .map(|field| {
            let not_null = if field.nullable { "" } else { " NOT NULL" };
            format!("  {} {}{}", field.name, field.field_type, not_null)
        })
        .collect();
    format!("CREATE TABLE {} (\n{}\n);", table.get_name(), columns.join(",\n"))
}

fn print_help() {
    println!(
        r#"
.help                    Show this help message
.quit                    Exit this program
.exit                    Exit this program
.tables                  List all tables
.schema ?TABLE?          Show the CREATE statements (all tables or specific table)
.config                  Show the binder configuration
.format FORMAT           Set output format (table, json)
.version                 Show version information

SQL Statements:
  SELECT ... FROM ... [WHERE ...]   Bind a query and show the resolved fields
  CREATE TABLE t (col TYPE, ...)    Add a table to the catalog
  DROP TABLE t                      Remove a table from the catalog
  Statements end with a semicolon (;) and may span several lines

Keyboard Shortcuts:
  Ctrl+C                Cancel current statement
  Ctrl+D                Exit (same as .exit)
  Up/Down arrows        Navigate command history
"#
    );
}

fn execute_sql(database: &Database, sql: &str, format: OutputFormat) -> anyhow::Result<()> {
    for result in database.execute_script(sql)? {
        match (&result, format) {
            (StatementResult::Bound(stmt), OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&stmt.summary())?);
            }
            (StatementResult::Bound(stmt), OutputFormat::Table) => {
                print!("{}", stmt.summary().to_table_string());
                println!("{}", result.status());
            }
            _ => println!("{}", result.status()),
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "prism-bind")]
#[command(about = "PrismDB Binder - resolve SELECT statements against a catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON schema file describing the catalog
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// SQL file with CREATE TABLE statements run at startup
    #[arg(long)]
    init: Option<PathBuf>,

    /// SQL to bind or execute
    #[arg(short, long)]
    query: Option<String>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// JSON binder configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Order of the resolved projection (visitation or source)
    #[arg(long)]
    projection_order: Option<ProjectionOrder>,

    /// Fail when the FROM list repeats a table
    #[arg(long)]
    reject_duplicate_tables: bool,

    /// Output format for bound statements
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => BinderConfig::load(path)?,
        None => BinderConfig::default(),
    };
    if let Some(order) = cli.projection_order {
        config.projection_order = order;
    }
    if cli.reject_duplicate_tables {
        config.duplicate_tables = DuplicateTablePolicy::Reject;
    }

    let catalog = match &cli.schema {
        Some(path) => Catalog::load_definition(path)
            .with_context(|| format!("loading schema {}", path.display()))?,
        None => Catalog::new(),
    };
    let database = Database::from_catalog(catalog, config);

    if let Some(path) = &cli.init {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        database.execute_script(&script)?;
    }

    if let Some(query) = &cli.query {
        if let Err(e) = execute_sql(&database, query, cli.format) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    } else if cli.interactive {
        run_interactive_mode(&database, cli.format)?;
    } else {
        println!("Please provide either --query or --interactive flag");
        process::exit(1);
    }

    Ok(())
}
