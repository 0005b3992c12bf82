//! SQL Parser
//!
//! Turns SQL text into the syntactic statements the binder consumes: SELECT
//! with a flat projection list, plus the CREATE TABLE and DROP TABLE needed to
//! populate a catalog.

pub mod ast;
pub mod keywords;
pub mod parser;
pub mod tokenizer;

pub use ast::*;
pub use keywords::*;
pub use parser::*;
pub use tokenizer::*;

use crate::common::error::BinderResult;

/// Main parser interface
pub struct SqlParser {
    tokenizer: Tokenizer,
}

impl SqlParser {
    /// Create a new SQL parser
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    /// Parse a SQL query string into a statement
    pub fn parse(&self, sql: &str) -> BinderResult<Statement> {
        let tokens = self.tokenizer.tokenize(sql)?;
        let mut parser = Parser::new(tokens);
        parser.parse_statement()
    }

    /// Parse multiple SQL statements
    pub fn parse_multiple(&self, sql: &str) -> BinderResult<Vec<Statement>> {
        let tokens = self.tokenizer.tokenize(sql)?;
        let mut parser = Parser::new(tokens);
        parser.parse_statements()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single SQL statement (convenience function)
pub fn parse_sql(sql: &str) -> BinderResult<Statement> {
    SqlParser::new().parse(sql)
}

/// Parse multiple SQL statements (convenience function)
pub fn parse_sql_multiple(sql: &str) -> BinderResult<Vec<Statement>> {
    SqlParser::new().parse_multiple(sql)
}
