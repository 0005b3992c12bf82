//! SQL Parser
//!
//! Parses tokens into AST statements.

use crate::common::constants::WILDCARD;
use crate::common::error::{BinderError, BinderResult};
use crate::parser::ast::*;
use crate::parser::keywords::Keyword;
use crate::parser::tokenizer::{Token, TokenType};
use crate::planner::aggregation::AggregateFunction;
use crate::types::{LogicalType, Value};

/// SQL parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser with the given tokens
    ///
    /// A stream that does not end with EOF gets one appended.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenType::EOF, String::new(), line, column));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse a single statement
    pub fn parse_statement(&mut self) -> BinderResult<Statement> {
        let statement = self.parse_statement_internal()?;

        // Skip any semicolons
        while self.consume_token(&TokenType::Semicolon).is_ok() {}

        if !self.current_token().is_eof() {
            return Err(self.unexpected("end of statement"));
        }

        Ok(statement)
    }

    /// Parse multiple statements
    pub fn parse_statements(&mut self) -> BinderResult<Vec<Statement>> {
        let mut statements = Vec::new();

        while !self.current_token().is_eof() {
            // Skip empty statements (just semicolons)
            if self.consume_token(&TokenType::Semicolon).is_ok() {
                continue;
            }

            statements.push(self.parse_statement_internal()?);

            if !self.current_token().is_eof() {
                self.consume_token(&TokenType::Semicolon)?;
            }
        }

        Ok(statements)
    }

    fn parse_statement_internal(&mut self) -> BinderResult<Statement> {
        match &self.current_token().token_type {
            TokenType::Keyword(Keyword::Select) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            TokenType::Keyword(Keyword::Create) => {
                Ok(Statement::CreateTable(self.parse_create_table_statement()?))
            }
            TokenType::Keyword(Keyword::Drop) => {
                Ok(Statement::DropTable(self.parse_drop_table_statement()?))
            }
            _ => Err(self.unexpected("SELECT, CREATE TABLE or DROP TABLE")),
        }
    }

    fn parse_select_statement(&mut self) -> BinderResult<SelectSyntax> {
        self.consume_keyword(Keyword::Select)?;

        let mut attributes = vec![self.parse_select_item()?];
        while self.consume_token(&TokenType::Comma).is_ok() {
            attributes.push(self.parse_select_item()?);
        }

        self.consume_keyword(Keyword::From)?;
        let mut relations = vec![self.consume_name()?];
        while self.consume_token(&TokenType::Comma).is_ok() {
            relations.push(self.consume_name()?);
        }

        let mut conditions = Vec::new();
        if self.consume_keyword(Keyword::Where).is_ok() {
            conditions.push(self.parse_condition()?);
            while self.consume_keyword(Keyword::And).is_ok() {
                conditions.push(self.parse_condition()?);
            }
        }

        Ok(SelectSyntax {
            relations,
            attributes,
            conditions,
        })
    }

    /// Parse one projection entry, including aggregate calls
    fn parse_select_item(&mut self) -> BinderResult<RelAttrSyntax> {
        if let Some(function) = self.peek_aggregate_call() {
            return self.parse_aggregate_call(function);
        }
        self.parse_attribute()
    }

    /// `f`, `t.f`, `t.*`, `*`, `*.*` or `*.f`
    fn parse_attribute(&mut self) -> BinderResult<RelAttrSyntax> {
        let first = if self.consume_token(&TokenType::Star).is_ok() {
            WILDCARD.to_string()
        } else {
            self.consume_name()?
        };

        if self.consume_token(&TokenType::Dot).is_err() {
            return Ok(RelAttrSyntax::unqualified(first));
        }

        let second = if self.consume_token(&TokenType::Star).is_ok() {
            WILDCARD.to_string()
        } else {
            self.consume_name()?
        };
        Ok(RelAttrSyntax::qualified(first, second))
    }

    /// Aggregate function keyword immediately followed by `(`
    fn peek_aggregate_call(&self) -> Option<AggregateFunction> {
        let function = match &self.current_token().token_type {
            TokenType::Keyword(Keyword::Count) => AggregateFunction::Count,
            TokenType::Keyword(Keyword::Sum) => AggregateFunction::Sum,
            TokenType::Keyword(Keyword::Avg) => AggregateFunction::Avg,
            TokenType::Keyword(Keyword::Min) => AggregateFunction::Min,
            TokenType::Keyword(Keyword::Max) => AggregateFunction::Max,
            _ => return None,
        };
        (self.peek_token().token_type == TokenType::LeftParen).then_some(function)
    }

    /// Parse `AGG(arg, ...)` and record its shape without judging it
    fn parse_aggregate_call(&mut self, function: AggregateFunction) -> BinderResult<RelAttrSyntax> {
        self.position += 1; // function keyword
        self.consume_token(&TokenType::LeftParen)?;

        let mut arguments = Vec::new();
        let mut inner_call = None;
        if self.current_token().token_type != TokenType::RightParen {
            loop {
                inner_call = inner_call.or(self.peek_aggregate_call());
                arguments.push(self.parse_select_item()?);
                if self.consume_token(&TokenType::Comma).is_err() {
                    break;
                }
            }
        }
        self.consume_token(&TokenType::RightParen)?;

        let argument_count = arguments.len();
        let first = match arguments.into_iter().next() {
            Some(first) => first,
            None => {
                return Ok(RelAttrSyntax::unqualified("").with_aggregate(
                    AggregateShape::Malformed(format!("{}() has no argument", function)),
                ))
            }
        };

        // An aggregate call among the arguments is nesting, whatever its own shape
        let shape = if let Some(inner) = inner_call {
            AggregateShape::Nested {
                outer: function,
                inner,
            }
        } else if argument_count > 1 {
            AggregateShape::MultipleArguments {
                function,
                count: argument_count,
            }
        } else {
            AggregateShape::Call(function)
        };

        Ok(first.with_aggregate(shape))
    }

    fn parse_condition(&mut self) -> BinderResult<ConditionSyntax> {
        let left = self.parse_operand()?;
        let op = self.parse_comparison_operator()?;
        let right = self.parse_operand()?;
        Ok(ConditionSyntax::new(left, op, right))
    }

    fn parse_comparison_operator(&mut self) -> BinderResult<CompOp> {
        let op = match &self.current_token().token_type {
            TokenType::Equals => CompOp::Equal,
            TokenType::NotEquals => CompOp::NotEqual,
            TokenType::LessThan => CompOp::LessThan,
            TokenType::LessThanOrEqual => CompOp::LessThanOrEqual,
            TokenType::GreaterThan => CompOp::GreaterThan,
            TokenType::GreaterThanOrEqual => CompOp::GreaterThanOrEqual,
            TokenType::Keyword(Keyword::Like) => CompOp::Like,
            TokenType::Keyword(Keyword::Not) => {
                self.position += 1;
                self.consume_keyword(Keyword::Like)?;
                return Ok(CompOp::NotLike);
            }
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.position += 1;
        Ok(op)
    }

    fn parse_operand(&mut self) -> BinderResult<ConditionOperand> {
        let value = match &self.current_token().token_type {
            TokenType::StringLiteral(text) => Value::Varchar(text.clone()),
            TokenType::NumericLiteral(text) => Value::from_numeric_literal(text)?,
            TokenType::Keyword(Keyword::True) => Value::Boolean(true),
            TokenType::Keyword(Keyword::False) => Value::Boolean(false),
            TokenType::Keyword(Keyword::Null) => Value::Null,
            TokenType::Minus => {
                self.position += 1;
                // Parsed with its sign so the most negative values keep their width
                let text = self.consume_numeric_literal()?;
                return Ok(ConditionOperand::Literal(Value::from_numeric_literal(
                    &format!("-{}", text),
                )?));
            }
            _ => return Ok(ConditionOperand::Attribute(self.parse_attribute()?)),
        };
        self.position += 1;
        Ok(ConditionOperand::Literal(value))
    }

    fn parse_create_table_statement(&mut self) -> BinderResult<CreateTableStatement> {
        self.consume_keyword(Keyword::Create)?;
        self.consume_keyword(Keyword::Table)?;
        let table_name = self.consume_name()?;

        self.consume_token(&TokenType::LeftParen)?;
        let mut columns = vec![self.parse_column_definition()?];
        while self.consume_token(&TokenType::Comma).is_ok() {
            columns.push(self.parse_column_definition()?);
        }
        self.consume_token(&TokenType::RightParen)?;

        Ok(CreateTableStatement {
            table_name,
            columns,
        })
    }

    fn parse_column_definition(&mut self) -> BinderResult<ColumnDefinition> {
        let name = self.consume_name()?;
        let data_type = self.parse_data_type()?;

        let mut nullable = true;
        if self.consume_keyword(Keyword::Not).is_ok() {
            self.consume_keyword(Keyword::Null)?;
            nullable = false;
        } else if self.consume_keyword(Keyword::Null).is_ok() {
            nullable = true;
        }

        Ok(ColumnDefinition {
            name,
            data_type,
            nullable,
        })
    }

    fn parse_data_type(&mut self) -> BinderResult<LogicalType> {
        let keyword = match &self.current_token().token_type {
            TokenType::Keyword(keyword) => *keyword,
            _ => return Err(self.unexpected("data type")),
        };

        let data_type = match keyword {
            Keyword::Int | Keyword::Integer => LogicalType::Integer,
            Keyword::BigInt => LogicalType::BigInt,
            Keyword::Float | Keyword::Real => LogicalType::Float,
            Keyword::Double => LogicalType::Double,
            Keyword::Text => LogicalType::Varchar,
            Keyword::Date => LogicalType::Date,
            Keyword::Boolean => LogicalType::Boolean,
            Keyword::Char => {
                self.position += 1;
                let length = self.parse_type_length()?.unwrap_or(1);
                return Ok(LogicalType::Char { length });
            }
            Keyword::Varchar => {
                self.position += 1;
                self.parse_type_length()?;
                return Ok(LogicalType::Varchar);
            }
            _ => return Err(self.unexpected("data type")),
        };
        self.position += 1;
        Ok(data_type)
    }

    /// Optional `(n)` after a character type
    fn parse_type_length(&mut self) -> BinderResult<Option<usize>> {
        if self.consume_token(&TokenType::LeftParen).is_err() {
            return Ok(None);
        }
        let text = self.consume_numeric_literal()?;
        let length = text
            .parse::<usize>()
            .map_err(|_| BinderError::Parse(format!("Invalid type length: {}", text)))?;
        if length == 0 {
            return Err(BinderError::Parse(
                "Character type length must be positive".to_string(),
            ));
        }
        self.consume_token(&TokenType::RightParen)?;
        Ok(Some(length))
    }

    fn parse_drop_table_statement(&mut self) -> BinderResult<DropTableStatement> {
        self.consume_keyword(Keyword::Drop)?;
        self.consume_keyword(Keyword::Table)?;
        Ok(DropTableStatement {
            table_name: self.consume_name()?,
        })
    }

    // Helper methods

    fn current_token(&self) -> &Token {
        // `new` guarantees a trailing EOF
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_token(&self) -> &Token {
        if self.position + 1 < self.tokens.len() {
            &self.tokens[self.position + 1]
        } else {
            &self.tokens[self.tokens.len() - 1] // EOF token
        }
    }

    fn consume_token(&mut self, token_type: &TokenType) -> BinderResult<&Token> {
        if self.current_token().token_type == *token_type {
            let token = &self.tokens[self.position];
            self.position += 1;
            Ok(token)
        } else {
            Err(BinderError::Parse(format!(
                "Expected token '{:?}', found '{}'",
                token_type,
                self.current_token().text
            )))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> BinderResult<&Token> {
        if self.current_token().is_keyword(keyword) {
            let token = &self.tokens[self.position];
            self.position += 1;
            Ok(token)
        } else {
            Err(BinderError::Parse(format!(
                "Expected keyword '{}', found '{}'",
                keyword,
                self.current_token().text
            )))
        }
    }

    /// Table or column name; non-reserved keywords such as `date` are accepted
    fn consume_name(&mut self) -> BinderResult<String> {
        let name = match &self.current_token().token_type {
            TokenType::Identifier(name) => name.clone(),
            TokenType::Keyword(keyword) if !keyword.is_reserved() => {
                self.current_token().text.clone()
            }
            _ => return Err(self.unexpected("identifier")),
        };
        self.position += 1;
        Ok(name)
    }

    fn consume_numeric_literal(&mut self) -> BinderResult<String> {
        match &self.current_token().token_type {
            TokenType::NumericLiteral(text) => {
                let text = text.clone();
                self.position += 1;
                Ok(text)
            }
            _ => Err(self.unexpected("numeric literal")),
        }
    }

    fn unexpected(&self, expected: &str) -> BinderError {
        let token = self.current_token();
        let found = if token.is_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", token.text)
        };
        BinderError::Parse(format!(
            "Expected {}, found {} at line {}, column {}",
            expected, found, token.line, token.column
        ))
    }
}
