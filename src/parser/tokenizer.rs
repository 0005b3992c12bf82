//! SQL Tokenizer
//!
//! Breaks SQL strings into individual tokens for parsing.

use crate::common::error::{BinderError, BinderResult};
use crate::parser::keywords::Keyword;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

/// SQL token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),

    // Keywords
    Keyword(Keyword),

    // Operators
    Minus,              // -
    Equals,             // =
    NotEquals,          // != or <>
    LessThan,           // <
    GreaterThan,        // >
    LessThanOrEqual,    // <=
    GreaterThanOrEqual, // >=

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Dot,        // .
    Semicolon,  // ;

    // Special
    Star, // *
    EOF,
}

/// SQL token with position information
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, text: String, line: usize, column: usize) -> Self {
        Self {
            token_type,
            text,
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::EOF)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.token_type, TokenType::Keyword(k) if k == keyword)
    }
}

/// SQL tokenizer
pub struct Tokenizer {
    keywords: HashMap<String, Keyword>,
}

impl Tokenizer {
    pub fn new() -> Self {
        let keywords = Keyword::all()
            .iter()
            .map(|keyword| (keyword.as_str().to_string(), *keyword))
            .collect();

        Self { keywords }
    }

    /// Tokenize a SQL string into tokens
    pub fn tokenize(&self, sql: &str) -> BinderResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut chars = sql.chars().peekable();
        let mut line = 1;
        let mut column = 1;

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                self.consume_whitespace(&mut chars, &mut line, &mut column);
                continue;
            }

            // Line comments
            if ch == '-' && self.starts_comment(&chars) {
                self.consume_line_comment(&mut chars, &mut line, &mut column);
                continue;
            }

            let start_line = line;
            let start_column = column;

            let single = match ch {
                '(' => Some(TokenType::LeftParen),
                ')' => Some(TokenType::RightParen),
                ',' => Some(TokenType::Comma),
                '.' => Some(TokenType::Dot),
                ';' => Some(TokenType::Semicolon),
                '*' => Some(TokenType::Star),
                '-' => Some(TokenType::Minus),
                '=' => Some(TokenType::Equals),
                _ => None,
            };
            if let Some(token_type) = single {
                chars.next();
                column += 1;
                tokens.push(Token::new(
                    token_type,
                    ch.to_string(),
                    start_line,
                    start_column,
                ));
                continue;
            }

            match ch {
                '\'' => {
                    let (text, new_line, new_column) =
                        self.consume_string(&mut chars, line, column)?;
                    line = new_line;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::StringLiteral(text.clone()),
                        text,
                        start_line,
                        start_column,
                    ));
                }
                '"' => {
                    let (text, new_column) =
                        self.consume_quoted_identifier(&mut chars, line, column)?;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::Identifier(text.clone()),
                        text,
                        start_line,
                        start_column,
                    ));
                }
                '0'..='9' => {
                    let (text, new_column) = self.consume_number(&mut chars, column);
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::NumericLiteral(text.clone()),
                        text,
                        start_line,
                        start_column,
                    ));
                }
                '!' => {
                    chars.next();
                    column += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        column += 1;
                        tokens.push(Token::new(
                            TokenType::NotEquals,
                            "!=".to_string(),
                            start_line,
                            start_column,
                        ));
                    } else {
                        return Err(BinderError::Parse(format!(
                            "Unexpected '!' at line {}, column {}",
                            start_line, start_column
                        )));
                    }
                }
                '<' => {
                    chars.next();
                    column += 1;
                    let (token_type, text) = match chars.peek() {
                        Some(&'=') => (TokenType::LessThanOrEqual, "<="),
                        Some(&'>') => (TokenType::NotEquals, "<>"),
                        _ => (TokenType::LessThan, "<"),
                    };
                    if text.len() == 2 {
                        chars.next();
                        column += 1;
                    }
                    tokens.push(Token::new(
                        token_type,
                        text.to_string(),
                        start_line,
                        start_column,
                    ));
                }
                '>' => {
                    chars.next();
                    column += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        column += 1;
                        tokens.push(Token::new(
                            TokenType::GreaterThanOrEqual,
                            ">=".to_string(),
                            start_line,
                            start_column,
                        ));
                    } else {
                        tokens.push(Token::new(
                            TokenType::GreaterThan,
                            ">".to_string(),
                            start_line,
                            start_column,
                        ));
                    }
                }
                _ if self.is_identifier_start(ch) => {
                    let (text, new_column) = self.consume_identifier(&mut chars, column);
                    column = new_column;

                    // Check if it's a keyword
                    if let Some(&keyword) = self.keywords.get(&text.to_uppercase()) {
                        tokens.push(Token::new(
                            TokenType::Keyword(keyword),
                            text,
                            start_line,
                            start_column,
                        ));
                    } else {
                        tokens.push(Token::new(
                            TokenType::Identifier(text.clone()),
                            text,
                            start_line,
                            start_column,
                        ));
                    }
                }
                _ => {
                    return Err(BinderError::Parse(format!(
                        "Unexpected character '{}' at line {}, column {}",
                        ch, start_line, start_column
                    )));
                }
            }
        }

        // Add EOF token
        tokens.push(Token::new(TokenType::EOF, String::new(), line, column));

        Ok(tokens)
    }

    fn starts_comment(&self, chars: &Peekable<Chars>) -> bool {
        let mut lookahead = chars.clone();
        lookahead.next();
        lookahead.peek() == Some(&'-')
    }

    fn consume_line_comment(
        &self,
        chars: &mut Peekable<Chars>,
        line: &mut usize,
        column: &mut usize,
    ) {
        for ch in chars.by_ref() {
            if ch == '\n' {
                *line += 1;
                *column = 1;
                return;
            }
            *column += 1;
        }
    }

    fn consume_whitespace(
        &self,
        chars: &mut Peekable<Chars>,
        line: &mut usize,
        column: &mut usize,
    ) {
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                chars.next();
                if ch == '\n' {
                    *line += 1;
                    *column = 1;
                } else {
                    *column += 1;
                }
            } else {
                break;
            }
        }
    }

    fn consume_string(
        &self,
        chars: &mut Peekable<Chars>,
        mut line: usize,
        mut column: usize,
    ) -> BinderResult<(String, usize, usize)> {
        let (start_line, start_column) = (line, column);
        chars.next(); // Consume opening quote
        column += 1;

        let mut result = String::new();

        while let Some(ch) = chars.next() {
            column += 1;
            match ch {
                '\'' => {
                    // '' is an escaped quote
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        column += 1;
                        result.push('\'');
                    } else {
                        return Ok((result, line, column));
                    }
                }
                '\n' => {
                    line += 1;
                    column = 1;
                    result.push(ch);
                }
                _ => result.push(ch),
            }
        }

        Err(BinderError::Parse(format!(
            "Unterminated string literal starting at line {}, column {}",
            start_line, start_column
        )))
    }

    fn consume_quoted_identifier(
        &self,
        chars: &mut Peekable<Chars>,
        line: usize,
        mut column: usize,
    ) -> BinderResult<(String, usize)> {
        let start_column = column;
        chars.next(); // Consume opening double quote
        column += 1;

        let mut result = String::new();

        while let Some(ch) = chars.next() {
            column += 1;
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    column += 1;
                    result.push('"');
                } else {
                    return Ok((result, column));
                }
            } else {
                result.push(ch);
            }
        }

        Err(BinderError::Parse(format!(
            "Unterminated quoted identifier starting at line {}, column {}",
            line, start_column
        )))
    }

    fn consume_number(&self, chars: &mut Peekable<Chars>, mut column: usize) -> (String, usize) {
        let mut result = String::new();
        let mut seen_dot = false;

        while let Some(&ch) = chars.peek() {
            if ch.is_ascii_digit() || (ch == '.' && !seen_dot) {
                seen_dot |= ch == '.';
                result.push(ch);
                chars.next();
                column += 1;
            } else {
                break;
            }
        }

        (result, column)
    }

    fn consume_identifier(
        &self,
        chars: &mut Peekable<Chars>,
        mut column: usize,
    ) -> (String, usize) {
        let mut result = String::new();

        while let Some(&ch) = chars.peek() {
            if self.is_identifier_char(ch) {
                result.push(ch);
                chars.next();
                column += 1;
            } else {
                break;
            }
        }

        (result, column)
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier_char(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(sql: &str) -> Vec<TokenType> {
        Tokenizer::new()
            .tokenize(sql)
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_select_tokens() {
        assert_eq!(
            types("select t.* from t"),
            vec![
                TokenType::Keyword(Keyword::Select),
                TokenType::Identifier("t".to_string()),
                TokenType::Dot,
                TokenType::Star,
                TokenType::Keyword(Keyword::From),
                TokenType::Identifier("t".to_string()),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            types("<= >= <> != < > ="),
            vec![
                TokenType::LessThanOrEqual,
                TokenType::GreaterThanOrEqual,
                TokenType::NotEquals,
                TokenType::NotEquals,
                TokenType::LessThan,
                TokenType::GreaterThan,
                TokenType::Equals,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            types("'it''s' 3.25 \"Mixed Case\""),
            vec![
                TokenType::StringLiteral("it's".to_string()),
                TokenType::NumericLiteral("3.25".to_string()),
                TokenType::Identifier("Mixed Case".to_string()),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_comments_and_positions() {
        let tokens = Tokenizer::new()
            .tokenize("-- leading comment\nselect\n  id")
            .unwrap();
        assert!(tokens[0].is_keyword(Keyword::Select));
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (3, 3));
    }

    #[test]
    fn test_errors() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("select 'open").is_err());
        assert!(tokenizer.tokenize("select a ! b").is_err());
        assert!(tokenizer.tokenize("select #").is_err());
    }
}
