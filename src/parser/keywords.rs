//! SQL keywords recognised by the tokenizer

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Where,
    And,
    Not,
    Null,
    Like,
    True,
    False,
    Create,
    Drop,
    Table,
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Int,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Char,
    Varchar,
    Text,
    Date,
    Boolean,
}

const ALL_KEYWORDS: &[Keyword] = &[
    Keyword::Select,
    Keyword::From,
    Keyword::Where,
    Keyword::And,
    Keyword::Not,
    Keyword::Null,
    Keyword::Like,
    Keyword::True,
    Keyword::False,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Table,
    Keyword::Count,
    Keyword::Sum,
    Keyword::Avg,
    Keyword::Min,
    Keyword::Max,
    Keyword::Int,
    Keyword::Integer,
    Keyword::BigInt,
    Keyword::Float,
    Keyword::Real,
    Keyword::Double,
    Keyword::Char,
    Keyword::Varchar,
    Keyword::Text,
    Keyword::Date,
    Keyword::Boolean,
];

impl Keyword {
    pub fn all() -> &'static [Keyword] {
        ALL_KEYWORDS
    }

    /// Keywords that shape a statement and can never name a table or column
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Keyword::Select
                | Keyword::From
                | Keyword::Where
                | Keyword::And
                | Keyword::Not
                | Keyword::Null
                | Keyword::Like
                | Keyword::True
                | Keyword::False
                | Keyword::Create
                | Keyword::Drop
                | Keyword::Table
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::And => "AND",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::Like => "LIKE",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Create => "CREATE",
            Keyword::Drop => "DROP",
            Keyword::Table => "TABLE",
            Keyword::Count => "COUNT",
            Keyword::Sum => "SUM",
            Keyword::Avg => "AVG",
            Keyword::Min => "MIN",
            Keyword::Max => "MAX",
            Keyword::Int => "INT",
            Keyword::Integer => "INTEGER",
            Keyword::BigInt => "BIGINT",
            Keyword::Float => "FLOAT",
            Keyword::Real => "REAL",
            Keyword::Double => "DOUBLE",
            Keyword::Char => "CHAR",
            Keyword::Varchar => "VARCHAR",
            Keyword::Text => "TEXT",
            Keyword::Date => "DATE",
            Keyword::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
