//! Token definitions for the Pascal-subset lexer

use crate::common::Span;
use logos::Logos;
use serde::{Deserialize, Serialize};

/// A token with its kind, literal payload, and position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<TokenValue>,
    pub span: Span,
}

/// Literal payload of a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Token {
    pub fn new(kind: TokenKind, value: Option<TokenValue>, span: Span) -> Self {
        Self { kind, value, span }
    }

    /// Identifier token for a name recorded in the AST, used when a later
    /// pass has to cite the reference that failed
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self {
            kind: TokenKind::Ident,
            value: Some(TokenValue::Text(name.into())),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: None,
            span,
        }
    }

    /// Text payload of identifiers and reserved words
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }
}

impl std::fmt::Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Integer(n) => write!(f, "{}", n),
            TokenValue::Real(r) => write!(f, "{:?}", r),
            TokenValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({}, ", self.kind.name())?;
        match &self.value {
            Some(value) => write!(f, "{}", value)?,
            None => write!(f, "'{}'", self.kind.as_str())?,
        }
        write!(f, ", position={}:{})", self.span.line, self.span.column)
    }
}

/// Token kinds recognized by the lexer
///
/// Reserved words match case-insensitively. Brace comments are skipped and do
/// not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\{[^}]*\}")]
pub enum TokenKind {
    // Reserved words
    #[token("program", ignore(ascii_case))]
    Program,
    #[token("var", ignore(ascii_case))]
    Var,
    #[token("procedure", ignore(ascii_case))]
    Procedure,
    #[token("begin", ignore(ascii_case))]
    Begin,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("div", ignore(ascii_case))]
    Div,
    #[token("integer", ignore(ascii_case))]
    Integer,
    #[token("real", ignore(ascii_case))]
    Real,

    // Literals
    #[regex(r"[0-9]+")]
    IntegerConst,
    #[regex(r"[0-9]+\.[0-9]*")]
    RealConst,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(":=")]
    Assign,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Punctuation
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token is a reserved word
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Program
                | TokenKind::Var
                | TokenKind::Procedure
                | TokenKind::Begin
                | TokenKind::End
                | TokenKind::Div
                | TokenKind::Integer
                | TokenKind::Real
        )
    }

    /// Kind name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Program => "PROGRAM",
            TokenKind::Var => "VAR",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Div => "INTEGER_DIV",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::IntegerConst => "INTEGER_CONST",
            TokenKind::RealConst => "REAL_CONST",
            TokenKind::Ident => "ID",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MUL",
            TokenKind::Slash => "FLOAT_DIV",
            TokenKind::Assign => "ASSIGN",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Semi => "SEMI",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Eof => "EOF",
        }
    }

    /// Get the source representation of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Program => "program",
            TokenKind::Var => "var",
            TokenKind::Procedure => "procedure",
            TokenKind::Begin => "begin",
            TokenKind::End => "end",
            TokenKind::Div => "div",
            TokenKind::Integer => "integer",
            TokenKind::Real => "real",
            TokenKind::IntegerConst => "<integer>",
            TokenKind::RealConst => "<real>",
            TokenKind::Ident => "<ident>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Assign => ":=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Eof => "<eof>",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
