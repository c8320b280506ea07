//! Diagnostic reporting with source locations
//!
//! Every stage fails with a [`CompileError`]. The first error aborts the
//! whole pipeline; there is no recovery and no batching.

use crate::common::Span;
use crate::lexer::Token;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Result type used throughout the front end
pub type Result<T, E = CompileError> = std::result::Result<T, E>;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }

    /// Attach this file to an error so miette can render the snippet
    pub fn report(&self, error: CompileError) -> miette::Report {
        miette::Report::new(error).with_source_code(self.to_named_source())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Kind tag carried by parser and semantic errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnexpectedToken,
    IdNotFound,
    DuplicateId,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "Unexpected token",
            ErrorCode::IdNotFound => "Identifier not found",
            ErrorCode::DuplicateId => "Duplicate id found",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler diagnostic
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CompileError {
    // === Lexer Errors ===
    #[error("Lexer error on '{ch}' line: {line} column: {column}")]
    #[diagnostic(code(lex::invalid_char))]
    Lexer {
        ch: char,
        line: u32,
        column: u32,
        #[label("unrecognized character")]
        span: SourceSpan,
    },

    #[error("Numeric literal `{text}` is out of range")]
    #[diagnostic(code(lex::invalid_number))]
    InvalidNumber {
        text: String,
        #[label("cannot be represented")]
        span: SourceSpan,
    },

    // === Parse Errors ===
    #[error("{code} -> {token}")]
    #[diagnostic(code(parse::unexpected_token))]
    Parser {
        code: ErrorCode,
        token: Token,
        #[label("unexpected token here")]
        span: SourceSpan,
    },

    // === Semantic Errors ===
    #[error("{code} -> {token}")]
    #[diagnostic(code(semantic::error))]
    Semantic {
        code: ErrorCode,
        token: Token,
        #[label("rejected by name resolution")]
        span: SourceSpan,
    },

    // === Runtime Errors ===
    #[error("variable `{name}` is not defined")]
    #[diagnostic(
        code(runtime::undefined_var),
        help("assign a value to the variable before reading it")
    )]
    UndefinedVariable {
        name: String,
        #[label("read before assignment")]
        span: SourceSpan,
    },

    #[error("integer division by zero")]
    #[diagnostic(code(runtime::division_by_zero))]
    DivisionByZero {
        #[label("divisor evaluates to zero")]
        span: SourceSpan,
    },

    #[error("integer overflow")]
    #[diagnostic(code(runtime::overflow))]
    IntegerOverflow {
        #[label("result does not fit in 64 bits")]
        span: SourceSpan,
    },
}

impl CompileError {
    pub fn lexer(ch: char, span: Span) -> Self {
        CompileError::Lexer {
            ch,
            line: span.line,
            column: span.column,
            span: span.into(),
        }
    }

    pub fn unexpected(token: Token) -> Self {
        CompileError::Parser {
            code: ErrorCode::UnexpectedToken,
            span: token.span.into(),
            token,
        }
    }

    pub fn semantic(code: ErrorCode, token: Token) -> Self {
        CompileError::Semantic {
            code,
            span: token.span.into(),
            token,
        }
    }

    /// Kind tag, for parser and semantic errors
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CompileError::Parser { code, .. } | CompileError::Semantic { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Offending token, for parser and semantic errors
    pub fn token(&self) -> Option<&Token> {
        match self {
            CompileError::Parser { token, .. } | CompileError::Semantic { token, .. } => {
                Some(token)
            }
            _ => None,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            CompileError::Lexer { span, .. }
            | CompileError::InvalidNumber { span, .. }
            | CompileError::Parser { span, .. }
            | CompileError::Semantic { span, .. }
            | CompileError::UndefinedVariable { span, .. }
            | CompileError::DivisionByZero { span }
            | CompileError::IntegerOverflow { span } => *span,
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            CompileError::UndefinedVariable { .. }
                | CompileError::DivisionByZero { .. }
                | CompileError::IntegerOverflow { .. }
        )
    }
}
