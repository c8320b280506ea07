//! Lexer for the Pascal subset
//!
//! Wraps the logos-generated scanner with line/column tracking, literal
//! decoding, and identifier case normalization. Tokens are produced on demand
//! through [`Lexer::next_token`].

pub mod tokens;

pub use tokens::{Token, TokenKind, TokenValue};

use crate::common::Span;
use crate::diagnostics::{CompileError, Result};

/// On-demand tokenizer over one source string
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
    /// Byte offset up to which line/column have been accounted for
    scanned: usize,
    line: u32,
    line_start: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: logos::Lexer::new(source),
            scanned: 0,
            line: 1,
            line_start: 0,
            finished: false,
        }
    }

    /// Return the next token, or an end-of-input token once the source is
    /// exhausted. Repeated calls after the end keep returning end-of-input.
    pub fn next_token(&mut self) -> Result<Token> {
        let Some(result) = self.inner.next() else {
            self.finished = true;
            let span = self.span_at(self.source.len(), self.source.len());
            return Ok(Token::eof(span));
        };

        let range = self.inner.span();
        let span = self.span_at(range.start, range.end);
        let slice = self.inner.slice();

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => {
                let ch = slice.chars().next().unwrap_or('\0');
                return Err(CompileError::lexer(ch, span));
            }
        };

        let value = match kind {
            TokenKind::IntegerConst => {
                let n = slice
                    .parse::<i64>()
                    .map_err(|_| CompileError::InvalidNumber {
                        text: slice.to_string(),
                        span: span.into(),
                    })?;
                Some(TokenValue::Integer(n))
            }
            TokenKind::RealConst => {
                let r = slice
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite())
                    .ok_or_else(|| CompileError::InvalidNumber {
                        text: slice.to_string(),
                        span: span.into(),
                    })?;
                Some(TokenValue::Real(r))
            }
            TokenKind::Ident => Some(TokenValue::Text(slice.to_ascii_uppercase())),
            k if k.is_keyword() => Some(TokenValue::Text(slice.to_ascii_uppercase())),
            _ => None,
        };

        let token = Token::new(kind, value, span);
        tracing::trace!(%token, "lexed");
        Ok(token)
    }

    /// True once end-of-input has been returned
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Build a span, advancing the line counter over everything skipped
    /// since the previous token (whitespace, comments, the previous token)
    fn span_at(&mut self, start: usize, end: usize) -> Span {
        let source = self.source;
        if start > self.scanned {
            for (offset, ch) in source[self.scanned..start].char_indices() {
                if ch == '\n' {
                    self.line += 1;
                    self.line_start = self.scanned + offset + 1;
                }
            }
            self.scanned = start;
        }
        let column = source[self.line_start..start].chars().count() as u32 + 1;
        Span::new(start, end, self.line, column)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    /// Yields tokens up to, but not including, end-of-input
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            other => Some(other),
        }
    }
}

/// Tokenize a whole source string. The returned vector always ends with
/// exactly one end-of-input token.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tracing::debug!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}
