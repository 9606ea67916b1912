//! Error types for template parsing.

use source_map::Span;
use std::fmt;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error raised while splitting a component or parsing its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Where the error occurred, relative to the parsed input.
    pub span: Span,
    pub code: ErrorCode,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("expected {}, found {}", expected, found),
            span,
            ErrorCode::UnexpectedToken,
        )
    }

    pub fn unclosed_element(tag: &str, span: Span) -> Self {
        Self::new(
            format!("element <{}> is never closed", tag),
            span,
            ErrorCode::UnclosedElement,
        )
    }

    pub fn unexpected_closing_tag(tag: &str, span: Span) -> Self {
        Self::new(
            format!("unexpected closing tag </{}>", tag),
            span,
            ErrorCode::UnexpectedClosingTag,
        )
    }

    pub fn unterminated(what: &str, span: Span) -> Self {
        Self::new(
            format!("unterminated {}", what),
            span,
            ErrorCode::Unterminated,
        )
    }

    /// Move the span into the coordinates of an enclosing file.
    pub fn shifted(mut self, offset: u32) -> Self {
        self.span = self.span.shift(offset);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)
    }
}

impl std::error::Error for ParseError {}

/// Error codes for parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnexpectedToken,
    UnclosedElement,
    UnexpectedClosingTag,
    /// Comment, quoted value or interpolation runs to end of input.
    Unterminated,
    /// `<template lang="pug">` and friends.
    UnsupportedLang,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected-token",
            Self::UnclosedElement => "unclosed-element",
            Self::UnexpectedClosingTag => "unexpected-closing-tag",
            Self::Unterminated => "unterminated",
            Self::UnsupportedLang => "unsupported-lang",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
