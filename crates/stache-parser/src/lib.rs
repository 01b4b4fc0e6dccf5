//! Stache Parser
//!
//! Builds a tree of element, text, mustache and section nodes from the token
//! stream produced by `stache-lexer`.
//!
//! The interesting part is the element builder: it decides token by token
//! when an element closes (explicit close, an ancestor's closing tag, a
//! sibling that implicitly closes it, or the end of an enclosing section),
//! and splits an element's attributes into plain attributes and behavioural
//! directives (event proxies, intro/outro transitions, decorators).

pub mod ast;
pub mod attributes;
pub mod directive;
pub mod element;
pub mod parser;
pub mod tables;

pub use ast::{
    Attribute, Component, Directive, DirectiveName, ElementKind, ElementNode, Fragment,
    HtmlElement, Item, NodeId, Section, Template,
};
pub use parser::{Parser, ParserOptions};

use stache_lexer::{LexerError, Span};

/// What went wrong while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The source could not be tokenized.
    Lexer,
    /// The element tree is malformed (e.g. two intro transitions).
    Structural,
    /// A directive attribute is missing its name or value.
    IllegalDirective,
}

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub(crate) fn structural(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Structural,
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub(crate) fn illegal_directive(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::IllegalDirective,
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        Self {
            kind: ParseErrorKind::Lexer,
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}
