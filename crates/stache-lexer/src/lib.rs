//! Stache Lexer
//!
//! Tokenizes mustache-markup template source into a flat stream of tokens.
//! Tags carry their attributes, and attribute values are tokenized again
//! into text and mustache tokens so that `class="{{active}} item"` keeps its
//! dynamic parts.
//!
//! # Example
//!
//! ```
//! use stache_lexer::Scanner;
//!
//! let tokens = Scanner::tokenize("").unwrap();
//! assert!(tokens.is_empty());
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{MustacheKind, RawAttribute, Span, Tag, Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
