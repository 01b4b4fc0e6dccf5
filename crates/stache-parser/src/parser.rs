//! Template parser for Stache.
//!
//! Owns the token cursor shared by every builder and the dispatcher that
//! builds "whatever node comes next". Elements are built in `element.rs`;
//! text, mustaches, sections, partials and comments are built here.
//!
//! Builders run depth-first: exactly one of them advances the cursor at a
//! time, and each leaves any token it does not own (a closing tag that
//! belongs to an ancestor, the end of an enclosing section) for its caller.

use crate::ast::{ElementNode, Fragment, Item, NodeId, Section, Template};
use crate::ParseError;
use stache_lexer::{MustacheKind, Scanner, Token, TokenKind};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_PARSE: AtomicUsize = AtomicUsize::new(0);

/// Options that change how a template is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    /// Keep whitespace exactly as written everywhere, not only inside `<pre>`.
    pub preserve_whitespace: bool,
    /// Drop `onclick`-style attributes from HTML elements.
    pub sanitize_event_attributes: bool,
}

/// Stache template parser.
///
/// Converts the flat token stream from the scanner into a tree of items.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    options: ParserOptions,
    parse_id: usize,
    next_id: usize,
}

impl Parser {
    /// Create a new parser for the given tokens.
    pub fn new(tokens: Vec<Token>, options: ParserOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
            parse_id: NEXT_PARSE.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
        }
    }

    /// Parse source text into a template.
    pub fn parse(source: &str, options: ParserOptions) -> Result<Template, ParseError> {
        let tokens = Scanner::tokenize(source)?;
        let mut parser = Parser::new(tokens, options);
        parser.parse_template()
    }

    /// Parse the whole token stream.
    pub fn parse_template(&mut self) -> Result<Template, ParseError> {
        let preserve_whitespace = self.options.preserve_whitespace;
        let mut items = Vec::new();

        while !self.is_at_end() {
            if let Some(item) = self.get_item(preserve_whitespace)? {
                items.push(item);
            }
        }

        if !preserve_whitespace {
            trim_boundary_whitespace(&mut items);
        }

        Ok(Template { items })
    }

    // =========================================================================
    // Dispatcher
    // =========================================================================

    /// Build the next item from the cursor.
    ///
    /// Returns `Ok(None)` for tokens that produce no node (mustache comments,
    /// stray closing tags and stray section ends); those are consumed.
    pub fn get_item(&mut self, preserve_whitespace: bool) -> Result<Option<Item>, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Ok(None);
        };

        match token.kind {
            TokenKind::Text(_) => Ok(Some(self.parse_text(preserve_whitespace))),

            TokenKind::Comment(text) => {
                self.advance();
                Ok(Some(Item::Comment(text)))
            }

            TokenKind::Mustache { kind, reference } => {
                self.advance();
                match kind {
                    MustacheKind::Interpolator | MustacheKind::Triple => {
                        Ok(Some(Item::Mustache { kind, reference }))
                    }
                    MustacheKind::Section | MustacheKind::Inverted => {
                        let inverted = kind == MustacheKind::Inverted;
                        self.parse_section(reference, inverted, preserve_whitespace)
                            .map(Some)
                    }
                    MustacheKind::Partial => Ok(Some(Item::Partial(reference))),
                    MustacheKind::Comment => Ok(None),
                    MustacheKind::Closing => {
                        log::debug!(
                            target: "stache.parser",
                            "ignoring unmatched section end {{{{/{reference}}}}} at line {}",
                            token.span.line
                        );
                        Ok(None)
                    }
                }
            }

            TokenKind::Tag(tag) if tag.closing => {
                log::debug!(
                    target: "stache.parser",
                    "ignoring unmatched closing tag </{}> at line {}",
                    tag.name,
                    token.span.line
                );
                self.advance();
                Ok(None)
            }

            TokenKind::Tag(tag) => {
                let element = ElementNode::build(tag, token.span, self, preserve_whitespace)?;
                Ok(Some(Item::Element(element)))
            }
        }
    }

    /// Merge consecutive text tokens into one text node.
    fn parse_text(&mut self, preserve_whitespace: bool) -> Item {
        let mut text = String::new();

        while let Some(value) = self.peek().and_then(Token::as_text) {
            text.push_str(value);
            self.advance();
        }

        if preserve_whitespace {
            Item::Text(text)
        } else {
            Item::Text(collapse_whitespace(&text))
        }
    }

    /// Collect items up to the section's `{{/...}}`, which is consumed.
    fn parse_section(
        &mut self,
        reference: String,
        inverted: bool,
        preserve_whitespace: bool,
    ) -> Result<Item, ParseError> {
        let mut items = Vec::new();

        while let Some(token) = self.peek() {
            if let TokenKind::Mustache {
                kind: MustacheKind::Closing,
                reference: closing,
            } = &token.kind
            {
                if !closing.is_empty() && *closing != reference {
                    log::warn!(
                        target: "stache.parser",
                        "section {{{{#{reference}}}}} closed by {{{{/{closing}}}}} at line {}",
                        token.span.line
                    );
                }
                self.advance();
                break;
            }

            if let Some(item) = self.get_item(preserve_whitespace)? {
                items.push(item);
            }
        }

        Ok(Item::Section(Section {
            reference,
            inverted,
            items,
        }))
    }

    // =========================================================================
    // Fragments
    // =========================================================================

    /// Build a fragment (attribute value, dynamic directive name or
    /// arguments) from its own token run. Whitespace is kept as written.
    pub fn build_fragment(&mut self, tokens: Vec<Token>) -> Result<Fragment, ParseError> {
        let mut sub = Parser {
            tokens,
            pos: 0,
            options: self.options.clone(),
            parse_id: self.parse_id,
            next_id: self.next_id,
        };

        let mut items = Vec::new();
        while !sub.is_at_end() {
            if let Some(item) = sub.get_item(true)? {
                items.push(item);
            }
        }

        self.next_id = sub.next_id;
        Ok(Fragment::new(items))
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    /// The token under the cursor, if any.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Move the cursor past the current token.
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub(crate) fn next_node_id(&mut self) -> NodeId {
        let id = NodeId {
            parse: self.parse_id,
            index: self.next_id,
        };
        self.next_id += 1;
        id
    }
}

/// Strip leading whitespace from a first text item and trailing whitespace
/// from a last one, dropping either if nothing is left.
pub(crate) fn trim_boundary_whitespace(items: &mut Vec<Item>) {
    let emptied = match items.first_mut() {
        Some(Item::Text(text)) => {
            let start = text.len() - text.trim_start().len();
            text.drain(..start);
            text.is_empty()
        }
        _ => false,
    };
    if emptied {
        items.remove(0);
    }

    let emptied = match items.last_mut() {
        Some(Item::Text(text)) => {
            let end = text.trim_end().len();
            text.truncate(end);
            text.is_empty()
        }
        _ => false,
    };
    if emptied {
        items.pop();
    }
}

/// Replace every run of whitespace with a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }

    out
}
