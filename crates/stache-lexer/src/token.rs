/// A position in source text, tracking line and column for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// The flavour of a `{{...}}` tag, chosen by the sigil after the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MustacheKind {
    /// `{{name}}`
    Interpolator,
    /// `{{{name}}}`, unescaped
    Triple,
    /// `{{#name}}`
    Section,
    /// `{{^name}}`
    Inverted,
    /// `{{/name}}`
    Closing,
    /// `{{>name}}`
    Partial,
    /// `{{!comment}}`
    Comment,
}

/// A single attribute as it appeared inside an opening tag.
///
/// The value (if any) is tokenized again into text and mustache tokens, so
/// `class="item {{state}}"` carries two tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    pub name: String,
    pub value: Option<Vec<Token>>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, value: Option<Vec<Token>>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A `<tag>`, `</tag>` or `<!doctype>` token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<RawAttribute>,
    pub closing: bool,
    pub self_closing: bool,
    pub doctype: bool,
}

/// Token classification for template source.
///
/// Data-carrying variants embed their value directly (no separate `value` field on Token).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A literal run of characters between tags and mustaches.
    Text(String),

    /// A `{{...}}` tag with its trimmed reference.
    Mustache {
        kind: MustacheKind,
        reference: String,
    },

    /// An opening, closing or doctype tag.
    Tag(Tag),

    /// An HTML `<!-- ... -->` comment (delimiters stripped).
    Comment(String),
}

/// A token produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Build a text token with an empty span.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Text(value.into()), Span::default())
    }

    /// The literal text of a `Text` token.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this is a `{{/...}}` section terminator.
    pub fn is_closing_mustache(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Mustache {
                kind: MustacheKind::Closing,
                ..
            }
        )
    }
}
