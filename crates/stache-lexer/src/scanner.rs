use crate::token::{MustacheKind, RawAttribute, Span, Tag, Token, TokenKind};
use crate::LexerError;

/// Scanner mode determines whether `<` can open a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerMode {
    /// Default mode: tags, comments, mustaches and text.
    Markup,
    /// Inside an attribute value: only text and mustaches.
    AttributeValue,
}

/// Template source scanner.
///
/// Tokenizes template source into a flat stream of tokens.
/// Handles tags with attributes, HTML comments, every mustache flavour
/// and the text runs between them.
///
/// - `Vec<char>` source for index-based navigation
/// - Mode-aware handling of `<`
/// - Position tracking on every token
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    mode: ScannerMode,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            mode: ScannerMode::Markup,
        }
    }

    /// Create a scanner with a specific mode.
    pub fn with_mode(source: &str, mode: ScannerMode) -> Self {
        let mut scanner = Self::new(source);
        scanner.mode = mode;
        scanner
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        log::trace!(target: "stache.lexer", "scanned {} tokens", scanner.tokens.len());
        Ok(scanner.tokens)
    }

    /// Tokenize an attribute value that started at the given line and column.
    fn tokenize_attribute_value(
        value: &str,
        line: usize,
        column: usize,
    ) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::with_mode(value, ScannerMode::AttributeValue);
        scanner.line = line;
        scanner.column = column;
        scanner.scan_tokens()?;
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }
        Ok(())
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), LexerError> {
        if self.starts_with("{{") {
            return self.scan_mustache();
        }

        if self.mode == ScannerMode::Markup && self.peek() == '<' {
            if self.starts_with("<!--") {
                return self.scan_comment();
            }
            if self.opens_tag() {
                return self.scan_tag();
            }
        }

        self.scan_text()
    }

    // --- Scanners ---

    /// Scan a run of text up to the next mustache or tag. Always consumes at
    /// least one character, so a stray `<` becomes text.
    fn scan_text(&mut self) -> Result<(), LexerError> {
        let (start_pos, start_line, start_col) = self.mark();

        let mut value = String::new();
        value.push(self.peek());
        self.advance();

        while !self.is_at_end() && !self.at_boundary() {
            value.push(self.peek());
            self.advance();
        }

        self.push(TokenKind::Text(value), start_pos, start_line, start_col);
        Ok(())
    }

    /// Scan `{{...}}` or `{{{...}}}`. The sigil after the opening delimiter
    /// picks the mustache kind; the reference is trimmed.
    fn scan_mustache(&mut self) -> Result<(), LexerError> {
        let (start_pos, start_line, start_col) = self.mark();

        let triple = self.starts_with("{{{");
        let (open, close) = if triple { (3, "}}}") } else { (2, "}}") };
        for _ in 0..open {
            self.advance();
        }

        let content = self.read_until(close).ok_or_else(|| LexerError {
            message: "Unterminated mustache".into(),
            line: start_line,
            column: start_col,
        })?;
        let content = content.trim();

        let (kind, reference) = if triple {
            (MustacheKind::Triple, content)
        } else {
            let mut chars = content.chars();
            let kind = match chars.next() {
                Some('#') => MustacheKind::Section,
                Some('^') => MustacheKind::Inverted,
                Some('/') => MustacheKind::Closing,
                Some('>') => MustacheKind::Partial,
                Some('!') => MustacheKind::Comment,
                _ => MustacheKind::Interpolator,
            };
            if kind == MustacheKind::Interpolator {
                (kind, content)
            } else {
                (kind, chars.as_str().trim())
            }
        };

        self.push(
            TokenKind::Mustache {
                kind,
                reference: reference.to_string(),
            },
            start_pos,
            start_line,
            start_col,
        );
        Ok(())
    }

    /// Scan an HTML comment (`<!-- ... -->`).
    fn scan_comment(&mut self) -> Result<(), LexerError> {
        let (start_pos, start_line, start_col) = self.mark();

        for _ in 0..4 {
            self.advance();
        }

        let content = self.read_until("-->").ok_or_else(|| LexerError {
            message: "Unterminated comment".into(),
            line: start_line,
            column: start_col,
        })?;

        self.push(TokenKind::Comment(content), start_pos, start_line, start_col);
        Ok(())
    }

    /// Scan `<name attrs>`, `<name/>`, `</name>` or `<!name ...>`.
    fn scan_tag(&mut self) -> Result<(), LexerError> {
        let (start_pos, start_line, start_col) = self.mark();
        self.advance(); // consume `<`

        let mut tag = Tag::default();
        match self.peek() {
            '/' => {
                tag.closing = true;
                self.advance();
            }
            '!' => {
                tag.doctype = true;
                self.advance();
            }
            _ => {}
        }

        while !self.is_at_end()
            && !self.peek().is_whitespace()
            && self.peek() != '/'
            && self.peek() != '>'
        {
            tag.name.push(self.peek());
            self.advance();
        }

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Err(LexerError {
                    message: format!("Unterminated tag <{}>", tag.name),
                    line: start_line,
                    column: start_col,
                });
            }

            match self.peek() {
                '>' => {
                    self.advance();
                    break;
                }
                '/' => {
                    self.advance();
                    if self.peek() == '>' {
                        self.advance();
                        tag.self_closing = true;
                        break;
                    }
                }
                _ => {
                    let attr = self.scan_attribute()?;
                    tag.attrs.push(attr);
                }
            }
        }

        self.push(TokenKind::Tag(tag), start_pos, start_line, start_col);
        Ok(())
    }

    /// Scan one attribute: a bare name, or `name=value` with a quoted or
    /// unquoted value.
    fn scan_attribute(&mut self) -> Result<RawAttribute, LexerError> {
        let mut name = String::new();
        while !self.is_at_end()
            && !self.peek().is_whitespace()
            && !matches!(self.peek(), '=' | '/' | '>' | '"' | '\'')
        {
            name.push(self.peek());
            self.advance();
        }

        if name.is_empty() {
            // A stray `=` or quote; take it as the name so scanning moves on.
            name.push(self.peek());
            self.advance();
        }

        self.skip_whitespace();
        if self.peek() != '=' {
            return Ok(RawAttribute::new(name, None));
        }
        self.advance(); // consume `=`
        self.skip_whitespace();

        let (_, value_line, mut value_col) = self.mark();
        let raw = match self.peek() {
            quote @ ('"' | '\'') => {
                self.advance();
                value_col += 1;
                self.scan_quoted_value(quote)?
            }
            _ => self.scan_unquoted_value()?,
        };

        let value = Self::tokenize_attribute_value(&raw, value_line, value_col)?;
        Ok(RawAttribute::new(name, Some(value)))
    }

    fn scan_quoted_value(&mut self, quote: char) -> Result<String, LexerError> {
        let (_, start_line, start_col) = self.mark();
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            value.push(self.peek());
            self.advance();
        }

        if self.is_at_end() {
            return Err(LexerError {
                message: "Unterminated attribute value".into(),
                line: start_line,
                column: start_col,
            });
        }

        self.advance(); // consume closing quote
        Ok(value)
    }

    /// Unquoted values end at whitespace or `>`, except inside a mustache.
    fn scan_unquoted_value(&mut self) -> Result<String, LexerError> {
        let mut value = String::new();

        while !self.is_at_end() && !self.peek().is_whitespace() && self.peek() != '>' {
            if self.starts_with("{{") {
                let (_, line, column) = self.mark();
                self.advance();
                self.advance();
                let inner = self.read_until("}}").ok_or(LexerError {
                    message: "Unterminated mustache".into(),
                    line,
                    column,
                })?;
                value.push_str("{{");
                value.push_str(&inner);
                value.push_str("}}");
            } else {
                value.push(self.peek());
                self.advance();
            }
        }

        Ok(value)
    }

    // --- Helpers ---

    /// Consume characters up to and including `delim`, returning what came
    /// before it. `None` when the source ends first.
    fn read_until(&mut self, delim: &str) -> Option<String> {
        let mut content = String::new();
        while !self.is_at_end() {
            if self.starts_with(delim) {
                for _ in 0..delim.chars().count() {
                    self.advance();
                }
                return Some(content);
            }
            content.push(self.peek());
            self.advance();
        }
        None
    }

    /// Whether the cursor sits on `<name`, `</name` or `<!name`.
    fn opens_tag(&self) -> bool {
        let next = self.peek_at(1);
        if next == '/' || next == '!' {
            self.peek_at(2).is_ascii_alphabetic()
        } else {
            next.is_ascii_alphabetic()
        }
    }

    /// Whether a text run must stop at the cursor.
    fn at_boundary(&self) -> bool {
        self.starts_with("{{")
            || (self.mode == ScannerMode::Markup
                && self.peek() == '<'
                && (self.starts_with("<!--") || self.opens_tag()))
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == c)
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn mark(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.column)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        let span = Span::new(start, self.pos, line, column);
        self.tokens.push(Token::new(kind, span));
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.chars.get(self.pos) {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
