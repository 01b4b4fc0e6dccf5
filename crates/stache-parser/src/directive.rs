//! Directive value parsing.
//!
//! A directive value is split at the first `:` found in literal text:
//!
//! ```text
//! on-click="select"             → name "select"
//! on-click="select:{{id}}"      → name "select", dynamic args {{id}}
//! on-click="move:[1, 2]"        → name "move", args [1, 2]
//! on-click="{{handler}}:now"    → dynamic name {{handler}}, args "now"
//! ```

use crate::ast::{Directive, DirectiveName};
use crate::parser::Parser;
use crate::ParseError;
use serde_json::Value;
use stache_lexer::{RawAttribute, Span, Token, TokenKind};

/// Parse a proxy or transition attribute into a directive.
pub fn parse_directive(
    parser: &mut Parser,
    directive: RawAttribute,
    span: Span,
) -> Result<Directive, ParseError> {
    let (directive_type, tokens) = match directive.value {
        Some(tokens) if !directive.name.is_empty() => (directive.name, tokens),
        _ => return Err(ParseError::illegal_directive("Illegal directive", span)),
    };

    let mut name_tokens = Vec::new();
    let mut arg_tokens = Vec::new();
    let mut remaining = tokens.into_iter();

    while let Some(token) = remaining.next() {
        let split = match &token.kind {
            TokenKind::Text(text) => text
                .split_once(':')
                .map(|(before, after)| (before.to_string(), after.to_string())),
            _ => None,
        };

        let Some((before, after)) = split else {
            name_tokens.push(token);
            continue;
        };

        if !before.is_empty() {
            name_tokens.push(Token::new(TokenKind::Text(before), token.span));
        }
        if !after.is_empty() {
            arg_tokens.push(Token::new(TokenKind::Text(after), token.span));
        }
        break;
    }
    arg_tokens.extend(remaining);

    let name = match single_literal(&name_tokens) {
        Some(name) => DirectiveName::Static(name),
        None => DirectiveName::Dynamic(parser.build_fragment(name_tokens)?),
    };

    let mut args = None;
    let mut dynamic_args = None;
    if !arg_tokens.is_empty() {
        match single_literal(&arg_tokens) {
            Some(literal) => args = Some(parse_args(literal)),
            None => dynamic_args = Some(parser.build_fragment(arg_tokens)?),
        }
    }

    Ok(Directive {
        directive_type,
        name,
        args,
        dynamic_args,
    })
}

/// The text of a sequence made of exactly one literal text token.
fn single_literal(tokens: &[Token]) -> Option<String> {
    match tokens {
        [token] => token.as_text().map(str::to_string),
        _ => None,
    }
}

/// Strict JSON, falling back to the raw string.
fn parse_args(literal: String) -> Value {
    match serde_json::from_str(&literal) {
        Ok(value) => value,
        Err(_) => Value::String(literal),
    }
}
