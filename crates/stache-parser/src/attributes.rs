//! Attribute classification.
//!
//! Splits the raw attributes of an opening tag into plain attributes and
//! directives:
//!
//! ```text
//! intro="fade"          → intro transition
//! outro="fly"           → outro transition
//! intro-outro="slide"   → both, as independent copies
//! proxy-click / on-click → event proxy named `click`
//! decorator="tooltip"   → decorator
//! anything else         → plain attribute
//! ```

use crate::ast::Attribute;
use crate::parser::Parser;
use crate::{tables, ParseError};
use stache_lexer::{RawAttribute, Span};

/// The attributes of one opening tag, split by role. Source order is kept
/// within `attrs` and `proxies`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedAttributes {
    pub attrs: Vec<RawAttribute>,
    pub proxies: Vec<RawAttribute>,
    pub intro: Option<RawAttribute>,
    pub outro: Option<RawAttribute>,
    pub decorator: Option<RawAttribute>,
}

/// Classify the raw attributes of an opening tag.
///
/// A second `intro`, `outro` or `intro-outro` is an error. A second
/// `decorator` silently replaces the first.
pub fn classify_attributes(
    attrs: Vec<RawAttribute>,
    span: Span,
) -> Result<ClassifiedAttributes, ParseError> {
    let mut classified = ClassifiedAttributes::default();

    for mut attr in attrs {
        match attr.name.as_str() {
            "intro" => {
                if classified.intro.is_some() {
                    return Err(ParseError::structural(
                        "An element can only have one intro transition",
                        span,
                    ));
                }
                classified.intro = Some(attr);
            }
            "outro" => {
                if classified.outro.is_some() {
                    return Err(ParseError::structural(
                        "An element can only have one outro transition",
                        span,
                    ));
                }
                classified.outro = Some(attr);
            }
            "intro-outro" => {
                if classified.intro.is_some() || classified.outro.is_some() {
                    return Err(ParseError::structural(
                        "An element can only have one intro and one outro transition",
                        span,
                    ));
                }
                classified.outro = Some(attr.clone());
                classified.intro = Some(attr);
            }
            "decorator" => {
                classified.decorator = Some(attr);
            }
            name => {
                let proxy_name = name
                    .strip_prefix("proxy-")
                    .or_else(|| name.strip_prefix("on-"))
                    .map(str::to_string);

                match proxy_name {
                    Some(proxy_name) => {
                        attr.name = proxy_name;
                        classified.proxies.push(attr);
                    }
                    None => classified.attrs.push(attr),
                }
            }
        }
    }

    Ok(classified)
}

/// Whether an attribute looks like an inline event handler (`onclick`).
pub fn is_event_attribute(name: &str) -> bool {
    name.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_alphabetic())
}

/// Build a plain HTML attribute: lower-case the name (keeping the SVG casing
/// where one exists) and turn the value into a fragment.
pub fn build_html_attribute(
    parser: &mut Parser,
    attr: RawAttribute,
) -> Result<Attribute, ParseError> {
    let lower = attr.name.to_lowercase();
    let name = match tables::svg_attribute_name(&lower) {
        Some(name) => name.to_string(),
        None => lower,
    };

    Ok(Attribute {
        name,
        value: attr
            .value
            .map(|tokens| parser.build_fragment(tokens))
            .transpose()?,
    })
}

/// Build a component attribute: the name is kept verbatim.
pub fn build_component_attribute(
    parser: &mut Parser,
    attr: RawAttribute,
) -> Result<Attribute, ParseError> {
    Ok(Attribute {
        name: attr.name,
        value: attr
            .value
            .map(|tokens| parser.build_fragment(tokens))
            .transpose()?,
    })
}
