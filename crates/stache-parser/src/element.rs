//! Element builder.
//!
//! Builds one element from its opening tag, then collects children until
//! something closes it:
//!
//! ```text
//! </ul>            own closing tag      → consumed
//! </div>           an ancestor's tag    → left for the ancestor
//! <li> after <li>  sibling close        → left for the parent
//! {{/items}}       end of a section     → left for the section
//! end of input                          → tolerated
//! ```

use crate::ast::{Component, ElementKind, ElementNode, HtmlElement, Item};
use crate::attributes::{
    build_component_attribute, build_html_attribute, classify_attributes, is_event_attribute,
};
use crate::directive::parse_directive;
use crate::parser::{trim_boundary_whitespace, Parser};
use crate::{tables, ParseError};
use stache_lexer::{RawAttribute, Span, Tag, TokenKind};

/// What the next token means for the element being built.
enum Step {
    /// Build one more child.
    Child,
    /// Own closing tag: consume it and finish.
    Close,
    /// Implicit close: finish and leave the token for the caller.
    Yield,
}

impl ElementNode {
    /// Build an element whose opening `tag` sits under the parser's cursor.
    ///
    /// `preserve_whitespace` is inherited from the enclosing context and is
    /// forced on inside `<pre>`.
    pub fn build(
        tag: Tag,
        span: Span,
        parser: &mut Parser,
        preserve_whitespace: bool,
    ) -> Result<Self, ParseError> {
        let Tag {
            name: raw_tag_name,
            attrs,
            self_closing,
            doctype,
            ..
        } = tag;
        let lower_tag_name = raw_tag_name.to_lowercase();
        parser.advance();

        let id = parser.next_node_id();
        let mut preserve_whitespace = preserve_whitespace;

        let kind = if lower_tag_name.starts_with(tables::COMPONENT_PREFIX) {
            let name = camel_case(&raw_tag_name[tables::COMPONENT_PREFIX.len()..]);
            let attributes = attrs
                .into_iter()
                .map(|attr| build_component_attribute(parser, attr))
                .collect::<Result<Vec<_>, _>>()?;
            ElementKind::Component(Component { name, attributes })
        } else {
            preserve_whitespace =
                preserve_whitespace || lower_tag_name == tables::PRESERVE_WHITESPACE_TAG;
            ElementKind::Html(build_html(&lower_tag_name, attrs, span, parser)?)
        };

        let is_void = tables::is_void_element(&lower_tag_name);
        let sibling_close_set = tables::sibling_close_set(&lower_tag_name);

        let mut element = ElementNode {
            id,
            raw_tag_name,
            lower_tag_name,
            kind,
            doctype,
            self_closing,
            is_void,
            sibling_close_set,
            children: None,
        };

        if self_closing || is_void {
            log::trace!(target: "stache.parser", "built <{}/>", element.lower_tag_name);
            return Ok(element);
        }

        log::trace!(target: "stache.parser", "open <{}>", element.lower_tag_name);
        let mut children = element.collect_children(parser, preserve_whitespace)?;

        if !preserve_whitespace {
            trim_boundary_whitespace(&mut children);
        }

        element.children = Some(children);
        Ok(element)
    }

    fn collect_children(
        &self,
        parser: &mut Parser,
        preserve_whitespace: bool,
    ) -> Result<Vec<Item>, ParseError> {
        let mut children = Vec::new();

        while let Some(token) = parser.peek() {
            let step = match &token.kind {
                TokenKind::Mustache { .. } if token.is_closing_mustache() => {
                    log::debug!(
                        target: "stache.parser",
                        "<{}> closed by end of section at line {}",
                        self.lower_tag_name,
                        token.span.line
                    );
                    Step::Yield
                }
                TokenKind::Tag(next) if next.closing => {
                    if next.name.to_lowercase() == self.lower_tag_name {
                        Step::Close
                    } else {
                        log::debug!(
                            target: "stache.parser",
                            "<{}> closed by </{}> at line {}",
                            self.lower_tag_name,
                            next.name,
                            token.span.line
                        );
                        Step::Yield
                    }
                }
                TokenKind::Tag(next) if self.closed_by_sibling(&next.name) => {
                    log::debug!(
                        target: "stache.parser",
                        "<{}> closed by sibling <{}> at line {}",
                        self.lower_tag_name,
                        next.name,
                        token.span.line
                    );
                    Step::Yield
                }
                _ => Step::Child,
            };

            match step {
                Step::Close => {
                    parser.advance();
                    log::trace!(target: "stache.parser", "close </{}>", self.lower_tag_name);
                    break;
                }
                Step::Yield => break,
                Step::Child => {
                    if let Some(item) = parser.get_item(preserve_whitespace)? {
                        children.push(item);
                    }
                }
            }
        }

        Ok(children)
    }

    /// Whether an opening tag with this name implicitly closes the element.
    fn closed_by_sibling(&self, name: &str) -> bool {
        self.sibling_close_set
            .is_some_and(|set| set.contains(&name.to_lowercase().as_str()))
    }
}

/// Resolve the tag, classify the attributes and parse the directives of a
/// plain HTML element.
fn build_html(
    lower_tag_name: &str,
    attrs: Vec<RawAttribute>,
    span: Span,
    parser: &mut Parser,
) -> Result<HtmlElement, ParseError> {
    let tag = tables::svg_element_name(lower_tag_name)
        .unwrap_or(lower_tag_name)
        .to_string();

    let classified = classify_attributes(attrs, span)?;

    let mut plain = classified.attrs;
    if parser.options().sanitize_event_attributes {
        plain.retain(|attr| {
            let keep = !is_event_attribute(&attr.name);
            if !keep {
                log::debug!(target: "stache.parser", "sanitized {} on <{tag}>", attr.name);
            }
            keep
        });
    }

    let attributes = plain
        .into_iter()
        .map(|attr| build_html_attribute(parser, attr))
        .collect::<Result<Vec<_>, _>>()?;

    let proxies = classified
        .proxies
        .into_iter()
        .map(|proxy| parse_directive(parser, proxy, span))
        .collect::<Result<Vec<_>, _>>()?;

    let intro = classified
        .intro
        .map(|intro| parse_directive(parser, intro, span))
        .transpose()?;

    let outro = classified
        .outro
        .map(|outro| parse_directive(parser, outro, span))
        .transpose()?;

    let decorator = classified
        .decorator
        .map(|decorator| decorator_value(decorator, span))
        .transpose()?
        .flatten();

    Ok(HtmlElement {
        tag,
        attributes,
        proxies,
        intro,
        outro,
        decorator,
    })
}

/// A decorator takes the literal text of its first value token. A value
/// that starts with a mustache names no decorator.
fn decorator_value(decorator: RawAttribute, span: Span) -> Result<Option<String>, ParseError> {
    let first = decorator
        .value
        .as_deref()
        .and_then(<[_]>::first)
        .ok_or_else(|| ParseError::illegal_directive("Illegal decorator", span))?;

    let name = first.as_text().map(str::to_string);
    if name.is_none() {
        log::debug!(
            target: "stache.parser",
            "ignoring dynamic decorator at line {}",
            span.line
        );
    }
    Ok(name)
}

/// `my-widget` → `myWidget`.
fn camel_case(hyphenated: &str) -> String {
    let mut out = String::with_capacity(hyphenated.len());
    let mut chars = hyphenated.chars().peekable();

    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(next) if ch == '-' && next.is_ascii_alphabetic() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DirectiveName, Template};
    use crate::{ParseErrorKind, ParserOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stache_lexer::MustacheKind;

    fn parse(source: &str) -> Template {
        Parser::parse(source, ParserOptions::default()).unwrap()
    }

    fn first_element(template: &Template) -> &ElementNode {
        template.items[0].as_element().expect("expected an element")
    }

    fn html(element: &ElementNode) -> &HtmlElement {
        element.html().expect("expected an HTML element")
    }

    // =========================================================================
    // Tags
    // =========================================================================

    #[test]
    fn test_simple_element() {
        let template = parse("<div>hello</div>");
        let div = first_element(&template);
        assert_eq!(div.tag(), "div");
        assert_eq!(div.children(), &[Item::Text("hello".into())]);
        assert!(!div.is_component());
    }

    #[test]
    fn test_tag_is_lower_cased() {
        let template = parse("<DIV>x</Div>");
        let div = first_element(&template);
        assert_eq!(div.raw_tag_name, "DIV");
        assert_eq!(div.lower_tag_name, "div");
        assert_eq!(div.tag(), "div");
        assert_eq!(template.items.len(), 1);
    }

    #[test]
    fn test_svg_tag_casing() {
        let template = parse("<svg><linearGradient></LINEARGRADIENT></svg>");
        let svg = first_element(&template);
        let gradient = svg.children()[0].as_element().unwrap();
        assert_eq!(gradient.tag(), "linearGradient");
        assert_eq!(gradient.lower_tag_name, "lineargradient");
    }

    #[test]
    fn test_nested_elements() {
        let template = parse("<ul><li>a</li><li>b</li></ul>");
        let ul = first_element(&template);
        assert_eq!(ul.children().len(), 2);
        assert!(ul.children().iter().all(|c| c.as_element().is_some()));
    }

    // =========================================================================
    // Void and self-closing
    // =========================================================================

    #[test]
    fn test_void_elements_have_no_children() {
        for tag in tables::VOID_ELEMENTS {
            let template = parse(&format!("<div><{tag}>after</div>"));
            let div = first_element(&template);
            let void = div.children()[0].as_element().unwrap();
            assert!(void.is_void, "{tag} should be void");
            assert_eq!(void.children, None, "{tag} should have no children");
            assert_eq!(div.children()[1], Item::Text("after".into()));
        }
    }

    #[test]
    fn test_self_closing_has_no_children() {
        let template = parse("<div/>text");
        let div = first_element(&template);
        assert!(div.self_closing);
        assert!(!div.is_void);
        assert_eq!(div.children, None);
        assert_eq!(template.items[1], Item::Text("text".into()));
    }

    #[test]
    fn test_doctype_does_not_swallow_document() {
        let template = parse("<!DOCTYPE html><html></html>");
        let doctype = first_element(&template);
        assert!(doctype.doctype);
        assert!(doctype.is_void);
        assert_eq!(template.items.len(), 2);
    }

    // =========================================================================
    // Implicit closing
    // =========================================================================

    #[test]
    fn test_sibling_li_closes_previous() {
        let template = parse("<li>one<li>two");
        assert_eq!(template.items.len(), 2);
        let first = template.items[0].as_element().unwrap();
        let second = template.items[1].as_element().unwrap();
        assert_eq!(first.children(), &[Item::Text("one".into())]);
        assert_eq!(second.children(), &[Item::Text("two".into())]);
    }

    #[test]
    fn test_sibling_close_is_case_insensitive() {
        let template = parse("<ul><li>one<LI>two</ul>");
        let ul = first_element(&template);
        assert_eq!(ul.children().len(), 2);
    }

    #[test]
    fn test_paragraph_closed_by_block() {
        let template = parse("<p>intro<div>block</div>");
        assert_eq!(template.items.len(), 2);
        assert_eq!(first_element(&template).tag(), "p");
        assert_eq!(template.items[1].as_element().unwrap().tag(), "div");
    }

    #[test]
    fn test_table_cells() {
        let template = parse("<table><tr><td>a<td>b</tr><tr><td>c</table>");
        let table = first_element(&template);
        let rows: Vec<_> = table.children().iter().filter_map(Item::as_element).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].children().len(), 2);
        assert_eq!(rows[1].children().len(), 1);
    }

    #[test]
    fn test_ancestor_close_tag_is_not_consumed() {
        let template = parse("<div><span>text</div>after");
        let div = first_element(&template);
        let span = div.children()[0].as_element().unwrap();
        assert_eq!(span.children(), &[Item::Text("text".into())]);
        assert_eq!(template.items[1], Item::Text("after".into()));
    }

    #[test]
    fn test_unterminated_element_is_tolerated() {
        let template = parse("<div><span>text");
        let div = first_element(&template);
        assert_eq!(div.children().len(), 1);
    }

    #[test]
    fn test_section_end_closes_element() {
        let template = parse("{{#items}}<li>{{name}}{{/items}}");
        let Item::Section(section) = &template.items[0] else {
            panic!("expected section");
        };
        let li = section.items[0].as_element().unwrap();
        assert_eq!(
            li.children(),
            &[Item::Mustache {
                kind: MustacheKind::Interpolator,
                reference: "name".into(),
            }]
        );
    }

    // =========================================================================
    // Whitespace
    // =========================================================================

    #[test]
    fn test_boundary_whitespace_is_trimmed() {
        let template = parse("<div>\n  text  \n</div>");
        assert_eq!(
            first_element(&template).children(),
            &[Item::Text("text".into())]
        );
    }

    #[test]
    fn test_pre_preserves_whitespace() {
        let template = parse("<pre>\n  text  \n</pre>");
        assert_eq!(
            first_element(&template).children(),
            &[Item::Text("\n  text  \n".into())]
        );
    }

    #[test]
    fn test_pre_is_inherited_by_descendants() {
        let template = parse("<pre><b>  a  </b></pre>");
        let pre = first_element(&template);
        let b = pre.children()[0].as_element().unwrap();
        assert_eq!(b.children(), &[Item::Text("  a  ".into())]);
    }

    #[test]
    fn test_whitespace_only_children_are_dropped() {
        let template = parse("<div>   </div>");
        assert_eq!(first_element(&template).children(), &[] as &[Item]);
    }

    #[test]
    fn test_trim_only_touches_boundaries() {
        let template = parse("<div> <b>a</b> <i>b</i> </div>");
        let div = first_element(&template);
        assert_eq!(div.children().len(), 3);
        assert_eq!(div.children()[1], Item::Text(" ".into()));
    }

    // =========================================================================
    // Attributes and directives
    // =========================================================================

    #[test]
    fn test_attributes_are_built() {
        let template = parse("<input type=\"checkbox\" CHECKED>");
        let input = html(first_element(&template));
        assert_eq!(input.attributes.len(), 2);
        assert_eq!(input.attributes[0].name, "type");
        assert_eq!(
            input.attributes[0].value.as_ref().unwrap().items,
            vec![Item::Text("checkbox".into())]
        );
        assert_eq!(input.attributes[1].name, "checked");
        assert_eq!(input.attributes[1].value, None);
    }

    #[test]
    fn test_duplicate_attributes_build_fine() {
        let template = parse("<div a=\"1\" a=\"2\"></div>");
        assert_eq!(html(first_element(&template)).attributes.len(), 2);
    }

    #[test]
    fn test_proxy_directive() {
        let template = parse("<li proxy-click=\"select:{{id}}\"></li>");
        let li = html(first_element(&template));
        assert_eq!(li.proxies.len(), 1);
        let proxy = &li.proxies[0];
        assert_eq!(proxy.directive_type, "click");
        assert_eq!(proxy.name, DirectiveName::Static("select".into()));
        assert_eq!(proxy.args, None);
        assert_eq!(
            proxy.dynamic_args.as_ref().unwrap().items,
            vec![Item::Mustache {
                kind: MustacheKind::Interpolator,
                reference: "id".into(),
            }]
        );
        assert!(li.attributes.is_empty());
    }

    #[test]
    fn test_proxy_json_args() {
        let template = parse("<div proxy-foo=\"bar:[1,2,3]\"></div>");
        let proxy = &html(first_element(&template)).proxies[0];
        assert_eq!(proxy.name, DirectiveName::Static("bar".into()));
        assert_eq!(proxy.args, Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_intro_outro_fills_both_slots() {
        let template = parse("<div intro-outro=\"fade:{{speed}}\"></div>");
        let div = html(first_element(&template));
        let intro = div.intro.as_ref().unwrap();
        let outro = div.outro.as_ref().unwrap();

        assert_eq!(intro, outro);
        assert_eq!(intro.directive_type, "intro-outro");
        assert_eq!(intro.name, DirectiveName::Static("fade".into()));
        assert_eq!(
            outro.dynamic_args.as_ref().map(|f| f.items.clone()),
            Some(vec![Item::Mustache {
                kind: MustacheKind::Interpolator,
                reference: "speed".into(),
            }])
        );
    }

    #[test]
    fn test_duplicate_intro_fails_at_build() {
        let err = Parser::parse("<div intro=\"a\" intro=\"b\"></div>", ParserOptions::default())
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Structural);
    }

    #[test]
    fn test_decorator() {
        let template = parse("<div decorator=\"tooltip\"></div>");
        assert_eq!(
            html(first_element(&template)).decorator.as_deref(),
            Some("tooltip")
        );
    }

    #[test]
    fn test_second_decorator_wins_without_error() {
        let template = parse("<div decorator=\"a\" decorator=\"b\"></div>");
        assert_eq!(
            html(first_element(&template)).decorator.as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_decorator_without_value_is_illegal() {
        for source in ["<div decorator></div>", "<div decorator=\"\"></div>"] {
            let err = Parser::parse(source, ParserOptions::default()).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::IllegalDirective, "{source}");
        }
    }

    #[test]
    fn test_dynamic_decorator_is_dropped() {
        let template = parse("<div decorator=\"{{tip}}\">x</div>");
        let div = first_element(&template);
        assert_eq!(html(div).decorator, None);
        assert_eq!(div.children(), &[Item::Text("x".into())]);
    }

    #[test]
    fn test_proxy_without_value_is_illegal() {
        let err = Parser::parse("<div on-click></div>", ParserOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalDirective);
    }

    #[test]
    fn test_sanitize_event_attributes() {
        let options = ParserOptions {
            sanitize_event_attributes: true,
            ..ParserOptions::default()
        };
        let template = Parser::parse(
            "<a onclick=\"steal()\" on-click=\"select\" href=\"/\">x</a>",
            options,
        )
        .unwrap();
        let a = html(first_element(&template));
        assert_eq!(a.attributes.len(), 1);
        assert_eq!(a.attributes[0].name, "href");
        assert_eq!(a.proxies.len(), 1);
    }

    #[test]
    fn test_event_attributes_kept_without_sanitize() {
        let template = parse("<a onclick=\"go()\">x</a>");
        assert_eq!(html(first_element(&template)).attributes[0].name, "onclick");
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn test_component() {
        let template = parse("<rv-my-widget Title=\"hi\" on-click=\"go\">body</rv-my-widget>");
        let widget = first_element(&template);
        assert!(widget.is_component());
        assert_eq!(widget.tag(), "myWidget");
        let ElementKind::Component(component) = &widget.kind else {
            panic!("expected component");
        };
        assert_eq!(component.attributes.len(), 2);
        assert_eq!(component.attributes[0].name, "Title");
        assert_eq!(component.attributes[1].name, "on-click");
        assert_eq!(widget.children(), &[Item::Text("body".into())]);
    }

    #[test]
    fn test_component_skips_classification() {
        let template = parse("<rv-box intro=\"a\" intro=\"b\"/>");
        assert!(first_element(&template).is_component());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("my-widget"), "myWidget");
        assert_eq!(camel_case("a-b-c"), "aBC");
        assert_eq!(camel_case("plain"), "plain");
        assert_eq!(camel_case("trailing-"), "trailing-");
    }
}
