//! Structured form.
//!
//! Every node lowers to a compact keyed object:
//!
//! ```text
//! <div class="a" on-click="go">{{x}}</div>
//!   → {"t": 7, "e": "div", "a": {"class": "a"}, "f": [{"t": 2, "r": "x"}], "v": {"click": "go"}}
//! ```
//!
//! | key  | meaning                                 |
//! |------|-----------------------------------------|
//! | `t`  | node type code                          |
//! | `e`  | tag or component name                   |
//! | `y`  | `1` for a doctype                       |
//! | `a`  | attributes                              |
//! | `f`  | children (or markup, when static)       |
//! | `v`  | event proxies by event type             |
//! | `t1` | intro transition                        |
//! | `t2` | outro transition                        |
//! | `o`  | decorator                               |

use crate::{types, CodegenError, Serializer};
use serde_json::{Map, Value};
use stache_lexer::MustacheKind;
use stache_parser::{Directive, DirectiveName, ElementKind, ElementNode, Fragment, Item};

impl Serializer {
    /// Structured form of an element and its subtree.
    ///
    /// With `no_stringify`, child lists are always emitted as arrays even
    /// when they could collapse to markup.
    pub fn element_json(
        &mut self,
        node: &ElementNode,
        no_stringify: bool,
    ) -> Result<Value, CodegenError> {
        if let Some(cached) = self.json_memo.get(&(node.id, no_stringify)) {
            return Ok(cached.clone());
        }

        let mut json = Map::new();
        let type_code = match node.kind {
            ElementKind::Component(_) => types::COMPONENT,
            ElementKind::Html(_) => types::ELEMENT,
        };
        json.insert("t".into(), type_code.into());
        json.insert("e".into(), node.tag().into());

        if node.doctype {
            json.insert("y".into(), 1.into());
        }

        if !node.attributes().is_empty() {
            let mut attributes = Map::new();
            for attribute in node.attributes() {
                if attributes.contains_key(&attribute.name) {
                    return Err(CodegenError::new(
                        "You cannot have multiple attributes with the same name",
                    ));
                }
                let value = match &attribute.value {
                    Some(fragment) => self.items_json(&fragment.items, no_stringify)?,
                    None => Value::Null,
                };
                attributes.insert(attribute.name.clone(), value);
            }
            json.insert("a".into(), Value::Object(attributes));
        }

        if !node.children().is_empty() {
            let children = self.items_json(node.children(), no_stringify)?;
            json.insert("f".into(), children);
        }

        if let ElementKind::Html(html) = &node.kind {
            if !html.proxies.is_empty() {
                let mut proxies = Map::new();
                for proxy in &html.proxies {
                    let value = self.directive_json(proxy)?;
                    proxies.insert(proxy.directive_type.clone(), value);
                }
                json.insert("v".into(), Value::Object(proxies));
            }

            if let Some(intro) = &html.intro {
                json.insert("t1".into(), self.directive_json(intro)?);
            }

            if let Some(outro) = &html.outro {
                json.insert("t2".into(), self.directive_json(outro)?);
            }

            if let Some(decorator) = &html.decorator {
                json.insert("o".into(), decorator.as_str().into());
            }
        }

        let json = Value::Object(json);
        self.json_memo.insert((node.id, no_stringify), json.clone());
        Ok(json)
    }

    /// Structured form of a directive.
    ///
    /// A static name without arguments collapses to the bare name. Static
    /// arguments take precedence over dynamic ones. Any parsed argument is
    /// kept, so `go:0`, `go:false`, `go:null` and `go:""` all emit `"a"`.
    pub fn directive_json(&mut self, directive: &Directive) -> Result<Value, CodegenError> {
        let name = match &directive.name {
            DirectiveName::Static(name)
                if directive.args.is_none() && directive.dynamic_args.is_none() =>
            {
                return Ok(name.as_str().into());
            }
            DirectiveName::Static(name) => name.as_str().into(),
            DirectiveName::Dynamic(fragment) => self.fragment_json(fragment)?,
        };

        let mut json = Map::new();
        json.insert("n".into(), name);

        if let Some(args) = &directive.args {
            json.insert("a".into(), args.clone());
        } else if let Some(dynamic_args) = &directive.dynamic_args {
            json.insert("d".into(), self.fragment_json(dynamic_args)?);
        }

        Ok(Value::Object(json))
    }

    /// Structured form of a child list: a single markup string when the
    /// whole list is static and `no_stringify` is off, otherwise an array.
    pub fn items_json(&mut self, items: &[Item], no_stringify: bool) -> Result<Value, CodegenError> {
        if !no_stringify {
            if let Some(markup) = self.items_markup(items) {
                return Ok(Value::String(markup));
            }
        }

        items
            .iter()
            .map(|item| self.item_json(item, no_stringify))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    /// Structured form of a single item.
    pub fn item_json(&mut self, item: &Item, no_stringify: bool) -> Result<Value, CodegenError> {
        let json = match item {
            Item::Text(text) => Value::String(text.clone()),

            Item::Mustache { kind, reference } => {
                let type_code = match kind {
                    MustacheKind::Triple => types::TRIPLE,
                    _ => types::INTERPOLATOR,
                };
                reference_json(type_code, reference)
            }

            Item::Section(section) => {
                let mut json = Map::new();
                json.insert("t".into(), types::SECTION.into());
                json.insert("r".into(), section.reference.as_str().into());
                if section.inverted {
                    json.insert("n".into(), 1.into());
                }
                if !section.items.is_empty() {
                    json.insert("f".into(), self.items_json(&section.items, no_stringify)?);
                }
                Value::Object(json)
            }

            Item::Partial(name) => reference_json(types::PARTIAL, name),

            Item::Comment(text) => {
                let mut json = Map::new();
                json.insert("t".into(), types::COMMENT.into());
                json.insert("f".into(), text.as_str().into());
                Value::Object(json)
            }

            Item::Element(element) => self.element_json(element, no_stringify)?,
        };

        Ok(json)
    }

    /// Fragments embedded in directives are always serialized in
    /// stringifying mode.
    fn fragment_json(&mut self, fragment: &Fragment) -> Result<Value, CodegenError> {
        self.items_json(&fragment.items, false)
    }
}

fn reference_json(type_code: u8, reference: &str) -> Value {
    let mut json = Map::new();
    json.insert("t".into(), type_code.into());
    json.insert("r".into(), reference.into());
    Value::Object(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stache_parser::{Parser, ParserOptions, Template};

    fn parse(source: &str) -> Template {
        Parser::parse(source, ParserOptions::default()).unwrap()
    }

    fn first_json(source: &str, no_stringify: bool) -> Value {
        let template = parse(source);
        let element = template.items[0].as_element().unwrap();
        Serializer::new().element_json(element, no_stringify).unwrap()
    }

    // =========================================================================
    // Elements
    // =========================================================================

    #[test]
    fn test_empty_element() {
        assert_eq!(first_json("<div></div>", false), json!({"t": 7, "e": "div"}));
    }

    #[test]
    fn test_static_children_collapse() {
        assert_eq!(
            first_json("<div><b>bold</b> text</div>", false),
            json!({"t": 7, "e": "div", "f": "<b>bold</b> text"})
        );
    }

    #[test]
    fn test_no_stringify_keeps_arrays() {
        assert_eq!(
            first_json("<div><b>bold</b> text</div>", true),
            json!({
                "t": 7,
                "e": "div",
                "f": [{"t": 7, "e": "b", "f": ["bold"]}, " text"]
            })
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            first_json("<input type=\"text\" value=\"{{name}}\" disabled>", false),
            json!({
                "t": 7,
                "e": "input",
                "a": {
                    "type": "text",
                    "value": [{"t": 2, "r": "name"}],
                    "disabled": null
                }
            })
        );
    }

    #[test]
    fn test_doctype() {
        assert_eq!(
            first_json("<!DOCTYPE html>", false),
            json!({"t": 7, "e": "doctype", "y": 1, "a": {"html": null}})
        );
    }

    #[test]
    fn test_component() {
        assert_eq!(
            first_json("<rv-user-card user=\"{{u}}\"/>", false),
            json!({
                "t": 15,
                "e": "userCard",
                "a": {"user": [{"t": 2, "r": "u"}]}
            })
        );
    }

    #[test]
    fn test_svg_keeps_case() {
        assert_eq!(
            first_json("<svg viewbox=\"0 0 10 10\"><clippath/></svg>", true),
            json!({
                "t": 7,
                "e": "svg",
                "a": {"viewBox": ["0 0 10 10"]},
                "f": [{"t": 7, "e": "clipPath"}]
            })
        );
    }

    #[test]
    fn test_duplicate_attributes_fail() {
        let template = parse("<div a=\"1\" a=\"2\"></div>");
        let element = template.items[0].as_element().unwrap();
        let err = Serializer::new().element_json(element, false).unwrap_err();
        assert!(err.message.contains("multiple attributes with the same name"));
    }

    #[test]
    fn test_memoized_per_mode() {
        let template = parse("<div><b>x</b></div>");
        let element = template.items[0].as_element().unwrap();
        let mut serializer = Serializer::new();
        let stringified = serializer.element_json(element, false).unwrap();
        let structured = serializer.element_json(element, true).unwrap();
        assert_ne!(stringified, structured);
        assert_eq!(serializer.element_json(element, false).unwrap(), stringified);
        assert_eq!(serializer.json_memo.len(), 3);
    }

    // =========================================================================
    // Directives
    // =========================================================================

    #[test]
    fn test_bare_proxy() {
        assert_eq!(
            first_json("<button on-click=\"save\">Save</button>", false),
            json!({"t": 7, "e": "button", "f": "Save", "v": {"click": "save"}})
        );
    }

    #[test]
    fn test_proxy_with_args() {
        assert_eq!(
            first_json("<div proxy-foo=\"bar:[1,2,3]\"></div>", false),
            json!({"t": 7, "e": "div", "v": {"foo": {"n": "bar", "a": [1, 2, 3]}}})
        );
    }

    #[test]
    fn test_proxy_with_dynamic_args() {
        assert_eq!(
            first_json("<li proxy-click=\"select:{{id}}\"></li>", false),
            json!({
                "t": 7,
                "e": "li",
                "v": {"click": {"n": "select", "d": [{"t": 2, "r": "id"}]}}
            })
        );
    }

    #[test]
    fn test_dynamic_proxy_name() {
        assert_eq!(
            first_json("<a on-click=\"{{handler}}\"></a>", false),
            json!({
                "t": 7,
                "e": "a",
                "v": {"click": {"n": [{"t": 2, "r": "handler"}]}}
            })
        );
    }

    #[test]
    fn test_zero_args_are_kept() {
        assert_eq!(
            first_json("<a on-click=\"go:0\"></a>", false),
            json!({"t": 7, "e": "a", "v": {"click": {"n": "go", "a": 0}}})
        );
    }

    #[test]
    fn test_falsy_args_are_kept() {
        for (source, args) in [
            ("<a on-click=\"go:false\"></a>", json!(false)),
            ("<a on-click=\"go:null\"></a>", json!(null)),
            ("<a on-click='go:\"\"'></a>", json!("")),
        ] {
            assert_eq!(
                first_json(source, false),
                json!({"t": 7, "e": "a", "v": {"click": {"n": "go", "a": args}}}),
                "{source}"
            );
        }
    }

    #[test]
    fn test_same_proxy_type_last_wins() {
        assert_eq!(
            first_json("<a on-click=\"first\" proxy-click=\"second\"></a>", false),
            json!({"t": 7, "e": "a", "v": {"click": "second"}})
        );
    }

    #[test]
    fn test_transitions_and_decorator() {
        assert_eq!(
            first_json(
                "<div intro='fade:{\"delay\":1}' outro=\"fly\" decorator=\"tip\"></div>",
                false
            ),
            json!({
                "t": 7,
                "e": "div",
                "t1": {"n": "fade", "a": {"delay": 1}},
                "t2": "fly",
                "o": "tip"
            })
        );
    }

    #[test]
    fn test_intro_outro_with_dynamic_args() {
        assert_eq!(
            first_json("<div intro-outro=\"fade:{{x}}\"></div>", false),
            json!({
                "t": 7,
                "e": "div",
                "t1": {"n": "fade", "d": [{"t": 2, "r": "x"}]},
                "t2": {"n": "fade", "d": [{"t": 2, "r": "x"}]}
            })
        );
    }

    #[test]
    fn test_intro_outro() {
        assert_eq!(
            first_json("<div intro-outro=\"slide\"></div>", false),
            json!({"t": 7, "e": "div", "t1": "slide", "t2": "slide"})
        );
    }

    // =========================================================================
    // Items
    // =========================================================================

    #[test]
    fn test_item_forms() {
        let template = parse("{{a}}{{{b}}}{{>row}}<!-- note -->{{^empty}}none{{/empty}}");
        let json = Serializer::new().items_json(&template.items, false).unwrap();
        assert_eq!(
            json,
            json!([
                {"t": 2, "r": "a"},
                {"t": 3, "r": "b"},
                {"t": 8, "r": "row"},
                {"t": 9, "f": " note "},
                {"t": 4, "r": "empty", "n": 1, "f": "none"}
            ])
        );
    }

    #[test]
    fn test_empty_section_has_no_children() {
        let template = parse("{{#list}}{{/list}}");
        let json = Serializer::new().items_json(&template.items, false).unwrap();
        assert_eq!(json, json!([{"t": 4, "r": "list"}]));
    }
}
