//! Markup form.
//!
//! A static subtree can be emitted as literal markup and inserted by the
//! renderer in one go. Anything that needs runtime wiring makes the whole
//! subtree ineligible, and the lowering returns `None`:
//!
//! - components, and tags outside the plain-HTML whitelist (SVG included);
//! - event proxies, intro or outro transitions;
//! - `id`, `intro`, `outro` and namespaced (`xlink:href`) attributes;
//! - any mustache, section or partial, in the children or in an attribute.

use crate::Serializer;
use stache_parser::tables;
use stache_parser::{ElementKind, ElementNode, Item};

impl Serializer {
    /// Markup for an element, or `None` if the subtree is not static.
    pub fn element_markup(&mut self, node: &ElementNode) -> Option<String> {
        if let Some(cached) = self.markup_memo.get(&node.id) {
            return cached.clone();
        }

        let markup = self.render_element(node);
        self.markup_memo.insert(node.id, markup.clone());
        markup
    }

    /// Concatenated markup of a child list, or `None` if any item is not
    /// static. An empty list is the empty string.
    pub fn items_markup(&mut self, items: &[Item]) -> Option<String> {
        let mut out = String::new();
        for item in items {
            out.push_str(&self.item_markup(item)?);
        }
        Some(out)
    }

    pub fn item_markup(&mut self, item: &Item) -> Option<String> {
        match item {
            Item::Text(text) => Some(text.clone()),
            Item::Comment(text) => Some(format!("<!--{text}-->")),
            Item::Element(element) => self.element_markup(element),
            Item::Mustache { .. } | Item::Section(_) | Item::Partial(_) => None,
        }
    }

    fn render_element(&mut self, node: &ElementNode) -> Option<String> {
        let html = match &node.kind {
            ElementKind::Component(component) => {
                return ineligible(node, &format!("component {}", component.name));
            }
            ElementKind::Html(html) => html,
        };

        if !tables::is_html_element(&node.lower_tag_name) {
            return ineligible(node, "not a plain HTML element");
        }

        if !html.proxies.is_empty() || html.intro.is_some() || html.outro.is_some() {
            return ineligible(node, "has proxies or transitions");
        }

        let Some(children) = self.items_markup(node.children()) else {
            return ineligible(node, "dynamic children");
        };

        let mut out = format!("<{}", html.tag);
        let mut ends_unquoted = false;

        for attribute in &html.attributes {
            let name = attribute.name.as_str();
            if name.contains(':') || matches!(name, "id" | "intro" | "outro") {
                return ineligible(node, &format!("attribute {name}"));
            }

            out.push(' ');
            out.push_str(name);
            ends_unquoted = false;

            let Some(fragment) = &attribute.value else {
                continue;
            };
            let Some(value) = self.items_markup(&fragment.items) else {
                return ineligible(node, &format!("dynamic attribute {name}"));
            };
            if value.is_empty() {
                continue;
            }

            out.push('=');
            if needs_quotes(&value) {
                out.push('"');
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            } else {
                out.push_str(&value);
                ends_unquoted = true;
            }
        }

        if node.is_void {
            out.push('>');
        } else if node.self_closing {
            // `<div title=a/>` would read back as `title="a/"`
            if ends_unquoted {
                out.push(' ');
            }
            out.push_str("/>");
        } else {
            out.push('>');
            out.push_str(&children);
            out.push_str(&format!("</{}>", html.tag));
        }

        Some(out)
    }
}

/// Attribute values containing whitespace, quotes, `=`, `<`, `>` or a backtick
/// must be quoted.
fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`'))
}

fn ineligible(node: &ElementNode, reason: &str) -> Option<String> {
    log::trace!(
        target: "stache.codegen",
        "<{}> ({:?}) not stringifiable: {reason}",
        node.lower_tag_name,
        node.id
    );
    None
}
