//! Node tree for Stache templates.
//!
//! Nodes are plain owned values: an element owns its children, a template
//! owns its top-level items. Nothing is mutated once a builder returns, so
//! serializers can cache their output per [`NodeId`].

use serde_json::Value;
use stache_lexer::MustacheKind;

/// Identity of an element. Serializer memo tables key on it.
///
/// `parse` differs between any two `Parser` runs in the process, so ids from
/// different templates never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub parse: usize,
    pub index: usize,
}

/// A complete parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub items: Vec<Item>,
}

/// Any node that can appear in a child list.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A run of literal text.
    Text(String),

    /// `{{name}}` or `{{{name}}}`.
    Mustache {
        kind: MustacheKind,
        reference: String,
    },

    /// `{{#name}}...{{/name}}` or `{{^name}}...{{/name}}`.
    Section(Section),

    /// `{{>name}}`
    Partial(String),

    /// An HTML comment (delimiters stripped).
    Comment(String),

    /// An HTML element or a component.
    Element(ElementNode),
}

/// A (possibly inverted) section block.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub reference: String,
    pub inverted: bool,
    pub items: Vec<Item>,
}

/// An embeddable sequence of items built from a token run, such as an
/// attribute value or a dynamic directive argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub items: Vec<Item>,
}

/// An element built from an opening tag and everything up to its close.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub id: NodeId,
    /// The tag name as written.
    pub raw_tag_name: String,
    /// Lower-cased tag name; all matching uses this.
    pub lower_tag_name: String,
    pub kind: ElementKind,
    pub doctype: bool,
    pub self_closing: bool,
    pub is_void: bool,
    /// Tags whose opening implicitly closes this element.
    pub sibling_close_set: Option<&'static [&'static str]>,
    /// `None` for void and self-closing elements.
    pub children: Option<Vec<Item>>,
}

/// Custom component or plain HTML element, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Component(Component),
    Html(HtmlElement),
}

/// A custom component (`<rv-widget>`). Attributes are kept unclassified.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Camel-cased name with the `rv-` prefix removed.
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// A plain HTML (or SVG) element with its directives split out.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    /// Lower-cased tag, or the case-sensitive SVG form.
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub proxies: Vec<Directive>,
    pub intro: Option<Directive>,
    pub outro: Option<Directive>,
    pub decorator: Option<String>,
}

/// A plain attribute. `value == None` marks a boolean attribute (`checked`).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<Fragment>,
}

/// A parsed behavioural attribute: `on-click="select:{{id}}"` gives
/// type `click`, name `select` and dynamic arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub directive_type: String,
    pub name: DirectiveName,
    /// Static arguments, JSON-parsed when possible.
    pub args: Option<Value>,
    /// Arguments containing mustaches or spanning several tokens.
    pub dynamic_args: Option<Fragment>,
}

/// A directive name is literal text unless it contains mustaches.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveName {
    Static(String),
    Dynamic(Fragment),
}

impl ElementNode {
    pub fn is_component(&self) -> bool {
        matches!(self.kind, ElementKind::Component(_))
    }

    /// Component name or resolved HTML tag.
    pub fn tag(&self) -> &str {
        match &self.kind {
            ElementKind::Component(component) => &component.name,
            ElementKind::Html(html) => &html.tag,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            ElementKind::Component(component) => &component.attributes,
            ElementKind::Html(html) => &html.attributes,
        }
    }

    pub fn html(&self) -> Option<&HtmlElement> {
        match &self.kind {
            ElementKind::Html(html) => Some(html),
            ElementKind::Component(_) => None,
        }
    }

    /// Children, or an empty slice for void and self-closing elements.
    pub fn children(&self) -> &[Item] {
        self.children.as_deref().unwrap_or(&[])
    }
}

impl Item {
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Item::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Item::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Fragment {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}
