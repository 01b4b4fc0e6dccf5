//! Stache Code Generator
//!
//! Lowers a parsed template to its structured (JSON) form. Wherever a
//! subtree is fully static, the structured form embeds plain markup instead,
//! which a renderer can insert directly.
//!
//! ```text
//! Template → compile() → serde_json::Value
//!                ├─ json.rs    structured form of every node
//!                └─ markup.rs  literal markup for static subtrees
//! ```
//!
//! Both forms are computed lazily and cached per element in a [`Serializer`].

pub mod json;
pub mod markup;

use serde_json::Value;
use stache_parser::{NodeId, Template};
use std::collections::HashMap;

/// Node type codes used in the structured form.
pub mod types {
    pub const INTERPOLATOR: u8 = 2;
    pub const TRIPLE: u8 = 3;
    pub const SECTION: u8 = 4;
    pub const ELEMENT: u8 = 7;
    pub const PARTIAL: u8 = 8;
    pub const COMMENT: u8 = 9;
    pub const COMPONENT: u8 = 15;
}

/// Code generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Codegen error: {message}")]
pub struct CodegenError {
    pub message: String,
}

impl CodegenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Serializer state shared by the structured and markup lowerings.
///
/// Results are memoized per element, so a node's markup is computed once even
/// though both its own structured form and its parent's child list ask for it.
/// Node ids carry their parse, so one serializer may be reused across
/// templates.
#[derive(Debug, Default)]
pub struct Serializer {
    json_memo: HashMap<(NodeId, bool), Value>,
    markup_memo: HashMap<NodeId, Option<String>>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compile a template into its structured form.
///
/// Static runs of the top-level item list collapse to a single markup string.
pub fn compile(template: &Template) -> Result<Value, CodegenError> {
    let mut serializer = Serializer::new();
    let value = serializer.items_json(&template.items, false)?;
    log::debug!(
        target: "stache.codegen",
        "compiled {} top-level items ({} elements serialized)",
        template.items.len(),
        serializer.markup_memo.len()
    );
    Ok(value)
}
