//! WASM bindings for the Stache compiler.
//!
//! Exposes `compile()` to JavaScript via wasm-bindgen.
//! Returns the structured form as a plain JS value or throws on error.

use serde::Serialize;
use serde_json::Value;
use stache_codegen::CodegenError;
use stache_parser::{ParseError, Parser, ParserOptions};
use wasm_bindgen::prelude::*;

/// Anything that can stop a template from compiling.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Compile Stache source to its structured form.
///
/// `options` is an optional object such as
/// `{ preserveWhitespace: true, sanitizeEventAttributes: true }`.
/// Throws a JS error if the options are malformed or compilation fails.
#[wasm_bindgen]
pub fn compile(source: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options: ParserOptions = if options.is_undefined() || options.is_null() {
        ParserOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsError::new(&format!("Invalid options: {e}")))?
    };

    let json = compile_template(source, options).map_err(|e| JsError::new(&e.to_string()))?;

    // Objects, not Maps, so the result reads like parsed JSON.
    json.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The compile pipeline behind [`compile`], usable off the JS boundary.
pub fn compile_template(source: &str, options: ParserOptions) -> Result<Value, CompileError> {
    let template = Parser::parse(source, options)?;
    Ok(stache_codegen::compile(&template)?)
}
