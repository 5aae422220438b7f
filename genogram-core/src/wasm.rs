//! WASM bindings for the genogram-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! None of them throw: failures come back as JSON with an `error` field.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::document::DocumentError;
use crate::output::DiagramOutput;
use crate::{correct_json, logging, render_json};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Error serializing output: {e}");
        r#"{"error":{"message":"serialization failed"}}"#.to_string()
    })
}

fn error_json(context: &str, e: &DocumentError) -> String {
    log::error!("{context}: {e}");
    to_json(&DiagramOutput::from_error(e.to_string()))
}

fn render_with(input: &str, config: Option<&str>) -> String {
    match render_json(input, config) {
        Ok(output) => to_json(&output),
        Err(e) => error_json("Error rendering genogram", &e),
    }
}

/// Correct a raw document and return the renderable document.
#[wasm_bindgen]
pub fn render_genogram(input: &str) -> String {
    render_with(input, None)
}

/// Same as `render_genogram`, with a JSON `LayoutConfig` (missing fields
/// take their defaults; an empty string means all defaults).
#[wasm_bindgen]
pub fn render_genogram_with_config(input: &str, config: &str) -> String {
    render_with(input, Some(config))
}

/// Correct a raw document and return it in the input schema.
#[wasm_bindgen]
pub fn correct_genogram(input: &str) -> String {
    match correct_json(input, None) {
        Ok(json) => json,
        Err(e) => error_json("Error correcting genogram", &e),
    }
}

#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logging::init(logging::parse_level(level));
}
