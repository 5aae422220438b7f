//! Layout correction for generated genograms.
//!
//! A producer writes a family diagram with rough coordinates; this crate
//! snaps it to a grid, keeps couples over their children, pulls apart
//! subjects sharing a slot and separates overlapping family subtrees, then
//! turns the result into nodes and edges a renderer can draw.

pub mod document;
pub mod layout;
pub mod output;
mod assemble;
mod logging;
mod wasm;

pub use assemble::assemble_document;
pub use document::{parse_document, ConfigError, DocumentError, RawDocument};
pub use layout::{correct_document, LayoutConfig};
pub use output::DiagramOutput;

/// Correct the document, then assemble it for rendering.
pub fn render_document(doc: &RawDocument, cfg: &LayoutConfig) -> DiagramOutput {
    let corrected = correct_document(doc, cfg);
    assemble_document(&corrected, cfg)
}

/// Parse an optional JSON layout config. `None` or a blank string yields the
/// defaults.
pub fn parse_config(config: Option<&str>) -> Result<LayoutConfig, DocumentError> {
    let cfg = match config.map(str::trim).filter(|c| !c.is_empty()) {
        Some(json) => serde_json::from_str(json)?,
        None => LayoutConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

pub fn render_json(input: &str, config: Option<&str>) -> Result<DiagramOutput, DocumentError> {
    let cfg = parse_config(config)?;
    let doc = parse_document(input)?;
    Ok(render_document(&doc, &cfg))
}

/// Correct a JSON document and return it in the input schema.
pub fn correct_json(input: &str, config: Option<&str>) -> Result<String, DocumentError> {
    let cfg = parse_config(config)?;
    let doc = parse_document(input)?;
    Ok(serde_json::to_string(&correct_document(&doc, &cfg))?)
}
