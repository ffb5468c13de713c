//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod summary;

use crate::model::Model;
use anyhow::{anyhow, Result};

/// Trait for rendering a parsed Model into a specific output format.
pub trait Renderer {
    fn render(&self, model: &Model) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "summary" | "text" => Ok(Box::new(summary::SummaryRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or summary", format)),
    }
}
