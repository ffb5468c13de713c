//! JSON renderer: the full model, for binding generators.

use crate::model::Model;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, model: &Model) -> Result<String> {
        let mut out = serde_json::to_string_pretty(model).context("failed to serialize model")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
