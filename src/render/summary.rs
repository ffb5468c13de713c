//! Plain-text summary renderer.
//!
//! One block per file with declaration counts, then every interface with its
//! function signatures in call-table order.

use crate::model::*;
use crate::render::Renderer;
use anyhow::Result;

pub struct SummaryRenderer;

impl Renderer for SummaryRenderer {
    fn render(&self, model: &Model) -> Result<String> {
        let mut out = String::new();

        for file in &model.files {
            out.push_str(&render_file(file));
        }

        out.push_str(&format!(
            "total: {} files, {} typedefs\n",
            model.files.len(),
            model.typedefs.len()
        ));
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

fn render_file(file: &SourceFile) -> String {
    let mut out = format!("{}\n", file.name);

    let counts = [
        ("includes", file.includes.len()),
        ("defines", file.defines.len()),
        ("constants", file.constants.len()),
        ("enums", file.enums.len()),
        ("structs", file.structs.len()),
        ("callbacks", file.callbacks.len()),
        ("interfaces", file.interfaces.len()),
        ("typedefs", file.typedefs.len()),
    ];
    let counts: Vec<String> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{} {}", n, label))
        .collect();
    if !counts.is_empty() {
        out.push_str(&format!("  {}\n", counts.join(", ")));
    }

    for interface in &file.interfaces {
        out.push_str(&format!("  interface {}\n", interface.name));
        for func in &interface.functions {
            out.push_str(&format!("    {}\n", signature(func)));
        }
    }

    for callback in &file.callbacks {
        out.push_str(&format!(
            "  callback {} = {}\n",
            callback.name,
            callback.callback_id.as_deref().unwrap_or("")
        ));
    }

    out
}

fn signature(func: &Function) -> String {
    let args: Vec<String> = func
        .args
        .iter()
        .map(|arg| match arg.default {
            Some(ref default) => format!("{} {} = {}", arg.ty, arg.name, default),
            None => format!("{} {}", arg.ty, arg.name),
        })
        .collect();

    let mut sig = format!("{} {}({})", func.return_type, func.name, args.join(", "));
    if func.private {
        sig.push_str(" [private]");
    }
    if let Some(ref condition) = func.condition {
        sig.push_str(&format!(" [#if {}]", condition));
    }
    sig
}
