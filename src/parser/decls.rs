//! Single-line declarations: typedefs and constants.

use super::{Line, ParseContext};
use crate::model::{Constant, Typedef};
use regex::Regex;
use std::sync::LazyLock;

static RE_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*const\s+(.*)\s+(\w+)\s+=\s+(.*);$").unwrap());

/// `typedef TYPE NAME;` at file scope. Function pointers and arrays are skipped.
pub(crate) fn parse_typedef(ctx: &mut ParseContext, line: &Line, registry: &mut Vec<Typedef>) {
    if line.token(0) != "typedef" {
        return;
    }

    let comment = ctx.comments.consume();

    if ctx.scope_depth > 0 {
        tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "skipped typedef inside a class or struct: {}", line.code);
        return;
    }
    if line.code.contains('(') || line.code.contains('[') {
        tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "skipped typedef containing '(' or '[': {}", line.code);
        return;
    }
    if !line.code.ends_with(';') || line.tokens.len() < 3 {
        tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "skipped typedef not ending on this line: {}", line.code);
        return;
    }

    let last = line.tokens[line.tokens.len() - 1].trim_end_matches(';');
    let mut ty = line.tokens[1..line.tokens.len() - 1].join(" ");
    let name = match last.strip_prefix('*') {
        Some(name) => {
            ty.push_str(" *");
            name
        }
        None => last,
    };

    let typedef = Typedef {
        name: name.to_string(),
        ty,
        file: ctx.file.name.clone(),
        comment,
    };
    registry.push(typedef.clone());
    ctx.file.typedefs.push(typedef);
}

/// `const TYPE NAME = VALUE;` or `static const TYPE NAME = VALUE;`.
pub(crate) fn parse_constant(ctx: &mut ParseContext, line: &Line) {
    if line.token(0) != "const" && !line.code.starts_with("static const") {
        return;
    }
    if ctx.scope_depth > 1 || ctx.function.is_some() {
        return;
    }

    if !line.tokens.contains(&"=") {
        return;
    }
    let Some(caps) = RE_CONSTANT.captures(line.code) else {
        return;
    };
    let comment = ctx.comments.consume();

    ctx.file.constants.push(Constant {
        name: caps[2].to_string(),
        value: caps[3].to_string(),
        ty: caps[1].to_string(),
        comment,
    });
}
