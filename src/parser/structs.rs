//! Struct and callback-macro builders.

use super::{Line, ParseContext};
use crate::error::Result;
use crate::model::{Struct, StructField};
use regex::Regex;
use std::sync::LazyLock;

static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=.]*\s\**)(\w+);$").unwrap());

static RE_ARRAY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\s\*?)(\w+)\[\s*(\w+)?\s*\];$").unwrap());

static RE_CALLBACK_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^STEAM_CALLBACK_BEGIN\(\s?(\w+),\s?(.*?)\s*\)").unwrap());

static RE_CALLBACK_MEMBER_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^STEAM_CALLBACK_MEMBER_ARRAY\(.*,\s+(.*?)\s*,\s*(\w*)\s*,\s*(\d*)\s*\)").unwrap()
});

static RE_CALLBACK_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^STEAM_CALLBACK_MEMBER\(.*,\s+(.*?)\s*,\s*(\w*)\[?(\d+)?\]?\s*\)").unwrap()
});

/// `struct Name` at file scope through the matching `};`.
pub(crate) fn parse_struct(ctx: &mut ParseContext, line: &Line) {
    if ctx.enum_.is_some() {
        return;
    }

    if ctx.struct_.is_some() {
        if line.code == "};" {
            if ctx.scope_depth != 1 {
                return;
            }
            let end_comment = ctx.comments.consume();
            if let Some(mut done) = ctx.struct_.take() {
                done.end_comment = end_comment;
                if done.is_callback() {
                    ctx.file.callbacks.push(done);
                } else {
                    ctx.file.structs.push(done);
                }
            }
        } else {
            parse_field(ctx, line);
        }
        return;
    }

    if line.token(0) != "struct" || line.tokens.len() < 2 {
        return;
    }
    // Forward declaration
    if line.token(1).ends_with(';') {
        return;
    }

    let comment = ctx.comments.consume();

    // Nested helper structs belong to a class body
    if ctx.scope_depth != 0 {
        return;
    }

    let name = line.token(1).trim_end_matches('{');
    ctx.struct_ = Some(Struct::new(name, ctx.pack_size(), comment));
}

fn parse_field(ctx: &mut ParseContext, line: &Line) {
    let comment = ctx.comments.consume();
    let code = line.code;

    if code.starts_with("enum") || code == "{" {
        return;
    }

    let field = if let Some(caps) = RE_FIELD.captures(code) {
        StructField {
            name: caps[2].to_string(),
            ty: caps[1].trim_end().to_string(),
            array_size: None,
            comment,
        }
    } else if let Some(caps) = RE_ARRAY_FIELD.captures(code) {
        StructField {
            name: caps[2].to_string(),
            ty: caps[1].trim_end().to_string(),
            array_size: caps.get(3).map(|m| m.as_str().to_string()),
            comment,
        }
    } else {
        return;
    };

    if let Some(open) = ctx.struct_.as_mut() {
        open.fields.push(field);
    }
}

/// `STEAM_CALLBACK_BEGIN( Name, id )` … `STEAM_CALLBACK_END(n)`.
pub(crate) fn parse_callback_macro(ctx: &mut ParseContext, line: &Line) -> Result<()> {
    let code = line.code;

    if ctx.callback_macro.is_some() {
        let comment = ctx.comments.consume();

        if code.starts_with("STEAM_CALLBACK_END(") {
            if let Some(done) = ctx.callback_macro.take() {
                ctx.file.callbacks.push(done);
            }
            return Ok(());
        }

        let field = if code.starts_with("STEAM_CALLBACK_MEMBER_ARRAY") {
            let caps = RE_CALLBACK_MEMBER_ARRAY
                .captures(code)
                .ok_or_else(|| ctx.malformed("STEAM_CALLBACK_MEMBER_ARRAY( idx, type, name, size )", code))?;
            StructField {
                name: caps[2].to_string(),
                ty: caps[1].to_string(),
                array_size: Some(caps[3].to_string()),
                comment,
            }
        } else if code.starts_with("STEAM_CALLBACK_MEMBER") {
            let caps = RE_CALLBACK_MEMBER
                .captures(code)
                .ok_or_else(|| ctx.malformed("STEAM_CALLBACK_MEMBER( idx, type, name )", code))?;
            StructField {
                name: caps[2].to_string(),
                ty: caps[1].to_string(),
                array_size: caps.get(3).map(|m| m.as_str().to_string()),
                comment,
            }
        } else {
            ctx.warn("Unexpected line in Callback Macro", code);
            return Ok(());
        };

        if let Some(open) = ctx.callback_macro.as_mut() {
            open.fields.push(field);
        }
        return Ok(());
    }

    if !code.starts_with("STEAM_CALLBACK_BEGIN") {
        return Ok(());
    }

    let comment = ctx.comments.consume();
    let caps = RE_CALLBACK_BEGIN
        .captures(code)
        .ok_or_else(|| ctx.malformed("STEAM_CALLBACK_BEGIN( name, id )", code))?;

    let mut callback = Struct::new(&caps[1], ctx.pack_size(), comment);
    callback.callback_id = Some(caps[2].to_string());
    ctx.callback_macro = Some(callback);
    Ok(())
}
