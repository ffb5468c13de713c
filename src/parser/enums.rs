//! Enum builder.
//!
//! Named enums collect fields until `};`. Anonymous enums are how the SDK
//! spells integer constants, so their members become `Constant`s instead.
//! Inside a struct, `enum { k_iCallback = N };` tags the struct as a
//! callback message.

use super::{Line, ParseContext};
use crate::error::Result;
use crate::model::{Comment, Constant, Enum, EnumField};
use regex::Regex;
use std::sync::LazyLock;

static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+),?([ \t]*)=?([ \t]*)(.*)$").unwrap());

static RE_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*=\s*(.+)$").unwrap());

const CALLBACK_ID: &str = "k_iCallback";

#[derive(Debug)]
pub(crate) struct EnumBuilder {
    /// `None` for an anonymous enum
    name: Option<String>,
    comment: Option<Comment>,
    fields: Vec<EnumField>,
    /// A field line ending in `=`, waiting for its value on the next line
    pending: Option<String>,
}

pub(crate) fn parse_enum(ctx: &mut ParseContext, line: &Line) -> Result<()> {
    if ctx.enum_.is_some() {
        parse_body_line(ctx, line);
        return Ok(());
    }

    if line.token(0) != "enum" {
        return Ok(());
    }

    let comment = ctx.comments.consume();
    let code = line.code;

    // Single line: enum { k_name = value };
    if let (Some(open), Some(close)) = (code.find('{'), code.rfind('}')) {
        if open < close {
            let name = enum_name(&code[..open]);
            let members = &code[open + 1..close];
            return match name {
                Some(name) => {
                    single_line_named(ctx, name, members, comment);
                    Ok(())
                }
                None => single_line_anonymous(ctx, members, comment),
            };
        }
    }

    let head = code.strip_suffix('{').unwrap_or(code);
    ctx.enum_ = Some(EnumBuilder {
        name: enum_name(head),
        comment: Some(comment),
        fields: Vec::new(),
        pending: None,
    });
    Ok(())
}

/// Name between `enum` and the body, without any `: base` part.
fn enum_name(head: &str) -> Option<String> {
    let rest = head.trim().strip_prefix("enum")?;
    let rest = rest.split(':').next().unwrap_or("").trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn single_line_anonymous(ctx: &mut ParseContext, members: &str, comment: Comment) -> Result<()> {
    let mut comment = Some(comment);
    for member in members.split(',').map(str::trim).filter(|m| !m.is_empty()) {
        let caps = RE_MEMBER
            .captures(member)
            .ok_or_else(|| ctx.malformed("`name = value` in an anonymous enum", member))?;
        let name = caps[1].to_string();
        let value = caps[2].trim().to_string();

        if name == CALLBACK_ID {
            if let Some(open) = ctx.struct_.as_mut() {
                open.callback_id = Some(value);
                continue;
            }
        }

        ctx.file.constants.push(Constant {
            name,
            value,
            ty: "int".to_string(),
            comment: comment.take().unwrap_or_default(),
        });
    }
    Ok(())
}

fn single_line_named(ctx: &mut ParseContext, name: String, members: &str, comment: Comment) {
    let fields = members
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .filter_map(|m| RE_FIELD.captures(m))
        .map(|caps| field_from(&caps, Comment::default()))
        .collect();
    ctx.file.enums.push(Enum {
        name,
        fields,
        comment,
        end_comment: Comment::default(),
    });
}

fn parse_body_line(ctx: &mut ParseContext, line: &Line) {
    let code = line.code;
    if code == "{" {
        return;
    }

    if code.ends_with("};") {
        let end_comment = ctx.comments.consume();
        if let Some(builder) = ctx.enum_.take() {
            if let Some(name) = builder.name {
                ctx.file.enums.push(Enum {
                    name,
                    fields: builder.fields,
                    comment: builder.comment.unwrap_or_default(),
                    end_comment,
                });
            }
        }
        return;
    }

    if code.starts_with('#') {
        return;
    }

    let Some(builder) = ctx.enum_.as_mut() else {
        return;
    };
    let text = match builder.pending.take() {
        Some(head) => format!("{} {}", head, code),
        None => code.to_string(),
    };
    if text.ends_with('=') {
        builder.pending = Some(text);
        return;
    }

    let Some(caps) = RE_FIELD.captures(&text) else {
        return;
    };
    let mut comment = ctx.comments.consume();

    let Some(builder) = ctx.enum_.as_mut() else {
        return;
    };
    if builder.name.is_none() {
        if let Some(enum_comment) = builder.comment.take() {
            comment.pre = enum_comment.pre;
            comment.raw_pre = enum_comment.raw_pre;
        }
        ctx.file.constants.push(Constant {
            name: caps[1].to_string(),
            value: caps[4].trim_end_matches(',').trim_end().to_string(),
            ty: "int".to_string(),
            comment,
        });
        return;
    }

    let field = field_from(&caps, comment);
    builder.fields.push(field);
}

fn field_from(caps: &regex::Captures, comment: Comment) -> EnumField {
    let mut field = EnumField::new(&caps[1]);
    let value = caps[4].trim_end_matches(',').trim_end();
    if !value.is_empty() {
        field.pre_spacing = caps[2].to_string();
        field.post_spacing = caps[3].to_string();
        field.value = value.to_string();
    }
    field.comment = comment;
    field
}
