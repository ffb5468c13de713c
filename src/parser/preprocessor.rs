//! Preprocessor directives: conditionals, includes, defines, and pack pragmas.

use super::{Line, ParseContext};
use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::model::Define;

/// Recognized directive kinds, matched by prefix in this order.
#[derive(Debug, PartialEq)]
enum Directive {
    Else,
    Include,
    Ifdef,
    Ifndef,
    If,
    Endif,
    Define,
    PragmaPack,
    Ignored,
    Elif,
    Unhandled,
}

fn classify(code: &str) -> Option<Directive> {
    if !code.starts_with('#') {
        return None;
    }
    let directive = if code.starts_with("#else") {
        Directive::Else
    } else if code.starts_with("#include") {
        Directive::Include
    } else if code.starts_with("#ifdef") {
        Directive::Ifdef
    } else if code.starts_with("#ifndef") {
        Directive::Ifndef
    } else if code.starts_with("#if") {
        Directive::If
    } else if code.starts_with("#endif") {
        Directive::Endif
    } else if code.starts_with("#define") {
        Directive::Define
    } else if code.starts_with("#pragma pack") {
        Directive::PragmaPack
    } else if ["#pragma", "#error", "#warning", "#undef"]
        .iter()
        .any(|p| code.starts_with(p))
    {
        Directive::Ignored
    } else if code.starts_with("#elif") {
        Directive::Elif
    } else {
        Directive::Unhandled
    };
    Some(directive)
}

pub(crate) fn parse_directive(
    ctx: &mut ParseContext,
    line: &Line,
    config: &ParserConfig,
) -> Result<()> {
    let Some(directive) = classify(line.code) else {
        return Ok(());
    };

    match directive {
        Directive::Else => {
            if !ctx.conditions.negate_top() {
                return Err(unbalanced(ctx, "#else"));
            }
        }
        Directive::Include => {
            ctx.comments.consume();
            let target = line.token(1);
            let path = target
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .or_else(|| target.strip_prefix('<').and_then(|t| t.strip_suffix('>')))
                .ok_or_else(|| ctx.malformed("an include target", line.code))?;
            ctx.file.includes.push(path.to_string());
        }
        Directive::Ifdef | Directive::Ifndef => {
            let token = line.token(1);
            if token.is_empty() {
                return Err(ctx.malformed("a macro name", line.code));
            }
            let condition = if directive == Directive::Ifdef {
                format!("defined({})", token)
            } else {
                format!("!defined({})", token)
            };
            ctx.conditions.push(condition);
        }
        Directive::If => {
            ctx.conditions.push(line.code[3..].trim());
        }
        Directive::Endif => {
            if ctx.conditions.pop().is_none() {
                return Err(unbalanced(ctx, "#endif"));
            }
        }
        Directive::Define => parse_define(ctx, line, config),
        Directive::PragmaPack => parse_pack(ctx, line.code)?,
        Directive::Ignored => {}
        Directive::Elif => {
            tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "ignoring {}", line.code);
        }
        Directive::Unhandled => {
            tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "unhandled directive: {}", line.code);
        }
    }
    Ok(())
}

fn unbalanced(ctx: &ParseContext, directive: &str) -> ParseError {
    ParseError::UnbalancedConditional {
        file: ctx.file.name.clone(),
        line: ctx.line_no,
        directive: directive.to_string(),
    }
}

/// `#define NAME VALUE`; function-like and valueless macros are not kept.
fn parse_define(ctx: &mut ParseContext, line: &Line, config: &ParserConfig) {
    let comment = ctx.comments.consume();

    let rest = line.code["#define".len()..].trim_start();
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = &rest[..name_end];
    let after_name = &rest[name_end..];
    let value = after_name.trim_start();
    let spacing = &after_name[..after_name.len() - value.len()];

    if config.warn_include_guard {
        check_include_guard(ctx, name);
    }

    if name.is_empty() || value.is_empty() || name.contains('(') {
        tracing::debug!(file = %ctx.file.name, line = ctx.line_no, "unused define: {}", line.code);
        return;
    }

    ctx.file.defines.push(Define {
        name: name.to_string(),
        value: value.to_string(),
        spacing: spacing.to_string(),
        comment,
    });
}

/// The guard defined right under the file's outer `#ifndef` should be named
/// after the file: `isteamfoo.h` → `ISTEAMFOO_H`.
fn check_include_guard(ctx: &ParseContext, name: &str) {
    if ctx.conditions.depth() != 1 {
        return;
    }
    let is_guard = ctx
        .conditions
        .top()
        .is_some_and(|top| top == format!("!defined({})", name));
    if !is_guard {
        return;
    }
    let expected = ctx.file.name.to_uppercase().replace('.', "_");
    if name != expected {
        ctx.warn("Include guard does not match the file name", name);
    }
}

/// `#pragma pack( push, N )` / `#pragma pack( pop )`.
fn parse_pack(ctx: &mut ParseContext, code: &str) -> Result<()> {
    if code.contains("push") {
        let size = code
            .split_once(',')
            .map(|(_, rest)| rest.trim_end_matches(')').trim())
            .and_then(|size| size.parse::<u32>().ok())
            .ok_or_else(|| ParseError::InvalidPackSize {
                file: ctx.file.name.clone(),
                line: ctx.line_no,
                text: code.to_string(),
            })?;
        ctx.pack.push(size);
    } else if code.contains("pop") && ctx.pack.pop().is_none() {
        return Err(ParseError::PackUnderflow {
            file: ctx.file.name.clone(),
            line: ctx.line_no,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ctx: &mut ParseContext, code: &str) -> Result<()> {
        let line = Line::new(code);
        parse_directive(ctx, &line, &ParserConfig::default())
    }

    #[test]
    fn condition_encoding() {
        let mut ctx = ParseContext::new("a.h");
        run(&mut ctx, "#ifndef A_H").unwrap();
        run(&mut ctx, "#ifdef _WIN32").unwrap();
        run(&mut ctx, "#if defined( VALVE_CALLBACK_PACK_SMALL )").unwrap();
        assert_eq!(ctx.conditions.top(), Some("defined( VALVE_CALLBACK_PACK_SMALL )"));
        run(&mut ctx, "#endif").unwrap();
        assert_eq!(ctx.conditions.top(), Some("defined(_WIN32)"));
        run(&mut ctx, "#endif").unwrap();
        assert_eq!(ctx.conditions.top(), Some("!defined(A_H)"));
    }

    #[test]
    fn define_keeps_spacing_and_value() {
        let mut ctx = ParseContext::new("a.h");
        run(&mut ctx, "#define STEAMUSER_INTERFACE_VERSION\t\t\"SteamUser023\"").unwrap();
        run(&mut ctx, "#define k_cchMax ( 1 << 8 )").unwrap();
        let defines = &ctx.file.defines;
        assert_eq!(defines.len(), 2);
        assert_eq!(defines[0].name, "STEAMUSER_INTERFACE_VERSION");
        assert_eq!(defines[0].spacing, "\t\t");
        assert_eq!(defines[0].value, "\"SteamUser023\"");
        assert_eq!(defines[1].value, "( 1 << 8 )");
    }

    #[test]
    fn function_like_and_valueless_defines_are_dropped() {
        let mut ctx = ParseContext::new("a.h");
        run(&mut ctx, "#define A_H").unwrap();
        run(&mut ctx, "#define STEAM_DESC(x) x").unwrap();
        assert!(ctx.file.defines.is_empty());
    }

    #[test]
    fn pack_push_and_pop() {
        let mut ctx = ParseContext::new("a.h");
        run(&mut ctx, "#pragma pack( push, 8 )").unwrap();
        run(&mut ctx, "#pragma pack(push,4)").unwrap();
        assert_eq!(ctx.pack_size(), Some(4));
        run(&mut ctx, "#pragma pack( pop )").unwrap();
        assert_eq!(ctx.pack_size(), Some(8));
        run(&mut ctx, "#pragma pack( pop )").unwrap();
        assert!(matches!(
            run(&mut ctx, "#pragma pack( pop )"),
            Err(ParseError::PackUnderflow { .. })
        ));
    }

    #[test]
    fn bad_pack_size_is_fatal() {
        let mut ctx = ParseContext::new("a.h");
        assert!(matches!(
            run(&mut ctx, "#pragma pack( push, VALVE_PACK )"),
            Err(ParseError::InvalidPackSize { .. })
        ));
    }

    #[test]
    fn else_without_if_is_fatal() {
        let mut ctx = ParseContext::new("a.h");
        assert!(matches!(
            run(&mut ctx, "#else"),
            Err(ParseError::UnbalancedConditional { .. })
        ));
    }

    #[test]
    fn include_targets() {
        let mut ctx = ParseContext::new("a.h");
        run(&mut ctx, "#include \"steam_api_common.h\"").unwrap();
        run(&mut ctx, "#include <stdint.h>").unwrap();
        assert_eq!(ctx.file.includes, vec!["steam_api_common.h", "stdint.h"]);
    }

    #[test]
    fn undelimited_include_is_fatal() {
        let mut ctx = ParseContext::new("a.h");
        for code in ["#include \u{e9}x", "#include \u{e9}", "#include"] {
            assert!(matches!(run(&mut ctx, code), Err(ParseError::Malformed { .. })));
        }
        assert!(ctx.file.includes.is_empty());
    }
}
