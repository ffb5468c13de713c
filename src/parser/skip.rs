//! Line skip rules, applied in order before any declaration parser runs.

use super::{track_scope, Line, ParseContext};
use crate::config::ParserConfig;
use regex::Regex;
use std::sync::LazyLock;

static RE_INLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\binline\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipRule {
    /// Inside a struct whose layout is defined elsewhere: track braces only.
    SkippedStruct,
    /// Inside the generation-only conditional.
    Gate,
    /// A `\`-continued line and the line after it.
    Continuation,
    /// The line contains a denylisted substring.
    SkippedLine,
    /// Inline free functions outside of an interface.
    InlineOutsideInterface,
}

pub const SKIP_RULES: [SkipRule; 5] = [
    SkipRule::SkippedStruct,
    SkipRule::Gate,
    SkipRule::Continuation,
    SkipRule::SkippedLine,
    SkipRule::InlineOutsideInterface,
];

impl SkipRule {
    /// Returns `true` when the rule consumes the line.
    pub(crate) fn apply(self, ctx: &mut ParseContext, line: &Line, config: &ParserConfig) -> bool {
        match self {
            SkipRule::SkippedStruct => {
                let skipped = ctx
                    .struct_
                    .as_ref()
                    .is_some_and(|s| config.is_skipped_struct(&s.name));
                if !skipped {
                    return false;
                }
                track_scope(ctx, line);
                if line.code == "};" && ctx.scope_depth == 0 {
                    if let Some(mut opaque) = ctx.struct_.take() {
                        opaque.end_comment = ctx.comments.consume();
                        ctx.file.structs.push(opaque);
                    }
                }
                true
            }
            SkipRule::Gate => ctx
                .conditions
                .swallow_gated(line.code, &config.gate_condition),
            SkipRule::Continuation => {
                if line.code.ends_with('\\') {
                    ctx.in_continuation = true;
                    return true;
                }
                if ctx.in_continuation {
                    ctx.in_continuation = false;
                    return true;
                }
                false
            }
            SkipRule::SkippedLine => config.has_skipped_line(line.code),
            SkipRule::InlineOutsideInterface => {
                ctx.interface.is_none() && RE_INLINE.is_match(line.code)
            }
        }
    }
}

/// Run the rules in order; the first one that fires consumes the line.
pub(crate) fn skip_line(ctx: &mut ParseContext, line: &Line, config: &ParserConfig) -> bool {
    SKIP_RULES.iter().any(|rule| rule.apply(ctx, line, config))
}
