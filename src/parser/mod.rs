//! Header parser: a line-by-line state machine over a whole file.
//!
//! Each physical line goes through comment extraction, the skip rules, and
//! then every declaration parser in a fixed order. The parsers guard
//! themselves, so a line may be looked at by several of them; the order
//! matters because brace depth is only updated at the very end.

pub mod comments;
pub mod conditionals;
mod decls;
mod enums;
mod function;
mod preprocessor;
pub mod skip;
mod structs;

use crate::config::ParserConfig;
use crate::discover;
use crate::error::{ParseError, Result};
use crate::model::*;
use comments::CommentState;
use conditionals::ConditionStack;
use std::path::Path;

/// UTF-8 byte-order mark as read through a Latin-1 decoder.
const BOM_LATIN1: &str = "\u{ef}\u{bb}\u{bf}";
const BOM: char = '\u{feff}';

/// One line of code with comments already removed.
pub(crate) struct Line<'a> {
    pub code: &'a str,
    pub tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            code,
            tokens: code.split_whitespace().collect(),
        }
    }

    /// Token at `idx`, or the empty string.
    pub fn token(&self, idx: usize) -> &'a str {
        self.tokens.get(idx).copied().unwrap_or("")
    }
}

/// Everything that is open while a single file is parsed.
#[derive(Debug)]
pub(crate) struct ParseContext {
    pub file: SourceFile,
    pub line_no: usize,
    pub comments: CommentState,
    pub conditions: ConditionStack,
    pub pack: Vec<u32>,
    pub scope_depth: i32,
    pub in_header: bool,
    pub in_continuation: bool,
    pub in_private: bool,
    pub interface: Option<Interface>,
    pub function: Option<function::FunctionBuilder>,
    pub function_attributes: Vec<FunctionAttribute>,
    pub enum_: Option<enums::EnumBuilder>,
    pub struct_: Option<Struct>,
    pub callback_macro: Option<Struct>,
}

impl ParseContext {
    fn new(name: &str) -> Self {
        Self {
            file: SourceFile::new(name),
            line_no: 0,
            comments: CommentState::default(),
            conditions: ConditionStack::default(),
            pack: Vec::new(),
            scope_depth: 0,
            in_header: true,
            in_continuation: false,
            in_private: false,
            interface: None,
            function: None,
            function_attributes: Vec::new(),
            enum_: None,
            struct_: None,
            callback_macro: None,
        }
    }

    pub fn pack_size(&self) -> Option<u32> {
        self.pack.last().copied()
    }

    pub fn warn(&self, message: &str, code: &str) {
        tracing::warn!(file = %self.file.name, line = self.line_no, "{}: {}", message, code);
    }

    pub fn malformed(&self, expected: &'static str, text: &str) -> ParseError {
        ParseError::Malformed {
            file: self.file.name.clone(),
            line: self.line_no,
            expected,
            text: text.to_string(),
        }
    }
}

/// Parses header files one at a time, collecting a shared typedef registry.
#[derive(Debug, Default)]
pub struct Parser {
    config: ParserConfig,
    files: Vec<SourceFile>,
    typedefs: Vec<Typedef>,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            typedefs: Vec::new(),
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Every typedef seen so far, in file-processing order.
    pub fn typedefs(&self) -> &[Typedef] {
        &self.typedefs
    }

    pub fn into_model(self) -> Model {
        Model {
            files: self.files,
            typedefs: self.typedefs,
        }
    }

    /// Parse every header in `dir`, in file-name order.
    pub fn parse_dir(&mut self, dir: &Path) -> Result<()> {
        for path in discover::header_files(dir, &self.config)? {
            let text = discover::read_latin1(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.parse_source(&name, &text)?;
        }
        Ok(())
    }

    /// Parse one file's text. Nothing is recorded if the file fails.
    pub fn parse_source(&mut self, name: &str, text: &str) -> Result<&SourceFile> {
        let mut ctx = ParseContext::new(name);
        let mut typedefs = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            ctx.line_no = idx + 1;
            let raw = if idx == 0 {
                strip_bom(&ctx, raw, self.config.warn_utf8bom)
            } else {
                if raw.contains(BOM) || raw.contains(BOM_LATIN1) {
                    ctx.warn("Byte-order mark in the middle of the file", raw);
                }
                raw
            };
            process_line(&self.config, &mut ctx, &mut typedefs, raw)?;
        }

        if ctx.comments.in_block() {
            ctx.warn("Unterminated block comment at end of file", "");
        }
        if ctx.scope_depth != 0 {
            tracing::debug!(file = %name, depth = ctx.scope_depth, "unbalanced braces at end of file");
        }

        self.typedefs.extend(typedefs);
        self.files.push(ctx.file);
        Ok(&self.files[self.files.len() - 1])
    }
}

fn strip_bom<'a>(ctx: &ParseContext, raw: &'a str, warn: bool) -> &'a str {
    let stripped = raw
        .strip_prefix(BOM_LATIN1)
        .or_else(|| raw.strip_prefix(BOM));
    match stripped {
        Some(rest) => {
            if warn {
                ctx.warn("File contains a UTF8 BOM", "");
            }
            rest
        }
        None => raw,
    }
}

fn process_line(
    config: &ParserConfig,
    ctx: &mut ParseContext,
    typedefs: &mut Vec<Typedef>,
    raw: &str,
) -> Result<()> {
    let code = ctx.comments.extract(raw);
    if code.is_empty() {
        return Ok(());
    }
    let line = Line::new(&code);

    if ctx.in_header {
        let header = ctx.comments.take_leading();
        ctx.file.header.extend(header);
        ctx.in_header = false;
    }

    if skip::skip_line(ctx, &line, config) {
        ctx.comments.consume();
        return Ok(());
    }

    preprocessor::parse_directive(ctx, &line, config)?;
    decls::parse_typedef(ctx, &line, typedefs);
    decls::parse_constant(ctx, &line);
    enums::parse_enum(ctx, &line)?;
    structs::parse_struct(ctx, &line);
    structs::parse_callback_macro(ctx, &line)?;
    function::parse_interface(ctx, &line, config);
    parse_class(ctx, &line, config);
    track_scope(ctx, &line);
    Ok(())
}

/// Classes other than interfaces are recognized only to drop their comments.
fn parse_class(ctx: &mut ParseContext, line: &Line, config: &ParserConfig) {
    if line.token(0) != "class" {
        return;
    }
    if line.token(1).starts_with(config.interface_prefix.as_str()) {
        return;
    }
    ctx.comments.consume();
}

/// Update brace depth; closing back to depth 0 commits the open interface.
pub(crate) fn track_scope(ctx: &mut ParseContext, line: &Line) {
    let code = line.code;

    if code.contains('{') {
        ctx.scope_depth += 1;
        if code.matches('{').count() > 1 {
            ctx.warn("Multiple occurrences of '{'", code);
        }
    }

    if code.contains('}') {
        ctx.scope_depth -= 1;

        if ctx.scope_depth == 0 {
            if let Some(interface) = ctx.interface.take() {
                ctx.file.interfaces.push(interface);
            }
        }
        if ctx.scope_depth < 0 {
            ctx.warn("Scope depth is less than 0", code);
        }
        if code.matches('}').count() > 1 {
            ctx.warn("Multiple occurrences of '}'", code);
        }
    }
}
