//! Comment extraction. Splits each physical line into code and comments.
//!
//! Block comments may span lines; their text lands in the normalized
//! leading-comment list. A trailing `//` comment stays attached to its line
//! until the next line is read, at which point (if no declaration consumed
//! it) it becomes a leading comment of whatever follows.

use crate::model::{Comment, RawComment};

#[derive(Debug, Default)]
pub struct CommentState {
    in_block: bool,
    pre: Vec<String>,
    raw_pre: Vec<RawComment>,
    line: Option<String>,
    raw_line: Option<String>,
}

impl CommentState {
    /// Strip comments from `original`, returning the trimmed code.
    /// An empty result means the line carries no code.
    pub fn extract(&mut self, original: &str) -> String {
        let original = original.trim_end();
        let mut code = self.strip_block_comments(original);

        if let Some(line) = self.line.take() {
            self.pre.push(line);
        }
        if let Some(raw) = self.raw_line.take() {
            self.raw_pre.push(RawComment::Line(raw));
        }

        if code.trim().is_empty() {
            self.raw_pre.push(RawComment::Blank);
            return String::new();
        }

        if let Some(pos) = code.find("//") {
            self.line = Some(code[pos + 2..].to_string());
            self.raw_line = raw_line_comment(original);
            code.truncate(pos);
        }

        code.trim().to_string()
    }

    /// Remove every `/* ... */` span, remembering an unterminated one.
    fn strip_block_comments(&mut self, line: &str) -> String {
        let mut code = String::new();
        let mut rest = line;

        loop {
            if self.in_block {
                match rest.find("*/") {
                    Some(end) => {
                        self.pre.push(rest[..end].trim_end().to_string());
                        rest = &rest[end + 2..];
                        self.in_block = false;
                    }
                    None => {
                        self.pre.push(rest.to_string());
                        break;
                    }
                }
            } else {
                let open = rest.find("/*");
                let line_comment = rest.find("//");
                match open {
                    Some(start) if line_comment.map_or(true, |lc| start < lc) => {
                        code.push_str(&rest[..start]);
                        rest = &rest[start + 2..];
                        self.in_block = true;
                    }
                    _ => {
                        code.push_str(rest);
                        break;
                    }
                }
            }
        }

        code
    }

    /// Hand out everything collected so far and start over.
    pub fn consume(&mut self) -> Comment {
        Comment {
            raw_pre: std::mem::take(&mut self.raw_pre),
            pre: std::mem::take(&mut self.pre),
            raw_line: self.raw_line.take(),
            line: self.line.take(),
        }
    }

    /// Take the leading comments only, leaving a same-line comment in place.
    pub fn take_leading(&mut self) -> Vec<String> {
        self.raw_pre.clear();
        std::mem::take(&mut self.pre)
    }

    pub fn in_block(&self) -> bool {
        self.in_block
    }
}

/// The trailing comment exactly as written, including the whitespace run
/// separating it from the code.
fn raw_line_comment(original: &str) -> Option<String> {
    let pos = original.find("//")?;
    let start = original[..pos].trim_end().len();
    Some(original[start..].to_string())
}
