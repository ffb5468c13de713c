//! Data model for parsed SDK headers, as consumed by binding generators.

use serde::Serialize;

/// Everything parsed from a header directory.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Model {
    /// Parsed files, in processing (name) order.
    pub files: Vec<SourceFile>,
    /// Every typedef across all files, in file-processing order.
    pub typedefs: Vec<Typedef>,
}

/// One parsed header file.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub name: String,
    /// Comment lines preceding the first line of code
    pub header: Vec<String>,
    /// `#include` targets without their `""` / `<>` delimiters
    pub includes: Vec<String>,
    pub defines: Vec<Define>,
    pub constants: Vec<Constant>,
    pub enums: Vec<Enum>,
    pub structs: Vec<Struct>,
    /// Structs tagged with a callback id
    pub callbacks: Vec<Struct>,
    pub interfaces: Vec<Interface>,
    pub typedefs: Vec<Typedef>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A raw leading comment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RawComment {
    /// A line comment exactly as written, including the whitespace before `//`.
    Line(String),
    /// A line that had no code and no line comment.
    Blank,
}

/// Comments attached to a declaration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub raw_pre: Vec<RawComment>,
    pub pre: Vec<String>,
    /// Same-line trailing comment, byte-exact
    pub raw_line: Option<String>,
    /// Same-line trailing comment, text after `//`
    pub line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    pub name: String,
    pub value: String,
    /// Whitespace between the name and the value, as written
    pub spacing: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    pub fields: Vec<EnumField>,
    pub comment: Comment,
    /// Comments between the last field and the closing `};`
    pub end_comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumField {
    pub name: String,
    pub value: String,
    /// Whitespace before `=`
    pub pre_spacing: String,
    /// Whitespace after `=`
    pub post_spacing: String,
    pub comment: Comment,
}

impl EnumField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            pre_spacing: " ".to_string(),
            post_spacing: " ".to_string(),
            comment: Comment::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Struct {
    pub name: String,
    /// `#pragma pack` value in effect when the struct opened
    pub pack_size: Option<u32>,
    pub fields: Vec<StructField>,
    pub callback_id: Option<String>,
    pub comment: Comment,
    pub end_comment: Comment,
}

impl Struct {
    pub fn new(name: impl Into<String>, pack_size: Option<u32>, comment: Comment) -> Self {
        Self {
            name: name.into(),
            pack_size,
            fields: Vec::new(),
            callback_id: None,
            comment,
            end_comment: Comment::default(),
        }
    }

    pub fn is_callback(&self) -> bool {
        self.callback_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub array_size: Option<String>,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Typedef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// File the typedef was declared in
    pub file: String,
    pub comment: Comment,
}

/// A virtual-dispatch API surface; `functions` is call-table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    pub functions: Vec<Function>,
    pub comment: Comment,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    /// Name as declared, before overload disambiguation
    pub original_name: String,
    pub return_type: String,
    pub args: Vec<Arg>,
    pub attributes: Vec<FunctionAttribute>,
    pub comment: Comment,
    pub private: bool,
    /// Innermost preprocessor condition the declaration sits in
    pub condition: Option<String>,
}

/// Documentation/codegen hint such as `STEAM_CALL_RESULT( ... )`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub default: Option<String>,
    pub attribute: Option<ArgAttribute>,
}

/// Argument annotation such as `STEAM_ARRAY_COUNT(cItems)`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ArgAttribute {
    pub name: String,
    pub value: String,
}
