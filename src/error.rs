//! Fatal parse errors.
//!
//! Anything the parser does not recognize is dropped silently; these errors
//! are reserved for broken internal invariants. Line numbers are 1-based.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to read a header or directory
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// `#else` / `#endif` with nothing on the conditional stack
    #[error("{file}:{line}: `{directive}` without an open conditional")]
    UnbalancedConditional {
        file: String,
        line: usize,
        directive: String,
    },

    /// `#pragma pack(pop)` with nothing pushed
    #[error("{file}:{line}: `#pragma pack(pop)` without a matching push")]
    PackUnderflow { file: String, line: usize },

    /// `#pragma pack(push, N)` where N is not a number
    #[error("{file}:{line}: invalid pack size in `{text}`")]
    InvalidPackSize {
        file: String,
        line: usize,
        text: String,
    },

    /// A line that must have a fixed shape did not
    #[error("{file}:{line}: expected {expected}, found `{text}`")]
    Malformed {
        file: String,
        line: usize,
        expected: &'static str,
        text: String,
    },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
