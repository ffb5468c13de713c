//! steamworks-parser: turn the annotated Steamworks SDK C++ headers into a
//! structured model for binding generators.
//!
//! ```no_run
//! use steamworks_parser::{parse_dir, ParserConfig};
//!
//! let model = parse_dir("sdk/public/steam".as_ref(), &ParserConfig::default())?;
//! for file in &model.files {
//!     println!("{}: {} interfaces", file.name, file.interfaces.len());
//! }
//! # Ok::<(), steamworks_parser::ParseError>(())
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod gameserver;
pub mod model;
pub mod parser;
pub mod render;

pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use model::Model;
pub use parser::Parser;

use std::path::Path;

/// Parse every header in `dir` with `config`.
pub fn parse_dir(dir: &Path, config: &ParserConfig) -> Result<Model> {
    let mut parser = Parser::new(config.clone());
    parser.parse_dir(dir)?;
    Ok(parser.into_model())
}
