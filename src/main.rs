//! steamworks-parser: parse a Steamworks SDK header directory and print the
//! resulting model.
//!
//! `steamworks-parser sdk/public/steam -f json -o steam.json`

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use steamworks_parser::{gameserver, render, ParserConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "steamworks-parser",
    about = "Parse the annotated Steamworks SDK headers into a structured model"
)]
struct Cli {
    /// Directory containing the SDK headers (not searched recursively)
    dir: PathBuf,

    /// Output format: json (default), summary
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Write to this file instead of stdout; a directory gets `steamworks.<ext>`
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// JSON file overriding parser settings; missing keys keep their defaults
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Add game-server copies of the shared interfaces
    #[arg(long)]
    gameserver: bool,

    /// Warn about files starting with a UTF-8 byte-order mark
    #[arg(long)]
    warn_bom: bool,

    /// Warn when an include guard does not match its file name
    #[arg(long)]
    warn_include_guard: bool,

    /// Warn about missing whitespace inside function parentheses
    #[arg(long)]
    warn_spacing: bool,

    /// Log parser decisions at debug level
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let mut model = steamworks_parser::parse_dir(&cli.dir, &config)
        .with_context(|| format!("failed to parse headers in {}", cli.dir.display()))?;

    if cli.gameserver {
        gameserver::synthesize(&mut model.files, &config);
    }

    let renderer = render::create_renderer(&cli.format)?;
    let output = renderer.render(&model)?;

    match cli.output {
        Some(ref path) => {
            let path = output_path(path, renderer.file_extension());
            fs::write(&path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?
        }
        None => print!("{}", output),
    }
    Ok(())
}

fn output_path(path: &Path, ext: &str) -> PathBuf {
    if path.is_dir() {
        path.join(format!("steamworks.{}", ext))
    } else {
        path.to_path_buf()
    }
}

/// Log to stderr. `RUST_LOG` wins over the default level.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "steamworks_parser=debug"
    } else {
        "steamworks_parser=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then command-line flags.
fn build_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => ParserConfig::default(),
    };

    if cli.warn_bom {
        config.warn_utf8bom = true;
    }
    if cli.warn_include_guard {
        config.warn_include_guard = true;
    }
    if cli.warn_spacing {
        config.warn_spacing = true;
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<ParserConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config: {}", path.display()))
}
