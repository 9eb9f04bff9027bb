//! objdiff - structural diff of two YAML/JSON documents
//!
//! Prints every path at which the documents differ. Exits with 0 when they are
//! equal, 1 when they differ and 2 on any error.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use object_diff::config::DiffConfig;
use object_diff::value::{self, Value};
use object_diff::ResultFormatter;

#[derive(Debug, Parser)]
#[command(name = "objdiff", version)]
#[command(about = "Structural diff of two YAML/JSON documents", long_about = None)]
struct Cli {
    /// Left document
    #[arg(short, long)]
    left: PathBuf,

    /// Right document
    #[arg(short, long)]
    right: PathBuf,

    /// YAML/JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path pattern to skip (full-match regular expression); repeatable
    #[arg(long = "ignore", value_name = "REGEX")]
    ignore: Vec<String>,

    /// Align lists of objects by this field instead of by position
    #[arg(long, value_name = "FIELD")]
    key_field: Option<String>,

    /// Identity label printed with the result; repeatable
    #[arg(long = "identity", value_name = "KEY=VALUE", value_parser = parse_identity)]
    identities: Vec<(String, String)>,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Log comparison details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_identity(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "object_diff=debug"
    } else {
        "object_diff=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the documents differ.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => DiffConfig::load(path)?,
        None => DiffConfig::default(),
    };
    config.ignore_paths.extend(cli.ignore);
    if cli.key_field.is_some() {
        config.key_field = cli.key_field;
    }
    config.identities.extend(cli.identities);
    debug!(?config, "effective configuration");

    let engine = config.to_builder().build()?;
    let left = read_document(&cli.left)?;
    let right = read_document(&cli.right)?;
    let result = engine.try_compare(&left, &right)?;

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match ResultFormatter::new().format(&result) {
        Some(text) => write!(output, "{}", text)?,
        None => writeln!(output, "no differences")?,
    }
    Ok(result.has_difference())
}

fn read_document(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    let document = value::from_yaml(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;
    Ok(document)
}
