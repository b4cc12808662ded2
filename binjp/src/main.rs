//! jp command-line tool for checking, formatting, and transcoding JSON documents.
//!
//! Usage: jp [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (json, compact, debug, yaml, toml, cbor, diag)
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   --max-depth <N>        Maximum nesting of objects and arrays
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` for parser tracing.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum, ValueHint};
use libjp::{encode, parse_with_context, Format, ParseContext, ParseOptions, Value, DEFAULT_MAX_DEPTH};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod transcode;

#[derive(Parser)]
#[command(
    name = "jp",
    version,
    about = "Check, pretty-print, and transcode JSON documents",
    after_help = r#"EXAMPLES
  $ jp data.json                 # pretty-print with sorted keys
  $ echo '{"a": [1, 2]}' | jp -t yaml
  $ jp --check fixtures/         # validate every .json file in a directory"#
)]
struct Cli {
    /// Input file or directory (reads from stdin if not provided or `-`).
    /// When a directory is given, processes all .json files in it.
    #[arg(value_hint = ValueHint::AnyPath)]
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "json")]
    to: OutputFormat,

    /// Write output to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Validate only; print "<file>: ok" for each valid file.
    #[arg(long)]
    check: bool,

    /// Maximum nesting of objects and arrays.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented JSON with sorted keys.
    Json,
    /// Single-line JSON with sorted keys.
    Compact,
    /// Rust debug rendering of the value tree.
    Debug,
    Yaml,
    Toml,
    Cbor,
    /// CBOR diagnostic notation.
    Diag,
}

impl OutputFormat {
    fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Compact => "compact JSON",
            OutputFormat::Debug => "debug",
            OutputFormat::Yaml => "YAML",
            OutputFormat::Toml => "TOML",
            OutputFormat::Cbor => "CBOR",
            OutputFormat::Diag => "CBOR diagnostic notation",
        }
    }
}

/// Rendered document, ready to write.
enum Rendered {
    Text(String),
    Binary(Vec<u8>),
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let options = ParseOptions::new().with_max_depth(cli.max_depth);
    let input_path = cli.input.as_deref().filter(|p| *p != Path::new("-"));

    if let Some(path) = input_path {
        if path.is_dir() {
            if cli.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, &cli, &options));
        }
    }

    let input = match read_input(input_path) {
        Ok(input) => input,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    process::exit(process_input(&input, input_path, &cli, &options));
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Error reading {}: {}", path.display(), e))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

/// Process every `.json` file in a directory, in name order.
fn process_directory(dir: &Path, cli: &Cli, options: &ParseOptions) -> i32 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir.display(), e);
            return 1;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    info!(dir = %dir.display(), files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in &paths {
        let exit_code = match read_input(Some(path)) {
            Ok(input) => process_input(&input, Some(path), cli, options),
            Err(message) => {
                eprintln!("{}", message);
                1
            }
        };
        if exit_code != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(input: &str, path: Option<&Path>, cli: &Cli, options: &ParseOptions) -> i32 {
    let filename = path.map(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.display().to_string())
    });
    let ctx = ParseContext::new(filename.as_deref());

    let value = match parse_with_context(input, &ctx, options) {
        Ok(value) => value,
        Err(e) => {
            debug!(kind = ?e.kind(), offset = e.context().offset, "rejected input");
            match path {
                Some(path) => eprintln!("{}: {}", path.display(), e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };

    if cli.check {
        match path {
            Some(path) => println!("{}: ok", path.display()),
            None => println!("ok"),
        }
        return 0;
    }

    let rendered = match render(&value, cli.to) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error: Cannot convert to {}: {}", cli.to.name(), e);
            return 1;
        }
    };

    let written = match &rendered {
        Rendered::Text(text) => write_text_output(text, cli.output.as_deref()),
        Rendered::Binary(bytes) => write_binary_output(bytes, cli.output.as_deref()),
    };
    match written {
        Ok(()) => 0,
        Err(message) => {
            eprintln!("{}", message);
            1
        }
    }
}

fn render(value: &Value, format: OutputFormat) -> Result<Rendered, String> {
    Ok(match format {
        OutputFormat::Json => Rendered::Text(encode(value, Format::Json)),
        OutputFormat::Compact => Rendered::Text(encode(value, Format::Compact)),
        OutputFormat::Debug => Rendered::Text(format!("{:#?}", value)),
        OutputFormat::Yaml => Rendered::Text(transcode::yaml::encode(value)?),
        OutputFormat::Toml => Rendered::Text(transcode::toml::encode(value)?),
        OutputFormat::Cbor => Rendered::Binary(transcode::cbor::encode(value)),
        OutputFormat::Diag => {
            Rendered::Text(transcode::cbor::diagnostic(&transcode::cbor::encode(value))?)
        }
    })
}

fn write_text_output(output: &str, output_file: Option<&Path>) -> Result<(), String> {
    match output_file {
        Some(path) => {
            let mut text = output.to_string();
            if !text.ends_with('\n') {
                text.push('\n');
            }
            fs::write(path, text).map_err(|e| format!("Error writing {}: {}", path.display(), e))
        }
        None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

fn write_binary_output(output: &[u8], output_file: Option<&Path>) -> Result<(), String> {
    match output_file {
        Some(path) => {
            fs::write(path, output).map_err(|e| format!("Error writing {}: {}", path.display(), e))
        }
        None => io::stdout()
            .lock()
            .write_all(output)
            .map_err(|e| format!("Error writing to stdout: {}", e)),
    }
}
