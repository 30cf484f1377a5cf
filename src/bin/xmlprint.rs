//! Command-line front end: parses XML files and prints them back, indented
//! one unit per nesting level or compact.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use xmlprint::error::ParseError;
use xmlprint::parser::{self, ParseOptions};
use xmlprint::serial::{print, IoSink, PrintOptions};
use xmlprint::Document;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlprint -- parse XML files and print them back.
#[derive(Parser, Debug)]
#[command(name = "xmlprint", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Log parser and printer activity to stderr.
    #[arg(long)]
    verbose: bool,

    // -- Parsing options ---------------------------------------------------
    /// Keep whitespace-only text between elements.
    #[arg(long)]
    keep_blanks: bool,

    /// Trim leading and trailing whitespace from text.
    #[arg(long)]
    trim: bool,

    /// Maximum element nesting depth.
    #[arg(long, value_name = "N", default_value_t = 256)]
    max_depth: u32,

    // -- Output options ----------------------------------------------------
    /// Print on one line without indentation or line breaks.
    #[arg(long)]
    no_indent: bool,

    /// Indentation unit repeated once per nesting level.
    #[arg(long, value_name = "CHAR", default_value_t = '\t', hide_default_value = true)]
    indent_char: char,

    /// Do not output the result tree.
    #[arg(long)]
    noout: bool,

    /// Write output to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<String>,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .keep_blanks(self.keep_blanks)
            .trim_whitespace(self.trim)
            .max_depth(self.max_depth)
    }

    fn print_options(&self) -> PrintOptions {
        PrintOptions::default()
            .no_indenting(self.no_indent)
            .indent_char(self.indent_char)
    }
}

// ---------------------------------------------------------------------------
// Errors and exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
}

impl CliError {
    fn io(path: &str, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } => EXIT_IO_ERROR,
            Self::Parse { .. } => EXIT_PARSE_ERROR,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut out = match open_output(&cli) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    let mut worst_exit = EXIT_SUCCESS;
    for file in &cli.files {
        if let Err(e) = process_file(&cli, file, &mut out) {
            eprintln!("{e}");
            worst_exit = worst_exit.max(e.exit_code());
        }
    }

    if let Err(e) = out.flush() {
        eprintln!("{}: {e}", output_name(&cli));
        worst_exit = worst_exit.max(EXIT_IO_ERROR);
    }

    ExitCode::from(worst_exit)
}

/// Parses one input and prints it to `out`.
fn process_file(cli: &Cli, filename: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let input = read_input(filename).map_err(|e| CliError::io(filename, e))?;
    debug!("{filename}: read {} bytes", input.len());

    let doc = parse(cli, filename, &input)?;
    if cli.noout {
        info!("{filename}: parsed, output suppressed");
        return Ok(());
    }

    print(IoSink::new(out), &doc, doc.root(), &cli.print_options())
        .map(drop)
        .map_err(|e| CliError::io(output_name(cli), e))
}

fn parse(cli: &Cli, filename: &str, input: &str) -> Result<Document, CliError> {
    parser::parse_str_with_options(input, &cli.parse_options()).map_err(|source| {
        CliError::Parse {
            path: filename.to_string(),
            source,
        }
    })
}

// ---------------------------------------------------------------------------
// I/O helpers
// ---------------------------------------------------------------------------

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<String> {
    if filename == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(filename)
    }
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>, CliError> {
    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::io(path, e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn output_name(cli: &Cli) -> &str {
    cli.output.as_deref().unwrap_or("<stdout>")
}
