//! CLI module for ctestgen
//!
//! ```text
//! ctestgen <TEST_DIR> <OUTPUT_FILE> [--strict] [--names pass|reject] [--pattern GLOB]
//!          [--macro NAME] [--runner NAME] [--check] [--list[=text|json]]
//! ```
//!
//! With no flags the tool regenerates `OUTPUT_FILE` from the `test_*.c` files in `TEST_DIR`.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::generate::{GenerateError, GeneratorConfig, MissingDirPolicy, NamePolicy};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Invalid configuration (bad pattern or macro name)
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<GenerateError> for CliError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::InvalidPattern { .. } | GenerateError::InvalidMacroName { .. } => {
                CliError::new(format!("Error: {}", err), ExitCode::USAGE)
            }
            // Already rendered with its own "error:" header and source context
            GenerateError::InvalidTestName { rendered, .. } => CliError::failure(rendered),
            other => CliError::failure(format!("Error: {}", other)),
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate RUN_TEST(...) invocations from TEST(...) declarations in C test files
#[derive(Parser, Debug)]
#[command(name = "ctestgen")]
#[command(version = VERSION)]
#[command(about = "Generate RUN_TEST(...) invocations from TEST(...) declarations", long_about = None)]
pub struct Cli {
    /// Directory containing test_*.c files
    #[arg(value_name = "TEST_DIR")]
    pub test_dir: PathBuf,

    /// Fragment to (over)write
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Fail if TEST_DIR is missing or unlistable instead of generating an empty fragment
    #[arg(long)]
    pub strict: bool,

    /// What to do with test names that are not identifier characters
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = NamesArg::Pass)]
    pub names: NamesArg,

    /// Glob for test file names
    #[arg(long, value_name = "GLOB", default_value = crate::discovery::DEFAULT_TEST_FILE_PATTERN)]
    pub pattern: String,

    /// Macro that declares a test at the start of a line
    #[arg(long = "macro", value_name = "NAME", default_value = ctestgen_syntax::scanner::DEFAULT_DECLARATION_MACRO)]
    pub declaration_macro: String,

    /// Macro invoked for each test in the fragment
    #[arg(long = "runner", value_name = "NAME", default_value = crate::generate::DEFAULT_RUNNER_MACRO)]
    pub runner_macro: String,

    /// Verify OUTPUT_FILE is up to date without writing it
    #[arg(long)]
    pub check: bool,

    /// Print the discovered tests to stdout
    #[arg(
        long,
        value_enum,
        value_name = "FORMAT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "text"
    )]
    pub list: Option<ListFormat>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamesArg {
    /// Write names verbatim
    Pass,
    /// Abort on the first name that cannot be pasted into an identifier
    Reject,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One `file:line: name` per test
    Text,
    Json,
}

impl Cli {
    /// Build the generator configuration from the parsed flags.
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_pattern(self.pattern.clone())
            .with_declaration_macro(self.declaration_macro.clone())
            .with_runner_macro(self.runner_macro.clone())
            .with_missing_dir(if self.strict {
                MissingDirPolicy::Strict
            } else {
                MissingDirPolicy::Lenient
            })
            .with_names(match self.names {
                NamesArg::Pass => NamePolicy::PassThrough,
                NamesArg::Reject => NamePolicy::Reject,
            })
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return the exit code.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();
    if cli.check {
        commands::check_fragment(&cli.test_dir, &cli.output, config, cli.list)
    } else {
        commands::generate_fragment(&cli.test_dir, &cli.output, config, cli.list)
    }
}

// ============================================================================
// Tests
// ============================================================================
