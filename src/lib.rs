#![forbid(unsafe_code)]
//! ctestgen: test discovery for C test suites
//!
//! Scans a directory for `test_*.c` files, picks up every line that starts with a `TEST(name)` declaration and writes
//! a fragment with one `RUN_TEST(name);` per declaration. The fragment is meant to be `#include`d by a test driver.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Layout
//!
//! - `discovery` - where test sources come from (filesystem or in-memory) and which file names count as tests
//! - `generate` - the generator itself: config, fragment writer, errors
//! - `cli` - command-line surface

pub mod cli;
pub mod discovery;
pub mod generate;

pub use ctestgen_syntax::{scanner, names, diagnostics};

pub use discovery::{FileMatcher, FsSource, MemorySource, TestSource};
pub use generate::{
    CheckOutcome, DiscoveredTest, GenerateError, GenerationReport, Generator, GeneratorConfig, MissingDirPolicy,
    NamePolicy, generate,
};
