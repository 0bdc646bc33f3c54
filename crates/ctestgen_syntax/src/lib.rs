//! Syntax layer for C test sources: the `TEST(...)` line scanner, test-name checks, diagnostics.
//!
//! This crate is dependency-light and knows nothing about directories or output files. It answers one question per
//! line: does this line declare a test, and if so, what is the name?
//!
//! ## Notes
//! - A declaration is a line that *starts* with the declaration macro (`TEST` by default) immediately followed by
//!   `(`, and that contains a `)` somewhere after it. The name is everything up to the *last* `)` on the line.
//! - Multi-line declarations, nested parentheses and multiple declarations per line are not recognised specially;
//!   see [`scanner`] for the exact edge-case behavior.
//!
//! ## Examples
//! ```rust
//! use ctestgen_syntax::scanner;
//!
//! let capture = scanner::scan_line("TEST(add) // adds", "TEST").unwrap();
//! assert_eq!(capture.name, "add");
//! assert!(scanner::scan_line("  TEST(indented)", "TEST").is_none());
//! ```

pub mod diagnostics;
pub mod names;
pub mod scanner;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use scanner::{Capture, DeclarationScanner, TestDeclaration, scan_line};
