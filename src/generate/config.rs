//! Generator configuration
//!
//! Defaults reproduce the classic behavior: `test_*.c` files, `TEST(name)` declarations, `RUN_TEST(name);`
//! invocations, a missing test directory treated as empty and captured names written verbatim.

use ctestgen_syntax::scanner::DEFAULT_DECLARATION_MACRO;

use crate::discovery::DEFAULT_TEST_FILE_PATTERN;

/// Default runner macro written to the fragment.
pub const DEFAULT_RUNNER_MACRO: &str = "RUN_TEST";

/// What to do when the test directory does not exist, is not a directory, or cannot be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDirPolicy {
    /// Treat it as a directory with no test files (logs a warning).
    #[default]
    Lenient,
    /// Fail before the output file is touched.
    Strict,
}

/// What to do with captured names that cannot be pasted into an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Write the name verbatim (logs a warning).
    #[default]
    PassThrough,
    /// Abort the run with a diagnostic pointing at the declaration.
    Reject,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Glob matched against file names in the test directory
    pub pattern: String,
    /// Macro that declares a test at the start of a line
    pub declaration_macro: String,
    /// Macro invoked once per test in the generated fragment
    pub runner_macro: String,
    pub missing_dir: MissingDirPolicy,
    pub names: NamePolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TEST_FILE_PATTERN.to_string(),
            declaration_macro: DEFAULT_DECLARATION_MACRO.to_string(),
            runner_macro: DEFAULT_RUNNER_MACRO.to_string(),
            missing_dir: MissingDirPolicy::default(),
            names: NamePolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test file glob
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the declaration macro name
    pub fn with_declaration_macro(mut self, name: impl Into<String>) -> Self {
        self.declaration_macro = name.into();
        self
    }

    /// Set the runner macro name
    pub fn with_runner_macro(mut self, name: impl Into<String>) -> Self {
        self.runner_macro = name.into();
        self
    }

    pub fn with_missing_dir(mut self, policy: MissingDirPolicy) -> Self {
        self.missing_dir = policy;
        self
    }

    pub fn with_names(mut self, policy: NamePolicy) -> Self {
        self.names = policy;
        self
    }

    /// Shorthand for `with_missing_dir(MissingDirPolicy::Strict)`
    pub fn strict(self) -> Self {
        self.with_missing_dir(MissingDirPolicy::Strict)
    }
}
