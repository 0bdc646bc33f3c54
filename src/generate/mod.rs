//! Fragment generation
//!
//! A run is a single linear pass:
//!
//! 1. list the test directory and keep the files whose names match the pattern (sorted by path)
//! 2. open the output (truncating it)
//! 3. scan each test file line by line; every `TEST(name)` line immediately becomes a `RUN_TEST(name);` line
//! 4. flush
//!
//! Any failure aborts the whole run. If it happens after step 2 the output is left partially written.

mod config;
mod error;
mod writer;

pub use config::{DEFAULT_RUNNER_MACRO, GeneratorConfig, MissingDirPolicy, NamePolicy};
pub use error::GenerateError;
pub use writer::FragmentWriter;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use ctestgen_syntax::diagnostics::{Diagnostic, DiagnosticKind, format_diagnostic};
use ctestgen_syntax::names::{NameIssue, check_test_name, is_c_identifier};
use ctestgen_syntax::scanner::{DeclarationScanner, TestDeclaration};

use crate::discovery::{FileMatcher, FsSource, TestSource, discover_test_files};

// ============================================================================
// Report types
// ============================================================================

/// A declaration together with the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTest {
    pub file: PathBuf,
    pub declaration: TestDeclaration,
}

impl DiscoveredTest {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Test files scanned, in scan order
    pub files: Vec<PathBuf>,
    /// Every declaration written, in output order
    pub tests: Vec<DiscoveredTest>,
    /// The test directory was missing or unlistable and treated as empty
    pub test_dir_missing: bool,
}

impl GenerationReport {
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// `file:line: name`, one test per line
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for test in &self.tests {
            out.push_str(&format!("{}:{}: {}\n", test.file.display(), test.declaration.line, test.name()));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let tests: Vec<serde_json::Value> = self
            .tests
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "file": t.file.display().to_string(),
                    "line": t.declaration.line,
                })
            })
            .collect();
        let files: Vec<String> = self.files.iter().map(|f| f.display().to_string()).collect();

        serde_json::json!({
            "files": files,
            "tests": tests,
            "test_dir_missing": self.test_dir_missing,
        })
    }
}

/// Result of comparing an existing output file against a fresh generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub up_to_date: bool,
    pub report: GenerationReport,
}

// ============================================================================
// Generator
// ============================================================================

/// Discovers tests through a [`TestSource`] and writes the invocation fragment.
pub struct Generator<S = FsSource> {
    source: S,
    config: GeneratorConfig,
    matcher: FileMatcher,
}

impl Generator<FsSource> {
    /// Generator over the real filesystem.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        Self::with_source(FsSource, config)
    }
}

impl<S: TestSource> Generator<S> {
    /// Generator over any test source. Validates the config and compiles the file pattern.
    pub fn with_source(source: S, config: GeneratorConfig) -> Result<Self, GenerateError> {
        if !is_c_identifier(&config.declaration_macro) {
            return Err(GenerateError::InvalidMacroName {
                what: "declaration macro",
                name: config.declaration_macro.clone(),
            });
        }
        if !is_c_identifier(&config.runner_macro) {
            return Err(GenerateError::InvalidMacroName {
                what: "runner macro",
                name: config.runner_macro.clone(),
            });
        }
        let matcher = FileMatcher::new(&config.pattern).map_err(|source| GenerateError::InvalidPattern {
            pattern: config.pattern.clone(),
            source,
        })?;

        Ok(Self { source, config, matcher })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// List the test files to scan, applying the missing-directory policy.
    ///
    /// A directory that exists but cannot be listed follows the same policy as a missing one. Returns the files and
    /// whether the directory was treated as empty.
    pub fn discover_files(&self, test_dir: &Path) -> Result<(Vec<PathBuf>, bool), GenerateError> {
        let listed = match discover_test_files(&self.source, test_dir, &self.matcher) {
            Ok(listed) => listed,
            Err(source) => match self.config.missing_dir {
                MissingDirPolicy::Strict => {
                    return Err(GenerateError::ListTestDir {
                        path: test_dir.to_path_buf(),
                        source,
                    });
                }
                MissingDirPolicy::Lenient => {
                    tracing::warn!(
                        dir = %test_dir.display(),
                        error = %source,
                        "test directory cannot be listed; generating an empty fragment"
                    );
                    return Ok((Vec::new(), true));
                }
            },
        };

        match listed {
            Some(files) => Ok((files, false)),
            None => match self.config.missing_dir {
                MissingDirPolicy::Strict => Err(GenerateError::MissingTestDir {
                    path: test_dir.to_path_buf(),
                }),
                MissingDirPolicy::Lenient => {
                    tracing::warn!(
                        dir = %test_dir.display(),
                        "test directory does not exist or is not a directory; generating an empty fragment"
                    );
                    Ok((Vec::new(), true))
                }
            },
        }
    }

    /// Discover tests in `test_dir` and write the fragment into `out`.
    #[tracing::instrument(skip_all, fields(dir = %test_dir.display()))]
    pub fn generate<W: Write>(&self, test_dir: &Path, out: W) -> Result<GenerationReport, GenerateError> {
        let (files, missing) = self.discover_files(test_dir)?;
        let mut writer = FragmentWriter::new(out, &self.config.runner_macro, "output");
        let report = self.emit(files, missing, &mut writer)?;
        writer.finish()?;
        Ok(report)
    }

    /// Generate into memory.
    pub fn render(&self, test_dir: &Path) -> Result<(Vec<u8>, GenerationReport), GenerateError> {
        let mut buf = Vec::new();
        let report = self.generate(test_dir, &mut buf)?;
        Ok((buf, report))
    }

    /// Discover tests in `test_dir` and overwrite `output` with the fragment.
    ///
    /// The output is created (or truncated) after the test directory has been listed and before any test file is
    /// read.
    #[tracing::instrument(skip_all, fields(dir = %test_dir.display(), output = %output.display()))]
    pub fn generate_file(&self, test_dir: &Path, output: &Path) -> Result<GenerationReport, GenerateError> {
        let (files, missing) = self.discover_files(test_dir)?;

        let file = fs::File::create(output).map_err(|source| GenerateError::CreateOutput {
            path: output.to_path_buf(),
            source,
        })?;
        let mut writer = FragmentWriter::new(
            BufWriter::new(file),
            &self.config.runner_macro,
            format!("'{}'", output.display()),
        );

        let report = self.emit(files, missing, &mut writer)?;
        let written = writer.lines_written();
        writer.finish()?;

        tracing::info!(files = report.files.len(), lines = written, "wrote test fragment");
        Ok(report)
    }

    /// Compare `output` against what [`generate_file`](Self::generate_file) would write, without modifying it.
    ///
    /// A missing output file is out of date.
    pub fn check_file(&self, test_dir: &Path, output: &Path) -> Result<CheckOutcome, GenerateError> {
        let (expected, report) = self.render(test_dir)?;

        let up_to_date = match fs::read(output) {
            Ok(existing) => existing == expected,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(GenerateError::ReadOutput {
                    path: output.to_path_buf(),
                    source,
                });
            }
        };

        Ok(CheckOutcome { up_to_date, report })
    }

    fn emit<W: Write>(
        &self,
        files: Vec<PathBuf>,
        test_dir_missing: bool,
        writer: &mut FragmentWriter<W>,
    ) -> Result<GenerationReport, GenerateError> {
        let mut report = GenerationReport {
            files: Vec::with_capacity(files.len()),
            tests: Vec::new(),
            test_dir_missing,
        };

        for path in files {
            tracing::debug!(file = %path.display(), "scanning");
            let read_error = |source: io::Error| GenerateError::ReadTestFile {
                path: path.clone(),
                source,
            };

            let reader = self.source.open(&path).map_err(read_error)?;
            let mut scanner = DeclarationScanner::new(reader, self.config.declaration_macro.as_str());
            for decl in scanner.by_ref() {
                let decl = decl.map_err(read_error)?;
                self.check_name(&path, &decl)?;
                writer.write_invocation(&decl.name)?;
                report.tests.push(DiscoveredTest {
                    file: path.clone(),
                    declaration: decl,
                });
            }
            tracing::debug!(file = %path.display(), lines = scanner.lines_read(), "scanned");
            report.files.push(path);
        }

        Ok(report)
    }

    fn check_name(&self, path: &Path, decl: &TestDeclaration) -> Result<(), GenerateError> {
        let Err(issue) = check_test_name(&decl.name) else {
            return Ok(());
        };

        match self.config.names {
            NamePolicy::PassThrough => {
                let rendered = render_name_issue(path, decl, &issue, DiagnosticKind::Warning);
                tracing::warn!(
                    file = %path.display(),
                    line = decl.line,
                    name = %decl.name,
                    "writing test name verbatim\n{}",
                    rendered
                );
                Ok(())
            }
            NamePolicy::Reject => Err(GenerateError::InvalidTestName {
                path: path.to_path_buf(),
                name: decl.name.clone(),
                line: decl.line,
                rendered: render_name_issue(path, decl, &issue, DiagnosticKind::Error),
            }),
        }
    }
}

fn render_name_issue(path: &Path, decl: &TestDeclaration, issue: &NameIssue, kind: DiagnosticKind) -> String {
    let (column, len) = match issue {
        NameIssue::Empty => (decl.column, 1),
        NameIssue::InvalidChar { ch, offset } => (decl.column + offset, ch.len_utf8()),
    };
    let message = issue.to_string();
    let diag = match kind {
        DiagnosticKind::Error => Diagnostic::error(message, decl.line, column, len),
        DiagnosticKind::Warning => Diagnostic::warning(message, decl.line, column, len),
    }
    .with_note("the name is pasted into an identifier by the runner macro")
    .with_hint("declare tests as TEST(name) using only letters, digits and '_'");

    format_diagnostic(&path.display().to_string(), &decl.source_line, &diag)
        .trim_end()
        .to_string()
}

/// Generate `output` from `test_dir` with the default configuration on the real filesystem.
pub fn generate(test_dir: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<GenerationReport, GenerateError> {
    Generator::new(GeneratorConfig::default())?.generate_file(test_dir.as_ref(), output.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
