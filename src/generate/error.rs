//! Errors raised while generating a fragment
//!
//! Every error is fatal to the run; there is no per-file recovery.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid test file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid {what} '{name}': expected a C identifier")]
    InvalidMacroName { what: &'static str, name: String },

    #[error("test directory '{}' does not exist or is not a directory", path.display())]
    MissingTestDir { path: PathBuf },

    #[error("failed to list test directory '{}': {source}", path.display())]
    ListTestDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read test file '{}': {source}", path.display())]
    ReadTestFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output file '{}': {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read output file '{}': {source}", path.display())]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to {target}: {source}")]
    WriteOutput {
        target: String,
        #[source]
        source: io::Error,
    },

    /// A captured name was rejected; `rendered` holds the diagnostic with source context.
    #[error("{rendered}")]
    InvalidTestName {
        path: PathBuf,
        name: String,
        line: usize,
        rendered: String,
    },
}

impl GenerateError {
    /// True for errors caused by I/O rather than by the inputs' content or the configuration.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            GenerateError::ListTestDir { .. }
                | GenerateError::ReadTestFile { .. }
                | GenerateError::CreateOutput { .. }
                | GenerateError::ReadOutput { .. }
                | GenerateError::WriteOutput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_message() {
        let err = GenerateError::MissingTestDir { path: PathBuf::from("tests") };
        assert_eq!(err.to_string(), "test directory 'tests' does not exist or is not a directory");
        assert!(!err.is_io());
    }

    #[test]
    fn test_create_output_message_and_source() {
        let err = GenerateError::CreateOutput {
            path: PathBuf::from("_build/tests.inc"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "failed to create output file '_build/tests.inc': No such file or directory"
        );
        assert!(err.is_io());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_macro_name_message() {
        let err = GenerateError::InvalidMacroName { what: "runner macro", name: "RUN-TEST".to_string() };
        assert_eq!(err.to_string(), "invalid runner macro 'RUN-TEST': expected a C identifier");
    }
}
