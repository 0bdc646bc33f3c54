//! Fragment writer
//!
//! Emits one `RUNNER(name);` line per test, immediately, into any `Write`.

use std::io::Write;

use super::error::GenerateError;

/// Writer that formats runner invocations and counts them
pub struct FragmentWriter<W: Write> {
    inner: W,
    runner_macro: String,
    /// Human-readable name of the destination, used in errors
    target: String,
    lines_written: usize,
}

impl<W: Write> FragmentWriter<W> {
    pub fn new(inner: W, runner_macro: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            inner,
            runner_macro: runner_macro.into(),
            target: target.into(),
            lines_written: 0,
        }
    }

    /// Write `RUNNER(name);\n`. The name is written verbatim.
    pub fn write_invocation(&mut self, name: &str) -> Result<(), GenerateError> {
        writeln!(self.inner, "{}({});", self.runner_macro, name).map_err(|source| GenerateError::WriteOutput {
            target: self.target.clone(),
            source,
        })?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of invocations written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, GenerateError> {
        self.inner.flush().map_err(|source| GenerateError::WriteOutput {
            target: self.target.clone(),
            source,
        })?;
        Ok(self.inner)
    }
}
