//! Line scanner for `TEST(name)` declarations
//!
//! Recognises the same lines as the anchored, greedy pattern `^TEST\((.*)\)`:
//!
//! - the line must begin with the macro name immediately followed by `(`; leading whitespace defeats the match
//! - the name runs from just after that `(` to the **last** `)` on the line, so `TEST(a) x(b)` captures `a) x(b`
//! - a line without a `)` after the opening parenthesis is not a declaration
//! - `TEST()` is a declaration with an empty name
//!
//! Lines end at `\n`, `\r\n` or a lone `\r`.

use std::io::{self, BufRead};

/// Default declaration macro name.
pub const DEFAULT_DECLARATION_MACRO: &str = "TEST";

/// A name captured from a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'a> {
    /// Verbatim captured text (no trimming)
    pub name: &'a str,
    /// 1-based byte column at which `name` starts
    pub column: usize,
}

/// A declaration found while scanning a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDeclaration {
    pub name: String,
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column of the captured name
    pub column: usize,
    /// The full source line, without its terminator (kept for diagnostics)
    pub source_line: String,
}

/// Scan a single line (without its terminator) for a declaration.
pub fn scan_line<'a>(line: &'a str, macro_name: &str) -> Option<Capture<'a>> {
    let rest = line.strip_prefix(macro_name)?;
    let body = rest.strip_prefix('(')?;
    let close = body.rfind(')')?;
    Some(Capture {
        name: &body[..close],
        column: macro_name.len() + 2,
    })
}

/// Length of the first line in `bytes` and of its terminator (`0` when the line runs to the end).
fn split_line(bytes: &[u8]) -> (usize, usize) {
    match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(i) if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') => (i, 2),
        Some(i) => (i, 1),
        None => (bytes.len(), 0),
    }
}

/// Lazily scans a reader line by line, yielding every declaration in order.
///
/// The reader is consumed as the iterator advances; nothing is buffered beyond the current `\n`-terminated chunk,
/// which may hold several `\r`-separated lines. Invalid UTF-8 is decoded lossily. The first I/O error is yielded and
/// ends the iteration.
pub struct DeclarationScanner<R> {
    reader: R,
    macro_name: String,
    buf: Vec<u8>,
    /// Start of the next unscanned line in `buf`
    pos: usize,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> DeclarationScanner<R> {
    pub fn new(reader: R, macro_name: impl Into<String>) -> Self {
        Self {
            reader,
            macro_name: macro_name.into(),
            buf: Vec::new(),
            pos: 0,
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for DeclarationScanner<R> {
    type Item = io::Result<TestDeclaration>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.buf.len() {
                if self.done {
                    return None;
                }
                self.buf.clear();
                self.pos = 0;
                match self.reader.read_until(b'\n', &mut self.buf) {
                    Ok(0) => {
                        self.done = true;
                        return None;
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.done = true;
                        self.buf.clear();
                        return Some(Err(e));
                    }
                }
            }

            let start = self.pos;
            let (len, terminator) = split_line(&self.buf[start..]);
            self.pos = start + len + terminator;
            self.line_no += 1;

            let line = String::from_utf8_lossy(&self.buf[start..start + len]);
            if let Some(capture) = scan_line(&line, &self.macro_name) {
                return Some(Ok(TestDeclaration {
                    name: capture.name.to_string(),
                    line: self.line_no,
                    column: capture.column,
                    source_line: line.to_string(),
                }));
            }
        }
    }
}

/// Convenience function to collect every declaration in a string.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn scan_source(source: &str, macro_name: &str) -> Vec<TestDeclaration> {
    DeclarationScanner::new(source.as_bytes(), macro_name)
        .filter_map(Result::ok)
        .collect()
}
