//! Diagnostics with source context
//!
//! Rendered in the familiar compiler layout:
//!
//! ```text
//! error: test name contains whitespace
//!   --> tests/test_math.c:3:6
//!   |
//! 3 | TEST( add )
//!   |      ^^^^^
//!   = hint: declare tests as TEST(name) with no spaces
//! ```

/// A problem found at a specific place in a test source.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub kind: DiagnosticKind,
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column
    pub column: usize,
    /// Number of bytes to underline (at least one caret is always drawn)
    pub len: usize,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: usize, column: usize, len: usize) -> Self {
        Self {
            message: message.into(),
            kind: DiagnosticKind::Error,
            line,
            column,
            len,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize, len: usize) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            ..Self::error(message, line, column, len)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Error => write!(f, "error"),
            DiagnosticKind::Warning => write!(f, "warning"),
        }
    }
}

/// Format a diagnostic against the line it points into (plain text, no colors).
pub fn format_diagnostic(file_name: &str, line_text: &str, diag: &Diagnostic) -> String {
    let gutter = diag.line.to_string().len();
    let col = diag.column.max(1);
    let available = line_text.len().saturating_sub(col - 1);
    let underline = diag.len.min(available).max(1);

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", diag.kind, diag.message));
    out.push_str(&format!("{:>width$}--> {}:{}:{}\n", "", file_name, diag.line, col, width = gutter + 1));
    out.push_str(&format!("{:>width$} |\n", "", width = gutter));
    out.push_str(&format!("{} | {}\n", diag.line, line_text));
    out.push_str(&format!(
        "{:>width$} | {}{}\n",
        "",
        " ".repeat(col - 1),
        "^".repeat(underline),
        width = gutter
    ));

    for note in &diag.notes {
        out.push_str(&format!("{:>width$}= note: {}\n", "", note, width = gutter + 1));
    }
    for hint in &diag.hints {
        out.push_str(&format!("{:>width$}= hint: {}\n", "", hint, width = gutter + 1));
    }

    out
}
