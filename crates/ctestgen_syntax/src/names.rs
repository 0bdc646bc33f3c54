//! Test-name checks
//!
//! The runner macro pastes the captured name onto an identifier prefix (`test_ ## name`) and stringifies it, so a
//! usable name is a non-empty run of identifier-continue characters. A leading digit is fine (`test_123` is a valid
//! identifier).

/// Why a captured name cannot be pasted into an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameIssue {
    Empty,
    /// First offending character and its byte offset within the name
    InvalidChar { ch: char, offset: usize },
}

impl std::fmt::Display for NameIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameIssue::Empty => write!(f, "test name is empty"),
            NameIssue::InvalidChar { ch, .. } if ch.is_whitespace() => {
                write!(f, "test name contains whitespace")
            }
            NameIssue::InvalidChar { ch, .. } => {
                write!(f, "test name contains '{}', which cannot appear in an identifier", ch)
            }
        }
    }
}

/// Check if a character can start a C identifier (ASCII-only).
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue a C identifier (ASCII-only).
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Check that `name` can be pasted onto an identifier prefix.
pub fn check_test_name(name: &str) -> Result<(), NameIssue> {
    if name.is_empty() {
        return Err(NameIssue::Empty);
    }
    match name.char_indices().find(|(_, c)| !is_ident_continue(*c)) {
        Some((offset, ch)) => Err(NameIssue::InvalidChar { ch, offset }),
        None => Ok(()),
    }
}

/// True if `name` is a complete C identifier on its own.
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}
