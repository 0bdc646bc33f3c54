//! Test source discovery
//!
//! The generator never touches the filesystem directly. It asks a [`TestSource`] for the files in a directory and
//! for a line reader over each file, which lets tests substitute an in-memory directory ([`MemorySource`]) for the
//! real one ([`FsSource`]).
//!
//! Which files count as tests is decided by a [`FileMatcher`] compiled from a glob (`test_*.c` by default) and
//! applied to file names only; discovery is not recursive.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher};

// ============================================================================
// Test Source Interface
// ============================================================================

/// Where test files are listed and read from.
pub trait TestSource {
    /// List the entries directly inside `dir` that are not directories.
    ///
    /// Returns `Ok(None)` when `dir` does not exist or is not a directory. Order is unspecified. Entries that cannot
    /// be stat'ed (dangling symlinks) are listed so that opening them fails loudly.
    fn list_files(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>>;

    /// Open a file for line-by-line reading. The reader is dropped (and the file closed) when scanning ends.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;
}

impl<T: TestSource + ?Sized> TestSource for &T {
    fn list_files(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>> {
        (**self).list_files(dir)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        (**self).open(path)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl TestSource for FsSource {
    fn list_files(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            // Follows symlinks; only known directories are skipped
            let is_dir = fs::metadata(&path).is_ok_and(|meta| meta.is_dir());
            if !is_dir {
                files.push(path);
            }
        }
        Ok(Some(files))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// An in-memory directory tree.
///
/// Adding a file registers its parent directory. Files marked unreadable are listed but fail to open; directories
/// marked unlistable exist but fail to list.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    unreadable: BTreeSet<PathBuf>,
    unlistable: BTreeSet<PathBuf>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an (initially empty) directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(dir.into());
        self
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.insert(parent.to_path_buf());
        }
        self.files.insert(path, contents.into());
        self
    }

    /// Add a file that is listed but cannot be opened.
    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.unreadable.insert(path.clone());
        self.with_file(path, Vec::new())
    }

    /// Register a directory that exists but cannot be listed.
    pub fn with_unlistable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.unlistable.insert(dir.clone());
        self.with_dir(dir)
    }
}

impl TestSource for MemorySource {
    fn list_files(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>> {
        if !self.dirs.contains(dir) {
            return Ok(None);
        }
        if self.unlistable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} cannot be listed", dir.display()),
            ));
        }
        let files = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        Ok(Some(files))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not readable", path.display()),
            ));
        }
        match self.files.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )),
        }
    }
}

// ============================================================================
// File name matching
// ============================================================================

/// Default glob for test file names.
pub const DEFAULT_TEST_FILE_PATTERN: &str = "test_*.c";

/// Matches test file names against a glob.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    pattern: String,
    matcher: GlobMatcher,
}

impl FileMatcher {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let glob: Glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check a bare file name. Hidden files only match patterns that start with `.` themselves.
    ///
    /// Names are matched as raw bytes, so names that are not valid UTF-8 still match.
    pub fn matches_name(&self, name: impl AsRef<OsStr>) -> bool {
        let name = name.as_ref();
        if name.as_encoded_bytes().starts_with(b".") && !self.pattern.starts_with('.') {
            return false;
        }
        self.matcher.is_match(name)
    }

    /// Check the file-name component of a path.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.matches_name(name))
    }
}

impl Default for FileMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_FILE_PATTERN).expect("INVARIANT: default test file pattern is a valid glob")
    }
}

/// Discover test files in a directory, sorted by path.
///
/// Returns `Ok(None)` when the directory is missing; the caller decides whether that is an error.
#[tracing::instrument(skip(source, matcher), fields(pattern = matcher.pattern()))]
pub fn discover_test_files<S: TestSource + ?Sized>(
    source: &S,
    dir: &Path,
    matcher: &FileMatcher,
) -> io::Result<Option<Vec<PathBuf>>> {
    let Some(entries) = source.list_files(dir)? else {
        return Ok(None);
    };

    let mut files: Vec<PathBuf> = entries.into_iter().filter(|p| matcher.matches_path(p)).collect();
    files.sort();
    tracing::debug!(count = files.len(), "discovered test files");
    Ok(Some(files))
}

// ============================================================================
// Tests
// ============================================================================
