//! Source file discovery.
//!
//! [`SourceFiles`] walks a project tree lazily and yields one [`SourceFile`] per
//! regular file whose extension is in the language table. Directories named in
//! [`IGNORED_DIRS`] are pruned by exact segment match.
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::errors::ScanError;
use crate::language::Language;

/// Directory names never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    ".vscode",
    "bin",
    "obj",
    "__pycache__",
    ".next",
    ".cache",
];

/// A file admitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Project-relative path with forward slashes.
    pub relative_path: String,
    pub content: String,
    pub language: Language,
}

impl SourceFile {
    /// Directory containing the file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Normalise a path relative to `root` into a forward-slash string.
#[must_use]
pub fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> =
        rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| IGNORED_DIRS.contains(&name))
}

fn keep_entry(entry: &DirEntry) -> bool {
    !is_ignored_dir(entry)
}

/// Lazy producer of [`SourceFile`] values for one scan.
///
/// Traversal errors are yielded as `Err` and should abort the scan. Files that
/// cannot be read as UTF-8 text are skipped with a warning.
pub struct SourceFiles {
    root: PathBuf,
    walker: FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl SourceFiles {
    /// Start walking `root`. Entries are visited in file-name order.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(keep_entry as fn(&DirEntry) -> bool);
        Self { root: root.to_path_buf(), walker }
    }

    fn admit(&self, entry: &DirEntry) -> Option<SourceFile> {
        if !entry.file_type().is_file() {
            return None;
        }
        let path = entry.path();
        let language = path.extension().and_then(|e| e.to_str()).and_then(Language::from_extension)?;
        let relative_path = relative_id(&self.root, path)?;
        match std::fs::read_to_string(path) {
            Ok(content) => Some(SourceFile { path: path.to_path_buf(), relative_path, content, language }),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        }
    }
}

impl Iterator for SourceFiles {
    type Item = Result<SourceFile, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walker.next()? {
                Err(e) => {
                    let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    return Some(Err(ScanError::Traversal { path, source: e }));
                }
                Ok(entry) => {
                    if let Some(file) = self.admit(&entry) {
                        return Some(Ok(file));
                    }
                }
            }
        }
    }
}

/// Collect every eligible file under `root`, failing on the first traversal error.
///
/// # Errors
/// Returns `ScanError::NotADirectory` when `root` is not a directory and
/// `ScanError::Traversal` when a directory cannot be read.
pub fn collect_source_files(root: &Path) -> Result<Vec<SourceFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    SourceFiles::new(root).collect()
}
