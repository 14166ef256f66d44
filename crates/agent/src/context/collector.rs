//! Project context collection.
//!
//! Scans a directory recursively for source files, keeps the first
//! [`MAX_FILES`] of them, and renders each as a fenced block headed by its
//! path relative to the scanned root. Files are enumerated one extension at
//! a time in [`SOURCE_EXTENSIONS`] order; within an extension the order is
//! whatever the filesystem yields, so callers must not depend on which files
//! are picked when more are available.

use azcc_core::error::ContextError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions recognised as source code.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "java", "cpp", "h", "cs", "go", "rs", "ts", "html", "css",
];

/// Maximum number of files included in a context.
pub const MAX_FILES: usize = 5;

/// Files longer than this many characters are truncated.
pub const MAX_FILE_CHARS: usize = 1000;

const TRUNCATION_MARKER: &str = "...";

/// The result of scanning a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedContext {
    /// The rendered digest; `None` when no file could be used.
    pub text: Option<String>,
    /// Files rendered into `text`, relative to the root.
    pub files_used: Vec<PathBuf>,
    /// Eligible files found before the [`MAX_FILES`] cut.
    pub files_found: usize,
}

/// Builds project context digests from a directory tree.
#[derive(Debug, Clone, Default)]
pub struct ContextCollector;

impl ContextCollector {
    pub fn new() -> Self {
        Self
    }

    /// Scan `root` and build a context digest.
    ///
    /// Fails only when `root` does not exist. Unreadable files among the
    /// selected ones are skipped.
    pub fn collect(&self, root: &Path) -> Result<CollectedContext, ContextError> {
        if !root.exists() {
            return Err(ContextError::PathNotFound(root.to_path_buf()));
        }

        let candidates = Self::find_source_files(root)?;
        let files_found = candidates.len();

        let mut sections = Vec::new();
        let mut files_used = Vec::new();
        for path in candidates.into_iter().take(MAX_FILES) {
            match Self::render_file(root, &path) {
                Ok((relative, section)) => {
                    files_used.push(relative);
                    sections.push(section);
                }
                Err(e) => debug!(error = %e, "Skipping unreadable context file"),
            }
        }

        debug!(
            root = %root.display(),
            found = files_found,
            used = files_used.len(),
            "Context collected"
        );

        Ok(CollectedContext {
            text: (!sections.is_empty()).then(|| sections.join("\n\n")),
            files_used,
            files_found,
        })
    }

    /// All eligible files under `root`, grouped by extension.
    fn find_source_files(root: &Path) -> Result<Vec<PathBuf>, ContextError> {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        let mut files = Vec::new();

        for ext in SOURCE_EXTENSIONS {
            let pattern = format!("{escaped_root}/**/*.{ext}");
            let paths = glob::glob(&pattern).map_err(|e| ContextError::Pattern(e.to_string()))?;
            for entry in paths {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => debug!(error = %e, "Skipping unreadable path during context scan"),
                }
            }
        }

        Ok(files)
    }

    /// Read one file and render its section.
    fn render_file(root: &Path, path: &Path) -> Result<(PathBuf, String), ContextError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContextError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let section = format!(
            "File: {}\n```\n{}\n```",
            relative.display(),
            truncate_chars(&content, MAX_FILE_CHARS)
        );
        Ok((relative, section))
    }
}

/// Cut `content` to `max` characters, appending the truncation marker.
fn truncate_chars(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content.to_string(),
    }
}
