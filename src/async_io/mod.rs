//! Async file loading for import batches.
//!
//! Reads go through tokio so a host can keep its event loop responsive while
//! files load. Reads are never issued concurrently: the session awaits each
//! file before asking for the next one.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, ViewerError};
use crate::parser::source_name;

/// Extension accepted when expanding directories.
pub const THREAD_FILE_EXTENSION: &str = "json";

/// The contents of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Source identifier (file name).
    pub name: String,
    /// File contents.
    pub text: String,
}

/// Read one file.
///
/// Any failure to obtain the text, including invalid UTF-8, is a
/// [`ViewerError::Read`] naming the file.
pub async fn read_source(path: impl AsRef<Path>) -> Result<SourceFile> {
    let path = path.as_ref();
    let name = source_name(path);
    trace!(path = %path.display(), "Reading thread file");

    let text = fs::read_to_string(path)
        .await
        .map_err(|e| ViewerError::read(&name, e))?;

    debug!(file = %name, bytes = text.len(), "Read thread file");
    Ok(SourceFile { name, text })
}

/// Expand command-line inputs into the list of files to import.
///
/// Plain files are kept as given, whatever their extension. Directories are
/// walked recursively; with `json_only`, only `*.json` files are kept. The
/// files found in each directory are sorted by path so batches are
/// deterministic.
pub fn expand_inputs(inputs: &[PathBuf], json_only: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .filter(|path| !json_only || is_thread_file(path))
                .collect();
            found.sort();
            debug!(dir = %input.display(), files = found.len(), "Expanded directory");
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(ViewerError::FileNotFound {
                path: input.clone(),
            });
        }
    }

    Ok(files)
}

/// Whether a path has the thread file extension (case-insensitive).
#[must_use]
pub fn is_thread_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(THREAD_FILE_EXTENSION))
}
