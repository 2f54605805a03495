//! Output directory lifecycle
//!
//! The output directory is always passed in explicitly. Page files are
//! written directly beneath it with a `.md` extension so that downstream
//! tooling can pick them up by extension alone.

use crate::url::MARKDOWN_EXTENSION;
use crate::{Result, ScribeError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Creates the output directory (and parents) if it does not exist
pub fn ensure_workspace(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Recursively removes the output directory and everything in it
///
/// A missing directory is not an error, so clearing twice in a row always
/// succeeds. Any other failure is returned as [`ScribeError::Deletion`]
/// carrying the underlying cause.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scribe::clear_workspace;
///
/// match clear_workspace(Path::new("files")) {
///     Ok(()) => println!("Folder and contents deleted."),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn clear_workspace(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::info!("Cleared output directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ScribeError::Deletion {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Writes one page file, replacing any existing file of the same name
pub fn write_page(dir: &Path, filename: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    fs::write(&path, body).map_err(|source| ScribeError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Lists the page files in the output directory, sorted by path
///
/// Returns an empty list when the directory does not exist.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
