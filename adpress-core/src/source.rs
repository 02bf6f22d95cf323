//! Candidate document discovery and selection.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Conventional entry document. A unique file with this name wins over
/// other candidates without prompting.
pub const CANONICAL_NAME: &str = "index.adoc";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("no .adoc documents found under {}", .0.display())]
    NoDocuments(PathBuf),

    #[error("document {} does not exist", .0.display())]
    MissingDocument(PathBuf),
}

/// Outcome of the selection rule over discovered candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// A single or canonical candidate; no interaction needed.
    Selected(PathBuf),
    /// Several candidates and no unique canonical file; the caller must ask.
    Choose(Vec<PathBuf>),
}

/// Discover `.adoc` files under the workspace root.
///
/// Hidden entries and the excluded directories (output and archives) are
/// pruned. Results are sorted so prompts and logs are deterministic.
pub fn discover_documents(root: &Path, exclude: &[&Path]) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_excluded(e.path(), exclude))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some("adoc"))
        .map(|e| e.path().to_path_buf())
        .collect();

    documents.sort();
    documents
}

fn is_hidden(entry: &DirEntry) -> bool {
    // depth 0 is the root itself, which may legitimately be "." or ".."
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_excluded(path: &Path, exclude: &[&Path]) -> bool {
    exclude.iter().any(|ex| path == *ex)
}

/// Apply the selection rule: one candidate wins outright, a unique
/// `index.adoc` is canonical, anything else needs a user choice.
pub fn select_document(
    root: &Path,
    mut candidates: Vec<PathBuf>,
) -> Result<SourceSelection, SourceError> {
    match candidates.len() {
        0 => Err(SourceError::NoDocuments(root.to_path_buf())),
        1 => Ok(SourceSelection::Selected(candidates.swap_remove(0))),
        _ => {
            let canonical: Vec<&PathBuf> = candidates
                .iter()
                .filter(|p| p.file_name().and_then(|n| n.to_str()) == Some(CANONICAL_NAME))
                .collect();

            if canonical.len() == 1 {
                Ok(SourceSelection::Selected(canonical[0].clone()))
            } else {
                Ok(SourceSelection::Choose(candidates))
            }
        }
    }
}

/// Validate an explicitly named document.
pub fn explicit_document(path: &Path) -> Result<PathBuf, SourceError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(SourceError::MissingDocument(path.to_path_buf()))
    }
}
