//! One-time file-name index over a vault tree.
//!
//! Closure computation resolves many identifiers against the same directory
//! tree. Instead of walking the tree once per identifier, the index walks it
//! once per run and answers lookups from a map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Canonical note file extension, tried first during lookup.
const NOTE_EXTENSION: &str = ".md";

/// Map from file name to the first location seen during a deterministic walk
/// of the vault tree.
#[derive(Debug, Default)]
pub struct NoteIndex {
    entries: HashMap<String, PathBuf>,
}

impl NoteIndex {
    /// Walk `root` and index every regular file by name.
    ///
    /// Entries are walked sorted by file name, so the first-wins tie-break
    /// for duplicate names across folders is stable for a fixed tree
    /// snapshot. Symlinks are not followed. Unreadable directories and
    /// non-UTF-8 file names are skipped with a debug log; an identifier
    /// could never match them anyway.
    pub fn build(root: &Path) -> Self {
        let mut entries: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable vault entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                debug!("skipping non-UTF-8 file name: {:?}", entry.file_name());
                continue;
            };

            if let Some(existing) = entries.get(name) {
                debug!(
                    "duplicate file name {}: keeping {}, ignoring {}",
                    name,
                    existing.display(),
                    entry.path().display()
                );
            } else {
                entries.insert(name.to_string(), entry.path().to_path_buf());
            }
        }

        Self { entries }
    }

    /// Look up an identifier, trying its candidate file names in order.
    ///
    /// The candidate carrying the canonical note extension always wins over
    /// the bare form, regardless of where in the tree either file lives.
    pub fn resolve(&self, identifier: &str) -> Option<&Path> {
        candidate_names(identifier)
            .iter()
            .find_map(|name| self.entries.get(name).map(PathBuf::as_path))
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the walk found no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Candidate file names for an identifier.
///
/// An identifier already ending in the note extension is tried as written,
/// then without it. Any other identifier is tried with the extension
/// appended, then as written, so references to raw file names like
/// `[[data.txt]]` still resolve.
fn candidate_names(identifier: &str) -> [String; 2] {
    match identifier.strip_suffix(NOTE_EXTENSION) {
        Some(bare) => [identifier.to_string(), bare.to_string()],
        None => [format!("{identifier}{NOTE_EXTENSION}"), identifier.to_string()],
    }
}
