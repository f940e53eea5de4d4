//! Vault lookup and reference-closure traversal.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::NoteIndex;
use crate::link::{self, ReferenceSet};

/// Set of note locations reachable from a start note.
pub type ClosureSet = BTreeSet<PathBuf>;

/// One reference seen while computing a closure, kept for diagnostic display.
///
/// `location` is the resolved file for the identifier, or `None` when nothing
/// in the vault matches. Resolved references are recorded only the first time
/// they are discovered; unresolved identifiers are recorded at every
/// occurrence, as each one marks a broken link in `referrer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discovery {
    /// Note whose content contained the reference
    pub referrer: PathBuf,
    /// Identifier exactly as written between the brackets
    pub identifier: String,
    pub location: Option<PathBuf>,
}

/// A vault root plus its one-time file-name index.
///
/// Fixed for one invocation: the index reflects the tree as it stood when
/// the vault was opened, and relocation is the only mutation expected while
/// it is alive.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    index: NoteIndex,
}

impl Vault {
    /// Open a vault root, validate it, and build the file-name index.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::vault_not_found(root));
        }
        let root = root
            .canonicalize()
            .map_err(|source| Error::io(root, source))?;
        let index = NoteIndex::build(&root);
        debug!("indexed {} files under {}", index.len(), root.display());
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files the vault index knows about
    pub fn file_count(&self) -> usize {
        self.index.len()
    }

    /// Map a note identifier to its location, or `None` when nothing matches.
    pub fn locate(&self, identifier: &str) -> Option<PathBuf> {
        self.index.resolve(identifier).map(Path::to_path_buf)
    }

    /// Resolve the source argument of a run.
    ///
    /// The argument is first taken as a filesystem path; if no file exists
    /// there it is treated as a note identifier and looked up in the vault.
    pub fn resolve_note(&self, name_or_path: &str) -> Result<PathBuf> {
        let direct = Path::new(name_or_path);
        if direct.is_file() {
            return direct
                .canonicalize()
                .map_err(|source| Error::io(direct, source));
        }
        self.locate(name_or_path)
            .ok_or_else(|| Error::note_not_found(name_or_path))
    }

    /// Compute the set of notes reachable from `start` through chained
    /// references.
    ///
    /// Explicit worklist traversal with a visited set as the cycle guard:
    /// every located reference lands in the result, but a note is explored
    /// at most once and never beyond `max_depth`. With `recursive` false the
    /// result is exactly the start note's direct references. `start` itself
    /// is never part of the result.
    pub fn closure(&self, start: &Path, recursive: bool, max_depth: u32) -> ClosureSet {
        self.closure_impl(start, recursive, max_depth, None)
    }

    /// Like [`Vault::closure`], additionally recording every discovery
    /// (resolved or not) in traversal order for display.
    pub fn closure_trace(
        &self,
        start: &Path,
        recursive: bool,
        max_depth: u32,
    ) -> (ClosureSet, Vec<Discovery>) {
        let mut trace = Vec::new();
        let result = self.closure_impl(start, recursive, max_depth, Some(&mut trace));
        (result, trace)
    }

    fn closure_impl(
        &self,
        start: &Path,
        recursive: bool,
        max_depth: u32,
        mut trace: Option<&mut Vec<Discovery>>,
    ) -> ClosureSet {
        let mut result = ClosureSet::new();
        let mut visited: BTreeSet<PathBuf> = BTreeSet::new();
        visited.insert(start.to_path_buf());
        let mut worklist: Vec<(PathBuf, u32)> = vec![(start.to_path_buf(), 0)];

        while let Some((note, depth)) = worklist.pop() {
            for identifier in self.references_of(&note) {
                let Some(located) = self.locate(&identifier) else {
                    debug!("unresolved reference [[{}]] in {}", identifier, note.display());
                    if let Some(trace) = trace.as_mut() {
                        trace.push(Discovery {
                            referrer: note.clone(),
                            identifier,
                            location: None,
                        });
                    }
                    continue;
                };

                if located != start && result.insert(located.clone()) {
                    if let Some(trace) = trace.as_mut() {
                        trace.push(Discovery {
                            referrer: note.clone(),
                            identifier: identifier.clone(),
                            location: Some(located.clone()),
                        });
                    }
                }

                // Marking visited at push time pins each note to the depth it
                // was first discovered at, and keeps it out of the worklist
                // from then on. The bound check comes first: a reference cut
                // off here may still be explored via a shallower referrer.
                if recursive && depth < max_depth && visited.insert(located.clone()) {
                    worklist.push((located, depth + 1));
                }
            }
        }

        result
    }

    /// References extracted from one note; unreadable content counts as no
    /// references rather than an error.
    fn references_of(&self, note: &Path) -> ReferenceSet {
        match fs::read_to_string(note) {
            Ok(content) => link::extract(&content),
            Err(err) => {
                debug!("could not read {}: {}", note.display(), err);
                ReferenceSet::new()
            }
        }
    }
}
