//! Migration planning and execution.
//!
//! A run resolves the source note, builds the working set (the note plus its
//! reference closure), computes a collision-free relocation plan, and then
//! executes it. Planning never mutates the tree, so a plan can be shown
//! without committing to it; execution creates the target directory and
//! relocates one note at a time, recording per-note failures instead of
//! aborting the batch.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::vault::Vault;

/// Depth bound applied when no override is given.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Knobs for one migration run.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Bring the reference closure of the source note along.
    pub include_references: bool,
    /// Follow references transitively instead of stopping at depth 1.
    pub recursive: bool,
    /// Copy instead of move.
    pub copy: bool,
    /// Depth bound for closure traversal.
    pub max_depth: u32,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            include_references: true,
            recursive: true,
            copy: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One planned relocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    /// Destination path, already disambiguated against collisions.
    pub target: PathBuf,
}

impl PlannedMove {
    /// True when collision handling had to pick a new file name.
    pub fn renamed(&self) -> bool {
        self.source.file_name() != self.target.file_name()
    }
}

/// Relocation plan for one run, ordered lexicographically by source path.
///
/// No two entries share a target path, and entries whose source already
/// lives in the target directory are recorded in `skipped` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub target_dir: PathBuf,
    pub moves: Vec<PlannedMove>,
    pub skipped: Vec<PathBuf>,
}

impl MigrationPlan {
    /// Size of the working set the plan was computed from
    pub fn attempted(&self) -> usize {
        self.moves.len() + self.skipped.len()
    }
}

/// Per-note failure record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of one migration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Working-set size: relocations plus skips, successful or not
    pub attempted: usize,
    /// File names at their new location, after any collision rename
    pub relocated: Vec<String>,
    /// Notes left in place because they already live in the target directory
    pub skipped: Vec<String>,
    pub failures: Vec<MigrationFailure>,
}

impl MigrationReport {
    pub fn relocated_count(&self) -> usize {
        self.relocated.len()
    }

    /// True when every planned relocation went through
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolve the source note, build the working set, and compute a
/// collision-free plan. Does not touch the filesystem beyond reads.
pub fn plan(
    vault: &Vault,
    source_note: &str,
    target_dir: &Path,
    options: &MigrateOptions,
) -> Result<MigrationPlan> {
    let source = vault.resolve_note(source_note)?;

    let mut working_set: BTreeSet<PathBuf> = if options.include_references {
        vault.closure(&source, options.recursive, options.max_depth)
    } else {
        BTreeSet::new()
    };
    working_set.insert(source);

    let target_dir = resolve_target_dir(target_dir)?;

    let mut moves = Vec::new();
    let mut skipped = Vec::new();
    let mut claimed: BTreeSet<PathBuf> = BTreeSet::new();

    for source in working_set {
        if source.parent() == Some(target_dir.as_path()) {
            debug!("{} already lives in the target directory", source.display());
            skipped.push(source);
            continue;
        }
        let name = source
            .file_name()
            .expect("working-set entries are canonical file paths");
        let target = free_target(&target_dir, name, &claimed);
        claimed.insert(target.clone());
        moves.push(PlannedMove { source, target });
    }

    info!(
        "planned {} relocation(s), {} skip(s) into {}",
        moves.len(),
        skipped.len(),
        target_dir.display()
    );
    Ok(MigrationPlan {
        target_dir,
        moves,
        skipped,
    })
}

/// Create the target directory and carry out a plan.
///
/// Directory creation failure aborts the run; a failed relocation is
/// recorded against its note and the batch continues.
pub fn execute(plan: &MigrationPlan, copy: bool) -> Result<MigrationReport> {
    fs::create_dir_all(&plan.target_dir)
        .map_err(|source| Error::io(&plan.target_dir, source))?;

    let mut report = MigrationReport {
        attempted: plan.attempted(),
        skipped: plan.skipped.iter().map(|path| note_name(path)).collect(),
        ..Default::default()
    };

    for entry in &plan.moves {
        match relocate(&entry.source, &entry.target, copy) {
            Ok(()) => {
                debug!(
                    "relocated {} -> {}",
                    entry.source.display(),
                    entry.target.display()
                );
                report.relocated.push(note_name(&entry.target));
            }
            Err(err) => {
                report.failures.push(MigrationFailure {
                    name: note_name(&entry.source),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        "relocated {}/{} note(s)",
        report.relocated_count(),
        report.attempted
    );
    Ok(report)
}

/// Resolve, plan, and execute one migration run.
pub fn migrate(
    vault: &Vault,
    source_note: &str,
    target_dir: &Path,
    options: &MigrateOptions,
) -> Result<MigrationReport> {
    let migration_plan = plan(vault, source_note, target_dir, options)?;
    execute(&migration_plan, options.copy)
}

/// Absolute form of the requested target directory.
///
/// Relative paths are resolved against the current working directory, and an
/// existing directory is canonicalized so the already-in-target skip check
/// compares real paths.
fn resolve_target_dir(target_dir: &Path) -> Result<PathBuf> {
    let absolute = if target_dir.is_absolute() {
        target_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| Error::io(target_dir, source))?
            .join(target_dir)
    };
    if absolute.is_dir() {
        absolute
            .canonicalize()
            .map_err(|source| Error::io(&absolute, source))
    } else {
        Ok(absolute)
    }
}

/// First free destination for `name` under `dir`: the plain name when
/// available, else `stem_1`, `stem_2`, ... before the extension. A
/// destination is taken when it exists on disk or an earlier plan entry
/// claimed it.
fn free_target(dir: &Path, name: &OsStr, claimed: &BTreeSet<PathBuf>) -> PathBuf {
    let plain = dir.join(name);
    if !is_taken(&plain, claimed) {
        return plain;
    }

    let base = Path::new(name);
    let stem = base.file_stem().unwrap_or(name);
    let extension = base.extension();
    let mut counter = 1u32;
    loop {
        let mut renamed = stem.to_os_string();
        renamed.push(format!("_{counter}"));
        if let Some(ext) = extension {
            renamed.push(".");
            renamed.push(ext);
        }
        let candidate = dir.join(&renamed);
        if !is_taken(&candidate, claimed) {
            return candidate;
        }
        counter += 1;
    }
}

fn is_taken(candidate: &Path, claimed: &BTreeSet<PathBuf>) -> bool {
    candidate.exists() || claimed.contains(candidate)
}

fn relocate(source: &Path, target: &Path, copy: bool) -> std::io::Result<()> {
    if copy {
        fs::copy(source, target).map(|_| ())
    } else {
        move_file(source, target)
    }
}

/// Move via rename, falling back to copy + remove when rename fails, as it
/// does across filesystems.
fn move_file(source: &Path, target: &Path) -> std::io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                source.display(),
                target.display(),
                err
            );
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
    }
}

/// Display name of a note: its file name, or the whole path when it has none.
fn note_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
