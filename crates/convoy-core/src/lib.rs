//! Convoy Core
//!
//! Moves or copies a note together with every note it references,
//! transitively, inside a personal knowledge vault. This crate provides:
//! - `[[wikilink]]` reference extraction
//! - A one-time file-name index over the vault tree
//! - Depth-bounded, cycle-safe reference-closure traversal
//! - Collision-free migration planning and execution

pub mod error;
pub mod index;
pub mod link;
pub mod migrate;
pub mod vault;

pub use error::{Error, Result};
pub use index::NoteIndex;
pub use link::{extract, ReferenceSet};
pub use migrate::{
    execute, migrate, plan, MigrateOptions, MigrationFailure, MigrationPlan, MigrationReport,
    PlannedMove, DEFAULT_MAX_DEPTH,
};
pub use vault::{ClosureSet, Discovery, Vault};
