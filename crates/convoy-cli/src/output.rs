//! Shared presentation helpers for command output.

use anyhow::Result;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

/// File name of a path for display, falling back to the whole path.
pub fn note_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}

/// Print a value as a pretty JSON document on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
