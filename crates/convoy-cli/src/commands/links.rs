//! Links command: display the reference closure of a note as a tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use convoy_core::{Discovery, Vault};
use serde_json::json;
use tracing::debug;

use crate::cli::{LinksArgs, OutputFormat};
use crate::config::CliConfig;
use crate::output::note_name;

pub fn execute(config: CliConfig, format: OutputFormat, args: LinksArgs) -> Result<()> {
    let vault_root = config.vault_path()?;
    let vault = Vault::open(&vault_root)?;
    let start = vault.resolve_note(&args.note)?;

    let recursive = !args.no_recursive;
    let max_depth = args.max_depth.unwrap_or(config.migrate.max_depth);
    debug!(
        "Collecting links of {} (recursive={}, max_depth={})",
        start.display(),
        recursive,
        max_depth
    );

    let (closure, trace) = vault.closure_trace(&start, recursive, max_depth);
    let unresolved: BTreeSet<&str> = trace
        .iter()
        .filter(|discovery| discovery.location.is_none())
        .map(|discovery| discovery.identifier.as_str())
        .collect();

    match format {
        OutputFormat::Json => {
            let payload = json!({
                "start": start,
                "linked": closure,
                "unresolved": unresolved,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            println!("Notes linked from {}:", note_name(&start));
            let children = children_by_referrer(&trace);
            print_subtree(&children, &start, 0);
            println!();
            println!(
                "{} linked note(s), {} unresolved reference(s)",
                closure.len(),
                unresolved.len()
            );
        }
    }
    Ok(())
}

/// Group trace entries by the note whose content produced them.
fn children_by_referrer(trace: &[Discovery]) -> BTreeMap<&Path, Vec<&Discovery>> {
    let mut children: BTreeMap<&Path, Vec<&Discovery>> = BTreeMap::new();
    for discovery in trace {
        children
            .entry(discovery.referrer.as_path())
            .or_default()
            .push(discovery);
    }
    children
}

/// Render the discoveries below `node`, indented two spaces per level.
///
/// Each resolved note appears in the trace under exactly one referrer,
/// so the edges form a forest and the recursion terminates.
fn print_subtree(children: &BTreeMap<&Path, Vec<&Discovery>>, node: &Path, depth: usize) {
    let Some(found) = children.get(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    for discovery in found {
        match &discovery.location {
            Some(location) => {
                println!("{}└─ {}", indent, note_name(location));
                print_subtree(children, location, depth + 1);
            }
            None => {
                println!(
                    "{}└─ {}",
                    indent,
                    format!("{} (unresolved)", discovery.identifier).dimmed()
                );
            }
        }
    }
}
