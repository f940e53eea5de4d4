//! Migrate command: relocate a note and its linked notes.

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use convoy_core::{MigrateOptions, MigrationPlan, MigrationReport, Vault};
use tracing::debug;

use crate::cli::{MigrateArgs, OutputFormat};
use crate::config::CliConfig;
use crate::output::{note_name, print_json};

pub fn execute(config: CliConfig, format: OutputFormat, args: MigrateArgs) -> Result<()> {
    let vault_root = config.vault_path()?;
    let vault = Vault::open(&vault_root)?;

    // --move wins over a copy = true config default; clap rejects --copy --move.
    let copy = if args.force_move {
        false
    } else {
        args.copy || config.migrate.copy
    };
    let options = MigrateOptions {
        include_references: !args.no_references,
        recursive: !args.no_recursive,
        copy,
        max_depth: args.max_depth.unwrap_or(config.migrate.max_depth),
    };
    debug!(
        "Migrating {:?} from {} to {} with {:?}",
        args.note,
        vault_root.display(),
        args.target.display(),
        options
    );

    let plan = convoy_core::plan(&vault, &args.note, &args.target, &options)?;

    if args.dry_run {
        return match format {
            OutputFormat::Json => print_json(&plan),
            OutputFormat::Text => {
                print_plan(&plan, options.copy);
                Ok(())
            }
        };
    }

    let report = convoy_core::execute(&plan, options.copy)?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_report(&plan, &report, options.copy);
            Ok(())
        }
    }
}

fn print_plan(plan: &MigrationPlan, copy: bool) {
    let verb = if copy { "copy" } else { "move" };
    println!(
        "Planned {} of {} note(s) into {} (dry run):",
        verb,
        plan.attempted(),
        plan.target_dir.display()
    );
    for entry in &plan.moves {
        if entry.renamed() {
            println!(
                "  {} -> {}",
                note_name(&entry.source),
                note_name(&entry.target).yellow()
            );
        } else {
            println!("  {}", note_name(&entry.source));
        }
    }
    for skipped in &plan.skipped {
        println!(
            "  {} {} (already in target)",
            "⊘".yellow(),
            note_name(skipped)
        );
    }
    println!();
    println!("Nothing was changed.");
}

fn print_report(plan: &MigrationPlan, report: &MigrationReport, copy: bool) {
    let verb = if copy { "Copied" } else { "Moved" };
    println!(
        "{} {} of {} note(s) into {}",
        verb,
        report.relocated_count(),
        report.attempted,
        plan.target_dir.display()
    );
    for name in &report.relocated {
        println!("  {} {}", "✓".green(), name);
    }
    for name in &report.skipped {
        println!("  {} {} (already in target)", "⊘".yellow(), name);
    }
    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.name.red().bold(),
            failure.reason
        );
    }

    println!();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Outcome".bold(), "Count".bold()]);
    table.add_row(vec![
        "Relocated".to_string(),
        report.relocated_count().to_string(),
    ]);
    table.add_row(vec!["Skipped".to_string(), report.skipped.len().to_string()]);
    table.add_row(vec!["Failed".to_string(), report.failures.len().to_string()]);
    println!("{table}");

    println!();
    println!(
        "Migrated {}/{} notes",
        report.relocated_count(),
        report.attempted
    );
    if !report.is_clean() {
        println!(
            "{} {} note(s) could not be relocated",
            "Warning:".yellow().bold(),
            report.failures.len()
        );
    }
}
