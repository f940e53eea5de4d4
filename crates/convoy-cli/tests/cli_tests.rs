//! End-to-end tests for the convoy binary
//!
//! Each test builds a throwaway vault in a temp directory and drives the
//! binary through assert_cmd. CONVOY_TEST_MODE keeps the user's real
//! config file out of the picture; tests that set CONVOY_VAULT are
//! serialized so the environment does not bleed between them.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn convoy() -> Command {
    let mut cmd = Command::cargo_bin("convoy").unwrap();
    cmd.env("CONVOY_TEST_MODE", "1").env_remove("CONVOY_VAULT");
    cmd
}

fn write_note(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// ============================================================================
// Migrate Command Tests
// ============================================================================

#[test]
fn test_migrate_moves_reference_cycle() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "start [[B]]");
    write_note(vault, "B.md", "middle [[C]]");
    write_note(vault, "C.md", "back to [[A]]");
    let target = vault.join("archive");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 3/3 notes"));

    for name in ["A.md", "B.md", "C.md"] {
        assert!(target.join(name).exists(), "{name} missing from target");
        assert!(!vault.join(name).exists(), "{name} still in vault root");
    }
}

#[test]
fn test_migrate_resolves_target_against_working_directory() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("kb");
    fs::create_dir(&vault).unwrap();
    write_note(&vault, "Solo.md", "no links here");

    convoy()
        .current_dir(temp.path())
        .arg("--vault")
        .arg(&vault)
        .arg("migrate")
        .arg("Solo")
        .arg("sorted")
        .assert()
        .success();

    assert!(temp.path().join("sorted").join("Solo.md").exists());
}

#[test]
fn test_migrate_copy_keeps_originals() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "leaf");
    let target = vault.join("out");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--copy")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 2/2 notes"));

    assert!(vault.join("A.md").exists());
    assert!(vault.join("B.md").exists());
    assert_eq!(fs::read_to_string(target.join("A.md")).unwrap(), "see [[B]]");
    assert_eq!(fs::read_to_string(target.join("B.md")).unwrap(), "leaf");
}

#[test]
fn test_migrate_renames_on_collision() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "vault copy");
    let target = vault.join("out");
    fs::create_dir(&target).unwrap();
    write_note(&target, "B.md", "already here");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("B_1.md"));

    assert_eq!(
        fs::read_to_string(target.join("B.md")).unwrap(),
        "already here"
    );
    assert_eq!(
        fs::read_to_string(target.join("B_1.md")).unwrap(),
        "vault copy"
    );
}

#[test]
fn test_migrate_skips_notes_already_in_target() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    let target = vault.join("done");
    fs::create_dir(&target).unwrap();
    write_note(vault, "A.md", "see [[B]]");
    write_note(&target, "B.md", "settled");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("already in target"))
        .stdout(predicate::str::contains("Migrated 1/2 notes"));

    assert_eq!(fs::read_to_string(target.join("B.md")).unwrap(), "settled");
    assert!(!target.join("B_1.md").exists());
}

#[test]
fn test_migrate_dry_run_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "leaf");
    let target = vault.join("out");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was changed."));

    assert!(vault.join("A.md").exists());
    assert!(vault.join("B.md").exists());
    assert!(!target.exists());
}

#[test]
fn test_migrate_no_recursive_stops_at_direct_references() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "see [[C]]");
    write_note(vault, "C.md", "leaf");
    let target = vault.join("out");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--no-recursive")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 2/2 notes"));

    assert!(target.join("A.md").exists());
    assert!(target.join("B.md").exists());
    assert!(vault.join("C.md").exists());
    assert!(!target.join("C.md").exists());
}

#[test]
fn test_migrate_no_references_moves_single_note() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "leaf");
    let target = vault.join("out");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--no-references")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 1/1 notes"));

    assert!(target.join("A.md").exists());
    assert!(vault.join("B.md").exists());
}

#[test]
fn test_migrate_missing_note_fails() {
    let temp = TempDir::new().unwrap();
    write_note(temp.path(), "A.md", "alone");

    convoy()
        .arg("--vault")
        .arg(temp.path())
        .arg("migrate")
        .arg("Ghost")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("note not found: Ghost"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_migrate_missing_vault_fails() {
    let temp = TempDir::new().unwrap();

    convoy()
        .arg("--vault")
        .arg(temp.path().join("nowhere"))
        .arg("migrate")
        .arg("A")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("vault not found"));
}

#[test]
fn test_migrate_json_report_parses() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "leaf");
    let target = vault.join("out");

    let output = convoy()
        .arg("--vault")
        .arg(vault)
        .arg("-f")
        .arg("json")
        .arg("-v")
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .output()
        .unwrap();
    assert!(output.status.success());

    // Diagnostics go to stderr, so stdout must be a clean JSON document
    let report: convoy_core::MigrationReport =
        serde_json::from_slice(&output.stdout).expect("stdout should be a migration report");
    assert_eq!(report.attempted, 2);
    assert_eq!(report.relocated, vec!["A.md", "B.md"]);
    assert!(report.failures.is_empty());
}

#[test]
fn test_migrate_json_dry_run_emits_plan() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "alone");
    let target = vault.join("out");

    let output = convoy()
        .arg("--vault")
        .arg(vault)
        .arg("-f")
        .arg("json")
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["moves"].as_array().unwrap().len(), 1);
    assert!(!target.exists());
}

#[cfg(unix)]
#[test]
fn test_migrate_reports_failures_but_exits_zero() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "leaf");
    let target = vault.join("locked");
    fs::create_dir(&target).unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores permission bits, which makes this scenario untestable
    if fs::write(target.join(".writecheck"), "").is_ok() {
        fs::remove_file(target.join(".writecheck")).unwrap();
        return;
    }

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 0/2 notes"))
        .stdout(predicate::str::contains("could not be relocated"));

    fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(vault.join("A.md").exists());
    assert!(vault.join("B.md").exists());
}

#[test]
#[serial]
fn test_vault_from_environment() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "alone");
    let target = vault.join("out");

    let mut cmd = Command::cargo_bin("convoy").unwrap();
    cmd.env("CONVOY_TEST_MODE", "1")
        .env("CONVOY_VAULT", vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success();

    assert!(target.join("A.md").exists());
}

#[test]
fn test_missing_vault_configuration_is_an_error() {
    let temp = TempDir::new().unwrap();

    convoy()
        .arg("migrate")
        .arg("A")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--vault"));
}

// ============================================================================
// Links Command Tests
// ============================================================================

#[test]
fn test_links_renders_tree() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]] and [[Ghost]]");
    write_note(vault, "B.md", "see [[C]]");
    write_note(vault, "C.md", "leaf");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("links")
        .arg("A")
        .assert()
        .success()
        .stdout(predicate::str::contains("Notes linked from A.md:"))
        .stdout(predicate::str::contains("└─ B.md"))
        .stdout(predicate::str::contains("  └─ C.md"))
        .stdout(predicate::str::contains("Ghost (unresolved)"))
        .stdout(predicate::str::contains(
            "2 linked note(s), 1 unresolved reference(s)",
        ));
}

#[test]
fn test_links_json_payload() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]] and [[Ghost]]");
    write_note(vault, "B.md", "leaf");

    let output = convoy()
        .arg("--vault")
        .arg(vault)
        .arg("-f")
        .arg("json")
        .arg("links")
        .arg("A")
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["linked"].as_array().unwrap().len(), 1);
    assert_eq!(payload["unresolved"], serde_json::json!(["Ghost"]));
}

#[test]
fn test_links_respects_max_depth() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path();
    write_note(vault, "A.md", "see [[B]]");
    write_note(vault, "B.md", "see [[C]]");
    write_note(vault, "C.md", "see [[D]]");
    write_note(vault, "D.md", "leaf");

    convoy()
        .arg("--vault")
        .arg(vault)
        .arg("links")
        .arg("A")
        .arg("--max-depth")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 linked note(s)"))
        .stdout(predicate::str::contains("└─ C.md"))
        .stdout(predicate::str::contains("└─ D.md").not());
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_path_prints_location() {
    convoy()
        .arg("config")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_writes_example() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    convoy()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Success:"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[vault]"));
    assert!(content.contains("max_depth"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "keep me").unwrap();

    convoy()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
}

#[test]
fn test_config_show_reads_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "[vault]\npath = \"/kb\"\n\n[migrate]\nmax_depth = 4\n",
    )
    .unwrap();

    convoy()
        .arg("-C")
        .arg(&path)
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_depth = 4"))
        .stdout(predicate::str::contains("/kb"));
}

#[test]
fn test_config_flags_override_file() {
    let temp = TempDir::new().unwrap();
    let config_vault = temp.path().join("from-file");
    fs::create_dir(&config_vault).unwrap();
    let real_vault = temp.path().join("from-flag");
    fs::create_dir(&real_vault).unwrap();
    write_note(&real_vault, "A.md", "alone");

    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        format!("[vault]\npath = \"{}\"\n", config_vault.display()),
    )
    .unwrap();
    let target = temp.path().join("out");

    convoy()
        .arg("-C")
        .arg(&path)
        .arg("--vault")
        .arg(&real_vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success();

    assert!(target.join("A.md").exists());
}

#[test]
fn test_config_copy_default_applies() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("kb");
    fs::create_dir(&vault).unwrap();
    write_note(&vault, "A.md", "alone");

    let path = temp.path().join("config.toml");
    fs::write(&path, "[migrate]\ncopy = true\n").unwrap();
    let target = temp.path().join("out");

    convoy()
        .arg("-C")
        .arg(&path)
        .arg("--vault")
        .arg(&vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 1 of 1"));

    assert!(vault.join("A.md").exists());
    assert!(target.join("A.md").exists());
}

#[test]
fn test_move_flag_overrides_configured_copy() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("kb");
    fs::create_dir(&vault).unwrap();
    write_note(&vault, "A.md", "alone");

    let path = temp.path().join("config.toml");
    fs::write(&path, "[migrate]\ncopy = true\n").unwrap();
    let target = temp.path().join("out");

    convoy()
        .arg("-C")
        .arg(&path)
        .arg("--vault")
        .arg(&vault)
        .arg("migrate")
        .arg("A")
        .arg(&target)
        .arg("--move")
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved 1 of 1"));

    assert!(target.join("A.md").exists());
    assert!(!vault.join("A.md").exists());
}
