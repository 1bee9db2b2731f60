use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `lnka` with its config isolated inside `dir`
fn lnka(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("lnka")?;
    cmd.env("LNKA_CONFIG_PATH", dir.path().join("config.toml"))
        .env_remove("LNKA_TITLE")
        .env_remove("LNKA_LOG");
    Ok(cmd)
}

#[test]
fn test_version_flag() -> Result<()> {
    let dir = TempDir::new()?;
    for flag in ["-v", "--version"] {
        lnka(&dir)?
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "lnka {}",
                env!("CARGO_PKG_VERSION")
            )));
    }
    Ok(())
}

#[test]
fn test_missing_arguments() -> Result<()> {
    let dir = TempDir::new()?;
    lnka(&dir)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("SOURCE"));

    lnka(&dir)?
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TARGET"));
    Ok(())
}

#[test]
fn test_missing_source_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("enabled");
    fs::create_dir(&target)?;

    lnka(&dir)?
        .arg(dir.path().join("available"))
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("source directory:"))
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_target_is_a_file() -> Result<()> {
    let dir = TempDir::new()?;
    let source = dir.path().join("available");
    let target = dir.path().join("enabled");
    fs::create_dir(&source)?;
    fs::write(&target, "not a dir")?;

    lnka(&dir)?
        .arg(&source)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("target directory:"))
        .stderr(predicate::str::contains("is not a directory"));
    Ok(())
}

#[test]
fn test_malformed_config_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("config.toml"), "[ui\npage_size = ")?;

    lnka(&dir)?
        .arg(dir.path())
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_unknown_config_field_warns() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("config.toml"), "[ui]\npagesize = 3\n")?;

    // The missing source directory stops the run before any screen is shown
    lnka(&dir)?
        .arg(dir.path().join("missing"))
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration field"))
        .stderr(predicate::str::contains("ui.pagesize"));
    Ok(())
}

#[test]
fn test_completions_need_no_directories() -> Result<()> {
    let dir = TempDir::new()?;
    lnka(&dir)?
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lnka"));
    Ok(())
}

#[test]
fn test_debug_log_is_written_fresh() -> Result<()> {
    let dir = TempDir::new()?;
    let log = dir.path().join("debug.log");
    fs::write(&log, "stale line from a previous run\n")?;

    lnka(&dir)?
        .arg("--debug")
        .arg(&log)
        .arg(dir.path().join("missing"))
        .arg(dir.path())
        .assert()
        .code(1);

    let contents = fs::read_to_string(&log)?;
    assert!(!contents.contains("stale line"));
    assert!(contents.contains("Debug logging started"));
    Ok(())
}
