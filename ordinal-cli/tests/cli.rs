use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn ordinal(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ordinal").unwrap();
    cmd.current_dir(root).env("RUST_LOG", "info");
    cmd
}

#[test]
fn setup_then_generate_renders_starter_site() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    ordinal(dir.path())
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("ordinal site ready"));
    assert!(dir.path().join("ordinal.yml").exists());

    ordinal(dir.path()).arg("generate").assert().success();

    let index = fs::read_to_string(dir.path().join("public/index.html"))?;
    assert!(index.contains(r#"<a href="/articles/welcome.html">Welcome</a>"#));

    let welcome = fs::read_to_string(dir.path().join("public/articles/welcome.html"))?;
    assert!(welcome.contains("<strong>bold</strong>"));
    assert!(welcome.contains(r##"href="#footnote-1""##));
    assert!(welcome.contains("/index.html"));
    assert!(welcome.contains(r#"<h3 id="images">Images</h3>"#));
    assert!(!welcome.contains("<p><h3"));
    assert!(!welcome.contains("<p><blockquote"));
    Ok(())
}

#[test]
fn generate_dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    ordinal(dir.path()).arg("setup").assert().success();

    ordinal(dir.path())
        .args(["generate", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would write"));
    assert!(!dir.path().join("public/index.html").exists());
    Ok(())
}

#[test]
fn generate_unknown_category_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    ordinal(dir.path()).arg("setup").assert().success();

    ordinal(dir.path())
        .args(["generate", "--category", "recipes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category: recipes"));
    Ok(())
}

#[test]
fn generate_without_content_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    ordinal(dir.path()).arg("generate").assert().failure();
    Ok(())
}

#[test]
fn snapshot_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let page = dir.path().join("public/notes/foo.html");
    fs::create_dir_all(page.parent().unwrap())?;
    fs::write(&page, "<p>original</p>")?;

    ordinal(dir.path())
        .args(["snapshot", "--action", "create"])
        .assert()
        .success();
    assert_eq!(fs::read_dir(dir.path().join("snapshots/notes"))?.count(), 1);

    fs::write(&page, "<p>edited</p>")?;
    ordinal(dir.path())
        .args(["snapshot", "--action", "restore", "--latest"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&page)?, "<p>original</p>");

    ordinal(dir.path())
        .args(["snapshot", "--action", "delete", "--select", "7", "--yes"])
        .assert()
        .failure();
    assert_eq!(fs::read_dir(dir.path().join("snapshots/notes"))?.count(), 1);

    ordinal(dir.path())
        .args(["snapshot", "--action", "delete", "--select", "all", "--yes"])
        .assert()
        .success();
    assert_eq!(fs::read_dir(dir.path().join("snapshots/notes"))?.count(), 0);
    Ok(())
}
