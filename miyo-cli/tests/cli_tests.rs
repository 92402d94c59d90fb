//! Integration tests for the Miyo CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A command pointed at private document and temp roots
fn miyo(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("miyo-cli").unwrap();
    cmd.env_remove("MIYO_CACHE_MAX_AGE_DAYS")
        .env("MIYO_DOCUMENT_DIR", dir.path().join("documents"))
        .env("MIYO_TEMP_DIR", dir.path().join("tmp"));
    cmd
}

fn app_root(dir: &TempDir) -> PathBuf {
    dir.path().join("documents").join("MiyoReader")
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("miyo-cli").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("cache"))
        .stdout(predicate::str::contains("backup"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("miyo-cli").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("miyo"));
}

#[test]
fn test_import_help() {
    let mut cmd = Command::cargo_bin("miyo-cli").unwrap();
    cmd.args(["import", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Import a book"))
        .stdout(predicate::str::contains("--id"))
        .stdout(predicate::str::contains("--metadata"));
}

#[test]
fn test_init_creates_tree() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Storage initialized"));

    let root = app_root(&dir);
    for sub in [
        "books",
        "database/backups",
        "preferences",
        "cache/images",
        "cache/thumbnails",
        "logs",
    ] {
        assert!(root.join(sub).is_dir(), "{} missing", sub);
    }
    assert!(dir.path().join("tmp").join("Miyo").is_dir());
}

#[test]
fn test_root_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("elsewhere");

    miyo(&dir)
        .args(["--root", other.to_str().unwrap(), "init"])
        .assert()
        .success();

    assert!(other.join("MiyoReader").join("books").is_dir());
    assert!(!app_root(&dir).exists());
}

#[test]
fn test_import_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("book.epub");
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    fs::write(&input, &bytes).unwrap();

    let metadata = dir.path().join("meta.json");
    fs::write(&metadata, r#"{ "title": "Round Trip" }"#).unwrap();

    miyo(&dir)
        .args([
            "import",
            input.to_str().unwrap(),
            "--id",
            "rt",
            "--metadata",
            metadata.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 'rt'"));

    assert_eq!(
        fs::read(app_root(&dir).join("books/rt/content.epub")).unwrap(),
        bytes
    );

    let output = dir.path().join("out.epub");
    miyo(&dir)
        .args(["export", "rt", "--output", output.to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), bytes);

    miyo(&dir)
        .args(["metadata", "rt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round Trip"));
}

#[test]
fn test_import_rejects_traversal_id() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("book.epub");
    fs::write(&input, b"x").unwrap();

    miyo(&dir)
        .args(["import", input.to_str().unwrap(), "--id", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid book id"));
}

#[test]
fn test_export_missing_book_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.epub");

    miyo(&dir)
        .args(["export", "ghost", "--output", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
    assert!(!output.exists());
}

#[test]
fn test_list_json_and_remove() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("book.epub");
    fs::write(&input, b"content").unwrap();

    for id in ["b", "a"] {
        miyo(&dir)
            .args(["import", input.to_str().unwrap(), "--id", id])
            .assert()
            .success();
    }

    let output = miyo(&dir).args(["list", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);

    miyo(&dir).args(["remove", "a"]).assert().success();
    // Removing again is not an error
    miyo(&dir).args(["remove", "a"]).assert().success();

    miyo(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("b").and(predicate::str::contains("books/a").not()));
}

#[test]
fn test_info_json() {
    let dir = TempDir::new().unwrap();

    let output = miyo(&dir).args(["info", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["total_books"], 0);
    assert!(json["paths"]["thumbnails"].is_string());
}

#[test]
fn test_prefs_set_and_reset() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"themeId\": \"light\""));

    miyo(&dir)
        .args(["prefs", "--set", "themeId=dark", "--set", "fontSize=40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"themeId\": \"dark\""))
        // Clamped to the supported maximum
        .stdout(predicate::str::contains("\"fontSize\": 32"));

    let saved = fs::read_to_string(app_root(&dir).join("preferences/user-settings.json")).unwrap();
    assert!(saved.contains("\"themeId\": \"dark\""));

    miyo(&dir)
        .args(["prefs", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"themeId\": \"light\""));
}

#[test]
fn test_prefs_string_keys_take_raw_text() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .args(["prefs", "--set", "language=123", "--set", "fontFamily=null"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"language\": \"123\""))
        .stdout(predicate::str::contains("\"fontFamily\": \"null\""));
}

#[test]
fn test_info_shows_cache_settings() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "500 MB limit, cleanup every 7 days, max age 30 days",
        ))
        .stdout(predicate::str::contains("Log files:   10 retained"));
}

#[test]
fn test_prefs_rejects_bad_assignment() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .args(["prefs", "--set", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_corrupt_prefs_fail() {
    let dir = TempDir::new().unwrap();
    miyo(&dir).arg("init").assert().success();
    fs::write(
        app_root(&dir).join("preferences/user-settings.json"),
        "{ not json",
    )
    .unwrap();

    miyo(&dir)
        .arg("prefs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corrupt JSON"));
}

#[test]
fn test_cache_commands() {
    let dir = TempDir::new().unwrap();
    miyo(&dir).arg("init").assert().success();

    let cache = app_root(&dir).join("cache");
    fs::write(cache.join("page.html"), b"<p>cached</p>").unwrap();
    fs::create_dir_all(cache.join("chapters")).unwrap();
    fs::write(cache.join("chapters/one.html"), b"x").unwrap();

    miyo(&dir)
        .args(["cache", "usage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files"));

    miyo(&dir)
        .args(["cache", "cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 cache entries older than 30 days"));

    miyo(&dir)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));

    assert!(!cache.join("page.html").exists());
    assert!(!cache.join("chapters").exists());
    assert!(cache.join("images").is_dir());
}

#[test]
fn test_backup_without_database() {
    let dir = TempDir::new().unwrap();

    miyo(&dir)
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("No database to back up"));

    assert_eq!(
        fs::read_dir(app_root(&dir).join("database/backups"))
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn test_backup_and_list_backups() {
    let dir = TempDir::new().unwrap();
    miyo(&dir).arg("init").assert().success();
    fs::write(app_root(&dir).join("database/miyo.db"), b"db").unwrap();

    miyo(&dir)
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("miyo.db.backup."));

    miyo(&dir)
        .arg("backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("miyo.db.backup."));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("miyo.json");
    fs::write(&config, r#"{ "app_namespace": "Custom", "cache_max_age_days": 9 }"#).unwrap();

    miyo(&dir)
        .args(["--config", config.to_str().unwrap(), "cache", "cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("older than 9 days"));

    assert!(dir.path().join("documents/Custom/books").is_dir());
}

#[test]
fn test_verbose_flag() {
    let dir = TempDir::new().unwrap();
    miyo(&dir).args(["--verbose", "init"]).assert().success();
}
