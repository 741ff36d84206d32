use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn fieldkv(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fieldkv").expect("binary");
    cmd.current_dir(workdir)
        .env_remove("FIELDKV_CONFIG")
        .env_remove("FIELDKV_NO_INFO")
        .env("FIELDKV_DATA_DIR", workdir.join("data"))
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn init_set_get_list() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root)
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("created new database: hkv-0"));

    fieldkv(root).args(["set", "city", "Berlin"]).assert().success();
    fieldkv(root).args(["s", "country", "DE"]).assert().success();

    fieldkv(root)
        .args(["get", "city"])
        .assert()
        .success()
        .stdout("Berlin\n");

    fieldkv(root)
        .arg("list")
        .assert()
        .success()
        .stdout("city\ncountry\n");
}

#[test]
fn init_twice_is_not_an_error() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).arg("i").assert().success();
    fieldkv(root)
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("database hkv-0 already exists"));
}

#[test]
fn list_on_fresh_database_prints_nothing() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).arg("init").assert().success();
    fieldkv(root).arg("l").assert().success().stdout("\n");
}

#[test]
fn get_missing_key_prints_empty_line() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).arg("init").assert().success();
    fieldkv(root).args(["g", "nope"]).assert().success().stdout("\n");
}

#[test]
fn set_rejects_oversized_value() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    let long = "x".repeat(64);

    fieldkv(root).arg("init").assert().success();
    fieldkv(root)
        .args(["set", "k", long.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Value is 64 characters"));
}

#[test]
fn set_without_init_fails() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root)
        .args(["set", "k", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Collection not found"));
}

#[test]
fn db_flag_selects_separate_collection() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).args(["--db", "7", "init"]).assert().success();
    fieldkv(root).args(["--db", "7", "set", "k", "v"]).assert().success();
    assert!(root.join("data/hkv-7.json").exists());

    fieldkv(root).arg("init").assert().success();
    fieldkv(root).args(["get", "k"]).assert().success().stdout("\n");
    fieldkv(root)
        .args(["--db", "7", "get", "k"])
        .assert()
        .success()
        .stdout("v\n");
}

#[test]
fn storage_report_can_be_suppressed() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).arg("init").assert().success();
    fieldkv(root)
        .args(["set", "k", "v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Storage:"));
    fieldkv(root)
        .args(["--no-info", "get", "k"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Storage:").not());
}

#[test]
fn unreadable_data_warns_by_default_and_fails_in_strict_mode() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fieldkv(root).arg("init").assert().success();
    std::fs::write(
        root.join("data/hkv-0.json"),
        r#"{"name":"hkv-0","records":[{"text":"@@legacy@@","attributes":{"kind":"label","key":"x"}}]}"#,
    )
    .unwrap();

    fieldkv(root)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("could not parse records"));

    fieldkv(root)
        .args(["--strict", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Stored payload is unreadable"));
}

#[test]
fn config_file_sets_name_prefix_and_medium() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    std::fs::write(
        root.join("fieldkv.toml"),
        "name_prefix = \"kv-\"\nmedium = \"labels\"\n",
    )
    .unwrap();

    fieldkv(root).arg("init").assert().success();
    fieldkv(root).args(["set", "a", "b"]).assert().success();

    let raw = std::fs::read_to_string(root.join("data/kv-0.json")).unwrap();
    assert!(raw.contains("\"kind\": \"label\""));
}
