use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn budgie(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("budgie").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn init(home: &Path) -> std::path::PathBuf {
    let data_dir = home.join("ledger");
    budgie(home)
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized budgie"));
    data_dir
}

#[test]
fn init_creates_database_and_settings() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = init(home.path());
    assert!(data_dir.join("budgie.db").exists());
    assert!(home.path().join(".config/budgie/settings.json").exists());

    budgie(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:  0"));
}

#[test]
fn status_without_init_suggests_init() {
    let home = tempfile::tempdir().unwrap();
    budgie(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("budgie init"));
    assert!(!home.path().join("Documents/budgie").exists());
}

#[test]
fn headless_commands_write_a_log_file() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = init(home.path());
    let csv = home.path().join("s.csv");
    std::fs::write(&csv, "01/15/2025,Coffee Shop,4.50,,\n").unwrap();
    budgie(home.path()).arg("import").arg(&csv).assert().success();

    let mut logged = String::new();
    for entry in std::fs::read_dir(data_dir.join("logs")).unwrap() {
        logged.push_str(&std::fs::read_to_string(entry.unwrap().path()).unwrap());
    }
    assert!(logged.contains("initialized"));
    assert!(logged.contains("imported file"));
    assert!(logged.contains("written=1"));
}

#[test]
fn import_then_find() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    let csv = home.path().join("stmt.csv");
    std::fs::write(
        &csv,
        "Date,Description,Debit,Credit,Total\n\
         01/15/2025,Coffee Shop,4.50,,\n\
         01/20/2025,Salary,,3000.00,\n\
         01/20/2025,Salary,,3000.00,\n",
    )
    .unwrap();

    budgie(home.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 inserted, 1 skipped (duplicates), 1 invalid"));

    budgie(home.path())
        .args(["find", "--description", "COFFEE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee Shop"))
        .stdout(predicate::str::contains("Salary").not());

    budgie(home.path())
        .args(["find", "--month", "Jan", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transaction(s)"));

    budgie(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:  2"));
}

#[test]
fn find_rejects_bad_criterion() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    budgie(home.path())
        .args(["find", "--month", "Foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid Month"));
}

#[test]
fn find_with_no_matches() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    budgie(home.path())
        .args(["find", "--year", "1999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions match year: 1999"));
}

#[test]
fn import_missing_file_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    budgie(home.path())
        .args(["import", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
