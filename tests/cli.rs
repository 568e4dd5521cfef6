use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn penny(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("penny").unwrap();
    cmd.env("HOME", home.path())
        .env("PENNY_DATA_DIR", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn add(home: &TempDir, args: &[&str]) {
    penny(home).arg("add").args(args).assert().success();
}

fn json(home: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = penny(home).args(args).output().unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn add_then_report_totals_by_author() {
    let home = TempDir::new().unwrap();
    add(&home, &["100", "--kind", "income", "--category", "shared", "--date", "2024-01-15", "--author", "Alice"]);
    add(&home, &["40", "--kind", "expense", "--category", "personal", "--date", "2024-01-20", "--author", "Alice"]);

    let totals = json(&home, &["report", "totals", "--month", "2024-01", "--json"]);
    assert_eq!(totals["authors"]["Alice"]["income"], 100.0);
    assert_eq!(totals["authors"]["Alice"]["expense"], 40.0);
    assert_eq!(totals["authors"].as_object().unwrap().len(), 1);
}

#[test]
fn category_report_reports_both_keys() {
    let home = TempDir::new().unwrap();
    add(&home, &["50", "--kind", "expense", "--category", "shared", "--date", "2024-02-01", "--author", "Bob"]);

    let report = json(&home, &["report", "categories", "--month", "2024-02", "--json"]);
    assert_eq!(report["breakdown"]["shared"], 50.0);
    assert_eq!(report["breakdown"]["personal"], 0.0);
}

#[test]
fn empty_period_is_not_an_error() {
    let home = TempDir::new().unwrap();
    let totals = json(&home, &["report", "totals", "--month", "2099-01", "--json"]);
    assert!(totals["authors"].as_object().unwrap().is_empty());
    let income = json(&home, &["report", "income", "--month", "2099-01", "--json"]);
    assert_eq!(income["total"], 0.0);
}

#[test]
fn invalid_month_is_rejected() {
    let home = TempDir::new().unwrap();
    penny(&home)
        .args(["report", "totals", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid period"));
}

#[test]
fn edit_changes_only_given_fields() {
    let home = TempDir::new().unwrap();
    add(&home, &["100", "--kind", "income", "--date", "2024-01-15", "--author", "Alice", "-d", "salary"]);
    penny(&home).args(["edit", "1", "--amount", "150"]).assert().success();

    let listing = json(&home, &["list", "--json"]);
    let row = &listing["rows"][0];
    assert_eq!(row["amount"], 150.0);
    assert_eq!(row["date"], "2024-01-15");
    assert_eq!(row["kind"], "income");
    assert_eq!(row["description"], "salary");
    assert_eq!(row["author"], "Alice");
}

#[test]
fn delete_twice_reports_missing_id() {
    let home = TempDir::new().unwrap();
    add(&home, &["10", "--date", "2024-01-15", "--author", "Alice"]);
    penny(&home).args(["delete", "1"]).assert().success();
    penny(&home)
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transaction with ID 1"));
}

#[test]
fn add_rejects_unknown_category() {
    let home = TempDir::new().unwrap();
    penny(&home)
        .args(["add", "10", "--category", "Commun", "--author", "Alice"])
        .assert()
        .failure();
}

#[test]
fn list_prints_total_row() {
    let home = TempDir::new().unwrap();
    add(&home, &["10", "--date", "2024-03-02", "--author", "Alice"]);
    add(&home, &["15.5", "--date", "2024-03-30", "--author", "Bob"]);
    add(&home, &["99", "--date", "2024-04-01", "--author", "Bob"]);
    penny(&home)
        .args(["list", "--month", "2024-03", "--kind", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL"))
        .stdout(predicate::str::contains("$25.50"));
}

#[test]
fn evolution_has_twelve_months() {
    let home = TempDir::new().unwrap();
    add(&home, &["20", "--kind", "income", "--date", "2024-12-31", "--author", "Alice"]);
    let report = json(&home, &["report", "evolution", "--year", "2024", "--json"]);
    let months = report["months"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[11]["income"], 20.0);
}

#[test]
fn export_writes_csv() {
    let home = TempDir::new().unwrap();
    add(&home, &["12.5", "--date", "2024-01-15", "--author", "Alice", "-d", "lunch"]);
    penny(&home)
        .args(["export", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id,date,amount,kind,category,description,author"))
        .stdout(predicate::str::contains("2024-01-15,12.50,expense,shared,lunch,Alice"));
}

#[test]
fn init_creates_only_the_database() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("ledger");
    penny(&home)
        .args(["init", "--user", "Alice", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Default author: Alice"));

    let entries: Vec<String> = std::fs::read_dir(&data)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(entries.iter().any(|name| name == "penny.db"), "got {entries:?}");
    assert!(!data.join("exports").exists());
}
