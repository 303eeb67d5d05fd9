use assert_cmd::Command;
use predicates::prelude::*;

/// Build a command with HOME and the data dirs pointed at a throwaway
/// directory so settings and the database never touch the real ones.
fn fiscus(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fiscus").unwrap();
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env("XDG_DATA_HOME", home.path().join(".local/share"));
    cmd
}

#[test]
fn init_demo_and_download_file_a() {
    let home = tempfile::tempdir().unwrap();

    fiscus(&home)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized warehouse"));

    fiscus(&home)
        .args(["demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded sample warehouse"));

    fiscus(&home)
        .args([
            "download",
            "--account-type",
            "account_balances",
            "--account-level",
            "federal_account",
            "--fy",
            "2020",
            "--quarter",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("federal_account_symbol"))
        .stdout(predicate::str::contains("097-0100"));
}

#[test]
fn download_rejects_bad_account_level() {
    let home = tempfile::tempdir().unwrap();
    fiscus(&home).args(["init"]).assert().success();

    fiscus(&home)
        .args([
            "download",
            "--account-type",
            "account_balances",
            "--account-level",
            "tas",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "account_level must be either \"federal_account\" or \"treasury_account\"",
        ));
}

#[test]
fn download_rejects_unknown_agency() {
    let home = tempfile::tempdir().unwrap();
    fiscus(&home).args(["init"]).assert().success();
    fiscus(&home).args(["demo"]).assert().success();

    fiscus(&home)
        .args([
            "download",
            "--account-type",
            "account_balances",
            "--fy",
            "2020",
            "--quarter",
            "2",
            "--agency",
            "12345",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Agency with that ID does not exist"));
}

#[test]
fn periods_lists_fiscal_year() {
    let home = tempfile::tempdir().unwrap();
    fiscus(&home).args(["init"]).assert().success();
    fiscus(&home).args(["demo"]).assert().success();

    fiscus(&home)
        .args(["periods", "--fy", "2020"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FY2020Q2"))
        .stdout(predicate::str::contains("FY2020P12"))
        .stdout(predicate::str::contains("(final)"));
}
