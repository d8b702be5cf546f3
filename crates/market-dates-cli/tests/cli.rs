use assert_cmd::Command;
use predicates::prelude::*;

fn mdates() -> Command {
    Command::cargo_bin("mdates").unwrap()
}

// ── roll ────────────────────────────────────────────────────────────────────

#[test]
fn test_roll_month_end_clamp() {
    mdates()
        .args(["roll", "1M", "2021-01-31", "2021-02-15"])
        .assert()
        .success()
        .stdout("2021-01-31\t2021-02-28\n2021-02-15\t2021-03-15\n");
}

#[test]
fn test_roll_reverse_days() {
    mdates()
        .args(["roll", "6M", "2018-11-23", "--reverse", "--days"])
        .assert()
        .success()
        .stdout("2018-11-23\t-184\n");
}

#[test]
fn test_roll_json() {
    let output = mdates()
        .args(["--format", "json", "roll", "1Y", "2020-02-29"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["date"], "2020-02-29");
    assert_eq!(json[0]["result"], "2021-02-28");
}

#[test]
fn test_roll_unknown_tenor_fails() {
    mdates()
        .args(["roll", "abc", "2020-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized tenor"));
}

#[test]
fn test_roll_bad_date_fails() {
    mdates()
        .args(["roll", "3M", "31/01/2020"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date argument"));
}

// ── lookback ────────────────────────────────────────────────────────────────

#[test]
fn test_lookback_steps_over_weekend() {
    mdates()
        .args(["lookback", "6M", "2019-05-04", "--index", "-"])
        .write_stdin("date,close\n01/11/2018,1\n02/11/2018,2\n05/11/2018,3\n")
        .assert()
        .success()
        .stdout("2018-11-02\n");
}

// ── infer ───────────────────────────────────────────────────────────────────

#[test]
fn test_infer_patterns() {
    mdates()
        .args(["infer", "31/01/2019", "01/02/2019"])
        .assert()
        .success()
        .stdout("%d/%m/%Y\n");
    mdates()
        .args(["infer", "01/02/03"])
        .assert()
        .success()
        .stdout("unresolved\n");
}

#[test]
fn test_infer_year_in_middle_fails() {
    mdates()
        .args(["infer", "01/2019/02"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("year in the middle"));
}

// ── clean ───────────────────────────────────────────────────────────────────

#[test]
fn test_clean_csv_from_stdin() {
    mdates()
        .arg("clean")
        .write_stdin(
            "Trade Date,Settle Date,Price,DateCode\n\
             31/01/2019,2019-02-04,101.5,7\n\
             01/02/2019,,102.0,8\n",
        )
        .assert()
        .success()
        .stdout(
            "Trade Date,Settle Date,Price,DateCode\n\
             2019-01-31,2019-02-04,101.5,7\n\
             2019-02-01,,102.0,8\n",
        );
}

#[test]
fn test_clean_json() {
    let output = mdates()
        .args(["-f", "json", "clean"])
        .write_stdin("date,label\n2019-01-31,a\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["date"], "2019-01-31");
    assert_eq!(json[0]["label"], "a");
}

// ── melt ────────────────────────────────────────────────────────────────────

#[test]
fn test_melt_bloomberg_export() {
    mdates()
        .arg("melt")
        .write_stdin(
            "UKX Index,,SPX Index,\n\
             Date,PX_LAST,Date,PX_LAST\n\
             31/01/2019,6968.85,43496,2704.1\n\
             01/02/2019,7020.22,01/02/2019,2706.53\n",
        )
        .assert()
        .success()
        .stdout(
            "product,date,price\n\
             UKX Index,2019-01-31,6968.85\n\
             UKX Index,2019-02-01,7020.22\n\
             SPX Index,2019-01-31,2704.1\n\
             SPX Index,2019-02-01,2706.53\n",
        );
}

#[test]
fn test_melt_wrong_header_fails() {
    mdates()
        .arg("melt")
        .write_stdin("A,\nDate,PX_OPEN\n31/01/2019,1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PX_OPEN"));
}
