use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_neutral_mass_search() {
    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.arg("180.0634")
        .assert()
        .success()
        .stdout(predicate::str::contains("formula;mass;ppm"))
        .stdout(predicate::str::contains("C6H12O6"));
}

#[test]
fn test_mz_under_adduct() {
    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.args(["181.070664", "-a", "[M+H]+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C6H12O6"));
}

#[test]
fn test_millidalton_tolerance() {
    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.args(["180.0634", "--mda", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C6H12O6"));
}

#[test]
fn test_list_adducts() {
    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.args(["--list-adducts", "pos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[M+H]+"))
        .stdout(predicate::str::contains("[2M+2K-H]+"));
}

#[test]
fn test_unknown_adduct_fails() {
    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.args(["181.070664", "-a", "[M+3H]3+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a known ionization form"));
}

#[test]
fn test_custom_bounds_file() {
    let dir = std::env::temp_dir();
    let path = dir.join("mzformulate_test_tiers.json");
    std::fs::write(
        &path,
        r#"[{"max_mass": 500.0, "bounds": {"C": 10, "H": 20, "O": 10}}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mzformulate").unwrap();
    cmd.args(["180.0634", "-b"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("C6H12O6"));

    std::fs::remove_file(&path).ok();
}
