use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_fasta(dir: &Path, name: &str, id: &str, residues: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!(">{} test record\n{}\n", id, residues)).unwrap();
    path
}

fn nwalign() -> Command {
    let mut cmd = Command::cargo_bin("nwalign").unwrap();
    cmd.env_remove("NWALIGN_CONFIG").env_remove("NWALIGN_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help_command() {
    nwalign()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("affine gap"))
        .stdout(predicate::str::contains("align"))
        .stdout(predicate::str::contains("rank"))
        .stdout(predicate::str::contains("matrix"));
}

#[test]
fn test_cli_version_command() {
    nwalign()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_align_json_report() {
    let dir = TempDir::new().unwrap();
    let a = write_fasta(dir.path(), "a.fa", "seqA", "MYQR");
    let b = write_fasta(dir.path(), "b.fa", "seqB", "MQR");

    let report = json_output(nwalign().arg("--format").arg("json").arg("align").arg(&a).arg(&b));

    assert_eq!(report["first"], "seqA");
    assert_eq!(report["second"], "seqB");
    assert_eq!(report["matrix"], "BLOSUM62");
    assert_eq!(report["score"].as_f64(), Some(4.0));
    assert_eq!(report["aligned_first"], "MYQR");
    assert_eq!(report["aligned_second"], "M-QR");
    assert_eq!(report["gaps"].as_u64(), Some(1));
}

#[test]
fn test_align_text_output() {
    let dir = TempDir::new().unwrap();
    let a = write_fasta(dir.path(), "a.fa", "seqA", "MAVHQLIRRP");
    let b = write_fasta(dir.path(), "b.fa", "seqB", "MQLIRHP");

    nwalign()
        .arg("align")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("MAVHQLIRRP"))
        .stdout(predicate::str::contains("M---QLIRHP"))
        .stdout(predicate::str::contains("Score: 17"));
}

#[test]
fn test_rank_orders_by_score() {
    let dir = TempDir::new().unwrap();
    let reference = write_fasta(dir.path(), "ref.fa", "reference", "MYQR");
    let distant = write_fasta(dir.path(), "distant.fa", "distant", "WWWW");
    let close = write_fasta(dir.path(), "close.fa", "close", "MQR");
    let same = write_fasta(dir.path(), "same.fa", "same", "MYQR");

    let report = json_output(
        nwalign()
            .args(["--format", "json", "rank"])
            .arg(&reference)
            .arg(&distant)
            .arg(&close)
            .arg(&same),
    );

    let labels: Vec<&str> = report["ranking"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["same", "close", "distant"]);
    assert_eq!(report["ranking"][0]["score"].as_f64(), Some(22.0));
    assert_eq!(report["ranking"][1]["score"].as_f64(), Some(4.0));
}

#[test]
fn test_rank_requires_targets() {
    let dir = TempDir::new().unwrap();
    let reference = write_fasta(dir.path(), "ref.fa", "reference", "MYQR");

    nwalign().arg("rank").arg(&reference).assert().failure();
}

#[test]
fn test_positive_gap_open_exits_with_parameter_code() {
    let dir = TempDir::new().unwrap();
    let a = write_fasta(dir.path(), "a.fa", "seqA", "MYQR");

    nwalign()
        .args(["--gap-open", "10", "align"])
        .arg(&a)
        .arg(&a)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_missing_file_exits_with_io_code() {
    let dir = TempDir::new().unwrap();
    let a = write_fasta(dir.path(), "a.fa", "seqA", "MYQR");

    nwalign()
        .arg("align")
        .arg(&a)
        .arg(dir.path().join("missing.fa"))
        .assert()
        .code(3);
}

#[test]
fn test_unknown_residue_is_reported() {
    let dir = TempDir::new().unwrap();
    let a = write_fasta(dir.path(), "a.fa", "seqA", "MYQR");
    let b = write_fasta(dir.path(), "b.fa", "seqB", "MJQR");

    nwalign()
        .arg("align")
        .arg(&a)
        .arg(&b)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'J' is not in the scoring alphabet"));
}

#[test]
fn test_config_file_supplies_penalties() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nwalign.toml");
    fs::write(&config, "[alignment]\ngap_open = -5.0\ngap_extend = -1.0\n").unwrap();
    let a = write_fasta(dir.path(), "a.fa", "long", "ACGTACGT");
    let b = write_fasta(dir.path(), "b.fa", "short", "ACGT");

    let report = json_output(
        nwalign()
            .arg("--config")
            .arg(&config)
            .args(["--format", "json", "align"])
            .arg(&a)
            .arg(&b),
    );

    assert_eq!(report["gap_open"].as_f64(), Some(-5.0));
    assert_eq!(report["gaps"].as_u64(), Some(4));
}

#[test]
fn test_matrix_json_summary() {
    let report = json_output(nwalign().args(["--format", "json", "matrix"]));

    assert_eq!(report["name"], "BLOSUM62");
    assert_eq!(report["size"].as_u64(), Some(24));
    assert_eq!(report["symmetric"], true);
    assert!(report["scores"].is_null());
}
