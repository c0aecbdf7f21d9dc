//! End-to-end tests of the command-line interface
//!
//! Every test works in its own temporary directory and runs the compiled
//! binary through `assert_cmd`.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const DATASET: &str = "\
Aptamer,S1,S2,S3
AACAATGG,11,20,30
TTCAATGC,12,25,40
GGCAATTT,15,16,17
ACGTACGT,1,2,3
CCCCCCCC,30,20,10
ACGT,50,60,70
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn cli() -> Command {
    Command::cargo_bin("aptamer-families").unwrap()
}

fn data_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("families"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("most-enriched"));
}

#[test]
fn test_families_writes_family_document() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.csv", DATASET);
    let output = dir.path().join("families.json");

    cli()
        .arg("families")
        .arg(&input)
        .arg(&output)
        .args(["--sequence-length", "8", "--family-length", "4"])
        .args(["--min-family-size", "3", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"families\": 1"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let caat = json["families"]["CAAT"].as_array().unwrap();
    assert_eq!(caat.len(), 3);
    assert_eq!(caat[0], "AACAATGG");
}

#[test]
fn test_families_without_key_length_fails() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.csv", DATASET);

    cli()
        .arg("families")
        .arg(&input)
        .arg(dir.path().join("families.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("family length or a must-have substring"));
}

#[test]
fn test_unsupported_extension_is_reported() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.tsv", DATASET);

    cli()
        .arg("filter")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file extension 'tsv'"));
}

#[test]
fn test_prune_drops_small_families() {
    let dir = tempdir().unwrap();
    let input = write(
        dir.path(),
        "families.json",
        r#"{"families":{"AAAA":["AAAAC","CAAAA"],"CCCC":["CCCCA"]}}"#,
    );
    let output = dir.path().join("pruned.json");

    cli()
        .arg("prune")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Families: 1"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"AAAA\""));
    assert!(!text.contains("\"CCCC\""));
}

#[test]
fn test_filter_keeps_rising_sequences_in_source_order() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.csv", DATASET);
    let out = dir.path().join("out");

    cli()
        .arg("filter")
        .arg(&input)
        .args(["--sequence-length", "8", "--type", "csv", "--filename", "rising"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept:     3 of 6"));

    let lines = data_lines(&out.join("rising.csv"));
    assert_eq!(
        lines,
        vec![
            "Aptamer,S1,S2,S3",
            "AACAATGG,11,20,30",
            "TTCAATGC,12,25,40",
            "GGCAATTT,15,16,17",
        ]
    );
}

#[test]
fn test_filter_missing_output_dir_fails_before_reading() {
    let dir = tempdir().unwrap();

    cli()
        .arg("filter")
        .arg(dir.path().join("absent.csv"))
        .arg("--output-dir")
        .arg(dir.path().join("nope"))
        .arg("--no-create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("working directory for the exporter does not exist"))
        .stderr(predicate::str::contains("Failed to read").not());
}

#[test]
fn test_most_enriched_top_two() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.csv", DATASET);

    cli()
        .arg("most-enriched")
        .arg(&input)
        .args(["--samples", "S1,S2", "-n", "2", "--sequence-length", "8"])
        .args(["--type", "csv", "--filename", "top"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success();

    let lines = data_lines(&dir.path().join("top.csv"));
    assert_eq!(
        lines,
        vec!["Aptamer,S1,S2", "CCCCCCCC,30,20", "TTCAATGC,12,25"]
    );
}

#[test]
fn test_group_writes_csv_and_xlsx() {
    let dir = tempdir().unwrap();
    let input = write(
        dir.path(),
        "input.csv",
        "String,S1\nAAA2XYZZZZ,1\nEEE1XYZZZZ,2\nCCCCCCCCCC,3\n",
    );

    cli()
        .arg("group")
        .arg(&input)
        .args(["--key-length", "4", "--min-members", "2"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups: 3"));

    assert!(dir.path().join("output.xlsx").exists());
    let lines = data_lines(&dir.path().join("output.csv"));
    assert_eq!(lines[0], "String,Group,S1");
    assert_eq!(lines[1], "AAA2XYZZZZ,XYZZ,1");
    assert_eq!(lines[2], "EEE1XYZZZZ,XYZZ,2");
    assert_eq!(lines.len(), 1 + 3 * 2);
}

#[test]
fn test_extract_runs_every_step() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "data.csv", DATASET);
    let out = dir.path().join("extracted");

    cli()
        .arg("extract")
        .arg(&input)
        .args(["--sequence-length", "8", "--must-have", "CAAT", "--min-family-size", "3"])
        .args(["--name", "caat", "--type", "csv"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("caat.json").exists());
    let enriched: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("caat-enriched.json")).unwrap()).unwrap();
    assert_eq!(enriched["CAAT"]["TTCAATGC"]["samples"]["S2"], "25");

    let lines = data_lines(&out.join("caat.csv"));
    assert_eq!(lines[0], "family,Aptamer,S1,S2,S3");
    assert_eq!(lines[1], "CAAT,AACAATGG,11,20,30");
    // Three members, then the blank separator row
    assert_eq!(lines[4], ",,0,0,0");
}

#[test]
fn test_compare_config_isolates_failed_jobs() {
    let dir = tempdir().unwrap();
    write(dir.path(), "1-dataset.csv", DATASET);
    write(
        dir.path(),
        "2-dataset.csv",
        "Aptamer,S1,S2,S3\nAACAATGG,11,20,30\nGGCAATTT,1,2,3\n",
    );
    let config = write(
        dir.path(),
        "compare.toml",
        r#"
sequence_length = 8

[[jobs]]
subject = "1-dataset.csv"
comparisons = ["missing.csv"]
output_dir = "out"
output_filename = "broken"
output_type = "csv"

[[jobs]]
subject = "1-dataset.csv"
comparisons = ["2-dataset.csv"]
output_dir = "out"
output_filename = "1-unique"
output_type = "csv"
"#,
    );

    cli()
        .arg("compare")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("Unique:              2"))
        .stderr(predicate::str::contains("1 of 2 comparison jobs failed"));

    // GGCAATTT did not pass the filters in 2-dataset.csv, so it stays unique
    let lines = data_lines(&dir.path().join("out").join("1-unique.csv"));
    assert_eq!(
        lines,
        vec!["Aptamer,S1,S2,S3", "GGCAATTT,15,16,17", "TTCAATGC,12,25,40"]
    );
    assert!(!dir.path().join("out").join("broken.csv").exists());
}

#[test]
fn test_compare_sample_config() {
    cli()
        .args(["compare", "--sample-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[jobs]]"));
}

#[test]
fn test_not_in_top_writes_one_file_per_reference() {
    let dir = tempdir().unwrap();
    let subject = write(dir.path(), "subject.csv", "Aptamer\nAAAA\nCCCC\nGGGG\n");
    let first = write(dir.path(), "first.csv", "Aptamer\nTT\nAAAA\nCCCC\nGGGG\n");
    let second = write(dir.path(), "second.csv", "Aptamer\nGGGG\nTTTT\n");

    cli()
        .arg("not-in-top")
        .arg(&subject)
        .arg(&first)
        .arg(&second)
        .args(["-n", "2", "--sequence-length", "4", "--type", "csv"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("first: 1 of 3 not found"));

    let lines = data_lines(&dir.path().join("3-subject-not-found-from-second-first-2.csv"));
    assert_eq!(lines, vec!["Aptamer", "AAAA", "CCCC"]);
}
