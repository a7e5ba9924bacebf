//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizbank() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizbank").unwrap();
    cmd.env_remove("QUIZBANK_BANK").env("HOME", "/nonexistent");
    cmd
}

fn sample_bank() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../banks/sample.txt")
}

/// A temp dir holding `bank.txt` with the given contents.
fn bank_dir(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bank.txt");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

const ONE_QUESTION: &str = "Q: Two plus two?\nA) 3\nB) *4\nC) 5\n";

#[test]
fn validate_sample_bank() {
    quizbank()
        .arg("validate")
        .arg("--bank")
        .arg(sample_bank())
        .assert()
        .success()
        .stdout(predicate::str::contains("(8 questions)"))
        .stdout(predicate::str::contains("2 multi-select question(s)"))
        .stdout(predicate::str::contains("All question blocks valid"));
}

#[test]
fn validate_reports_rejected_blocks() {
    let (_dir, path) = bank_dir(
        "Q: fine\nA) *a\nB) b\n\nQ: lonely\nA) *a\n\nQ: unmarked\nA) a\nB) b\n",
    );
    quizbank()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 questions)"))
        .stdout(predicate::str::contains(
            "[line 5] WARNING: \"lonely\" needs at least 2 options, found 1",
        ))
        .stdout(predicate::str::contains("[line 8]"))
        .stdout(predicate::str::contains("2 block(s) skipped"));
}

#[test]
fn validate_empty_bank_fails() {
    let (_dir, path) = bank_dir("// nothing but comments\n");
    quizbank()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid questions"));
}

#[test]
fn validate_nonexistent_file() {
    quizbank()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn blocks_lists_catalog_names_and_counts() {
    quizbank()
        .arg("blocks")
        .arg("--bank")
        .arg(sample_bank())
        .arg("--certification")
        .arg("togaf10")
        .assert()
        .success()
        .stdout(predicate::str::contains("TOGAF 10 - Foundation"))
        .stdout(predicate::str::contains("Introduction to the ADM"))
        .stdout(predicate::str::contains("Questions"));
}

#[test]
fn blocks_unknown_certification_fails() {
    quizbank()
        .arg("blocks")
        .arg("--certification")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown certification"));
}

#[test]
fn run_immediate_feedback() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(&path)
        .write_stdin("b\nf\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting quiz: 1 questions"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Score: 1 / 1 (100.0%)"));
}

#[test]
fn run_end_feedback_withholds_result() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(&path)
        .arg("--feedback")
        .arg("end")
        .arg("--review")
        .write_stdin("A\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer recorded."))
        .stdout(predicate::str::contains("Incorrect").not())
        .stdout(predicate::str::contains("Score: 0 / 1 (0.0%)"))
        .stdout(predicate::str::contains("A) 3  <- your answer"))
        .stdout(predicate::str::contains("B) 4  <- correct"));
}

#[test]
fn run_caps_count_to_block_pool() {
    let (dir, _) = bank_dir("");
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(sample_bank())
        .arg("--block")
        .arg("2")
        .arg("--count")
        .arg("50")
        .arg("--seed")
        .arg("11")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting quiz: 3 questions (block 2"))
        .stdout(predicate::str::contains("Score: 0 / 3"));
}

#[test]
fn run_empty_block_fails() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(&path)
        .arg("--block")
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions in block 9"));
}

#[test]
fn run_rejects_bad_block_argument() {
    quizbank()
        .arg("run")
        .arg("--block")
        .arg("everything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid block"));
}

#[test]
fn run_json_report() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(&path)
        .arg("--json")
        .write_stdin("B\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"session_id\""))
        .stdout(predicate::str::contains("\"outcome\": \"correct\""));
}

#[test]
fn run_markdown_report() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--bank")
        .arg(&path)
        .arg("--markdown")
        .write_stdin("B\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Quiz Results"))
        .stdout(predicate::str::contains("**Score:** 1 / 1 (100.0%)"))
        .stdout(predicate::str::contains("**Duration:**"));
}

#[test]
fn run_without_bank_fails() {
    let dir = TempDir::new().unwrap();
    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question bank given"));
}

#[test]
fn run_uses_config_defaults() {
    let (dir, path) = bank_dir(ONE_QUESTION);
    std::fs::write(
        dir.path().join("quizbank.toml"),
        format!(
            "default_bank = {:?}\ndefault_feedback = \"end\"\n",
            path.to_string_lossy()
        ),
    )
    .unwrap();

    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .write_stdin("B\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("feedback end"))
        .stdout(predicate::str::contains("Answer recorded."));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizbank()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizbank.toml"))
        .stdout(predicate::str::contains("Created banks/example.txt"));

    assert!(dir.path().join("quizbank.toml").exists());

    quizbank()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("banks/example.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("(4 questions)"));

    quizbank()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn init_config_drives_run() {
    let dir = TempDir::new().unwrap();
    quizbank()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizbank()
        .current_dir(dir.path())
        .arg("run")
        .arg("--seed")
        .arg("3")
        .write_stdin("f\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting quiz: 4 questions"))
        .stdout(predicate::str::contains("Navigation"))
        .stdout(predicate::str::contains("Files and permissions"));
}
