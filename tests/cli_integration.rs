use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_kjv_module(data_dir: &Path) {
    let module = json!({
        "Genesis 1:1": "In the beginning <H7225> God <H430> created <H1254> {TH8804} the heaven and the earth.",
        "Genesis 1:2": "And the earth was without form, and void; and darkness <i>was</i> upon the face of the deep.",
        "Genesis 1:3": "And God said, Let there be light: and there was light.",
        "Genesis 1:4": "And God saw the light, that <i>it was</i> good: and God divided the light from the darkness.",
        "Genesis 1:5": "And God called the light Day, and the darkness he called Night.",
        "Psalms 23:1": "The LORD <i>is</i> my shepherd; I shall not want.",
        "Malachi 4:6": "And he shall turn the heart of the fathers to the children.",
        "Matthew 1:1": "The book of the generation of Jesus Christ, the son of David.",
        "John 1:1": "In the beginning was the Word, and the Word was with God.",
        "John 3:16": "For God so loved the world, that he gave his only begotten Son.<n>See note</n>",
        "John 3:17": "For God sent not his Son into the world to condemn the world.",
        "Revelation of John 22:20": "Surely I come quickly. Amen.",
        "Revelation of John 22:21": "The grace of our Lord Jesus Christ <i>be</i> with you all. Amen."
    });
    fs::write(data_dir.join("KJV.json"), module.to_string()).unwrap();
}

/// Create a data dir with the fixture module and build its index.
fn indexed_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_kjv_module(dir.path());

    versegrep_cmd(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"));

    dir
}

fn versegrep_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("versegrep").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn phrase_search_finds_ordered_phrases() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "in", "the", "beginning"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 verses"))
        .stdout(predicate::str::contains("Genesis 1:1"))
        .stdout(predicate::str::contains("John 1:1"));
}

#[test]
fn multiword_search_needs_all_words() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "multiword", "light", "darkness"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genesis 1:4"))
        .stdout(predicate::str::contains("Genesis 1:5"))
        .stdout(predicate::str::contains("Genesis 1:2").not());
}

#[test]
fn anyword_search_takes_any_word() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "anyword", "shepherd", "quickly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Psalms 23:1"))
        .stdout(predicate::str::contains("Revelation of John 22:20"));
}

#[test]
fn mixed_search_excludes_negated_terms() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "mixed", "light", "!darkness"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genesis 1:3"))
        .stdout(predicate::str::contains("Genesis 1:4").not());
}

#[test]
fn regex_search_uses_raw_pattern() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "regex", r"shep\w+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Psalms 23:1"));
}

#[test]
fn unknown_search_type_aborts() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "backwards", "light"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid search type: backwards"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_index_reports_error() {
    let dir = TempDir::new().unwrap();
    write_kjv_module(dir.path());

    versegrep_cmd(dir.path())
        .args(["search", "light"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No index found"));
}

#[test]
fn lookup_renders_requested_verses() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["lookup", "John 3:16-17"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 verses"))
        .stdout(predicate::str::contains("For God so loved the world"))
        .stdout(predicate::str::contains("John 3:17"));
}

#[test]
fn context_window_pulls_in_neighbors() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "multiword", "--context", "1", "void"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genesis 1:1"))
        .stdout(predicate::str::contains("Genesis 1:2"))
        .stdout(predicate::str::contains("Genesis 1:3"));
}

#[test]
fn list_only_prints_sorted_references() {
    let dir = indexed_data_dir();

    let output = versegrep_cmd(dir.path())
        .args(["search", "-r", "-s", "anyword", "beginning", "shepherd"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines, ["Genesis 1:1", "Psalms 23:1", "John 1:1"]);
}

#[test]
fn quiet_suppresses_output() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-q", "light"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn one_line_joins_verses() {
    let dir = indexed_data_dir();

    let output = versegrep_cmd(dir.path())
        .args(["search", "-s", "multiword", "--one-line", "beginning"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Genesis 1:1"));
    assert!(lines[0].contains("John 1:1"));
}

#[test]
fn range_restricts_search() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-s", "multiword", "-R", "John", "God"])
        .assert()
        .success()
        .stdout(predicate::str::contains("John 3:16"))
        .stdout(predicate::str::contains("Genesis").not());
}

#[test]
fn strongs_shown_on_request() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["search", "-n", "-s", "multiword", "created"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<H1254>"));

    // Hidden by default.
    versegrep_cmd(dir.path())
        .args(["search", "-s", "multiword", "created"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<H1254>").not());
}

#[test]
fn notes_folded_in_when_asked() {
    let dir = indexed_data_dir();

    versegrep_cmd(dir.path())
        .args(["lookup", "--notes", "John 3:16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Notes: See note)"));

    versegrep_cmd(dir.path())
        .args(["lookup", "John 3:16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("See note").not());
}

#[test]
fn dictionary_lookup() {
    let dir = TempDir::new().unwrap();
    let module = json!({
        "2316": "theos; a deity, especially the supreme Divinity."
    });
    fs::write(dir.path().join("StrongsRealGreek.json"), module.to_string()).unwrap();

    versegrep_cmd(dir.path())
        .args(["strongs", "G2316"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theos"));
}

#[test]
fn missing_module_is_surfaced() {
    let dir = TempDir::new().unwrap();

    versegrep_cmd(dir.path())
        .args(["webster", "grace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn completions_generate() {
    Command::cargo_bin("versegrep")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("versegrep"));
}
