use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const BOOK: &str = r#"{"book": {
  "meta": {"name": "Test Book"},
  "pages": [
    {"vol": "1", "page": "10", "text": "كتاب جميل"},
    {"vol": "1", "page": "11", "text": "هذا كتاب"}
  ],
  "indexes": {"headings": [{"title": "Intro", "level": 1, "page": 1}]}
}}"#;

/// Workspace with a book file and an empty data directory
fn workspace() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("b1.json"), BOOK)?;
    Ok(dir)
}

fn readarabic(dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("readarabic")?;
    cmd.current_dir(dir)
        .env_remove("READARABIC_API_URL")
        .args(["--data-dir", "data"]);
    Ok(cmd)
}

#[test]
fn tokenize_json_outputs_keys() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("page.txt"), "الْكِتَابُ «جميل»")?;

    let assert = readarabic(dir.path())?
        .args(["tokenize", "page.txt", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["kind"], "tokenize.tokens");
    let rows = value["data"].as_array().expect("token rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["position"], "0-0");
    assert_eq!(rows[0]["key"], "الكتاب");
    assert_eq!(rows[1]["key"], "جميل");
    Ok(())
}

#[test]
fn read_shows_positions_and_printed_page() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--printed", "11", "--positions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Book · page 2/2 · p. 11"))
        .stdout(predicate::str::contains("هذا#0 كتاب#1"));

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--page", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    Ok(())
}

#[test]
fn toc_maps_headings_to_pages() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;
    let assert = readarabic(dir.path())?
        .args(["toc", "--file", "b1.json", "--json"])
        .assert()
        .success();

    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["data"][0]["title"], "Intro");
    assert_eq!(value["data"][0]["page_index"], 0);
    assert_eq!(value["data"][0]["page_number"], "10");
    Ok(())
}

#[test]
fn annotate_then_read_shows_gloss() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-0", "--translation", "book"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved at 0-0"));

    assert!(dir.path().join("data/annotations/b1.json").exists());

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("كتاب [book] جميل"));

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--no-glosses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[book]").not());
    Ok(())
}

#[test]
fn duplicate_word_asks_before_saving() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-0", "--translation", "book"])
        .assert()
        .success();

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "1-1", "--translation", "tome"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already translated as \"book\""));

    // Nothing was saved at 1-1 yet
    readarabic(dir.path())?
        .args(["annotations", "--file", "b1.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1-1").not());

    readarabic(dir.path())?
        .args([
            "annotate",
            "--file",
            "b1.json",
            "--at",
            "1-1",
            "--translation",
            "tome",
            "--use-existing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[book] saved at 1-1"));

    let assert = readarabic(dir.path())?
        .args(["annotations", "--file", "b1.json", "--json"])
        .assert()
        .success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let rows = value["data"].as_array().expect("annotation rows");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["translation"] == "book"));
    Ok(())
}

#[test]
fn other_translation_keeps_both() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-0", "--translation", "book"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args([
            "annotate",
            "--file",
            "b1.json",
            "--at",
            "1-1",
            "--translation",
            "tome",
            "--other",
        ])
        .assert()
        .success();

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("كتاب [tome]"));
    Ok(())
}

#[test]
fn edit_and_delete_annotation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-1", "--translation", "nice"])
        .assert()
        .success();

    readarabic(dir.path())?
        .args(["edit", "--file", "b1.json", "--at", "0-1", "beautiful"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args(["read", "--file", "b1.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("جميل [beautiful]"));

    readarabic(dir.path())?
        .args(["delete", "--file", "b1.json", "--at", "0-1"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args(["annotations", "--file", "b1.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No translations saved"));

    readarabic(dir.path())?
        .args(["delete", "--file", "b1.json", "--at", "0-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no annotation at 0-1"));
    Ok(())
}

#[test]
fn legacy_translations_seed_first_read() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;
    fs::create_dir_all(dir.path().join("data"))?;
    fs::write(
        dir.path().join("data/inline-translations.json"),
        r#"{"كتاب": "book"}"#,
    )?;

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("هذا كتاب [book]"));
    Ok(())
}

#[test]
fn dictionary_list_edit_delete() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-0", "--translation", "book"])
        .assert()
        .success();

    readarabic(dir.path())?
        .args(["dictionary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1  كتاب  book"));

    readarabic(dir.path())?
        .args(["dictionary", "edit", "1", "volume"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args(["dictionary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("volume"));

    readarabic(dir.path())?
        .args(["dictionary", "delete", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No dictionary entry 2"));

    readarabic(dir.path())?
        .args(["dictionary", "delete", "1"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args(["dictionary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dictionary is empty"));
    Ok(())
}

#[test]
fn dictionary_delete_clears_inline_translations() -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace()?;

    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-0", "--translation", "book"])
        .assert()
        .success();
    readarabic(dir.path())?
        .args([
            "annotate",
            "--file",
            "b1.json",
            "--at",
            "1-1",
            "--translation",
            "book",
            "--use-existing",
        ])
        .assert()
        .success();
    readarabic(dir.path())?
        .args(["annotate", "--file", "b1.json", "--at", "0-1", "--translation", "nice"])
        .assert()
        .success();

    readarabic(dir.path())?
        .args(["dictionary", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 inline translation(s) of كتاب"));

    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--page", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("كتاب جميل [nice]"))
        .stdout(predicate::str::contains("[book]").not());
    readarabic(dir.path())?
        .args(["read", "--file", "b1.json", "--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[book]").not());

    readarabic(dir.path())?
        .args(["dictionary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("كتاب").not())
        .stdout(predicate::str::contains("جميل  nice"));
    Ok(())
}

#[test]
fn signed_out_commands() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    readarabic(dir.path())?
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));

    readarabic(dir.path())?
        .args(["vocab", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    readarabic(dir.path())?
        .args(["subscription", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
    Ok(())
}

#[test]
fn config_get_reads_file_and_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    readarabic(dir.path())?
        .args(["config", "get", "api.base_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://www.readarabic.io"));

    fs::write(
        dir.path().join("readarabic.yml"),
        "api:\n  timeout_secs: 5\nsubscription:\n  monthly_plan_id: P-123\n",
    )?;
    readarabic(dir.path())?
        .args(["config", "get", "subscription.monthly_plan_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-123"));

    readarabic(dir.path())?
        .args(["config", "get", "google.client_id"])
        .assert()
        .failure();

    readarabic(dir.path())?
        .args(["--api-url", "http://127.0.0.1:9/", "config", "get", "api.base_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9"))
        .stdout(predicate::str::contains("http://127.0.0.1:9/").not());
    Ok(())
}
