use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn shipdex(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shipdex").unwrap();
    cmd.env("SHIPDEX_HOME", home)
        .env_remove("SHIPDEX_LOG")
        .env("NO_COLOR", "1")
        .current_dir(home)
        .arg("--offline");
    cmd
}

fn cached(home: &Path) -> serde_json::Value {
    let text = fs::read_to_string(home.join("fandomShips.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn first_id(home: &Path, name: &str) -> String {
    cached(home)
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == name)
        .map(|r| r["id"].to_string())
        .unwrap()
}

#[test]
fn first_run_shows_the_seed() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Stony"));

    assert_eq!(cached(home.path()).as_array().unwrap().len(), 1);
}

#[test]
fn add_then_search() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args([
            "add",
            "--name",
            "Drarry",
            "--characters",
            "Harry Potter x Draco Malfoy",
            "--fandom",
            "Harry Potter",
            "--tags",
            "enemies to lovers, slow burn",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pairing added"));

    shipdex(home.path())
        .args(["search", "draco"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drarry"))
        .stdout(predicate::str::contains("Stony").not());

    shipdex(home.path())
        .args(["search", "potter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drarry"));

    // tags are only searched in extended scope
    shipdex(home.path())
        .args(["search", "slow", "burn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pairings found."));

    shipdex(home.path())
        .args(["search", "--extended", "slow", "burn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drarry"));
}

#[test]
fn add_requires_fandom() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "--name", "Nameless"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fandom is required"));
}

#[test]
fn list_filters_by_status_and_favorites() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "-n", "Klance", "-f", "Voltron", "--status", "Canon"])
        .assert()
        .success();

    shipdex(home.path())
        .args(["list", "--status", "canon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Klance"))
        .stdout(predicate::str::contains("Stony").not());

    shipdex(home.path())
        .args(["list", "--favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stony"))
        .stdout(predicate::str::contains("Klance").not());

    shipdex(home.path())
        .args(["list", "--status", "all", "--fandom", "ALL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stony"))
        .stdout(predicate::str::contains("Klance"));
}

#[test]
fn favorite_toggle_by_name_and_id() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["fav", "stony"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed from favorites"));
    assert_eq!(cached(home.path())[0]["favorite"], false);

    shipdex(home.path())
        .args(["fav", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to favorites"));
    assert_eq!(cached(home.path())[0]["favorite"], true);
}

#[test]
fn edit_keeps_unspecified_fields() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["edit", "Stony", "--rating", "5", "--notes", "forever"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pairing updated"));

    let record = &cached(home.path())[0];
    assert_eq!(record["id"], 1);
    assert_eq!(record["rating"], 5);
    assert_eq!(record["notes"], "forever");
    assert_eq!(record["fandom"], "Marvel Cinematic Universe");
    assert_eq!(record["addedDate"], "2024-01-15");
}

#[test]
fn edit_rejects_bad_image_and_keeps_record() {
    let home = TempDir::new().unwrap();
    let bogus = home.path().join("cover.bmp");
    fs::write(&bogus, b"BM").unwrap();

    shipdex(home.path())
        .args(["edit", "1", "--notes", "changed", "--image"])
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid image file"));

    assert_eq!(
        cached(home.path())[0]["notes"],
        "The loyalty and history between them gets me every time"
    );
}

#[test]
fn edit_embeds_image() {
    let home = TempDir::new().unwrap();
    let cover = home.path().join("cover.png");
    fs::write(&cover, [0x89, b'P', b'N', b'G']).unwrap();

    shipdex(home.path())
        .args(["edit", "1", "--image"])
        .arg(&cover)
        .assert()
        .success();

    let image = cached(home.path())[0]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("data:image/png;base64,"));

    shipdex(home.path())
        .args(["edit", "1", "--clear-image"])
        .assert()
        .success();
    assert!(cached(home.path())[0]["image"].is_null());
}

#[test]
fn delete_unknown_id_is_harmless() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["delete", "999", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));
    assert_eq!(cached(home.path()).as_array().unwrap().len(), 1);
}

#[test]
fn delete_removes_pairing() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "-n", "Destiel", "-f", "Supernatural"])
        .assert()
        .success();
    let id = first_id(home.path(), "Destiel");

    shipdex(home.path())
        .args(["rm", id.as_str(), "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pairing deleted"));

    let names: Vec<_> = cached(home.path())
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Stony"]);
}

#[test]
fn export_import_round_trip() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "-n", "Bellarke", "-f", "The 100", "--rating", "4"])
        .assert()
        .success();
    let before = cached(home.path());

    shipdex(home.path())
        .args(["export", "--output", "snapshot.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 pairing(s)"));

    shipdex(home.path()).args(["rm", "1", "-y"]).assert().success();

    shipdex(home.path())
        .args(["import", "snapshot.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 pairing(s)."));

    assert_eq!(cached(home.path()), before);
}

#[test]
fn export_to_stdout() {
    let home = TempDir::new().unwrap();
    let output = shipdex(home.path())
        .args(["export", "--stdout"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value[0]["name"], "Stony");
    assert!(!home.path().join("pairings.json").exists());
}

#[test]
fn malformed_import_changes_nothing() {
    let home = TempDir::new().unwrap();
    shipdex(home.path()).assert().success();
    let before = cached(home.path());

    fs::write(home.path().join("bad.json"), "not json").unwrap();
    shipdex(home.path())
        .args(["import", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid snapshot"));

    assert_eq!(cached(home.path()), before);
}

#[test]
fn stats_and_fandoms() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "-n", "Wincest", "-f", "Supernatural", "--fanfics", "3"])
        .assert()
        .success();

    shipdex(home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Pairings:\s+2").unwrap())
        .stdout(predicate::str::is_match(r"Fanfics:\s+3").unwrap());

    shipdex(home.path())
        .arg("fandoms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Marvel Cinematic Universe"))
        .stdout(predicate::str::contains("Supernatural"));
}

#[test]
fn doctor_repairs_duplicate_ids() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("dupes.json"),
        r#"[
            {"id": 7, "name": "A", "fandom": "F", "addedDate": "2024-01-01"},
            {"id": 7, "name": "B", "fandom": "F", "addedDate": "2024-01-01"}
        ]"#,
    )
    .unwrap();

    shipdex(home.path())
        .args(["import", "dupes.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shipdex doctor"));

    shipdex(home.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Duplicate id 7"));

    shipdex(home.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("No inconsistencies found."));
}

#[test]
fn legacy_two_field_records_are_read() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("fandomShips.json"),
        r#"[{"id": 3, "char1": "Korra", "char2": "Asami", "fandom": "Legend of Korra", "dynamic": "NA", "addedDate": "2023-06-01"}]"#,
    )
    .unwrap();

    shipdex(home.path())
        .args(["view", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Korra x Asami"))
        .stdout(predicate::str::contains("Dynamic").not());
}

#[test]
fn config_set_and_show() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["config", "sort", "stored"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sort set to stored"));

    shipdex(home.path())
        .args(["config", "sort"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stored"));

    shipdex(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap = local-first"))
        .stdout(predicate::str::contains("cache-key = fandomShips"));

    shipdex(home.path())
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn path_points_into_home() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("fandomShips.json"));
}

#[test]
fn ambiguous_name_is_an_error() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .args(["add", "-n", "Stony", "-f", "Comics"])
        .assert()
        .success();

    shipdex(home.path())
        .args(["view", "stony"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches several pairings"));
}

#[test]
fn grouped_help() {
    let home = TempDir::new().unwrap();
    shipdex(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Per-Pairing Commands:"));
}
