// ABOUTME: Integration tests for the beekeeper CLI binary.
// ABOUTME: Drives extract, preview, clip and card management against temp files and a mock server.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn beekeeper_cmd() -> Command {
    let mut cmd = Command::cargo_bin("beekeeper").unwrap();
    cmd.env_remove("BEEKEEPER_STORE")
        .env_remove("BEEKEEPER_DATA")
        .env_remove("RUST_LOG");
    cmd
}

fn file_store_cmd(data: &Path) -> Command {
    let mut cmd = beekeeper_cmd();
    cmd.arg("--store").arg("file").arg("--data").arg(data);
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn extract_from_html_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(
        &html_path,
        r#"<html><head>
            <title>Local page</title>
            <meta name="description" content="Saved to disk">
            <link rel="icon" href="/icon.png">
        </head></html>"#,
    )
    .unwrap();

    let json = stdout_json(
        beekeeper_cmd()
            .arg("extract")
            .arg("--html")
            .arg(&html_path)
            .arg("--url")
            .arg("https://www.example.com/a/b"),
    );

    assert_eq!(json["title"], "Local page");
    assert_eq!(json["description"], "Saved to disk");
    assert_eq!(json["favicon"], "https://www.example.com/icon.png");
    assert_eq!(json["domain"], "example.com");
}

#[test]
fn extract_missing_file_fails() {
    beekeeper_cmd()
        .arg("extract")
        .arg("--html")
        .arg("/nonexistent/page.html")
        .arg("--url")
        .arg("https://example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading"));
}

#[test]
fn preview_uses_fetched_metadata_and_stores_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/photo.jpg");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><head><title>Photo page</title></head></html>");
    });
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("cards.json");

    let json = stdout_json(
        file_store_cmd(&data)
            .arg("--allow-private-networks")
            .arg("preview")
            .arg(server.url("/photo.jpg")),
    );
    mock.assert();

    assert_eq!(json["type"], "image");
    assert_eq!(json["title"], "Photo page");
    assert_eq!(json["domain"], "127.0.0.1");
    assert!(!data.exists());
}

#[test]
fn clip_then_manage_cards() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html")
            .body(r#"<html><head><meta property="og:title" content="A post"></head></html>"#);
    });
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("cards.json");

    let clipped = stdout_json(
        file_store_cmd(&data)
            .arg("--allow-private-networks")
            .arg("clip")
            .arg(server.url("/post"))
            .arg("--tag")
            .arg("reading"),
    );
    assert_eq!(clipped["title"], "A post");
    assert_eq!(clipped["type"], "link");
    assert_eq!(clipped["tags"], serde_json::json!(["reading"]));
    let link_id = clipped["id"].as_str().unwrap().to_string();

    let note = stdout_json(
        file_store_cmd(&data)
            .arg("note")
            .arg("--title")
            .arg("Check the hives"),
    );
    assert_eq!(note["type"], "note");
    let note_id = note["id"].as_str().unwrap().to_string();

    let listed = stdout_json(file_store_cmd(&data).arg("list"));
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![note_id.as_str(), link_id.as_str()]);

    let pinned = stdout_json(file_store_cmd(&data).arg("pin").arg(&link_id));
    assert_eq!(pinned["pinned"], true);
    assert_eq!(pinned["title"], "A post");

    let updated = stdout_json(
        file_store_cmd(&data)
            .arg("update")
            .arg(&link_id)
            .arg("--title")
            .arg("Renamed")
            .arg("--clear-tags"),
    );
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["tags"], serde_json::json!([]));
    assert_eq!(updated["pinned"], true);

    let deleted = stdout_json(file_store_cmd(&data).arg("delete").arg(&note_id));
    assert_eq!(deleted["deleted"], true);

    let listed = stdout_json(file_store_cmd(&data).arg("--compact").arg("list"));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn other_users_cannot_pin() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("cards.json");

    let note = stdout_json(file_store_cmd(&data).arg("note").arg("--title").arg("mine"));
    let id = note["id"].as_str().unwrap();

    file_store_cmd(&data)
        .arg("--user")
        .arg("someone-else")
        .arg("pin")
        .arg(id)
        .assert()
        .failure()
        .stderr(predicate::str::contains("belongs to another user"));
}

#[test]
fn invalid_url_fails() {
    beekeeper_cmd()
        .arg("clip")
        .arg("not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn empty_update_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("cards.json");

    file_store_cmd(&data)
        .arg("update")
        .arg("some-id")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));
}

#[test]
fn store_flag_overrides_a_broken_environment() {
    beekeeper_cmd()
        .env("BEEKEEPER_STORE", "redis")
        .arg("--store")
        .arg("memory")
        .arg("list")
        .assert()
        .success();

    beekeeper_cmd()
        .env("BEEKEEPER_STORE", "redis")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid store configuration"));
}

#[test]
fn data_environment_fills_in_for_store_flag() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("env-cards.json");

    beekeeper_cmd()
        .env("BEEKEEPER_STORE", "redis")
        .env("BEEKEEPER_DATA", &data)
        .arg("--store")
        .arg("file")
        .arg("note")
        .arg("--title")
        .arg("From the environment")
        .assert()
        .success();
    assert!(data.exists());
}
