use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_steamworks-parser")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn json_output(args: &[&str]) -> Value {
    let assert = cmd().args(args).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

fn file_names(model: &Value) -> Vec<String> {
    model["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect()
}

// -- json --

#[test]
fn json_skips_denylisted_files() {
    let model = json_output(&[fixture_path("sdk").as_str()]);
    assert_eq!(file_names(&model), vec!["isteamutils.h", "steamtypes.h"]);
}

#[test]
fn json_interface_and_functions() {
    let model = json_output(&[fixture_path("sdk").as_str()]);
    let utils = &model["files"][0];

    assert_eq!(utils["header"].as_array().unwrap().len(), 5);
    assert_eq!(utils["includes"][0], "steam_api_common.h");

    let interface = &utils["interfaces"][0];
    assert_eq!(interface["name"], "ISteamUtils");
    let functions = interface["functions"].as_array().unwrap();
    let names: Vec<_> = functions.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["GetSecondsSinceAppActive", "CheckFileSignature", "GetImageRGBA"]
    );

    assert_eq!(functions[1]["attributes"][0]["name"], "STEAM_CALL_RESULT");
    assert_eq!(functions[1]["attributes"][0]["value"], "CheckFileSignature_t");
    assert_eq!(functions[1]["args"][0]["type"], "const char *");

    let pub_dest = &functions[2]["args"][1];
    assert_eq!(pub_dest["name"], "pubDest");
    assert_eq!(pub_dest["type"], "uint8 *");
    assert_eq!(pub_dest["attribute"]["name"], "STEAM_ARRAY_COUNT");
    assert_eq!(pub_dest["attribute"]["value"], "nDestBufferSize");
}

#[test]
fn json_callbacks_enums_and_constants() {
    let model = json_output(&[fixture_path("sdk").as_str()]);
    let utils = &model["files"][0];

    let callbacks = utils["callbacks"].as_array().unwrap();
    assert_eq!(callbacks.len(), 2);
    assert_eq!(callbacks[0]["name"], "IPCountry_t");
    assert_eq!(callbacks[0]["callback_id"], "k_iSteamUtilsCallbacks + 1");
    assert_eq!(callbacks[1]["pack_size"], 8);
    assert_eq!(callbacks[1]["fields"][0]["name"], "m_nMinutesBatteryLeft");
    assert!(utils["structs"].as_array().unwrap().is_empty());

    let fields = &utils["enums"][0]["fields"];
    assert_eq!(fields[0]["value"], "-1");
    assert_eq!(fields[0]["comment"]["line"], " no failure");

    assert_eq!(utils["constants"][0]["name"], "k_cchMaxNotificationText");
    assert_eq!(utils["defines"][0]["value"], "\"SteamUtils010\"");
}

#[test]
fn json_typedef_registry() {
    let model = json_output(&[fixture_path("sdk").as_str()]);
    let typedefs = model["typedefs"].as_array().unwrap();
    let names: Vec<_> = typedefs.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["uint8", "uint32", "SteamAPICall_t"]);
    assert!(typedefs.iter().all(|t| t["file"] == "steamtypes.h"));
}

#[test]
fn gameserver_flag_adds_clones() {
    let model = json_output(&[fixture_path("sdk").as_str(), "--gameserver"]);
    assert_eq!(
        file_names(&model),
        vec!["isteamutils.h", "steamtypes.h", "isteamgameserverutils.h"]
    );
    assert_eq!(model["files"][2]["interfaces"][0]["name"], "ISteamGameServerUtils");
    assert_eq!(model["files"][0]["interfaces"][0]["name"], "ISteamUtils");
}

// -- summary --

#[test]
fn summary_format() {
    cmd()
        .args([fixture_path("sdk").as_str(), "-f", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interface ISteamUtils"))
        .stdout(predicate::str::contains(
            "callback IPCountry_t = k_iSteamUtilsCallbacks + 1",
        ))
        .stdout(predicate::str::contains("total: 2 files, 3 typedefs"));
}

#[test]
fn output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("steam.json");

    cmd()
        .args([fixture_path("sdk").as_str(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let model: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(file_names(&model).len(), 2);
}

#[test]
fn output_directory_uses_format_extension() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args([fixture_path("sdk").as_str(), "-f", "summary", "-o", dir.path().to_str().unwrap()])
        .assert()
        .success();

    let text = std::fs::read_to_string(dir.path().join("steamworks.txt")).unwrap();
    assert!(text.contains("interface ISteamUtils"));
}

// -- config --

#[test]
fn config_file_replaces_skip_list() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{ "skipped_files": ["steamtypes.h", "steam_api_flat.h"] }"#,
    )
    .unwrap();

    let model = json_output(&[fixture_path("sdk").as_str(), "-c", config.to_str().unwrap()]);
    assert_eq!(file_names(&model), vec!["isteamutils.h"]);
    assert!(model["typedefs"].as_array().unwrap().is_empty());
}

// -- failures --

#[test]
fn parse_error_fails_the_run() {
    cmd()
        .arg(fixture_path("broken"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("broken.h:1"))
        .stderr(predicate::str::contains("without a matching push"));
}

#[test]
fn skipped_file_would_fail_if_parsed() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{ "skipped_files": [] }"#).unwrap();

    cmd()
        .args([fixture_path("sdk").as_str(), "-c", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("steam_api_flat.h:2"));
}

#[test]
fn missing_directory() {
    cmd()
        .arg(fixture_path("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse headers"));
}

#[test]
fn unknown_format() {
    cmd()
        .args([fixture_path("sdk").as_str(), "-f", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: yaml"));
}
