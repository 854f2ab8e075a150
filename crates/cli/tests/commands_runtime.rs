use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use closet_cli::commands::{analyze, config, needs};
use serde_json::Value;
use tempfile::TempDir;

const DRESS_REQUEST: &str = r#"{
  "correlation_id": "req-dress-1",
  "analyzed_item": {"id": "d-1", "name": "Dress", "category": "dress", "seasons": ["summer"]},
  "wardrobe_items": [
    {"id": "d-1", "name": "Dress", "category": "dress", "seasons": ["summer"]},
    {"id": "f-1", "name": "Sandals", "category": "footwear", "seasons": ["summer"]}
  ],
  "scenarios": [{"id": "s-social", "name": "Social Outings", "frequency": "twice a week"}],
  "compatible_items": {
    "footwear": [{"id": "f-1", "name": "Sandals", "category": "footwear", "seasons": ["summer"]}]
  }
}"#;

#[test]
fn analyze_returns_dress_based_outfit_for_sandals() {
    with_env(&[], || {
        let (_dir, path) = write_file("request.json", DRESS_REQUEST);
        let result = analyze::run(&path, false);
        assert_eq!(result.exit_code, 0, "expected successful analysis: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "analyze");
        assert_eq!(payload["status"], "ok");

        let data = &payload["data"];
        assert_eq!(data["correlation_id"], "req-dress-1");
        let bucket = &data["outfit_combinations"][0];
        assert_eq!(bucket["label"], "summer - Social Outings");
        assert_eq!(bucket["outfits"][0]["kind"], "dress-based");
        assert_eq!(bucket["outfits"][0]["items"][1]["name"], "Sandals");
        assert_eq!(data["scoring_input"]["outfits"]["status"], "count");
        assert_eq!(data["scoring_input"]["outfits"]["count"], 1);
    });
}

const TOP_REQUEST: &str = r#"{
  "analyzed_item": {"id": "t-1", "name": "Tee", "category": "top", "seasons": ["summer"]},
  "wardrobe_items": [
    {"id": "b-1", "name": "Shorts", "category": "bottom", "seasons": ["summer"]},
    {"id": "f-1", "name": "Sneakers", "category": "footwear", "seasons": ["summer"]}
  ],
  "scenarios": [{"id": "s-gym", "name": "Gym"}]
}"#;

#[test]
fn analyze_with_wardrobe_flag_treats_every_item_as_compatible() {
    with_env(&[], || {
        let (_dir, path) = write_file("request.json", TOP_REQUEST);

        let result = analyze::run(&path, true);
        assert_eq!(result.exit_code, 0, "expected successful analysis: {}", result.output);

        let payload = parse_payload(&result.output);
        let outfit = &payload["data"]["outfit_combinations"][0]["outfits"][0];
        assert_eq!(outfit["kind"], "top-based");
    });
}

#[test]
fn analyze_treats_absent_null_and_empty_compatible_items_alike() {
    with_env(&[], || {
        let with_null = TOP_REQUEST.replacen('{', r#"{"compatible_items": null, "#, 1);
        let with_empty = TOP_REQUEST.replacen('{', r#"{"compatible_items": {}, "#, 1);

        for request in [TOP_REQUEST.to_string(), with_null, with_empty] {
            let (_dir, path) = write_file("request.json", &request);
            let result = analyze::run(&path, false);
            assert_eq!(result.exit_code, 0, "expected successful analysis: {}", result.output);

            let payload = parse_payload(&result.output);
            let data = &payload["data"];
            assert_eq!(data["scoring_input"]["outfits"]["status"], "count");
            assert_eq!(data["scoring_input"]["outfits"]["count"], 0, "request: {request}");
        }
    });
}

#[test]
fn analyze_reports_missing_input_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let result = analyze::run(&dir.path().join("absent.json"), false);
        assert_eq!(result.exit_code, 4, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
        assert!(payload["message"].as_str().unwrap_or_default().contains("could not read"));
    });
}

#[test]
fn analyze_rejects_blank_item_id() {
    with_env(&[], || {
        let request = r#"{"analyzed_item": {"id": "", "name": "Tee", "category": "top"}}"#;
        let (_dir, path) = write_file("request.json", request);

        let result = analyze::run(&path, false);
        assert_eq!(result.exit_code, 5, "expected invalid request code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_request");
    });
}

#[test]
fn analyze_returns_config_failure_with_invalid_env() {
    with_env(&[("CLOSET_NEEDS_WEARS_PER_OUTFIT", "0")], || {
        let (_dir, path) = write_file("request.json", DRESS_REQUEST);
        let result = analyze::run(&path, false);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn needs_reports_targets_for_weekly_frequency() {
    with_env(&[], || {
        let result = needs::run("3 times per week", "summer", None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let data = &payload["data"];
        assert_eq!(data["seasonal_uses"], 39);
        assert_eq!(data["outfits_needed"], 7);
        assert_eq!(data["category_needs"]["top"]["min"], 4);
        assert_eq!(data["category_needs"]["top"]["ideal"], 6);
        assert_eq!(data["category_needs"]["footwear"]["min"], 2);
    });
}

#[test]
fn needs_reads_scenario_frequencies_from_file() {
    with_env(&[], || {
        let scenarios = r#"[
          {"id": "s-office", "name": "Office", "frequency": "daily"},
          {"id": "s-party", "name": "Parties", "frequency": "rarely"}
        ]"#;
        let (_dir, path) = write_file("scenarios.json", scenarios);

        let result = needs::run("", "spring/fall", Some(path.as_path()));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let data = payload["data"].as_array().cloned().unwrap_or_default();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["needs"]["seasonal_uses"], 180);
        assert_eq!(data[1]["needs"]["seasonal_uses"], 2);
        assert_eq!(data[1]["needs"]["outfits_needed"], 1);
    });
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("CLOSET_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("- logging.level = debug (source: env (CLOSET_LOG_LEVEL))"));
        assert!(message.contains("- outfits.max_outfits_per_scenario = 10 (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn write_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture should be written");
    (dir, path)
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CLOSET_OUTFITS_MAX_PER_BUILD",
        "CLOSET_OUTFITS_MAX_PER_SCENARIO",
        "CLOSET_NEEDS_DEFAULT_SEASONAL_USES",
        "CLOSET_NEEDS_WEARS_PER_OUTFIT",
        "CLOSET_SCORING_OUTFIT_BONUS",
        "CLOSET_SCORING_MAX_OUTFIT_BONUS",
        "CLOSET_SCORING_NO_OUTFIT_PENALTY",
        "CLOSET_SCORING_CRITICAL_GAP_PENALTY",
        "CLOSET_SCORING_IMPROVEMENT_GAP_PENALTY",
        "CLOSET_LOGGING_LEVEL",
        "CLOSET_LOGGING_FORMAT",
        "CLOSET_LOG_LEVEL",
        "CLOSET_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
