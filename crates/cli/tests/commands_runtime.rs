use std::env;
use std::sync::{Mutex, OnceLock};

use renoprop_cli::commands::{config, doctor, publish};
use serde_json::Value;

const VALID_ENV: &[(&str, &str)] = &[
    ("RENOPROP_STORAGE_BUCKET", "renovation-bucket"),
    ("RENOPROP_STORAGE_ACCESS_TOKEN", "ya29.test-token"),
    ("RENOPROP_LLM_API_KEY", "AIza-test-key"),
];

#[test]
fn config_reports_env_sources_and_redacts_secrets() {
    with_env(VALID_ENV, || {
        let output = config::run();

        assert!(output.contains("effective config"));
        assert!(output
            .contains("- storage.bucket = renovation-bucket (source: env (RENOPROP_STORAGE_BUCKET))"));
        assert!(output.contains(
            "- storage.object_name = proposal_document_for_user.pdf (source: default)"
        ));
        assert!(output.contains("- llm.api_key = <redacted>"));
        assert!(output.contains("- storage.access_token = ya29.***"));
        assert!(!output.contains("ya29.test-token"));
        assert!(!output.contains("AIza-test-key"));
    });
}

#[test]
fn config_reports_validation_failure_without_bucket() {
    with_env(&[], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed:"));
    });
}

#[test]
fn doctor_passes_with_valid_env() {
    with_env(VALID_ENV, || {
        let report = parse_payload(&doctor::run(true));

        assert_eq!(report["overall_status"], "pass");
        let checks = report["checks"].as_array().expect("checks array");
        let names: Vec<&str> =
            checks.iter().filter_map(|check| check["name"].as_str()).collect();
        assert_eq!(
            names,
            vec!["config_validation", "storage_credentials", "llm_key_readiness", "pdf_render"]
        );
        assert!(checks.iter().all(|check| check["status"] == "pass"));
    });
}

#[test]
fn doctor_fails_and_skips_when_config_invalid() {
    with_env(&[], || {
        let report = parse_payload(&doctor::run(true));

        assert_eq!(report["overall_status"], "fail");
        let checks = report["checks"].as_array().expect("checks array");
        assert_eq!(checks[0]["name"], "config_validation");
        assert_eq!(checks[0]["status"], "fail");
        assert_eq!(checks[1]["status"], "skipped");
        assert_eq!(checks[2]["status"], "skipped");
        // rendering needs no configuration, so the probe still runs
        assert_eq!(checks[3]["name"], "pdf_render");
        assert_eq!(checks[3]["status"], "pass");
    });
}

#[test]
fn doctor_human_output_lists_every_check() {
    with_env(VALID_ENV, || {
        let output = doctor::run(false);
        assert!(output.starts_with("doctor: all readiness checks passed"));
        assert!(output.contains("- [ok] config_validation:"));
        assert!(output.contains("- [ok] pdf_render:"));
    });
}

#[test]
fn publish_surfaces_storage_failure_from_unreachable_endpoint() {
    let env: Vec<(&str, &str)> = VALID_ENV
        .iter()
        .copied()
        .chain([("RENOPROP_STORAGE_ENDPOINT", "http://127.0.0.1:9")])
        .collect();

    with_env(&env, || {
        let dir = tempfile::TempDir::new().expect("tempdir should create");
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, "Kitchen remodel proposal draft.").expect("draft should write");

        let result = publish::run(Some(&path));
        assert_eq!(result.exit_code, 4, "expected storage failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "publish");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "storage");
    });
}

#[test]
fn publish_returns_config_failure_without_env() {
    with_env(&[], || {
        let result = publish::run(None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "publish");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "RENOPROP_LLM_PROVIDER",
        "RENOPROP_LLM_API_KEY",
        "RENOPROP_LLM_BASE_URL",
        "RENOPROP_LLM_MODEL",
        "RENOPROP_LLM_TIMEOUT_SECS",
        "RENOPROP_LLM_TEMPERATURE",
        "RENOPROP_STORAGE_BUCKET",
        "RENOPROP_STORAGE_OBJECT_NAME",
        "RENOPROP_STORAGE_PROJECT",
        "RENOPROP_STORAGE_LOCATION",
        "RENOPROP_STORAGE_ACCESS_TOKEN",
        "RENOPROP_STORAGE_ENDPOINT",
        "RENOPROP_STORAGE_TIMEOUT_SECS",
        "RENOPROP_LOGGING_LEVEL",
        "RENOPROP_LOGGING_FORMAT",
        "RENOPROP_LOG_LEVEL",
        "RENOPROP_LOG_FORMAT",
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
