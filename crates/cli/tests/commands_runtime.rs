use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use procura_cli::commands::{config, lookup, skills, smoke, strategy};
use serde_json::Value;
use tempfile::TempDir;

const PILOT_STRATEGY: &str =
    "Collaborative approach focusing on delivery improvements in exchange for contract renewal.";

#[test]
fn smoke_passes_against_pilot_suppliers() {
    with_env(&[], || {
        let result = smoke::run(false);
        assert_eq!(result.exit_code, 0, "expected successful smoke report");
        assert!(result.output.starts_with("smoke: 3/3 checks passed"));
        assert!(result.output.contains(PILOT_STRATEGY));

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");
        assert_eq!(payload["strategy"], PILOT_STRATEGY);

        let names: Vec<&str> = payload["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, ["config_validation", "supplier_lookup", "strategy_generation"]);
    });
}

#[test]
fn smoke_reports_config_failure_without_failing_exit_code() {
    with_env(&[("PROCURA_LOG_FORMAT", "xml")], || {
        let result = smoke::run(false);
        assert_eq!(result.exit_code, 0, "non-strict smoke never signals through exit code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
        assert_eq!(payload["checks"][2]["status"], "skipped");
    });
}

#[test]
fn strict_smoke_exits_non_zero_on_failure() {
    with_env(&[("PROCURA_LOG_FORMAT", "xml")], || {
        let result = smoke::run(true);
        assert_eq!(result.exit_code, 6, "expected smoke failure code");
    });
}

#[test]
fn smoke_skips_strategy_when_pilot_supplier_is_missing() {
    let dir = TempDir::new().expect("tempdir");
    let fixtures = dir.path().join("suppliers.toml");
    fs::write(
        &fixtures,
        r#"
[[supplier]]
supplierId = "2000001"
name = "Initech"
status = "Active"
riskProfile = "Medium"
paymentTerms = "Net 45"

[supplier.rating]
quality = 80
delivery = 90
overall = 85
"#,
    )
    .expect("fixture written");
    let fixtures = fixtures.display().to_string();

    with_env(&[("PROCURA_DIRECTORY_FIXTURES_PATH", fixtures.as_str())], || {
        let result = smoke::run(false);
        assert!(result.output.contains("- [fail] supplier_lookup"));
        assert!(result.output.contains("Supplier 1000123 not found."));

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "fail");
        assert_eq!(payload["checks"][2]["status"], "skipped");
        assert_eq!(payload["checks"][2]["message"], "skipped due to previous failure");
        assert!(payload.get("strategy").is_none());
    });
}

#[test]
fn lookup_prints_found_envelope() {
    with_env(&[], || {
        let result = lookup::run("1000123");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], 200);
        assert_eq!(payload["data"]["name"], "Acme Corp");
        assert_eq!(payload["data"]["rating"]["overall"], 91);
    });
}

#[test]
fn lookup_prints_not_found_envelope() {
    with_env(&[], || {
        let result = lookup::run("9999999");
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(
            payload,
            serde_json::json!({ "status": 404, "message": "Supplier 9999999 not found." })
        );
    });
}

#[test]
fn strategy_generates_for_known_supplier() {
    with_env(&[], || {
        let result = strategy::run("1000123", "Stable", &["Reduce price".to_string()]);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], 200);
        assert_eq!(payload["data"]["strategy"], PILOT_STRATEGY);
    });
}

#[test]
fn strategy_passes_through_lookup_miss() {
    with_env(&[], || {
        let result = strategy::run("9999999", "Stable", &[]);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], 404);
        assert_eq!(payload["message"], "Supplier 9999999 not found.");
    });
}

#[test]
fn model_mode_fails_fast_without_client() {
    with_env(&[("PROCURA_STRATEGY_MODE", "model")], || {
        let result = strategy::run("1000123", "Stable", &[]);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "strategy");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "registry_setup");
    });
}

#[test]
fn lookup_reports_config_failure() {
    with_env(&[("PROCURA_LOG_LEVEL", "loud")], || {
        let result = lookup::run("1000123");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn skills_lists_both_skills() {
    with_env(&[], || {
        let result = skills::run();
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("registered skills (2):"));
        assert!(result.output.contains("- generate-strategy: "));
        assert!(result.output.contains("- get-supplier-data: "));
    });
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("PROCURA_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result
            .output
            .contains("- logging.level = debug (source: env (PROCURA_LOG_LEVEL))"));
        assert!(result.output.contains("- strategy.mode = Placeholder (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PROCURA_DIRECTORY_FIXTURES_PATH",
        "PROCURA_STRATEGY_MODE",
        "PROCURA_LOGGING_LEVEL",
        "PROCURA_LOGGING_FORMAT",
        "PROCURA_LOG_LEVEL",
        "PROCURA_LOG_FORMAT",
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
