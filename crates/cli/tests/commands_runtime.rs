use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use samalook_cli::commands::{config, doctor, list, seed};
use serde_json::Value;

#[test]
fn seed_loads_demo_catalog_into_empty_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("data").join("products.json");

    with_catalog(&catalog_path, &[], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("demo catalog loaded with 6 products"));
        assert!(message.contains("  - shoes: #1 Sandales en cuir"));

        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(&catalog_path).expect("catalog written"))
                .expect("catalog parses");
        assert_eq!(on_disk["shoes"][0]["id"], 1);
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");

    with_catalog(&catalog_path, &[], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let written = fs::read_to_string(&catalog_path).expect("catalog written");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let payload = parse_payload(&second.output);
        assert_eq!(
            payload["message"],
            "catalog already holds 6 products; demo catalog not loaded"
        );
        assert_eq!(fs::read_to_string(&catalog_path).expect("catalog still present"), written);
    });
}

#[test]
fn seed_reports_config_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");

    with_catalog(&catalog_path, &[("SAMALOOK_SERVER_PORT", "0")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(!catalog_path.exists());
    });
}

#[test]
fn list_prints_catalog_as_pretty_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");
    fs::write(
        &catalog_path,
        r#"{"watches":[{"id":3,"name":"Montre","price":"30 000","image":"/w.jpg"}]}"#,
    )
    .expect("write fixture");

    with_catalog(&catalog_path, &[], || {
        let result = list::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["watches"][0]["name"], "Montre");
        assert!(result.output.contains("\n  \"watches\""));
    });
}

#[test]
fn list_of_missing_document_is_empty_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");

    with_catalog(&catalog_path, &[], || {
        let result = list::run();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output, "{}");
    });
}

#[test]
fn doctor_passes_for_fresh_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");

    with_catalog(&catalog_path, &[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected doctor to pass: {}", result.output);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let names: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, vec!["config_validation", "catalog_document", "storage_directory"]);
    });
}

#[test]
fn doctor_fails_for_malformed_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");
    fs::write(&catalog_path, "[1, 2").expect("write fixture");

    with_catalog(&catalog_path, &[], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] catalog_document:"));
    });
}

#[test]
fn config_reports_env_sources_and_redacts_secret() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("products.json");

    with_catalog(
        &catalog_path,
        &[("SAMALOOK_ADMIN_SECRET", "open-sesame"), ("PORT", "4000")],
        || {
            let output = config::run();

            assert!(output
                .contains("- admin.secret = op*** (source: env (SAMALOOK_ADMIN_SECRET))"));
            assert!(output.contains("- server.port = 4000 (source: env (PORT))"));
            assert!(output.contains("(source: env (SAMALOOK_STORAGE_CATALOG_PATH))"));
            assert!(output.contains("- logging.level = info (source: default)"));
            assert!(!output.contains("open-sesame"));
        },
    );
}

fn with_catalog(catalog_path: &Path, vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    let path = catalog_path.display().to_string();
    let mut all_vars = vec![("SAMALOOK_STORAGE_CATALOG_PATH", path.as_str())];
    all_vars.extend_from_slice(vars);
    with_env(&all_vars, test_fn);
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SAMALOOK_STORAGE_CATALOG_PATH",
        "SAMALOOK_STORAGE_WRITE_FAILURE_POLICY",
        "SAMALOOK_SERVER_BIND_ADDRESS",
        "SAMALOOK_SERVER_PORT",
        "SAMALOOK_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "SAMALOOK_SERVER_ALLOWED_ORIGINS",
        "SAMALOOK_SERVER_STATIC_DIR",
        "SAMALOOK_ADMIN_SECRET",
        "SAMALOOK_LOGGING_LEVEL",
        "SAMALOOK_LOGGING_FORMAT",
        "SAMALOOK_LOG_LEVEL",
        "SAMALOOK_LOG_FORMAT",
        "PORT",
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

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}
