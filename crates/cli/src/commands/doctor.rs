use std::path::Path;

use samalook_core::config::{AppConfig, LoadOptions};
use samalook_store::CatalogDocument;
use serde::Serialize;

use crate::commands::{runtime, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            },
            check_catalog_document(&config.storage.catalog_path),
            check_storage_directory(&config.storage.catalog_path),
        ],
        Err(error) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
            skipped("catalog_document"),
            skipped("storage_directory"),
        ],
    };

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let (overall_status, summary) = if all_pass {
        (CheckStatus::Pass, "doctor: all readiness checks passed")
    } else {
        (CheckStatus::Fail, "doctor: one or more readiness checks failed")
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration did not load".to_string(),
    }
}

fn check_catalog_document(path: &Path) -> DoctorCheck {
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(details) => {
            return DoctorCheck { name: "catalog_document", status: CheckStatus::Fail, details }
        }
    };

    let document = CatalogDocument::new(path);
    match runtime.block_on(document.read()) {
        Ok(Some(catalog)) => DoctorCheck {
            name: "catalog_document",
            status: CheckStatus::Pass,
            details: format!(
                "`{}` holds {} products in {} categories",
                path.display(),
                catalog.product_count(),
                catalog.categories().count()
            ),
        },
        Ok(None) => DoctorCheck {
            name: "catalog_document",
            status: CheckStatus::Pass,
            details: format!(
                "`{}` does not exist yet; it is created on first write",
                path.display()
            ),
        },
        Err(error) => DoctorCheck {
            name: "catalog_document",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_storage_directory(path: &Path) -> DoctorCheck {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !directory.exists() {
        return DoctorCheck {
            name: "storage_directory",
            status: CheckStatus::Pass,
            details: format!("`{}` will be created on first write", directory.display()),
        };
    }

    match tempfile::NamedTempFile::new_in(directory) {
        Ok(_scratch) => DoctorCheck {
            name: "storage_directory",
            status: CheckStatus::Pass,
            details: format!("`{}` is writable", directory.display()),
        },
        Err(error) => DoctorCheck {
            name: "storage_directory",
            status: CheckStatus::Fail,
            details: format!("`{}` is not writable: {error}", directory.display()),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{check_catalog_document, check_storage_directory, CheckStatus};

    #[test]
    fn missing_document_is_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let check = check_catalog_document(&dir.path().join("products.json"));

        assert_eq!(check.status, CheckStatus::Pass);
        assert!(check.details.contains("created on first write"));
    }

    #[test]
    fn malformed_document_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(&path, "{ not json").expect("write fixture");

        let check = check_catalog_document(&path);

        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[test]
    fn existing_directory_is_writable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let check = check_storage_directory(&dir.path().join("products.json"));

        assert_eq!(check.status, CheckStatus::Pass);
        assert!(check.details.ends_with("is writable"));
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }
}
