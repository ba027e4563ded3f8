use std::env;
use std::fs;
use std::path::Path;

use samalook_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct FieldSource<'a> {
    doc: Option<&'a Value>,
    path: Option<&'a Path>,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let sources =
        FieldSource { doc: config_file_doc.as_ref(), path: config_file_path.as_deref() };

    let static_dir = config
        .server
        .static_dir
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());
    let origins = if config.server.allowed_origins.is_empty() {
        "<any>".to_string()
    } else {
        config.server.allowed_origins.join(",")
    };
    let admin_secret = match &config.admin.secret {
        Some(secret) => redact_secret(secret.expose_secret()),
        None => "<unset>".to_string(),
    };

    let fields = [
        field(
            "storage.catalog_path",
            config.storage.catalog_path.display().to_string(),
            &["SAMALOOK_STORAGE_CATALOG_PATH"],
        ),
        field(
            "storage.write_failure_policy",
            format!("{:?}", config.storage.write_failure_policy),
            &["SAMALOOK_STORAGE_WRITE_FAILURE_POLICY"],
        ),
        field(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["SAMALOOK_SERVER_BIND_ADDRESS"],
        ),
        field("server.port", config.server.port.to_string(), &["SAMALOOK_SERVER_PORT", "PORT"]),
        field(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["SAMALOOK_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        field("server.allowed_origins", origins, &["SAMALOOK_SERVER_ALLOWED_ORIGINS"]),
        field("server.static_dir", static_dir, &["SAMALOOK_SERVER_STATIC_DIR"]),
        field("admin.secret", admin_secret, &["SAMALOOK_ADMIN_SECRET"]),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["SAMALOOK_LOGGING_LEVEL", "SAMALOOK_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["SAMALOOK_LOGGING_FORMAT", "SAMALOOK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        lines.push(render_line(key, &value, sources.describe(key, env_keys)));
    }

    lines.join("\n")
}

fn field(
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
) -> (&'static str, String, &'static [&'static str]) {
    (key, value, env_keys)
}

impl FieldSource<'_> {
    fn describe(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Shows at most the first two characters of the admin secret.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.chars().count() <= 4 {
        return "<redacted>".to_string();
    }

    let prefix: String = trimmed.chars().take(2).collect();
    format!("{prefix}***")
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact_secret};

    #[test]
    fn redacts_short_and_long_secrets() {
        assert_eq!(redact_secret("abc"), "<redacted>");
        assert_eq!(redact_secret("  hunter22  "), "hu***");
    }

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: toml::Value = "[server]\nport = 8080\n".parse().expect("toml should parse");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "storage.catalog_path"));
    }
}
