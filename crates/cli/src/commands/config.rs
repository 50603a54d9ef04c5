use std::env;
use std::fs;
use std::path::Path;

use serde_json::json;
use toml::Value;

use atelier_core::config::{resolve_config_path, AppConfig, LoadOptions};

use crate::commands::{load_config, CommandResult};

const COMMAND: &str = "config";

struct ConfigEntry {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match load_config(COMMAND, options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    let mut values = serde_json::Map::new();
    for entry in entries(&config) {
        let source = field_source(
            entry.key,
            entry.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(entry.key, &entry.value, &source));
        values.insert(entry.key.to_string(), json!({ "value": entry.value, "source": source }));
    }

    CommandResult::success_with_data(COMMAND, lines.join("\n"), json!(values))
}

fn entries(config: &AppConfig) -> Vec<ConfigEntry> {
    vec![
        ConfigEntry {
            key: "storage.backend",
            value: config.storage.backend.as_str().to_string(),
            env_keys: &["ATELIER_STORAGE_BACKEND"],
        },
        ConfigEntry {
            key: "storage.url",
            value: config.storage.url.clone(),
            env_keys: &["ATELIER_STORAGE_URL"],
        },
        ConfigEntry {
            key: "storage.path",
            value: config.storage.path.display().to_string(),
            env_keys: &["ATELIER_STORAGE_PATH"],
        },
        ConfigEntry {
            key: "storage.max_connections",
            value: config.storage.max_connections.to_string(),
            env_keys: &["ATELIER_STORAGE_MAX_CONNECTIONS"],
        },
        ConfigEntry {
            key: "storage.timeout_secs",
            value: config.storage.timeout_secs.to_string(),
            env_keys: &["ATELIER_STORAGE_TIMEOUT_SECS"],
        },
        ConfigEntry {
            key: "contact.whatsapp_number",
            value: config.contact.whatsapp_number.clone(),
            env_keys: &["ATELIER_CONTACT_WHATSAPP_NUMBER"],
        },
        ConfigEntry {
            key: "contact.email",
            value: config.contact.email.clone(),
            env_keys: &["ATELIER_CONTACT_EMAIL"],
        },
        ConfigEntry {
            key: "export.output_dir",
            value: config.export.output_dir.display().to_string(),
            env_keys: &["ATELIER_EXPORT_OUTPUT_DIR"],
        },
        ConfigEntry {
            key: "export.prefer_pdf",
            value: config.export.prefer_pdf.to_string(),
            env_keys: &["ATELIER_EXPORT_PREFER_PDF"],
        },
        ConfigEntry {
            key: "agency.name",
            value: config.agency.name.clone(),
            env_keys: &["ATELIER_AGENCY_NAME"],
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["ATELIER_LOGGING_LEVEL", "ATELIER_LOG_LEVEL"],
        },
        ConfigEntry {
            key: "logging.format",
            value: config.logging.format.as_str().to_string(),
            env_keys: &["ATELIER_LOGGING_FORMAT", "ATELIER_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
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

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_the_file_document() {
        let doc: Value = "[contact]\nemail = \"studio@example.com\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "contact.email"));
        assert!(!contains_path(&doc, "contact.whatsapp_number"));
        assert!(!contains_path(&doc, "agency.name"));
    }

    #[test]
    fn file_keys_are_attributed_to_the_file() {
        let doc: Value = "[agency]\nname = \"Studio\"\n".parse().expect("toml");

        let source = field_source(
            "agency.name",
            &["ATELIER_TEST_NEVER_SET_AGENCY"],
            Some(&doc),
            Some(std::path::Path::new("atelier.toml")),
        );
        let fallback = field_source("export.output_dir", &[], Some(&doc), None);

        assert_eq!(source, "file (atelier.toml)");
        assert_eq!(fallback, "default");
    }
}
