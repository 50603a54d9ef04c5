use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "atelier.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub contact: ContactConfig,
    pub export: ExportConfig,
    pub agency: AgencyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub path: PathBuf,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ContactConfig {
    pub whatsapp_number: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub prefer_pdf: bool,
}

#[derive(Clone, Debug)]
pub struct AgencyConfig {
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Sqlite,
    File,
    Memory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_backend: Option<StorageBackend>,
    pub storage_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                url: "sqlite://atelier.db".to_string(),
                path: PathBuf::from("atelier-session.json"),
                max_connections: 1,
                timeout_secs: 30,
            },
            contact: ContactConfig {
                whatsapp_number: "254700000000".to_string(),
                email: "hello@creativeagency.co.ke".to_string(),
            },
            export: ExportConfig { output_dir: PathBuf::from("quotes"), prefer_pdf: true },
            agency: AgencyConfig { name: "Creative Agency Kenya".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected sqlite|file|memory)"
            ))),
        }
    }
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(url) = storage.url {
                self.storage.url = url;
            }
            if let Some(path) = storage.path {
                self.storage.path = path;
            }
            if let Some(max_connections) = storage.max_connections {
                self.storage.max_connections = max_connections;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
        }

        if let Some(contact) = patch.contact {
            if let Some(whatsapp_number) = contact.whatsapp_number {
                self.contact.whatsapp_number = whatsapp_number;
            }
            if let Some(email) = contact.email {
                self.contact.email = email;
            }
        }

        if let Some(export) = patch.export {
            if let Some(output_dir) = export.output_dir {
                self.export.output_dir = output_dir;
            }
            if let Some(prefer_pdf) = export.prefer_pdf {
                self.export.prefer_pdf = prefer_pdf;
            }
        }

        if let Some(name) = patch.agency.and_then(|agency| agency.name) {
            self.agency.name = name;
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ATELIER_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = read_env("ATELIER_STORAGE_URL") {
            self.storage.url = value;
        }
        if let Some(value) = read_env("ATELIER_STORAGE_PATH") {
            self.storage.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("ATELIER_STORAGE_MAX_CONNECTIONS") {
            self.storage.max_connections = parse_u32("ATELIER_STORAGE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("ATELIER_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_u64("ATELIER_STORAGE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("ATELIER_CONTACT_WHATSAPP_NUMBER") {
            self.contact.whatsapp_number = value;
        }
        if let Some(value) = read_env("ATELIER_CONTACT_EMAIL") {
            self.contact.email = value;
        }

        if let Some(value) = read_env("ATELIER_EXPORT_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("ATELIER_EXPORT_PREFER_PDF") {
            self.export.prefer_pdf = parse_bool("ATELIER_EXPORT_PREFER_PDF", &value)?;
        }

        if let Some(value) = read_env("ATELIER_AGENCY_NAME") {
            self.agency.name = value;
        }

        let log_level =
            read_env("ATELIER_LOGGING_LEVEL").or_else(|| read_env("ATELIER_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ATELIER_LOGGING_FORMAT").or_else(|| read_env("ATELIER_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(url) = overrides.storage_url {
            self.storage.url = url;
        }
        if let Some(path) = overrides.storage_path {
            self.storage.path = path;
        }
        if let Some(output_dir) = overrides.export_dir {
            self.export.output_dir = output_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_contact(&self.contact)?;
        validate_export(&self.export)?;
        validate_logging(&self.logging)?;
        if self.agency.name.trim().is_empty() {
            return Err(ConfigError::Validation("agency.name must not be empty".to_string()));
        }
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || !matches!(chars.peek(), Some('{')) {
            output.push(ch);
            continue;
        }

        chars.next();
        let mut key = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(next) => key.push(next),
                None => return Err(ConfigError::UnterminatedInterpolation),
            }
        }

        let value =
            env::var(&key).map_err(|_| ConfigError::MissingEnvInterpolation { var: key })?;
        output.push_str(&value);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    match storage.backend {
        StorageBackend::Sqlite => {
            let url = storage.url.trim();
            let sqlite_url =
                url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
            if !sqlite_url {
                return Err(ConfigError::Validation(
                    "storage.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                        .to_string(),
                ));
            }
        }
        StorageBackend::File => {
            if storage.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "storage.path is required for the file backend".to_string(),
                ));
            }
        }
        StorageBackend::Memory => {}
    }

    if storage.max_connections == 0 {
        return Err(ConfigError::Validation(
            "storage.max_connections must be greater than zero".to_string(),
        ));
    }

    if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "storage.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_contact(contact: &ContactConfig) -> Result<(), ConfigError> {
    let number = contact.whatsapp_number.trim();
    if number.is_empty() || !number.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ConfigError::Validation(
            "contact.whatsapp_number must be digits only, in international form (e.g. 254700000000)"
                .to_string(),
        ));
    }

    if !crate::validation::validate_email(&contact.email) {
        return Err(ConfigError::Validation(format!(
            "contact.email `{}` is not a valid email address",
            contact.email
        )));
    }

    Ok(())
}

fn validate_export(export: &ExportConfig) -> Result<(), ConfigError> {
    if export.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("export.output_dir must not be empty".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    contact: Option<ContactPatch>,
    export: Option<ExportPatch>,
    agency: Option<AgencyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    url: Option<String>,
    path: Option<PathBuf>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactPatch {
    whatsapp_number: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExportPatch {
    output_dir: Option<PathBuf>,
    prefer_pdf: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct AgencyPatch {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StorageBackend};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_agency_contact_details() -> Result<(), String> {
        let config = AppConfig::default();
        config.validate().map_err(|err| err.to_string())?;

        ensure(config.contact.whatsapp_number == "254700000000", "default chat number")?;
        ensure(config.contact.email == "hello@creativeagency.co.ke", "default email")?;
        ensure(config.agency.name == "Creative Agency Kenya", "default agency name")?;
        ensure(config.storage.backend == StorageBackend::Sqlite, "sqlite is the default store")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_ATELIER_CHAT_NUMBER", "254711111111");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("atelier.toml");
            fs::write(
                &path,
                r#"
[contact]
whatsapp_number = "${TEST_ATELIER_CHAT_NUMBER}"
email = "studio@example.co.ke"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.contact.whatsapp_number == "254711111111",
                "chat number should be interpolated from the environment",
            )?;
            ensure(config.contact.email == "studio@example.co.ke", "email should come from file")
        })();

        clear_vars(&["TEST_ATELIER_CHAT_NUMBER"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("atelier.toml");
        fs::write(&path, "[agency]\nname = \"${ATELIER_TEST_UNSET_NAME}\"\n")
            .map_err(|err| err.to_string())?;

        match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }) {
            Err(ConfigError::MissingEnvInterpolation { var }) => {
                ensure(var == "ATELIER_TEST_UNSET_NAME", "error should name the variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected interpolation failure".to_string()),
        }
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATELIER_LOG_LEVEL", "warn");
        env::set_var("ATELIER_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["ATELIER_LOG_LEVEL", "ATELIER_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATELIER_STORAGE_URL", "sqlite://from-env.db");
        env::set_var("ATELIER_AGENCY_NAME", "Env Studio");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("atelier.toml");
            fs::write(
                &path,
                r#"
[storage]
url = "sqlite://from-file.db"

[agency]
name = "File Studio"

[export]
output_dir = "from-file"
prefer_pdf = false

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    storage_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.storage.url == "sqlite://from-override.db",
                "override storage url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.agency.name == "Env Studio", "env agency name should win over file")?;
            ensure(
                config.export.output_dir == PathBuf::from("from-file"),
                "file export dir should win over defaults",
            )?;
            ensure(!config.export.prefer_pdf, "file prefer_pdf should win over defaults")
        })();

        clear_vars(&["ATELIER_STORAGE_URL", "ATELIER_AGENCY_NAME"]);
        result
    }

    #[test]
    fn invalid_env_override_names_the_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATELIER_STORAGE_MAX_CONNECTIONS", "many");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "ATELIER_STORAGE_MAX_CONNECTIONS", "error should name the key")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected invalid override failure".to_string()),
        };

        clear_vars(&["ATELIER_STORAGE_MAX_CONNECTIONS"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATELIER_CONTACT_WHATSAPP_NUMBER", "+254 700 000 000");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("contact.whatsapp_number")
            );
            ensure(has_message, "validation failure should mention contact.whatsapp_number")
        })();

        clear_vars(&["ATELIER_CONTACT_WHATSAPP_NUMBER"]);
        result
    }

    #[test]
    fn sqlite_backend_rejects_non_sqlite_url() {
        let mut config = AppConfig::default();
        config.storage.url = "postgres://localhost/atelier".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(message)) if message.contains("storage.url")
        ));

        config.storage.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("FILE".parse::<StorageBackend>().ok(), Some(StorageBackend::File));
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn required_file_must_exist() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/atelier.toml")),
            require_file: true,
            ..LoadOptions::default()
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }
}
