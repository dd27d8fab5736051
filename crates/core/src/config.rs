use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proposal::PROPOSAL_OBJECT_NAME;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    pub object_name: String,
    pub project: Option<String>,
    pub location: Option<String>,
    pub access_token: Option<SecretString>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Gemini,
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
    pub bucket: Option<String>,
    pub object_name: Option<String>,
    pub storage_endpoint: Option<String>,
    pub storage_access_token: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
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

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro-preview-03-25";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                provider: LlmProvider::Gemini,
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                model: DEFAULT_MODEL.to_string(),
                timeout_secs: 60,
                temperature: 0.2,
            },
            storage: StorageConfig {
                bucket: String::new(),
                object_name: PROPOSAL_OBJECT_NAME.to_string(),
                project: None,
                location: None,
                access_token: None,
                endpoint: "https://storage.googleapis.com".to_string(),
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected gemini)"
            ))),
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

impl AppConfig {
    /// Resolve the effective configuration: defaults, then an optional
    /// `renoprop.toml`, then `RENOPROP_*` environment variables, then
    /// explicit overrides, then validation. Validation failure here is
    /// fatal at startup; the publish path never re-reads configuration.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("renoprop.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(bucket) = storage.bucket {
                self.storage.bucket = bucket;
            }
            if let Some(object_name) = storage.object_name {
                self.storage.object_name = object_name;
            }
            if let Some(project) = storage.project {
                self.storage.project = Some(project);
            }
            if let Some(location) = storage.location {
                self.storage.location = Some(location);
            }
            if let Some(access_token_value) = storage.access_token {
                self.storage.access_token = Some(secret_value(access_token_value));
            }
            if let Some(endpoint) = storage.endpoint {
                self.storage.endpoint = endpoint;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
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
        if let Some(value) = read_env("RENOPROP_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("RENOPROP_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("RENOPROP_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("RENOPROP_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("RENOPROP_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("RENOPROP_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("RENOPROP_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("RENOPROP_LLM_TEMPERATURE", &value)?;
        }

        if let Some(value) = read_env("RENOPROP_STORAGE_BUCKET") {
            self.storage.bucket = value;
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_OBJECT_NAME") {
            self.storage.object_name = value;
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_PROJECT") {
            self.storage.project = Some(value);
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_LOCATION") {
            self.storage.location = Some(value);
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_ACCESS_TOKEN") {
            self.storage.access_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_ENDPOINT") {
            self.storage.endpoint = value;
        }
        if let Some(value) = read_env("RENOPROP_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_u64("RENOPROP_STORAGE_TIMEOUT_SECS", &value)?;
        }

        let log_level =
            read_env("RENOPROP_LOGGING_LEVEL").or_else(|| read_env("RENOPROP_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RENOPROP_LOGGING_FORMAT").or_else(|| read_env("RENOPROP_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bucket) = overrides.bucket {
            self.storage.bucket = bucket;
        }
        if let Some(object_name) = overrides.object_name {
            self.storage.object_name = object_name;
        }
        if let Some(endpoint) = overrides.storage_endpoint {
            self.storage.endpoint = endpoint;
        }
        if let Some(access_token) = overrides.storage_access_token {
            self.storage.access_token = Some(secret_value(access_token));
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_storage(&self.storage)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("renoprop.toml"), PathBuf::from("config/renoprop.toml")]
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
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if llm.base_url.trim().is_empty() {
        return Err(ConfigError::Validation("llm.base_url must not be empty".to_string()));
    }

    let missing = llm
        .api_key
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if missing {
        return Err(ConfigError::Validation(
            "llm.api_key is required for the gemini provider".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.bucket.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.bucket is required (the destination object-storage bucket name)".to_string(),
        ));
    }

    if storage.object_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.object_name must not be empty".to_string(),
        ));
    }

    if storage.object_name.contains('/') {
        return Err(ConfigError::Validation(
            "storage.object_name must be a flat object key without `/`".to_string(),
        ));
    }

    let token_missing = storage
        .access_token
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if token_missing {
        return Err(ConfigError::Validation(
            "storage.access_token is required to authorize bucket uploads".to_string(),
        ));
    }

    if !storage.endpoint.starts_with("http://") && !storage.endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "storage.endpoint must start with http:// or https://".to_string(),
        ));
    }

    if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "storage.timeout_secs must be in range 1..=300".to_string(),
        ));
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

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    storage: Option<StoragePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    bucket: Option<String>,
    object_name: Option<String>,
    project: Option<String>,
    location: Option<String>,
    access_token: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
