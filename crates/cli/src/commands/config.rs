use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use renoprop_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let mut push = |key_path: &str, value: &str, env_key: &str| {
        lines.push(render_line(
            key_path,
            value,
            field_source(
                key_path,
                Some(env_key),
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        ));
    };

    push("llm.provider", &format!("{:?}", config.llm.provider), "RENOPROP_LLM_PROVIDER");
    push("llm.model", &config.llm.model, "RENOPROP_LLM_MODEL");
    push("llm.base_url", &config.llm.base_url, "RENOPROP_LLM_BASE_URL");
    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    push("llm.api_key", llm_api_key, "RENOPROP_LLM_API_KEY");
    push("llm.timeout_secs", &config.llm.timeout_secs.to_string(), "RENOPROP_LLM_TIMEOUT_SECS");
    push("llm.temperature", &config.llm.temperature.to_string(), "RENOPROP_LLM_TEMPERATURE");

    push("storage.bucket", &config.storage.bucket, "RENOPROP_STORAGE_BUCKET");
    push("storage.object_name", &config.storage.object_name, "RENOPROP_STORAGE_OBJECT_NAME");
    push(
        "storage.project",
        config.storage.project.as_deref().unwrap_or("<unset>"),
        "RENOPROP_STORAGE_PROJECT",
    );
    push(
        "storage.location",
        config.storage.location.as_deref().unwrap_or("<unset>"),
        "RENOPROP_STORAGE_LOCATION",
    );
    let access_token = config
        .storage
        .access_token
        .as_ref()
        .map(|token| redact_token(token.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    push("storage.access_token", &access_token, "RENOPROP_STORAGE_ACCESS_TOKEN");
    push("storage.endpoint", &config.storage.endpoint, "RENOPROP_STORAGE_ENDPOINT");
    push(
        "storage.timeout_secs",
        &config.storage.timeout_secs.to_string(),
        "RENOPROP_STORAGE_TIMEOUT_SECS",
    );

    push("logging.level", &config.logging.level, "RENOPROP_LOGGING_LEVEL");
    push("logging.format", &format!("{:?}", config.logging.format), "RENOPROP_LOGGING_FORMAT");

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("renoprop.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/renoprop.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('.') {
        return format!("{prefix}.***");
    }

    "<redacted>".to_string()
}
