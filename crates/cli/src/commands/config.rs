use std::env;
use std::fs;
use std::path::Path;

use smartshop_core::config::{detect_config_path, AppConfig, LoadOptions};
use smartshop_core::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

/// Plain-text report; an invalid config exits with the config failure code.
pub fn run(options: &LoadOptions) -> CommandResult {
    match AppConfig::load(options.clone()) {
        Ok(config) => CommandResult { exit_code: 0, output: render_report(options, &config) },
        Err(error) => {
            let output = format!("config validation failed: {error}");
            CommandResult { exit_code: ApplicationError::from(error).exit_code(), output }
        }
    }
}

fn render_report(options: &LoadOptions, config: &AppConfig) -> String {
    let config_file_path = options
        .config_path
        .clone()
        .filter(|path| path.exists())
        .or_else(detect_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key_path: "nudges.scan_interval",
            env_keys: &["SMARTSHOP_NUDGES_SCAN_INTERVAL"],
            value: config.nudges.scan_interval.to_string(),
        },
        ConfigField {
            key_path: "nudges.max_nudges",
            env_keys: &["SMARTSHOP_NUDGES_MAX_NUDGES"],
            value: config.nudges.max_nudges.to_string(),
        },
        ConfigField {
            key_path: "nudges.display_timeout_secs",
            env_keys: &["SMARTSHOP_NUDGES_DISPLAY_TIMEOUT_SECS"],
            value: config.nudges.display_timeout_secs.to_string(),
        },
        ConfigField {
            key_path: "catalog.path",
            env_keys: &["SMARTSHOP_CATALOG_PATH"],
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string()),
        },
        ConfigField {
            key_path: "catalog.currency_symbol",
            env_keys: &["SMARTSHOP_CATALOG_CURRENCY_SYMBOL"],
            value: config.catalog.currency_symbol.clone(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["SMARTSHOP_LOGGING_LEVEL", "SMARTSHOP_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["SMARTSHOP_LOGGING_FORMAT", "SMARTSHOP_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
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
    let set_env = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = set_env {
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
