use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use procura_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_PATHS};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: EXIT_CONFIG,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fixtures_path = config
        .directory
        .fixtures_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<pilot suppliers>".to_string());

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "directory.fixtures_path",
            &fixtures_path,
            source("directory.fixtures_path", &["PROCURA_DIRECTORY_FIXTURES_PATH"]),
        ),
        render_line(
            "strategy.mode",
            &format!("{:?}", config.strategy.mode),
            source("strategy.mode", &["PROCURA_STRATEGY_MODE"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["PROCURA_LOGGING_LEVEL", "PROCURA_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["PROCURA_LOGGING_FORMAT", "PROCURA_LOG_FORMAT"]),
        ),
    ];

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_PATHS.into_iter().map(PathBuf::from).find(|path| path.exists())
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
