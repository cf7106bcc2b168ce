use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    pub strategy: StrategyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default)]
pub struct DirectoryConfig {
    /// Supplier fixture file. `None` serves the built-in pilot suppliers.
    pub fixtures_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct StrategyConfig {
    pub mode: StrategyMode,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// How the strategy skill produces its advisory payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Fixed pilot payload, independent of input.
    #[default]
    Placeholder,
    /// Delegate the constructed prompt to a language-model client.
    Model,
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
    pub fixtures_path: Option<PathBuf>,
    pub strategy_mode: Option<StrategyMode>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for StrategyMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "model" => Ok(Self::Model),
            other => Err(ConfigError::Validation(format!(
                "unsupported strategy mode `{other}` (expected placeholder|model)"
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
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(directory) = patch.directory {
            if let Some(fixtures_path) = directory.fixtures_path {
                self.directory.fixtures_path = Some(fixtures_path);
            }
        }

        if let Some(strategy) = patch.strategy {
            if let Some(mode) = strategy.mode {
                self.strategy.mode = mode;
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
        if let Some(value) = read_env("PROCURA_DIRECTORY_FIXTURES_PATH") {
            self.directory.fixtures_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("PROCURA_STRATEGY_MODE") {
            self.strategy.mode = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "PROCURA_STRATEGY_MODE".to_string(),
                value,
            })?;
        }

        let log_level =
            read_env("PROCURA_LOGGING_LEVEL").or_else(|| read_env("PROCURA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PROCURA_LOGGING_FORMAT").or_else(|| read_env("PROCURA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(fixtures_path) = overrides.fixtures_path {
            self.directory.fixtures_path = Some(fixtures_path);
        }
        if let Some(strategy_mode) = overrides.strategy_mode {
            self.strategy.mode = strategy_mode;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_directory(&self.directory)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Candidate config file locations, in lookup order.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["procura.toml", "config/procura.toml"];

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_PATHS.into_iter().map(PathBuf::from).find(|path| path.exists())
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

fn validate_directory(directory: &DirectoryConfig) -> Result<(), ConfigError> {
    let Some(path) = &directory.fixtures_path else {
        return Ok(());
    };

    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "directory.fixtures_path must not be empty when set".to_string(),
        ));
    }

    let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
    if !is_toml {
        return Err(ConfigError::Validation(format!(
            "directory.fixtures_path must point to a `.toml` file (got `{}`)",
            path.display()
        )));
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

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    directory: Option<DirectoryPatch>,
    strategy: Option<StrategyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryPatch {
    fixtures_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct StrategyPatch {
    mode: Option<StrategyMode>,
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

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StrategyMode};

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
    fn defaults_serve_pilot_data_in_placeholder_mode() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let config = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.directory.fixtures_path.is_none(), "default should use pilot suppliers")?;
        ensure(config.strategy.mode == StrategyMode::Placeholder, "default mode is placeholder")?;
        ensure(config.logging.level == "info", "default log level is info")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_PROCURA_FIXTURES", "/srv/procura/suppliers.toml");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("procura.toml");
            fs::write(
                &path,
                r#"
[directory]
fixtures_path = "${TEST_PROCURA_FIXTURES}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.directory.fixtures_path
                    == Some(PathBuf::from("/srv/procura/suppliers.toml")),
                "fixtures path should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_PROCURA_FIXTURES"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["TEST_PROCURA_UNSET"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("procura.toml");
        fs::write(&path, "[logging]\nlevel = \"${TEST_PROCURA_UNSET}\"\n")
            .map_err(|err| err.to_string())?;

        match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }) {
            Err(ConfigError::MissingEnvInterpolation { var }) => {
                ensure(var == "TEST_PROCURA_UNSET", "error should name the missing variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected interpolation failure".to_string()),
        }
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCURA_LOG_LEVEL", "warn");
        env::set_var("PROCURA_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["PROCURA_LOG_LEVEL", "PROCURA_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCURA_STRATEGY_MODE", "model");
        env::set_var("PROCURA_DIRECTORY_FIXTURES_PATH", "from-env.toml");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("procura.toml");
            fs::write(
                &path,
                r#"
[directory]
fixtures_path = "from-file.toml"

[strategy]
mode = "placeholder"

[logging]
level = "warn"
format = "json"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    fixtures_path: Some(PathBuf::from("from-override.toml")),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.directory.fixtures_path == Some(PathBuf::from("from-override.toml")),
                "override fixtures path should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "file log format should win over default",
            )?;
            ensure(
                config.strategy.mode == StrategyMode::Model,
                "env strategy mode should win over file",
            )
        })();

        clear_vars(&["PROCURA_STRATEGY_MODE", "PROCURA_DIRECTORY_FIXTURES_PATH"]);
        result
    }

    #[test]
    fn invalid_strategy_mode_env_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCURA_STRATEGY_MODE", "oracle");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, value }) => ensure(
                key == "PROCURA_STRATEGY_MODE" && value == "oracle",
                "error should name the offending variable and value",
            ),
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected invalid env override".to_string()),
        };

        clear_vars(&["PROCURA_STRATEGY_MODE"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PROCURA_DIRECTORY_FIXTURES_PATH", "suppliers.json");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("directory.fixtures_path")
            );
            ensure(has_message, "validation failure should mention directory.fixtures_path")
        })();

        clear_vars(&["PROCURA_DIRECTORY_FIXTURES_PATH"]);
        result
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(
            matches!(
                result,
                Err(ConfigError::Validation(ref message)) if message.contains("logging.level")
            ),
            "unknown log level should fail validation",
        )
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("procura.toml");
        fs::write(&path, "[strategy\nmode = \"placeholder\"\n").map_err(|err| err.to_string())?;

        let options = LoadOptions { config_path: Some(path.clone()), ..LoadOptions::default() };
        match AppConfig::load(options) {
            Err(ConfigError::ParseFile { path: reported, .. }) => {
                ensure(reported == path, "parse error should name the config file")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected parse failure".to_string()),
        }
    }

    #[test]
    fn unreadable_config_path_is_a_read_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().to_path_buf()),
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::ReadFile { .. })),
            "a directory in place of the config file should fail to read",
        )
    }
}
