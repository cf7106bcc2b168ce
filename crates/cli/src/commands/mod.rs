pub mod config;
pub mod lookup;
pub mod skills;
pub mod smoke;
pub mod strategy;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use procura_agent::{SkillRegistry, StrategyBackend};
use procura_core::config::{AppConfig, LoadOptions, StrategyMode};
use procura_core::{ResponseEnvelope, StaticSupplierDirectory};
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_SETUP: u8 = 3;
pub const EXIT_SKILL_FAILURE: u8 = 4;
pub const EXIT_SMOKE_FAILURE: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Prints the response envelope as the command output. Non-success
    /// envelopes exit with [`EXIT_SKILL_FAILURE`].
    pub fn envelope(response: &ResponseEnvelope) -> Self {
        let output = serde_json::to_string(response).unwrap_or_else(|error| {
            format!(
                "{{\"status\":500,\"message\":\"response serialization failed: {}\"}}",
                escape_json(&error.to_string())
            )
        });
        let exit_code = if response.is_success() { 0 } else { EXIT_SKILL_FAILURE };
        Self { exit_code, output }
    }
}

/// Builds the skill registry the CLI invokes, wiring the configured supplier
/// directory and strategy backend.
pub fn build_registry(config: &AppConfig) -> Result<SkillRegistry> {
    let directory = match &config.directory.fixtures_path {
        Some(path) => StaticSupplierDirectory::from_toml_file(path)
            .with_context(|| format!("failed to load supplier fixtures `{}`", path.display()))?,
        None => StaticSupplierDirectory::pilot(),
    };

    let backend = match config.strategy.mode {
        StrategyMode::Placeholder => StrategyBackend::Placeholder,
        StrategyMode::Model => bail!(
            "strategy.mode `model` needs a language-model client and none is available to the CLI; \
             use `placeholder`"
        ),
    };

    Ok(SkillRegistry::procurement(Arc::new(directory), backend))
}

/// Loads config and the registry, or the failure result to print instead.
pub(crate) fn prepare(command: &str) -> Result<SkillRegistry, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
    })?;
    build_registry(&config).map_err(|error| {
        CommandResult::failure(command, "registry_setup", format!("{error:#}"), EXIT_SETUP)
    })
}

pub(crate) fn current_thread_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    })
}

pub(crate) fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
