use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use procura_core::{
    InvocationContext, InvocationEnvelope, ResponseEnvelope, SkillError, SupplierDirectory,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub mod strategy;
pub mod supplier_lookup;

pub use strategy::{NegotiationStrategySkill, StrategyBackend, StrategyRequest};
pub use supplier_lookup::{SupplierLookupRequest, SupplierLookupSkill};

/// A stateless operation translating an invocation envelope into a response
/// envelope. Faults never escape `invoke`; they are folded into the response.
#[async_trait]
pub trait Skill: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn invoke(
        &self,
        envelope: InvocationEnvelope<Value>,
        context: &InvocationContext,
    ) -> ResponseEnvelope;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no skill registered under `{0}`")]
    UnknownSkill(String),
}

#[derive(Default)]
pub struct SkillRegistry {
    skills: HashMap<String, Box<dyn Skill>>,
}

impl SkillRegistry {
    /// Registry with the supplier lookup and strategy generation skills.
    pub fn procurement(directory: Arc<dyn SupplierDirectory>, backend: StrategyBackend) -> Self {
        let mut registry = Self::default();
        registry.register(SupplierLookupSkill::new(directory));
        registry.register(NegotiationStrategySkill::new(backend));
        registry
    }

    pub fn register<T>(&mut self, skill: T)
    where
        T: Skill + 'static,
    {
        self.skills.insert(skill.name().to_string(), Box::new(skill));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Skill> {
        self.skills.get(name).map(|skill| &**skill)
    }

    /// Registered skill names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub async fn invoke(
        &self,
        name: &str,
        envelope: InvocationEnvelope<Value>,
        context: &InvocationContext,
    ) -> Result<ResponseEnvelope, RegistryError> {
        let skill = self.get(name).ok_or_else(|| RegistryError::UnknownSkill(name.to_string()))?;
        Ok(skill.invoke(envelope, context).await)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

pub(crate) fn decode_request<T: DeserializeOwned>(data: Value) -> Result<T, SkillError> {
    serde_json::from_value(data).map_err(|error| SkillError::InvalidInput(error.to_string()))
}

pub(crate) fn encode_payload<T: Serialize>(payload: &T) -> Result<Value, SkillError> {
    serde_json::to_value(payload)
        .map_err(|error| SkillError::Backend(format!("could not encode response payload: {error}")))
}

/// Normalizes a skill outcome into the uniform response shape.
pub(crate) fn respond(
    skill: &'static str,
    outcome: Result<Value, SkillError>,
    context: &InvocationContext,
    internal_message: &str,
) -> ResponseEnvelope {
    match outcome {
        Ok(data) => ResponseEnvelope::ok(data),
        Err(error @ SkillError::NotFound { .. }) => {
            debug!(
                event_name = "skill.invoke.not_found",
                correlation_id = %context.correlation_id,
                skill,
                error = %error,
                "skill lookup missed"
            );
            ResponseEnvelope::not_found(error.user_message(internal_message))
        }
        Err(error) => {
            error!(
                event_name = "skill.invoke.failed",
                correlation_id = %context.correlation_id,
                skill,
                error = %error,
                "{internal_message}"
            );
            ResponseEnvelope::internal(error.user_message(internal_message))
        }
    }
}
