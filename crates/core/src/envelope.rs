//! Uniform request/response wrappers shared by every skill.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL: u16 = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvocationEnvelope<T = Value> {
    pub data: T,
}

impl<T> InvocationEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Per-invocation execution context. Never influences the response payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationContext {
    pub correlation_id: String,
}

impl InvocationContext {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self { correlation_id: correlation_id.into() }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    pub fn ok(data: Value) -> Self {
        Self { status: STATUS_OK, data: Some(data), message: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: STATUS_NOT_FOUND, data: None, message: Some(message.into()) }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: STATUS_INTERNAL, data: None, message: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}
