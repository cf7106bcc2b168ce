//! Procurement skills - supplier lookup and negotiation strategy generation
//!
//! Every skill is a stateless adapter behind the same invocation contract:
//! an [`InvocationEnvelope`](procura_core::InvocationEnvelope) and an
//! [`InvocationContext`](procura_core::InvocationContext) go in, a
//! [`ResponseEnvelope`](procura_core::ResponseEnvelope) comes out. Faults are
//! caught at the skill boundary and normalized into a 404 or 500 response.
//!
//! # Key Types
//!
//! - `Skill` / `SkillRegistry` - the invocation contract and name-based dispatch
//! - `SupplierLookupSkill` - reads an injected `SupplierDirectory`
//! - `NegotiationStrategySkill` - builds a `NegotiationPrompt` and answers with
//!   either the fixed placeholder payload or an `LlmClient` completion

pub mod llm;
pub mod prompt;
pub mod skills;

pub use skills::{
    NegotiationStrategySkill, RegistryError, Skill, SkillRegistry, StrategyBackend,
    StrategyRequest, SupplierLookupRequest, SupplierLookupSkill,
};
