use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use procura_core::config::StrategyMode;
use procura_core::{
    InvocationContext, InvocationEnvelope, MarketSignal, NegotiationStrategy, ResponseEnvelope,
    SkillError, SupplierSnapshot,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{decode_request, encode_payload, respond, Skill};
use crate::llm::LlmClient;
use crate::prompt::NegotiationPrompt;

const INTERNAL_MESSAGE: &str = "Error generating strategy";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRequest {
    pub supplier_data: SupplierSnapshot,
    pub market_data: MarketSignal,
    pub objectives: Vec<String>,
}

/// Where the advisory payload comes from.
#[derive(Clone)]
pub enum StrategyBackend {
    /// Constant pilot payload. The prompt is assembled but not consumed.
    Placeholder,
    Model(Arc<dyn LlmClient>),
}

impl StrategyBackend {
    pub fn mode(&self) -> StrategyMode {
        match self {
            Self::Placeholder => StrategyMode::Placeholder,
            Self::Model(_) => StrategyMode::Model,
        }
    }
}

impl fmt::Debug for StrategyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("Placeholder"),
            Self::Model(_) => f.write_str("Model(..)"),
        }
    }
}

/// Generates a negotiation strategy from supplier and market data.
#[derive(Debug)]
pub struct NegotiationStrategySkill {
    backend: StrategyBackend,
}

impl NegotiationStrategySkill {
    pub const NAME: &'static str = "generate-strategy";

    pub fn new(backend: StrategyBackend) -> Self {
        Self { backend }
    }

    pub fn placeholder() -> Self {
        Self::new(StrategyBackend::Placeholder)
    }

    pub fn with_model(client: Arc<dyn LlmClient>) -> Self {
        Self::new(StrategyBackend::Model(client))
    }

    pub fn mode(&self) -> StrategyMode {
        self.backend.mode()
    }

    pub async fn generate(
        &self,
        request: &StrategyRequest,
    ) -> Result<NegotiationStrategy, SkillError> {
        let prompt = NegotiationPrompt::build(
            &request.supplier_data,
            &request.market_data,
            &request.objectives,
        );

        match &self.backend {
            StrategyBackend::Placeholder => {
                debug!(
                    event_name = "skill.strategy.placeholder",
                    supplier_id = %request.supplier_data.supplier_id,
                    prompt_chars = prompt.system.len() + prompt.user.len(),
                    "serving placeholder negotiation strategy"
                );
                Ok(placeholder_strategy())
            }
            StrategyBackend::Model(client) => {
                let completion = client
                    .complete(&prompt.with_json_response_contract())
                    .await
                    .map_err(|error| SkillError::Backend(format!("{error:#}")))?;
                parse_completion(&completion)
            }
        }
    }
}

#[async_trait]
impl Skill for NegotiationStrategySkill {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Generate a negotiation strategy from supplier performance and market data"
    }

    async fn invoke(
        &self,
        envelope: InvocationEnvelope<Value>,
        context: &InvocationContext,
    ) -> ResponseEnvelope {
        let outcome = async {
            let request: StrategyRequest = decode_request(envelope.data)?;
            let strategy = self.generate(&request).await?;
            encode_payload(&strategy)
        }
        .await;

        respond(Self::NAME, outcome, context, INTERNAL_MESSAGE)
    }
}

fn placeholder_strategy() -> NegotiationStrategy {
    NegotiationStrategy {
        leverage_points: vec![
            "High quality score (95%) justifies maintaining relationship".to_string(),
            "Delivery score (88%) is slightly below target, use as leverage for price".to_string(),
            "Market trend is stable, so no external pressure for price increases".to_string(),
        ],
        strategy: "Collaborative approach focusing on delivery improvements in exchange for \
                   contract renewal."
            .to_string(),
        talking_points: vec![
            "We value our partnership and your high quality standards.".to_string(),
            "However, we've noticed some delivery delays recently.".to_string(),
            "If you can commit to 95% on-time delivery, we can discuss extending the contract."
                .to_string(),
        ],
    }
}

/// Extracts the JSON object from a completion, tolerating prose or code fences
/// around it.
fn parse_completion(completion: &str) -> Result<NegotiationStrategy, SkillError> {
    let start = completion.find('{');
    let end = completion.rfind('}');
    let body = match (start, end) {
        (Some(start), Some(end)) if start < end => &completion[start..=end],
        _ => {
            return Err(SkillError::Backend("completion did not contain a JSON object".to_string()))
        }
    };

    let strategy: NegotiationStrategy = serde_json::from_str(body)
        .map_err(|error| SkillError::Backend(format!("completion is not a strategy: {error}")))?;
    if !strategy.is_complete() {
        return Err(SkillError::Backend("completion left a strategy section empty".to_string()));
    }

    Ok(strategy)
}
