//! Prompt assembly for negotiation strategy generation.

use procura_core::{MarketSignal, SupplierSnapshot};

const SYSTEM_INSTRUCTION: &str = "You are an expert procurement negotiation advisor.\n\
Your goal is to help the user negotiate better terms with the supplier.\n\
Use the provided data to identify leverage points and create a strategy.";

const JSON_RESPONSE_CONTRACT: &str = "Respond with a single JSON object of the form \
{\"leveragePoints\": [string], \"strategy\": string, \"talkingPoints\": [string]} \
and nothing else.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiationPrompt {
    pub system: String,
    pub user: String,
}

impl NegotiationPrompt {
    pub fn build(
        supplier: &SupplierSnapshot,
        market: &MarketSignal,
        objectives: &[String],
    ) -> Self {
        let user = format!(
            "Supplier: {name} (ID: {id})\n\
             Performance: Quality {quality}%, Delivery {delivery}%\n\
             Market Trend: {trend}\n\
             Objectives: {objectives}\n\
             \n\
             Please provide:\n\
             1. Key Leverage Points\n\
             2. Negotiation Strategy\n\
             3. Specific Talking Points",
            name = supplier.name,
            id = supplier.supplier_id,
            quality = supplier.rating.quality,
            delivery = supplier.rating.delivery,
            trend = market.trend,
            objectives = objectives.join(", "),
        );

        Self { system: SYSTEM_INSTRUCTION.to_string(), user }
    }

    /// Appends the structured-output contract a model backend must honor.
    pub fn with_json_response_contract(mut self) -> Self {
        self.system.push_str("\n\n");
        self.system.push_str(JSON_RESPONSE_CONTRACT);
        self
    }
}
