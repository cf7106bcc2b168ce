use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub trend: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationStrategy {
    pub leverage_points: Vec<String>,
    pub strategy: String,
    pub talking_points: Vec<String>,
}

impl NegotiationStrategy {
    /// True when every advisory section carries content.
    pub fn is_complete(&self) -> bool {
        !self.leverage_points.is_empty()
            && !self.talking_points.is_empty()
            && !self.strategy.trim().is_empty()
    }
}
